use anyhow::Result;
use std::path::Path;

use crate::output_path;
use crate::pdf::security;
use crate::pdf::PdfDocument;

pub struct EncryptOptions {
    pub user_password: Option<String>,
    pub owner_password: Option<String>,
    pub allow_print: bool,
    pub allow_modify: bool,
    pub allow_copy: bool,
    pub allow_annotate: bool,
    pub strength: u16,
}

pub fn run(input: &Path, output: &Path, options: &EncryptOptions) -> Result<()> {
    if options.user_password.is_none() && options.owner_password.is_none() {
        anyhow::bail!("At least one of --user-password or --owner-password is required");
    }

    let user_password = options.user_password.clone().unwrap_or_default();
    // An absent owner password falls back to the user password so the
    // document always has a full-access credential.
    let owner_password = options
        .owner_password
        .clone()
        .unwrap_or_else(|| user_password.clone());

    let permissions = security::permissions_from_flags(
        options.allow_print,
        options.allow_modify,
        options.allow_copy,
        options.allow_annotate,
    );

    let mut doc = PdfDocument::open(input)?;
    security::encrypt(
        &mut doc.doc,
        &security::EncryptionOptions {
            user_password: user_password.clone(),
            owner_password,
            key_length: options.strength,
            permissions,
        },
    )?;

    output_path::ensure_parent_dir(output)?;
    PdfDocument::save(&mut doc.doc, output)?;

    println!(
        "Encrypted '{}' with {}-bit AES; saved to '{}'",
        input.display(),
        options.strength,
        output.display()
    );
    println!(
        "  User password: {}  Owner password: set",
        if user_password.is_empty() { "not set" } else { "set" }
    );
    println!(
        "  Permissions: print={} modify={} copy={} annotate={}",
        options.allow_print, options.allow_modify, options.allow_copy, options.allow_annotate
    );
    Ok(())
}
