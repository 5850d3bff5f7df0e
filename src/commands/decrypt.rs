use anyhow::Result;
use std::path::Path;

use crate::output_path;
use crate::pdf::security;
use crate::pdf::PdfDocument;

pub fn run(input: &Path, password: &str, output: &Path) -> Result<()> {
    let mut doc = PdfDocument::open(input)?;
    let was_encrypted = security::decrypt(&mut doc.doc, password)?;

    output_path::ensure_parent_dir(output)?;
    PdfDocument::save(&mut doc.doc, output)?;

    if was_encrypted {
        println!(
            "Decrypted '{}'; saved to '{}'",
            input.display(),
            output.display()
        );
    } else {
        println!(
            "'{}' is not encrypted; saved a copy to '{}'",
            input.display(),
            output.display()
        );
    }
    Ok(())
}
