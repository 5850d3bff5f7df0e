use anyhow::{Context, Result};
use std::path::Path;

use crate::error::PdfProError;
use crate::output_path;
use crate::pdf;

pub fn run(input: &Path, output: &Path) -> Result<()> {
    if !input.exists() {
        return Err(PdfProError::FileNotFound(input.to_path_buf()).into());
    }

    let text = pdf::text::extract_text(input)?;

    output_path::ensure_parent_dir(output)?;
    std::fs::write(output, text)
        .with_context(|| PdfProError::WriteFailure(output.to_path_buf()))?;

    println!(
        "Extracted text from '{}' to '{}'",
        input.display(),
        output.display()
    );
    Ok(())
}
