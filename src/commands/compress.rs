use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::CompressionLevel;
use crate::output_path;
use crate::pdf::PdfDocument;

pub fn run(input: &Path, output: &Path, level: CompressionLevel) -> Result<()> {
    let original_size = std::fs::metadata(input)
        .with_context(|| format!("Failed to read input: {}", input.display()))?
        .len();

    let mut doc = PdfDocument::open(input)?;
    match level {
        CompressionLevel::Basic => {
            doc.doc.compress();
        }
        CompressionLevel::Strong => {
            let _ = doc.doc.prune_objects();
            let _ = doc.doc.delete_zero_length_streams();
            doc.doc.compress();
            doc.doc.renumber_objects();
        }
    }

    output_path::ensure_parent_dir(output)?;
    PdfDocument::save(&mut doc.doc, output)?;

    let compressed_size = std::fs::metadata(output)
        .with_context(|| format!("Failed to read output: {}", output.display()))?
        .len();
    let saved = original_size.saturating_sub(compressed_size);
    let percent = if original_size > 0 {
        saved as f64 / original_size as f64 * 100.0
    } else {
        0.0
    };

    println!(
        "Compressed '{}' into '{}'",
        input.display(),
        output.display()
    );
    println!("  Original:   {:.2} KB", original_size as f64 / 1024.0);
    println!("  Compressed: {:.2} KB", compressed_size as f64 / 1024.0);
    println!("  Reduction:  {:.2} KB ({percent:.2}%)", saved as f64 / 1024.0);
    Ok(())
}
