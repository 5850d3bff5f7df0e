use anyhow::Result;
use std::path::Path;

use crate::output_path;
use crate::page_select::PageSet;
use crate::pdf::PdfDocument;

pub fn run(input: &Path, angle: u32, pages: Option<&str>, output: Option<&Path>) -> Result<()> {
    let mut doc = PdfDocument::open(input)?;
    let total_pages = doc.page_count();

    let selection = match pages {
        Some(spec) => PageSet::parse(spec, total_pages)?,
        None => PageSet::all(total_pages),
    };
    if selection.is_empty() {
        println!("No pages selected; '{}' left unchanged", input.display());
        return Ok(());
    }

    doc.rotate_pages(&selection.page_numbers(), angle as i64)?;

    let target = output.unwrap_or(input);
    output_path::ensure_parent_dir(target)?;
    PdfDocument::save(&mut doc.doc, target)?;

    println!(
        "Rotated {} page(s) by {} degrees; saved to '{}'",
        selection.len(),
        angle,
        target.display()
    );
    Ok(())
}
