use anyhow::Result;
use std::path::Path;

use crate::output_path;
use crate::page_select;
use crate::pdf::PdfDocument;

pub fn run(input: &Path, order_spec: &str, output: Option<&Path>) -> Result<()> {
    let doc = PdfDocument::open(input)?;
    let order = page_select::parse_page_order(order_spec, doc.page_count())?;

    let page_numbers: Vec<u32> = order.iter().map(|&idx| idx as u32 + 1).collect();
    let mut reordered = doc.reorder_pages(&page_numbers)?;

    let target = output.unwrap_or(input);
    output_path::ensure_parent_dir(target)?;
    PdfDocument::save(&mut reordered, target)?;

    match output {
        Some(path) => println!("Reordered and saved to '{}'", path.display()),
        None => println!("Reordered '{}' in place", input.display()),
    }
    Ok(())
}
