use anyhow::{Context, Result};
use std::path::Path;

use crate::error::PdfProError;
use crate::output_path;
use crate::page_select::PageSet;
use crate::pdf::PdfDocument;

pub fn run(input: &Path, pages_spec: &str, output: Option<&Path>) -> Result<()> {
    let mut doc = PdfDocument::open(input)?;
    let total_pages = doc.page_count();

    let selection = PageSet::parse(pages_spec, total_pages)?;
    if selection.is_empty() {
        // Nothing to delete, but an explicit output still gets its copy.
        match output {
            Some(path) => {
                output_path::ensure_parent_dir(path)?;
                PdfDocument::save(&mut doc.doc, path)?;
                println!(
                    "No pages selected; copied '{}' to '{}' unchanged",
                    input.display(),
                    path.display()
                );
            }
            None => println!("No pages selected; '{}' left unchanged", input.display()),
        }
        return Ok(());
    }
    if selection.len() == total_pages {
        return Err(PdfProError::EmptySelection)
            .context("deleting every page would leave an empty document");
    }

    let mut trimmed = doc.without_pages(&selection.page_numbers());

    let target = output.unwrap_or(input);
    output_path::ensure_parent_dir(target)?;
    PdfDocument::save(&mut trimmed, target)?;

    println!(
        "Deleted {} page(s); saved to '{}'",
        selection.len(),
        target.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Document, Object};

    fn write_sample_pdf(path: &Path, page_count: usize) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let kids: Vec<Object> = (0..page_count)
            .map(|_| {
                let page_id = doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                });
                Object::Reference(page_id)
            })
            .collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_empty_selection_with_output_writes_copy() {
        let dir = std::env::temp_dir().join("pdfpro_delete_empty_selection");
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("in.pdf");
        let output = dir.join("copy.pdf");
        let _ = std::fs::remove_file(&output);
        write_sample_pdf(&input, 2);

        run(&input, "  ", Some(&output)).unwrap();

        let copy = PdfDocument::open(&output).unwrap();
        assert_eq!(copy.page_count(), 2);
    }

    #[test]
    fn test_deleting_every_page_is_refused() {
        let dir = std::env::temp_dir().join("pdfpro_delete_all_pages");
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("in.pdf");
        write_sample_pdf(&input, 2);

        assert!(run(&input, "1-2", None).is_err());
    }
}
