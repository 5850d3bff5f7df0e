use anyhow::{anyhow, Result};
use image::GenericImageView;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

use crate::output_path;
use crate::pdf::render;

pub fn run(inputs: &[PathBuf], output: &Path) -> Result<()> {
    let pdfium = render::bind_pdfium()?;
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|err| anyhow!("failed to create PDF: {err}"))?;

    let mut added = 0;
    for path in inputs {
        match add_image_page(&mut document, path) {
            Ok(()) => {
                println!("Added '{}'", path.display());
                added += 1;
            }
            Err(err) => {
                // Unreadable inputs are skipped, not fatal.
                eprintln!("Skipping '{}': {err:#}", path.display());
            }
        }
    }

    if added == 0 {
        anyhow::bail!("No images could be processed; output PDF not created");
    }

    output_path::ensure_parent_dir(output)?;
    document
        .save_to_file(output)
        .map_err(|err| anyhow!("Failed to save PDF: {}: {err}", output.display()))?;

    println!(
        "Created '{}' from {} image(s)",
        output.display(),
        added
    );
    Ok(())
}

fn add_image_page(document: &mut PdfDocument, path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("image file not found");
    }
    let image = image::open(path)?;
    let (width_px, height_px) = image.dimensions();

    // One point per pixel keeps the aspect ratio without picking a DPI.
    let width = PdfPoints::new(width_px as f32);
    let height = PdfPoints::new(height_px as f32);

    let mut object = PdfPageImageObject::new(document, &image)
        .map_err(|err| anyhow!("failed to embed image: {err}"))?;
    object
        .scale(width.value, height.value)
        .map_err(|err| anyhow!("failed to scale image: {err}"))?;

    let mut page = document
        .pages_mut()
        .create_page_at_end(PdfPagePaperSize::Custom(width, height))
        .map_err(|err| anyhow!("failed to create page: {err}"))?;
    page.objects_mut()
        .add_image_object(object)
        .map_err(|err| anyhow!("failed to place image: {err}"))?;
    Ok(())
}
