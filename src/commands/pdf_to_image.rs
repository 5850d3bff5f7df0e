use anyhow::{anyhow, Result};
use std::path::Path;

use crate::cli::PageImageFormat;
use crate::error::PdfProError;
use crate::output_path;
use crate::page_select::PageSet;
use crate::pdf::render;

pub fn run(
    input: &Path,
    output_spec: &str,
    pages: Option<&str>,
    format: PageImageFormat,
    dpi: u32,
) -> Result<()> {
    if !input.exists() {
        return Err(PdfProError::FileNotFound(input.to_path_buf()).into());
    }

    let pdfium = render::bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(input, None)
        .map_err(|err| anyhow!("Failed to open PDF: {}: {err}", input.display()))?;
    let total_pages = document.pages().len() as usize;

    let selection = match pages {
        Some(spec) => PageSet::parse(spec, total_pages)?,
        None => PageSet::all(total_pages),
    };
    if selection.is_empty() {
        println!("No pages selected for conversion.");
        return Ok(());
    }

    let extension = format.extension();
    let mut converted = 0;
    let mut failed = 0;
    for index in selection.iter() {
        match convert_page(&document, index, input, output_spec, format, dpi) {
            Ok(path) => {
                println!("Saved page {} to '{}'", index + 1, path.display());
                converted += 1;
            }
            Err(err) => {
                eprintln!("Failed to convert page {}: {err:#}", index + 1);
                failed += 1;
            }
        }
    }

    println!("Converted {converted} page(s) to {extension} images");
    if failed > 0 {
        anyhow::bail!("{failed} page(s) could not be converted");
    }
    Ok(())
}

fn convert_page(
    document: &pdfium_render::prelude::PdfDocument,
    index: usize,
    input: &Path,
    output_spec: &str,
    format: PageImageFormat,
    dpi: u32,
) -> Result<std::path::PathBuf> {
    let pages = document.pages();
    let page = pages
        .get(index as u16)
        .map_err(|err| anyhow!("failed to load page: {err}"))?;
    let rendered = render::render_page(&page, dpi)?;

    let path = output_path::resolve_image(input, output_spec, index + 1, format.extension());
    output_path::ensure_parent_dir(&path)?;

    let result = match format {
        // JPEG cannot carry the rendered alpha channel.
        PageImageFormat::Jpg => rendered.to_rgb8().save(&path),
        PageImageFormat::Png => rendered.save(&path),
    };
    result.map_err(|_| PdfProError::WriteFailure(path.clone()))?;
    Ok(path)
}
