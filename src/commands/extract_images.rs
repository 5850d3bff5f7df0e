use anyhow::{Context, Result};
use std::io::Cursor;
use std::path::Path;

use crate::cli::ExtractedImageFormat;
use crate::pdf::images::{extract_embedded_images, EmbeddedImage};
use crate::pdf::PdfDocument;

pub fn run(input: &Path, output_dir: &Path, format: ExtractedImageFormat) -> Result<()> {
    let doc = PdfDocument::open(input)?;
    let images = extract_embedded_images(&doc.doc)?;

    if images.is_empty() {
        println!("No images found in '{}'", input.display());
        return Ok(());
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let mut saved = 0;
    let mut failed = 0;
    for image in &images {
        let (data, extension) = convert_image(image, format);
        let path = output_dir.join(format!(
            "image_p{}_{}.{}",
            image.page_number, image.index, extension
        ));
        match std::fs::write(&path, data) {
            Ok(()) => {
                println!("Saved '{}'", path.display());
                saved += 1;
            }
            Err(err) => {
                eprintln!("Failed to save '{}': {err}", path.display());
                failed += 1;
            }
        }
    }

    println!(
        "Extracted {} image(s) to '{}'",
        saved,
        output_dir.display()
    );
    if failed > 0 {
        anyhow::bail!("{failed} image(s) could not be written");
    }
    Ok(())
}

/// Re-encode an image into the requested format where possible, keeping the
/// native bytes as a fallback.
fn convert_image(image: &EmbeddedImage, format: ExtractedImageFormat) -> (Vec<u8>, &'static str) {
    if image.extension == format.extension() {
        return (image.data.clone(), image.extension);
    }
    match transcode(&image.data, format) {
        Some(converted) => (converted, format.extension()),
        None => {
            log::warn!(
                "Could not convert image_p{}_{} to {}; keeping {}",
                image.page_number,
                image.index,
                format.extension(),
                image.extension
            );
            (image.data.clone(), image.extension)
        }
    }
}

fn transcode(data: &[u8], format: ExtractedImageFormat) -> Option<Vec<u8>> {
    let decoded = image::load_from_memory(data).ok()?;
    // JPEG has no alpha channel.
    let decoded = match format {
        ExtractedImageFormat::Jpg => image::DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => decoded,
    };
    let mut out = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut out), format.image_format())
        .ok()?;
    Some(out)
}
