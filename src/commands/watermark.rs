use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::WatermarkPosition;
use crate::error::PdfProError;
use crate::output_path;
use crate::page_select::PageSet;
use crate::pdf::overlay::{self, Overlay};
use crate::pdf::PdfDocument;

const MARGIN: f32 = 20.0;

pub struct WatermarkOptions {
    pub text: Option<String>,
    pub image: Option<PathBuf>,
    pub font_name: String,
    pub font_size: f32,
    pub color: (f32, f32, f32),
    pub opacity: f32,
    pub position: WatermarkPosition,
    pub rotation: f32,
    pub pages: Option<String>,
}

pub fn run(input: &Path, output: &Path, options: &WatermarkOptions) -> Result<()> {
    let mut doc = PdfDocument::open(input)?;
    let total_pages = doc.page_count();

    let selection = match &options.pages {
        Some(spec) => PageSet::parse(spec, total_pages)?,
        None => PageSet::all(total_pages),
    };
    if selection.is_empty() {
        println!("No pages selected; saving '{}' unchanged", output.display());
    }

    let page_ids = doc.page_ids();
    let targets: Vec<_> = page_ids
        .iter()
        .filter(|(num, _)| selection.contains(*num as usize - 1))
        .collect();

    match (&options.text, &options.image) {
        (Some(text), None) => {
            let overlay = Overlay::new(&mut doc.doc, &options.font_name, options.opacity);
            for &&(_, page_id) in &targets {
                let (page_w, page_h) = overlay::page_size(&doc.doc, page_id);
                let (origin, rotation) = text_placement(
                    options.position,
                    options.rotation,
                    page_w,
                    page_h,
                    text,
                    options.font_size,
                );
                overlay.stamp_text(
                    &mut doc.doc,
                    page_id,
                    text,
                    options.font_size,
                    options.color,
                    origin,
                    rotation,
                )?;
            }
        }
        (None, Some(image_path)) => {
            let bytes = std::fs::read(image_path)
                .with_context(|| PdfProError::FileNotFound(image_path.clone()))?;
            let (image_w, image_h) = image::image_dimensions(image_path).with_context(|| {
                format!("Failed to read image: {}", image_path.display())
            })?;
            for &&(_, page_id) in &targets {
                let (page_w, page_h) = overlay::page_size(&doc.doc, page_id);
                let (origin, size) = image_placement(
                    options.position,
                    page_w,
                    page_h,
                    image_w as f32,
                    image_h as f32,
                );
                overlay::stamp_image(&mut doc.doc, page_id, bytes.clone(), origin, size)?;
            }
        }
        _ => anyhow::bail!("Specify either --text or --image, not both"),
    }

    output_path::ensure_parent_dir(output)?;
    PdfDocument::save(&mut doc.doc, output)?;

    println!(
        "Added watermark to {} page(s); saved to '{}'",
        targets.len(),
        output.display()
    );
    Ok(())
}

/// Baseline origin and rotation for a text stamp. PDF coordinates: origin
/// bottom-left, y grows upward.
fn text_placement(
    position: WatermarkPosition,
    rotation: f32,
    page_w: f32,
    page_h: f32,
    text: &str,
    font_size: f32,
) -> ((f32, f32), f32) {
    let text_w = overlay::estimated_text_width(text, font_size);
    let centered_x = (page_w - text_w) / 2.0;
    let top_y = page_h - MARGIN - font_size;
    let bottom_y = MARGIN;

    match position {
        WatermarkPosition::Center => ((centered_x, page_h / 2.0), rotation),
        WatermarkPosition::TopLeft => ((MARGIN, top_y), rotation),
        WatermarkPosition::TopCenter => ((centered_x, top_y), rotation),
        WatermarkPosition::TopRight => ((page_w - text_w - MARGIN, top_y), rotation),
        WatermarkPosition::BottomLeft => ((MARGIN, bottom_y), rotation),
        WatermarkPosition::BottomCenter => ((centered_x, bottom_y), rotation),
        WatermarkPosition::BottomRight => ((page_w - text_w - MARGIN, bottom_y), rotation),
        WatermarkPosition::Diagonal => {
            let rotation = if rotation == 0.0 { 45.0 } else { rotation };
            // Shift the start down-left so the rotated run crosses the center.
            let x = page_w / 2.0 - text_w / 2.0 * rotation.to_radians().cos();
            let y = page_h / 2.0 - text_w / 2.0 * rotation.to_radians().sin();
            ((x, y), rotation)
        }
    }
}

/// Lower-left corner and drawn size for an image stamp, scaled to at most
/// half the page in either dimension.
fn image_placement(
    position: WatermarkPosition,
    page_w: f32,
    page_h: f32,
    image_w: f32,
    image_h: f32,
) -> ((f32, f32), (f32, f32)) {
    let mut scale: f32 = 1.0;
    if image_w > page_w / 2.0 {
        scale = (page_w / 2.0) / image_w;
    }
    if image_h * scale > page_h / 2.0 {
        scale = scale.min((page_h / 2.0) / image_h);
    }
    let width = image_w * scale;
    let height = image_h * scale;

    let origin = match position {
        WatermarkPosition::BottomLeft => (MARGIN, MARGIN),
        WatermarkPosition::BottomCenter => ((page_w - width) / 2.0, MARGIN),
        WatermarkPosition::BottomRight => (page_w - width - MARGIN, MARGIN),
        WatermarkPosition::TopLeft => (MARGIN, page_h - height - MARGIN),
        WatermarkPosition::TopCenter => ((page_w - width) / 2.0, page_h - height - MARGIN),
        WatermarkPosition::TopRight => (page_w - width - MARGIN, page_h - height - MARGIN),
        _ => ((page_w - width) / 2.0, (page_h - height) / 2.0),
    };
    (origin, (width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_defaults_to_forty_five() {
        let (_, rotation) =
            text_placement(WatermarkPosition::Diagonal, 0.0, 612.0, 792.0, "DRAFT", 48.0);
        assert_eq!(rotation, 45.0);
        let (_, rotation) =
            text_placement(WatermarkPosition::Diagonal, 30.0, 612.0, 792.0, "DRAFT", 48.0);
        assert_eq!(rotation, 30.0);
    }

    #[test]
    fn test_center_placement_is_horizontally_centered() {
        let ((x, _), _) =
            text_placement(WatermarkPosition::Center, 0.0, 612.0, 792.0, "ab", 10.0);
        let text_w = overlay::estimated_text_width("ab", 10.0);
        assert!((x - (612.0 - text_w) / 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_image_scaled_to_half_page() {
        let (_, (width, height)) =
            image_placement(WatermarkPosition::Center, 600.0, 800.0, 1200.0, 1200.0);
        assert!(width <= 300.0 && height <= 400.0);
        // Aspect ratio survives the clamp.
        assert!((width / height - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_small_image_not_upscaled() {
        let (_, (width, height)) =
            image_placement(WatermarkPosition::Center, 600.0, 800.0, 100.0, 50.0);
        assert_eq!((width, height), (100.0, 50.0));
    }
}
