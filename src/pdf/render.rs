use anyhow::{anyhow, Result};
use image::DynamicImage;
use pdfium_render::prelude::*;

/// Bind to the pdfium library, preferring a copy next to the executable and
/// falling back to the system library. Rasterization commands need this;
/// everything else works without pdfium installed.
pub fn bind_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|err| anyhow!("pdfium library not available: {err}"))?;
    Ok(Pdfium::new(bindings))
}

/// Rasterize one page at the given resolution.
pub fn render_page(page: &PdfPage, dpi: u32) -> Result<DynamicImage> {
    let width_px = (page.width().value * dpi as f32 / 72.0).round().max(1.0) as i32;
    let config = PdfRenderConfig::new().set_target_width(width_px);
    let bitmap = page
        .render_with_config(&config)
        .map_err(|err| anyhow!("failed to render page: {err}"))?;
    Ok(bitmap.as_image())
}
