use anyhow::Result;
use std::path::Path;

use crate::cli::NumberPosition;
use crate::output_path;
use crate::page_select::PageSet;
use crate::pdf::overlay::{self, Overlay};
use crate::pdf::PdfDocument;

const MARGIN: f32 = 20.0;

pub struct PageNumberOptions {
    pub position: NumberPosition,
    pub start_number: i64,
    pub font_name: String,
    pub font_size: f32,
    pub color: (f32, f32, f32),
    pub format_string: String,
    pub pages: Option<String>,
}

pub fn run(input: &Path, output: &Path, options: &PageNumberOptions) -> Result<()> {
    let mut doc = PdfDocument::open(input)?;
    let total_pages = doc.page_count();

    let selection = match &options.pages {
        Some(spec) => PageSet::parse(spec, total_pages)?,
        None => PageSet::all(total_pages),
    };

    let overlay = Overlay::new(&mut doc.doc, &options.font_name, 1.0);
    let mut counter = options.start_number;
    let mut stamped = 0;

    for (page_number, page_id) in doc.page_ids() {
        if !selection.contains(page_number as usize - 1) {
            continue;
        }
        let label = format_page_label(&options.format_string, counter, total_pages);
        let (page_w, page_h) = overlay::page_size(&doc.doc, page_id);
        let origin = label_origin(options.position, page_w, page_h, &label, options.font_size);
        overlay.stamp_text(
            &mut doc.doc,
            page_id,
            &label,
            options.font_size,
            options.color,
            origin,
            0.0,
        )?;
        counter += 1;
        stamped += 1;
    }

    output_path::ensure_parent_dir(output)?;
    PdfDocument::save(&mut doc.doc, output)?;

    println!(
        "Added page numbers to {} page(s); saved to '{}'",
        stamped,
        output.display()
    );
    Ok(())
}

/// Substitute {page_num} and {total_pages} in the label template.
/// {total_pages} is always the document's page count, even when only a
/// subset is being numbered.
fn format_page_label(template: &str, page_number: i64, total_pages: usize) -> String {
    template
        .replace("{page_num}", &page_number.to_string())
        .replace("{total_pages}", &total_pages.to_string())
}

fn label_origin(
    position: NumberPosition,
    page_w: f32,
    page_h: f32,
    label: &str,
    font_size: f32,
) -> (f32, f32) {
    let label_w = overlay::estimated_text_width(label, font_size);
    let y = match position {
        NumberPosition::FooterLeft | NumberPosition::FooterCenter | NumberPosition::FooterRight => {
            MARGIN
        }
        _ => page_h - MARGIN - font_size,
    };
    let x = match position {
        NumberPosition::FooterLeft | NumberPosition::HeaderLeft => MARGIN,
        NumberPosition::FooterCenter | NumberPosition::HeaderCenter => (page_w - label_w) / 2.0,
        NumberPosition::FooterRight | NumberPosition::HeaderRight => page_w - MARGIN - label_w,
    };
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_page_label_substitution() {
        assert_eq!(
            format_page_label("Page {page_num} of {total_pages}", 3, 10),
            "Page 3 of 10"
        );
        assert_eq!(format_page_label("- {page_num} -", 7, 10), "- 7 -");
        assert_eq!(format_page_label("no placeholders", 1, 2), "no placeholders");
    }

    #[test]
    fn test_footer_positions_sit_at_bottom_margin() {
        let (_, y) = label_origin(NumberPosition::FooterCenter, 612.0, 792.0, "Page 1", 10.0);
        assert_eq!(y, MARGIN);
        let (_, y) = label_origin(NumberPosition::HeaderCenter, 612.0, 792.0, "Page 1", 10.0);
        assert!(y > 700.0);
    }

    #[test]
    fn test_left_and_right_alignment() {
        let (left_x, _) = label_origin(NumberPosition::FooterLeft, 612.0, 792.0, "1", 10.0);
        let (right_x, _) = label_origin(NumberPosition::FooterRight, 612.0, 792.0, "1", 10.0);
        assert_eq!(left_x, MARGIN);
        assert!(right_x > left_x);
    }
}
