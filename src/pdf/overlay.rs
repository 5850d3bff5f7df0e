use anyhow::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

const FONT_KEY: &str = "FPro";
const GS_KEY: &str = "GSPro";

/// Stamps text on top of existing page content.
///
/// Holds the shared font and graphics-state objects so a single pair serves
/// every stamped page of one document.
pub struct Overlay {
    font_id: ObjectId,
    gs_id: ObjectId,
}

impl Overlay {
    /// `font_name` is a standard PDF base font name (e.g. "Helvetica");
    /// `opacity` is clamped to [0, 1] and applies to all stamps.
    pub fn new(doc: &mut Document, font_name: &str, opacity: f32) -> Overlay {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => Object::Name(font_name.as_bytes().to_vec()),
        });
        let opacity = opacity.clamp(0.0, 1.0);
        let gs_id = doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => opacity,
            "CA" => opacity,
        });
        Overlay { font_id, gs_id }
    }

    /// Draw `text` with its baseline starting at `origin` (PDF coordinates,
    /// origin bottom-left), rotated counter-clockwise by `rotation_degrees`.
    pub fn stamp_text(
        &self,
        doc: &mut Document,
        page_id: ObjectId,
        text: &str,
        font_size: f32,
        color: (f32, f32, f32),
        origin: (f32, f32),
        rotation_degrees: f32,
    ) -> Result<()> {
        add_page_resource(doc, page_id, b"Font", FONT_KEY, self.font_id)?;
        add_page_resource(doc, page_id, b"ExtGState", GS_KEY, self.gs_id)?;

        let radians = rotation_degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        let (red, green, blue) = color;
        let (x, y) = origin;

        let operations = vec![
            Operation::new("q", vec![]),
            Operation::new("gs", vec![Object::Name(GS_KEY.into())]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(FONT_KEY.into()), font_size.into()],
            ),
            Operation::new("rg", vec![red.into(), green.into(), blue.into()]),
            Operation::new(
                "Tm",
                vec![
                    cos.into(),
                    sin.into(),
                    (-sin).into(),
                    cos.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ];
        append_content(doc, page_id, operations)
    }
}

/// Place an image watermark on a page. `position` is the lower-left corner
/// and `size` the drawn extent, both in PDF points.
pub fn stamp_image(
    doc: &mut Document,
    page_id: ObjectId,
    image_bytes: Vec<u8>,
    position: (f32, f32),
    size: (f32, f32),
) -> Result<()> {
    let xobject = lopdf::xobject::image_from(image_bytes)?;
    doc.insert_image(page_id, xobject, position, size)?;
    Ok(())
}

/// Page dimensions in points from /MediaBox, walking up the page tree when
/// the page itself carries none. Falls back to US Letter.
pub fn page_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let mut current = Some(page_id);
    for _ in 0..32 {
        let Some(id) = current else { break };
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };
        if let Some(size) = media_box_size(dict) {
            return size;
        }
        current = match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => Some(*parent),
            _ => None,
        };
    }
    (612.0, 792.0)
}

fn media_box_size(dict: &Dictionary) -> Option<(f32, f32)> {
    let Ok(Object::Array(values)) = dict.get(b"MediaBox") else {
        return None;
    };
    let nums: Vec<f32> = values.iter().filter_map(as_number).collect();
    if nums.len() == 4 {
        Some((nums[2] - nums[0], nums[3] - nums[1]))
    } else {
        None
    }
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value),
        _ => None,
    }
}

/// Rough advance width of `text` in points. Good enough for centering a
/// watermark; exact metrics would need the font program.
pub fn estimated_text_width(text: &str, font_size: f32) -> f32 {
    0.5 * font_size * text.chars().count() as f32
}

/// Append a new content stream after the page's existing ones.
fn append_content(doc: &mut Document, page_id: ObjectId, operations: Vec<Operation>) -> Result<()> {
    let encoded = Content { operations }.encode()?;
    let stream_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_dict = doc.get_dictionary_mut(page_id)?;
    let contents = page_dict.get(b"Contents").ok().cloned();
    let new_contents = match contents {
        Some(Object::Array(mut entries)) => {
            entries.push(Object::Reference(stream_id));
            Object::Array(entries)
        }
        Some(existing @ Object::Reference(_)) => {
            Object::Array(vec![existing, Object::Reference(stream_id)])
        }
        _ => Object::Reference(stream_id),
    };
    page_dict.set("Contents", new_contents);
    Ok(())
}

/// Register `resource_id` under the page's /Resources, creating the
/// category dictionary as needed. Shared (indirect) resource dictionaries
/// are updated in place; inline ones are rewritten on the page.
fn add_page_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &[u8],
    name: &str,
    resource_id: ObjectId,
) -> Result<()> {
    let resources = {
        let page_dict = doc.get_dictionary(page_id)?;
        page_dict.get(b"Resources").ok().cloned()
    };
    match resources {
        Some(Object::Reference(res_id)) => {
            let dict = doc.get_dictionary_mut(res_id)?;
            upsert_category(dict, category, name, resource_id);
        }
        Some(Object::Dictionary(mut dict)) => {
            upsert_category(&mut dict, category, name, resource_id);
            doc.get_dictionary_mut(page_id)?
                .set("Resources", Object::Dictionary(dict));
        }
        _ => {
            let mut dict = Dictionary::new();
            upsert_category(&mut dict, category, name, resource_id);
            doc.get_dictionary_mut(page_id)?
                .set("Resources", Object::Dictionary(dict));
        }
    }
    Ok(())
}

fn upsert_category(resources: &mut Dictionary, category: &[u8], name: &str, id: ObjectId) {
    let mut entries = match resources.get(category) {
        Ok(Object::Dictionary(existing)) => existing.clone(),
        _ => Dictionary::new(),
    };
    entries.set(name, Object::Reference(id));
    resources.set(category.to_vec(), Object::Dictionary(entries));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_scales_with_length_and_size() {
        assert_eq!(estimated_text_width("abcd", 10.0), 20.0);
        assert!(estimated_text_width("draft", 48.0) > estimated_text_width("draft", 10.0));
    }

    #[test]
    fn test_media_box_size() {
        let mut dict = Dictionary::new();
        dict.set(
            "MediaBox",
            vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(595),
                Object::Integer(842),
            ],
        );
        assert_eq!(media_box_size(&dict), Some((595.0, 842.0)));
    }

    #[test]
    fn test_missing_media_box_defaults_to_letter() {
        let doc = Document::with_version("1.5");
        assert_eq!(page_size(&doc, (999, 0)), (612.0, 792.0));
    }
}
