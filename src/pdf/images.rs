use anyhow::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Cursor;

/// One image XObject found on a page.
pub struct EmbeddedImage {
    /// 1-based page number the image appeared on.
    pub page_number: u32,
    /// 1-based position among the page's images.
    pub index: u32,
    /// Encoded image bytes, ready to write to disk.
    pub data: Vec<u8>,
    /// File extension matching `data`.
    pub extension: &'static str,
}

/// Collect the image XObjects of every page, in page order.
///
/// JPEG and JPEG2000 streams are passed through untouched; raw
/// DeviceRGB/DeviceGray streams are re-encoded as PNG. Images in other
/// colorspaces are skipped with a warning.
pub fn extract_embedded_images(doc: &Document) -> Result<Vec<EmbeddedImage>> {
    let mut images = Vec::new();
    let mut pages: Vec<_> = doc.get_pages().into_iter().collect();
    pages.sort_by_key(|(num, _)| *num);

    for (page_number, page_id) in pages {
        let Some(resources) = page_resources(doc, page_id) else {
            continue;
        };
        let Some(xobjects) = category_dict(doc, resources, b"XObject") else {
            continue;
        };

        let mut index = 1;
        for (name, entry) in xobjects.iter() {
            let stream = match entry {
                Object::Reference(id) => match doc.get_object(*id) {
                    Ok(Object::Stream(stream)) => stream,
                    _ => continue,
                },
                Object::Stream(stream) => stream,
                _ => continue,
            };
            if !matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(kind)) if kind == b"Image") {
                continue;
            }

            match decode_image_stream(stream) {
                Some((data, extension)) => {
                    images.push(EmbeddedImage {
                        page_number,
                        index,
                        data,
                        extension,
                    });
                    index += 1;
                }
                None => {
                    log::warn!(
                        "Skipping image '{}' on page {}: unsupported encoding",
                        String::from_utf8_lossy(name),
                        page_number
                    );
                }
            }
        }
    }
    Ok(images)
}

fn decode_image_stream(stream: &Stream) -> Option<(Vec<u8>, &'static str)> {
    let filters = stream_filters(stream);
    if filters.iter().any(|f| f == b"DCTDecode") {
        return Some((stream.content.clone(), "jpg"));
    }
    if filters.iter().any(|f| f == b"JPXDecode") {
        return Some((stream.content.clone(), "jp2"));
    }

    // Raw samples behind Flate (or no filter): rebuild a PNG.
    let raw = stream.decompressed_content().ok()?;
    let width = dict_u32(&stream.dict, b"Width")?;
    let height = dict_u32(&stream.dict, b"Height")?;
    let bits = dict_u32(&stream.dict, b"BitsPerComponent").unwrap_or(8);
    if bits != 8 {
        return None;
    }

    let image = match stream.dict.get(b"ColorSpace") {
        Ok(Object::Name(name)) if name == b"DeviceRGB" => {
            image::DynamicImage::ImageRgb8(image::RgbImage::from_raw(width, height, raw)?)
        }
        Ok(Object::Name(name)) if name == b"DeviceGray" => {
            image::DynamicImage::ImageLuma8(image::GrayImage::from_raw(width, height, raw)?)
        }
        _ => return None,
    };

    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .ok()?;
    Some((out, "png"))
}

fn stream_filters(stream: &Stream) -> Vec<Vec<u8>> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(entries)) => entries
            .iter()
            .filter_map(|entry| match entry {
                Object::Name(name) => Some(name.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn dict_u32(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    match dict.get(key) {
        Ok(Object::Integer(value)) => u32::try_from(*value).ok(),
        _ => None,
    }
}

/// The page's /Resources dictionary, following one level of indirection.
/// Resources inherited from ancestor page tree nodes are not consulted.
pub fn page_resources(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    let page = doc.get_dictionary(page_id).ok()?;
    match page.get(b"Resources").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn category_dict<'a>(
    doc: &'a Document,
    resources: &'a Dictionary,
    category: &[u8],
) -> Option<&'a Dictionary> {
    match resources.get(category).ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}
