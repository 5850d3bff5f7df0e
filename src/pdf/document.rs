use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

use crate::error::PdfProError;

pub struct PdfDocument {
    pub doc: Document,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PdfProError::FileNotFound(path.to_path_buf()).into());
        }
        let doc = Document::load(path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
        Ok(PdfDocument { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// 1-based page numbers with their object IDs, in document order.
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Build a new document keeping only the given 1-based page numbers.
    ///
    /// Document order is preserved, so callers that need a particular page
    /// ordering must use [`PdfDocument::reorder_pages`] instead.
    pub fn extract_pages(&self, pages: &[u32]) -> Result<Document> {
        let total = self.page_count() as u32;
        for &page in pages {
            if page == 0 || page > total {
                anyhow::bail!("Page {} is out of range (1-{})", page, total);
            }
        }

        let mut new_doc = self.doc.clone();
        let to_delete: Vec<u32> = (1..=total).filter(|num| !pages.contains(num)).collect();
        if !to_delete.is_empty() {
            new_doc.delete_pages(&to_delete);
        }
        Ok(new_doc)
    }

    /// Build a new document without the given 1-based page numbers.
    pub fn without_pages(&self, pages: &[u32]) -> Document {
        let mut new_doc = self.doc.clone();
        if !pages.is_empty() {
            new_doc.delete_pages(pages);
        }
        new_doc
    }

    /// Build a new document whose pages follow `order` (1-based page
    /// numbers, duplicates and subsets allowed).
    ///
    /// Rewrites the root page tree with a flat kid list; intermediate page
    /// tree nodes are dropped.
    pub fn reorder_pages(&self, order: &[u32]) -> Result<Document> {
        let mut new_doc = self.doc.clone();
        let pages = self.doc.get_pages();
        let total = pages.len();

        let mut page_ids = Vec::with_capacity(order.len());
        for &num in order {
            let id = pages
                .get(&num)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("Page {} is out of range (1-{})", num, total))?;
            page_ids.push(id);
        }

        let pages_root = root_pages_id(&new_doc)?;
        for &id in &page_ids {
            new_doc
                .get_dictionary_mut(id)?
                .set("Parent", Object::Reference(pages_root));
        }

        let kids: Vec<Object> = page_ids.into_iter().map(Object::Reference).collect();
        let count = kids.len() as i64;
        let pages_dict = new_doc.get_dictionary_mut(pages_root)?;
        pages_dict.set("Kids", kids);
        pages_dict.set("Count", count);
        Ok(new_doc)
    }

    /// Add `angle` degrees (clockwise) to the /Rotate entry of the given
    /// 1-based pages.
    pub fn rotate_pages(&mut self, pages: &[u32], angle: i64) -> Result<()> {
        let page_map = self.doc.get_pages();
        for &num in pages {
            let Some(&page_id) = page_map.get(&num) else {
                anyhow::bail!("Page {} is out of range (1-{})", num, page_map.len());
            };
            let dict = self.doc.get_dictionary_mut(page_id)?;
            let current = match dict.get(b"Rotate") {
                Ok(Object::Integer(value)) => *value,
                _ => 0,
            };
            dict.set("Rotate", (current + angle).rem_euclid(360));
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        let path = path.as_ref();
        doc.save(path)
            .with_context(|| PdfProError::WriteFailure(path.to_path_buf()))?;
        Ok(())
    }
}

/// Object ID of the root /Pages node.
pub fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    let catalog = doc.catalog()?;
    match catalog.get(b"Pages")? {
        Object::Reference(id) => Ok(*id),
        _ => anyhow::bail!("Malformed document: /Pages is not a reference"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn sample_doc(page_count: usize) -> PdfDocument {
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
        PdfDocument { doc }
    }

    #[test]
    fn test_rotation_wraps_at_360() {
        let mut doc = sample_doc(1);
        doc.rotate_pages(&[1], 270).unwrap();
        doc.rotate_pages(&[1], 180).unwrap();
        let (_, page_id) = doc.page_ids()[0];
        let dict = doc.doc.get_dictionary(page_id).unwrap();
        assert!(matches!(dict.get(b"Rotate"), Ok(Object::Integer(90))));
    }

    #[test]
    fn test_rotate_out_of_range_page() {
        let mut doc = sample_doc(2);
        assert!(doc.rotate_pages(&[3], 90).is_err());
    }

    #[test]
    fn test_extract_pages_keeps_document_order() {
        let doc = sample_doc(4);
        let extracted = doc.extract_pages(&[2, 4]).unwrap();
        assert_eq!(extracted.get_pages().len(), 2);
    }

    #[test]
    fn test_extract_pages_rejects_out_of_range() {
        let doc = sample_doc(3);
        assert!(doc.extract_pages(&[0]).is_err());
        assert!(doc.extract_pages(&[4]).is_err());
    }

    #[test]
    fn test_reorder_rewrites_kid_list() {
        let doc = sample_doc(3);
        let original: Vec<_> = doc.page_ids().into_iter().map(|(_, id)| id).collect();
        let reordered = doc.reorder_pages(&[3, 1, 2]).unwrap();
        let wrapped = PdfDocument { doc: reordered };
        let new_order: Vec<_> = wrapped.page_ids().into_iter().map(|(_, id)| id).collect();
        assert_eq!(new_order, vec![original[2], original[0], original[1]]);
    }
}
