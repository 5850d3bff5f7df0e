use anyhow::Result;
use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};

use crate::output_path;
use crate::pdf::document::root_pages_id;
use crate::pdf::PdfDocument;

pub fn run(inputs: &[PathBuf], output: &Path) -> Result<()> {
    if inputs.len() < 2 {
        anyhow::bail!("At least two input files are required for merging");
    }

    let mut merged = PdfDocument::open(&inputs[0])?;
    let mut total_pages = merged.page_count();

    for input in &inputs[1..] {
        let doc = PdfDocument::open(input)?;
        total_pages += append_pages(&mut merged.doc, doc.doc)?;
    }

    output_path::ensure_parent_dir(output)?;
    // The appended documents leave their old catalogs behind as orphans.
    let _ = merged.doc.prune_objects();
    merged.doc.renumber_objects();
    PdfDocument::save(&mut merged.doc, output)?;

    println!(
        "Merged {} files ({} pages) into '{}'",
        inputs.len(),
        total_pages,
        output.display()
    );
    Ok(())
}

/// Move every page of `incoming` to the end of `base`, returning the number
/// of pages appended.
fn append_pages(base: &mut Document, mut incoming: Document) -> Result<usize> {
    // Shift the incoming object IDs past everything in the base document so
    // the two object sets cannot collide.
    incoming.renumber_objects_with(base.max_id + 1);
    base.max_id = incoming.max_id;

    let mut pages: Vec<_> = incoming.get_pages().into_iter().collect();
    pages.sort_by_key(|(num, _)| *num);
    let page_ids: Vec<ObjectId> = pages.into_iter().map(|(_, id)| id).collect();
    base.objects.extend(incoming.objects);

    let pages_root = root_pages_id(base)?;
    for &page_id in &page_ids {
        base.get_dictionary_mut(page_id)?
            .set("Parent", Object::Reference(pages_root));
    }

    let pages_dict = base.get_dictionary_mut(pages_root)?;
    let mut kids = match pages_dict.get(b"Kids") {
        Ok(Object::Array(existing)) => existing.clone(),
        _ => Vec::new(),
    };
    kids.extend(page_ids.iter().map(|&id| Object::Reference(id)));
    let count = match pages_dict.get(b"Count") {
        Ok(Object::Integer(value)) => *value,
        _ => 0,
    };
    pages_dict.set("Count", count + page_ids.len() as i64);
    pages_dict.set("Kids", kids);

    Ok(page_ids.len())
}
