use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::error::PdfProError;
use crate::output_path;
use crate::page_select::PageGroups;
use crate::pdf::PdfDocument;

pub enum SplitMode {
    /// Comma-separated range spec; each range becomes one output file.
    Ranges(String),
    /// Fixed-size chunks of N pages.
    EveryN(usize),
    /// One output file per page.
    EachPage,
}

pub fn run(input: &Path, output_spec: &str, mode: &SplitMode) -> Result<()> {
    let doc = PdfDocument::open(input)?;
    let total_pages = doc.page_count();

    // (1-based page numbers, filename suffix) per output unit.
    let units: Vec<(Vec<u32>, String)> = match mode {
        SplitMode::EachPage => (1..=total_pages as u32)
            .map(|num| (vec![num], format!("page_{num}")))
            .collect(),
        SplitMode::EveryN(chunk) => {
            if *chunk == 0 {
                anyhow::bail!("Number of pages for splitting (N) must be a positive integer");
            }
            (0..total_pages)
                .step_by(*chunk)
                .map(|start| {
                    let end = (start + chunk).min(total_pages);
                    let pages = (start as u32 + 1..=end as u32).collect();
                    (pages, format!("pages_{}-{}", start + 1, end))
                })
                .collect()
        }
        SplitMode::Ranges(spec) => {
            let groups = PageGroups::parse(spec, total_pages)?;
            if groups.is_empty() {
                return Err(PdfProError::EmptySelection)
                    .context("no page ranges to split on; nothing to do");
            }
            groups
                .iter()
                .map(|group| {
                    let first = group[0] + 1;
                    let last = group[group.len() - 1] + 1;
                    let suffix = if group.len() == 1 {
                        format!("page_{first}")
                    } else {
                        format!("pages_{first}-{last}")
                    };
                    let pages = group.iter().map(|&idx| idx as u32 + 1).collect();
                    (pages, suffix)
                })
                .collect()
        }
    };

    let mut written = 0;
    let mut failed = 0;
    for (part_number, (pages, suffix)) in units.iter().enumerate() {
        match write_unit(&doc, input, output_spec, pages, suffix, part_number + 1) {
            Ok(path) => {
                println!("Created '{}'", path.display());
                written += 1;
            }
            Err(err) => {
                // One bad unit should not sink the rest of the batch.
                log::warn!("Skipping output part {}: {err:#}", part_number + 1);
                eprintln!("Failed to write part {}: {err:#}", part_number + 1);
                failed += 1;
            }
        }
    }

    println!("Split '{}' into {} file(s)", input.display(), written);
    if failed > 0 {
        anyhow::bail!("{failed} of {} output file(s) could not be written", units.len());
    }
    Ok(())
}

fn write_unit(
    doc: &PdfDocument,
    input: &Path,
    output_spec: &str,
    pages: &[u32],
    suffix: &str,
    part_number: usize,
) -> Result<PathBuf> {
    let path = output_path::resolve(input, output_spec, suffix, part_number);
    output_path::ensure_parent_dir(&path)?;
    let mut unit = doc.extract_pages(pages)?;
    PdfDocument::save(&mut unit, &path)?;
    Ok(path)
}
