use std::collections::BTreeSet;

use crate::error::PdfProError;

/// An unordered, deduplicated selection of 0-based page indices.
///
/// Used where a selection marks pages to act on uniformly (delete, rotate,
/// watermark, page numbering, image export). Iteration is always ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSet(BTreeSet<usize>);

impl PageSet {
    /// Parse a selection string like "1,3-5,7" into a flat set of indices.
    ///
    /// Page numbers in the string are 1-based; the resulting indices are
    /// 0-based. An empty string yields an empty set. Any malformed token
    /// aborts the whole parse.
    pub fn parse(spec: &str, total_pages: usize) -> Result<Self, PdfProError> {
        let mut pages = BTreeSet::new();
        if spec.trim().is_empty() {
            return Ok(PageSet(pages));
        }
        for token in spec.split(',').map(str::trim) {
            expand_token(token, total_pages, |idx| {
                pages.insert(idx);
            })?;
        }
        Ok(PageSet(pages))
    }

    /// The selection covering every page of a document.
    pub fn all(total_pages: usize) -> Self {
        PageSet((0..total_pages).collect())
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert back to 1-based page numbers for the PDF library boundary.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.iter().map(|idx| idx as u32 + 1).collect()
    }
}

/// An ordered sequence of page groups, one group per output document.
///
/// Each group is deduplicated and sorted ascending. Used by split
/// `--ranges`, where "1-3,7" produces two output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGroups(Vec<Vec<usize>>);

impl PageGroups {
    /// Parse a selection string like "1-3,5,7-9" into ordered groups.
    ///
    /// Tokenization and validation are identical to [`PageSet::parse`];
    /// only the shape of the result differs.
    pub fn parse(spec: &str, total_pages: usize) -> Result<Self, PdfProError> {
        let mut groups = Vec::new();
        if spec.trim().is_empty() {
            return Ok(PageGroups(groups));
        }
        for token in spec.split(',').map(str::trim) {
            let mut group = BTreeSet::new();
            expand_token(token, total_pages, |idx| {
                group.insert(idx);
            })?;
            if !group.is_empty() {
                groups.push(group.into_iter().collect());
            }
        }
        Ok(PageGroups(groups))
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.0.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parse an explicit page order like "3,1,2" into 0-based indices.
///
/// Unlike [`PageSet::parse`] the order of tokens is preserved, duplicates
/// are allowed, and range tokens are not: each token must be a single page
/// number. Used by the reorder command.
pub fn parse_page_order(spec: &str, total_pages: usize) -> Result<Vec<usize>, PdfProError> {
    spec.split(',')
        .map(str::trim)
        .map(|token| {
            page_index(token, total_pages).ok_or_else(|| PdfProError::InvalidPageNumber {
                token: token.to_string(),
                total_pages,
            })
        })
        .collect()
}

/// Expand one comma-separated token, feeding every selected index to `add`.
fn expand_token(
    token: &str,
    total_pages: usize,
    mut add: impl FnMut(usize),
) -> Result<(), PdfProError> {
    if let Some((start, end)) = token.split_once('-') {
        let invalid = || PdfProError::InvalidRange {
            token: token.to_string(),
            total_pages,
        };
        let start_idx = page_index(start, total_pages).ok_or_else(invalid)?;
        let end_idx = page_index(end, total_pages).ok_or_else(invalid)?;
        if start_idx > end_idx {
            return Err(invalid());
        }
        for idx in start_idx..=end_idx {
            add(idx);
        }
        Ok(())
    } else {
        let idx = page_index(token, total_pages).ok_or_else(|| PdfProError::InvalidPageNumber {
            token: token.to_string(),
            total_pages,
        })?;
        add(idx);
        Ok(())
    }
}

/// Parse a 1-based page number and convert it to a 0-based index, checking
/// it lies within the document.
fn page_index(text: &str, total_pages: usize) -> Option<usize> {
    let number: usize = text.trim().parse().ok()?;
    if number >= 1 && number <= total_pages {
        Some(number - 1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(spec: &str, total: usize) -> Vec<usize> {
        PageSet::parse(spec, total).unwrap().iter().collect()
    }

    fn groups(spec: &str, total: usize) -> Vec<Vec<usize>> {
        PageGroups::parse(spec, total)
            .unwrap()
            .iter()
            .map(|g| g.to_vec())
            .collect()
    }

    #[test]
    fn test_set_mixed_tokens() {
        assert_eq!(set("1,3-5,7", 10), vec![0, 2, 3, 4, 6]);
    }

    #[test]
    fn test_groups_one_per_token() {
        assert_eq!(groups("1-2,3-4", 10), vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_group_single_page() {
        assert_eq!(groups("5", 10), vec![vec![4]]);
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(set("3-3", 10), vec![2]);
    }

    #[test]
    fn test_whitespace_around_tokens() {
        assert_eq!(set(" 1 , 3 - 5 ", 10), vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_duplicates_across_tokens_dedup() {
        assert_eq!(set("1-3,2,3", 10), vec![0, 1, 2]);
    }

    #[test]
    fn test_full_document_selection() {
        assert_eq!(set("1-4", 4), vec![0, 1, 2, 3]);
        assert_eq!(PageSet::parse("1-4", 4).unwrap(), PageSet::all(4));
    }

    #[test]
    fn test_empty_spec_is_empty_not_error() {
        assert!(PageSet::parse("", 10).unwrap().is_empty());
        assert!(PageGroups::parse("", 10).unwrap().is_empty());
        assert!(PageSet::parse("   ", 10).unwrap().is_empty());
    }

    #[test]
    fn test_page_out_of_bounds() {
        let err = PageSet::parse("5", 3).unwrap_err();
        assert!(matches!(
            err,
            PdfProError::InvalidPageNumber { ref token, total_pages: 3 } if token == "5"
        ));
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(PageSet::parse("0", 10).is_err());
    }

    #[test]
    fn test_non_numeric_token_names_offender() {
        let err = PageSet::parse("1,two,3", 10).unwrap_err();
        assert!(err.to_string().contains("two"));
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = PageSet::parse("5-2", 10).unwrap_err();
        assert!(matches!(err, PdfProError::InvalidRange { .. }));
    }

    #[test]
    fn test_range_end_out_of_bounds() {
        let err = PageGroups::parse("1-12", 10).unwrap_err();
        assert!(matches!(err, PdfProError::InvalidRange { .. }));
    }

    #[test]
    fn test_malformed_token_aborts_whole_parse() {
        assert!(PageSet::parse("1,,3", 10).is_err());
        assert!(PageGroups::parse("1-", 10).is_err());
    }

    #[test]
    fn test_indices_stay_in_bounds() {
        let pages = set("1-10", 10);
        assert!(pages.iter().all(|&idx| idx < 10));
        for group in groups("1-3,4-10", 10) {
            assert!(group.iter().all(|&idx| idx < 10));
        }
    }

    #[test]
    fn test_page_numbers_round_trip() {
        let selection = PageSet::parse("2,4", 10).unwrap();
        assert_eq!(selection.page_numbers(), vec![2, 4]);
    }

    #[test]
    fn test_page_order_preserved_with_duplicates() {
        assert_eq!(parse_page_order("3,1,2,1", 5).unwrap(), vec![2, 0, 1, 0]);
    }

    #[test]
    fn test_page_order_rejects_ranges() {
        assert!(parse_page_order("1-3", 5).is_err());
    }

    #[test]
    fn test_page_order_out_of_bounds() {
        assert!(parse_page_order("1,6", 5).is_err());
    }
}
