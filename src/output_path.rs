use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Marker substituted with the 1-based part number in pattern output specs,
/// e.g. `chapter_%d.pdf`.
pub const PART_PLACEHOLDER: &str = "%d";

/// How a user-supplied output spec is interpreted.
///
/// Classification is re-derived on every resolution; nothing is cached
/// between output units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSpecKind {
    /// An existing directory (or `"."`, which resolves to the working
    /// directory): generated filenames are placed inside it.
    Directory(PathBuf),
    /// A filename pattern containing `%d` (or another `%` marker, kept for
    /// compatibility with loosely written patterns).
    Pattern(String),
    /// A literal filename.
    Literal(PathBuf),
}

pub fn classify(output_spec: &str) -> OutputSpecKind {
    if output_spec == "." {
        // Resolve to the absolute working directory so printed paths name
        // a real location instead of "./...".
        return OutputSpecKind::Directory(
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        );
    }
    let path = Path::new(output_spec);
    if path.is_dir() {
        return OutputSpecKind::Directory(path.to_path_buf());
    }
    if output_spec.contains(PART_PLACEHOLDER) {
        return OutputSpecKind::Pattern(output_spec.to_string());
    }
    if output_spec.contains('%') {
        return OutputSpecKind::Pattern(output_spec.to_string());
    }
    OutputSpecKind::Literal(path.to_path_buf())
}

/// Compute the output path for one output unit.
///
/// `unit_suffix` names the unit (e.g. "page_3" or "pages_1-5") and is used
/// when the spec is a directory; `part_number` is the 1-based counter across
/// all output units of one command invocation and is used for pattern
/// substitution and literal-name disambiguation. Pure: the same inputs
/// always yield the same path.
pub fn resolve(
    input_path: &Path,
    output_spec: &str,
    unit_suffix: &str,
    part_number: usize,
) -> PathBuf {
    match classify(output_spec) {
        OutputSpecKind::Directory(dir) => {
            let stem = file_stem(input_path);
            let ext = file_ext(input_path);
            dir.join(format!("{stem}_{unit_suffix}{ext}"))
        }
        OutputSpecKind::Pattern(pattern) => {
            PathBuf::from(pattern.replace(PART_PLACEHOLDER, &part_number.to_string()))
        }
        OutputSpecKind::Literal(path) => {
            if part_number > 1 {
                // A literal name shared by several outputs would collide;
                // disambiguate everything after the first.
                let (stem, ext) = split_spec(output_spec);
                PathBuf::from(format!("{stem}_{part_number}{ext}"))
            } else {
                path
            }
        }
    }
}

/// Compute the output path for one converted page of `pdf-to-image`.
///
/// Differs from [`resolve`] in that the caller dictates the file extension
/// (the image format) and the placeholder is substituted with the 1-based
/// page number rather than a running part counter.
pub fn resolve_image(
    input_path: &Path,
    output_spec: &str,
    page_number: usize,
    image_ext: &str,
) -> PathBuf {
    if output_spec.contains(PART_PLACEHOLDER) {
        let (stem, _) = split_spec(output_spec);
        let stem = stem.replace(PART_PLACEHOLDER, &page_number.to_string());
        return PathBuf::from(format!("{stem}.{image_ext}"));
    }
    let path = Path::new(output_spec);
    if path.is_dir() || output_spec.ends_with('/') || output_spec.ends_with('\\') {
        let stem = file_stem(input_path);
        return path.join(format!("{stem}_page_{page_number}.{image_ext}"));
    }
    let (stem, _) = split_spec(output_spec);
    if page_number > 1 {
        PathBuf::from(format!("{stem}_page_{page_number}.{image_ext}"))
    } else {
        PathBuf::from(format!("{stem}.{image_ext}"))
    }
}

/// Create the resolved path's parent directory if it is missing.
///
/// Callers run this before every write; resolution itself never touches the
/// filesystem beyond existence checks.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

fn file_stem(path: &Path) -> &str {
    path.file_stem().and_then(OsStr::to_str).unwrap_or("output")
}

fn file_ext(path: &Path) -> String {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// Split a spec string into (everything before the extension, ".ext").
fn split_spec(spec: &str) -> (&str, String) {
    match Path::new(spec).extension().and_then(OsStr::to_str) {
        Some(ext) => (&spec[..spec.len() - ext.len() - 1], format!(".{ext}")),
        None => (spec, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_existing_directory() {
        let dir = std::env::temp_dir();
        let kind = classify(dir.to_str().unwrap());
        assert_eq!(kind, OutputSpecKind::Directory(dir));
    }

    #[test]
    fn test_classify_pattern_and_literal() {
        assert!(matches!(classify("out_%d.pdf"), OutputSpecKind::Pattern(_)));
        assert!(matches!(classify("out_%p.pdf"), OutputSpecKind::Pattern(_)));
        assert!(matches!(classify("out.pdf"), OutputSpecKind::Literal(_)));
    }

    #[test]
    fn test_classify_dot_is_absolute_working_directory() {
        match classify(".") {
            OutputSpecKind::Directory(dir) => {
                assert!(dir.is_absolute());
                assert_eq!(dir, std::env::current_dir().unwrap());
            }
            other => panic!("expected a directory, got {other:?}"),
        }
    }

    #[test]
    fn test_directory_spec_builds_suffixed_name() {
        let dir = std::env::temp_dir();
        let path = resolve(
            Path::new("report.pdf"),
            dir.to_str().unwrap(),
            "page_3",
            1,
        );
        assert_eq!(path.parent().unwrap(), dir.as_path());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "report_page_3.pdf"
        );
    }

    #[test]
    fn test_pattern_substitutes_part_number() {
        let path = resolve(Path::new("in.pdf"), "parts/out_%d.pdf", "page_1", 7);
        assert_eq!(path, PathBuf::from("parts/out_7.pdf"));
    }

    #[test]
    fn test_generic_percent_pattern_passes_through() {
        // A '%' marker other than "%d" has nothing to substitute.
        let path = resolve(Path::new("in.pdf"), "out_%p.pdf", "page_1", 2);
        assert_eq!(path, PathBuf::from("out_%p.pdf"));
    }

    #[test]
    fn test_literal_first_part_unchanged() {
        let path = resolve(Path::new("in.pdf"), "chosen.pdf", "page_1", 1);
        assert_eq!(path, PathBuf::from("chosen.pdf"));
    }

    #[test]
    fn test_literal_later_parts_disambiguated() {
        let first = resolve(Path::new("in.pdf"), "chosen.pdf", "page_1", 1);
        let second = resolve(Path::new("in.pdf"), "chosen.pdf", "page_2", 2);
        assert_ne!(first, second);
        assert_eq!(second, PathBuf::from("chosen_2.pdf"));
    }

    #[test]
    fn test_resolve_is_pure() {
        let a = resolve(Path::new("x.pdf"), "y_%d.pdf", "page_1", 4);
        let b = resolve(Path::new("x.pdf"), "y_%d.pdf", "page_1", 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_image_pattern_uses_page_number_and_format() {
        let path = resolve_image(Path::new("doc.pdf"), "scan_%d.jpg", 4, "png");
        assert_eq!(path, PathBuf::from("scan_4.png"));
    }

    #[test]
    fn test_image_directory_spec() {
        let dir = std::env::temp_dir();
        let path = resolve_image(Path::new("doc.pdf"), dir.to_str().unwrap(), 2, "png");
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "doc_page_2.png"
        );
    }

    #[test]
    fn test_image_literal_spec() {
        assert_eq!(
            resolve_image(Path::new("doc.pdf"), "cover.png", 1, "png"),
            PathBuf::from("cover.png")
        );
        assert_eq!(
            resolve_image(Path::new("doc.pdf"), "cover.png", 3, "png"),
            PathBuf::from("cover_page_3.png")
        );
    }
}
