use std::path::PathBuf;
use thiserror::Error;

/// Failures that commands surface to the user as one-line messages.
#[derive(Debug, Error)]
pub enum PdfProError {
    #[error("invalid page number '{token}': pages must be between 1 and {total_pages}")]
    InvalidPageNumber { token: String, total_pages: usize },

    #[error(
        "invalid page range '{token}': pages must be between 1 and {total_pages} \
         and the start must not exceed the end"
    )]
    InvalidRange { token: String, total_pages: usize },

    #[error("selection leaves no pages to write")]
    EmptySelection,

    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to write output: {}", .0.display())]
    WriteFailure(PathBuf),
}
