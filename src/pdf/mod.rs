pub mod document;
pub mod images;
pub mod overlay;
pub mod render;
pub mod security;
pub mod text;

pub use document::PdfDocument;
