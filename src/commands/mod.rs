pub mod compress;
pub mod decrypt;
pub mod delete;
pub mod encrypt;
pub mod extract_images;
pub mod extract_text;
pub mod images_to_pdf;
pub mod merge;
pub mod page_numbers;
pub mod pdf_to_image;
pub mod reorder;
pub mod rotate;
pub mod split;
pub mod watermark;
