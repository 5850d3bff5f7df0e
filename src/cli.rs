use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfpro")]
#[command(about = "PDF toolbox: merge, split, rotate, watermark, encrypt, and more")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge two or more PDFs into one
    Merge {
        /// PDF files to merge, in order
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Split a PDF into multiple files
    #[command(group(ArgGroup::new("mode").required(true).multiple(false)))]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Output directory or filename pattern (e.g. "chunks/" or "part_%d.pdf")
        #[arg(short, long, default_value = ".")]
        output: String,

        /// Page ranges, each becoming its own PDF (e.g. "1-5,8,10-12")
        #[arg(short, long, group = "mode")]
        ranges: Option<String>,

        /// Split every N pages
        #[arg(short = 'n', long, value_name = "N", group = "mode")]
        every_n_pages: Option<usize>,

        /// One output PDF per page
        #[arg(short, long, group = "mode")]
        each_page: bool,
    },

    /// Reorder pages
    Reorder {
        /// PDF file to reorder
        path: PathBuf,

        /// New page order as comma-separated page numbers (e.g. "3,1,2,4")
        page_order: String,

        /// Output file; overwrites the input when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete pages
    Delete {
        /// PDF file to modify
        path: PathBuf,

        /// Pages to delete (e.g. "1,3-5,7")
        pages: String,

        /// Output file; overwrites the input when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rotate pages clockwise
    Rotate {
        /// PDF file to modify
        path: PathBuf,

        /// Rotation angle in degrees
        #[arg(value_parser = parse_angle)]
        angle: u32,

        /// Pages to rotate (e.g. "1,3-5,7"); all pages when omitted
        #[arg(short, long)]
        pages: Option<String>,

        /// Output file; overwrites the input when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract all text to a plain-text file
    ExtractText {
        /// PDF file to read
        path: PathBuf,

        /// Output .txt file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Extract embedded images
    ExtractImages {
        /// PDF file to read
        path: PathBuf,

        /// Directory to save extracted images into
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Preferred format for saved images
        #[arg(long, value_enum, default_value_t = ExtractedImageFormat::Png)]
        image_format: ExtractedImageFormat,
    },

    /// Render pages to image files
    PdfToImage {
        /// PDF file to convert
        path: PathBuf,

        /// Output directory or filename pattern (e.g. "imgs/" or "page_%d.png")
        #[arg(short, long)]
        output: String,

        /// Pages to convert (e.g. "1,3-5,7"); all pages when omitted
        #[arg(short, long)]
        pages: Option<String>,

        /// Output image format
        #[arg(long, value_enum, default_value_t = PageImageFormat::Png)]
        format: PageImageFormat,

        /// Render resolution
        #[arg(long, default_value_t = 150)]
        dpi: u32,
    },

    /// Build a PDF from image files, one page per image
    ImagesToPdf {
        /// Image files in page order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Stamp a text or image watermark onto pages
    #[command(group(ArgGroup::new("source").required(true).multiple(false)))]
    AddWatermark {
        /// PDF file to watermark
        path: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Watermark text
        #[arg(long, group = "source")]
        text: Option<String>,

        /// Watermark image file
        #[arg(long, group = "source")]
        image: Option<PathBuf>,

        /// Base font for text watermarks (e.g. Helvetica, Courier)
        #[arg(long, default_value = "Helvetica")]
        font_name: String,

        /// Font size for text watermarks
        #[arg(long, default_value_t = 48.0)]
        font_size: f32,

        /// Text color as "r,g,b" floats in [0,1]
        #[arg(long, value_parser = parse_color, default_value = "0.5,0.5,0.5")]
        color: (f32, f32, f32),

        /// Watermark opacity in [0,1]
        #[arg(long, default_value_t = 0.5)]
        opacity: f32,

        /// Placement on the page
        #[arg(long, value_enum, default_value_t = WatermarkPosition::Center)]
        position: WatermarkPosition,

        /// Rotation in degrees (counter-clockwise)
        #[arg(long, default_value_t = 0.0)]
        rotate: f32,

        /// Pages to stamp (e.g. "1,3-5,7"); all pages when omitted
        #[arg(short, long)]
        pages: Option<String>,
    },

    /// Stamp page numbers onto pages
    AddPageNumbers {
        /// PDF file to number
        path: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Placement of the numbers
        #[arg(long, value_enum, default_value_t = NumberPosition::FooterCenter)]
        position: NumberPosition,

        /// First number stamped
        #[arg(long, default_value_t = 1)]
        start_number: i64,

        /// Base font (e.g. Helvetica, Courier)
        #[arg(long, default_value = "Helvetica")]
        font_name: String,

        /// Font size
        #[arg(long, default_value_t = 10.0)]
        font_size: f32,

        /// Font color as "r,g,b" floats in [0,1]
        #[arg(long, value_parser = parse_color, default_value = "0,0,0")]
        font_color: (f32, f32, f32),

        /// Label template; {page_num} and {total_pages} are substituted
        #[arg(long, default_value = "Page {page_num} of {total_pages}")]
        format_string: String,

        /// Pages to number (e.g. "1,3-5,7"); all pages when omitted
        #[arg(short, long)]
        pages: Option<String>,
    },

    /// Password-protect a PDF
    #[command(group(ArgGroup::new("password").required(true).multiple(true)))]
    Encrypt {
        /// PDF file to encrypt
        path: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Password required to open the document
        #[arg(long, group = "password")]
        user_password: Option<String>,

        /// Password required to change permissions; falls back to the user
        /// password when omitted
        #[arg(long, group = "password")]
        owner_password: Option<String>,

        /// Allow printing
        #[arg(long, value_enum, default_value_t = Toggle::Yes)]
        allow_print: Toggle,

        /// Allow modifying the document
        #[arg(long, value_enum, default_value_t = Toggle::Yes)]
        allow_modify: Toggle,

        /// Allow copying text and graphics
        #[arg(long, value_enum, default_value_t = Toggle::Yes)]
        allow_copy: Toggle,

        /// Allow annotations and form filling
        #[arg(long, value_enum, default_value_t = Toggle::Yes)]
        allow_annotate: Toggle,

        /// AES key length in bits
        #[arg(long, value_parser = parse_strength, default_value = "128")]
        strength: u16,
    },

    /// Remove password protection, given the password
    Decrypt {
        /// Encrypted PDF file
        path: PathBuf,

        /// User or owner password
        password: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Reduce file size
    Compress {
        /// PDF file to compress
        path: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Compression effort
        #[arg(short, long, value_enum, default_value_t = CompressionLevel::Basic)]
        level: CompressionLevel,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageImageFormat {
    Png,
    Jpg,
}

impl PageImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            PageImageFormat::Png => "png",
            PageImageFormat::Jpg => "jpg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractedImageFormat {
    Png,
    Jpg,
    Bmp,
    Tiff,
}

impl ExtractedImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExtractedImageFormat::Png => "png",
            ExtractedImageFormat::Jpg => "jpg",
            ExtractedImageFormat::Bmp => "bmp",
            ExtractedImageFormat::Tiff => "tiff",
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            ExtractedImageFormat::Png => image::ImageFormat::Png,
            ExtractedImageFormat::Jpg => image::ImageFormat::Jpeg,
            ExtractedImageFormat::Bmp => image::ImageFormat::Bmp,
            ExtractedImageFormat::Tiff => image::ImageFormat::Tiff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WatermarkPosition {
    Center,
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Diagonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NumberPosition {
    FooterLeft,
    FooterCenter,
    FooterRight,
    HeaderLeft,
    HeaderCenter,
    HeaderRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionLevel {
    Basic,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    Yes,
    No,
}

impl Toggle {
    pub fn is_yes(self) -> bool {
        self == Toggle::Yes
    }
}

fn parse_angle(s: &str) -> Result<u32, String> {
    match s {
        "90" => Ok(90),
        "180" => Ok(180),
        "270" => Ok(270),
        _ => Err(format!("invalid angle '{s}': must be 90, 180, or 270")),
    }
}

fn parse_strength(s: &str) -> Result<u16, String> {
    match s {
        "128" => Ok(128),
        "256" => Ok(256),
        _ => Err(format!("invalid strength '{s}': must be 128 or 256")),
    }
}

/// Parse an "r,g,b" triple of floats in [0, 1].
fn parse_color(s: &str) -> Result<(f32, f32, f32), String> {
    let invalid = || format!("invalid color '{s}': expected \"r,g,b\" floats in [0,1]");
    let parts: Vec<f32> = s
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid())?;
    if parts.len() != 3 || parts.iter().any(|&v| !(0.0..=1.0).contains(&v)) {
        return Err(invalid());
    }
    Ok((parts[0], parts[1], parts[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("0.5,0.5,0.5"), Ok((0.5, 0.5, 0.5)));
        assert_eq!(parse_color("1, 0, 0"), Ok((1.0, 0.0, 0.0)));
        assert!(parse_color("1,0").is_err());
        assert!(parse_color("2,0,0").is_err());
        assert!(parse_color("red").is_err());
    }

    #[test]
    fn test_parse_angle() {
        assert_eq!(parse_angle("180"), Ok(180));
        assert!(parse_angle("45").is_err());
    }

    #[test]
    fn test_cli_asserts() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
