mod cli;
mod commands;
mod error;
mod output_path;
mod page_select;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::split::SplitMode;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge { inputs, output } => {
            commands::merge::run(&inputs, &output)?;
        }
        Commands::Split {
            path,
            output,
            ranges,
            every_n_pages,
            each_page,
        } => {
            let mode = if let Some(spec) = ranges {
                SplitMode::Ranges(spec)
            } else if let Some(chunk) = every_n_pages {
                SplitMode::EveryN(chunk)
            } else {
                debug_assert!(each_page);
                SplitMode::EachPage
            };
            commands::split::run(&path, &output, &mode)?;
        }
        Commands::Reorder {
            path,
            page_order,
            output,
        } => {
            commands::reorder::run(&path, &page_order, output.as_deref())?;
        }
        Commands::Delete {
            path,
            pages,
            output,
        } => {
            commands::delete::run(&path, &pages, output.as_deref())?;
        }
        Commands::Rotate {
            path,
            angle,
            pages,
            output,
        } => {
            commands::rotate::run(&path, angle, pages.as_deref(), output.as_deref())?;
        }
        Commands::ExtractText { path, output } => {
            commands::extract_text::run(&path, &output)?;
        }
        Commands::ExtractImages {
            path,
            output_dir,
            image_format,
        } => {
            commands::extract_images::run(&path, &output_dir, image_format)?;
        }
        Commands::PdfToImage {
            path,
            output,
            pages,
            format,
            dpi,
        } => {
            commands::pdf_to_image::run(&path, &output, pages.as_deref(), format, dpi)?;
        }
        Commands::ImagesToPdf { inputs, output } => {
            commands::images_to_pdf::run(&inputs, &output)?;
        }
        Commands::AddWatermark {
            path,
            output,
            text,
            image,
            font_name,
            font_size,
            color,
            opacity,
            position,
            rotate,
            pages,
        } => {
            let options = commands::watermark::WatermarkOptions {
                text,
                image,
                font_name,
                font_size,
                color,
                opacity,
                position,
                rotation: rotate,
                pages,
            };
            commands::watermark::run(&path, &output, &options)?;
        }
        Commands::AddPageNumbers {
            path,
            output,
            position,
            start_number,
            font_name,
            font_size,
            font_color,
            format_string,
            pages,
        } => {
            let options = commands::page_numbers::PageNumberOptions {
                position,
                start_number,
                font_name,
                font_size,
                color: font_color,
                format_string,
                pages,
            };
            commands::page_numbers::run(&path, &output, &options)?;
        }
        Commands::Encrypt {
            path,
            output,
            user_password,
            owner_password,
            allow_print,
            allow_modify,
            allow_copy,
            allow_annotate,
            strength,
        } => {
            let options = commands::encrypt::EncryptOptions {
                user_password,
                owner_password,
                allow_print: allow_print.is_yes(),
                allow_modify: allow_modify.is_yes(),
                allow_copy: allow_copy.is_yes(),
                allow_annotate: allow_annotate.is_yes(),
                strength,
            };
            commands::encrypt::run(&path, &output, &options)?;
        }
        Commands::Decrypt {
            path,
            password,
            output,
        } => {
            commands::decrypt::run(&path, &password, &output)?;
        }
        Commands::Compress {
            path,
            output,
            level,
        } => {
            commands::compress::run(&path, &output, level)?;
        }
    }

    Ok(())
}
