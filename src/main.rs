// ABOUTME: Main entry point for the pptx2png program.
// ABOUTME: Provides CLI interface and runs the conversion from the library.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Convert PowerPoint slides to PNG images.", long_about = None)]
struct Cli {
    /// Path to the source PowerPoint (.pptx) file
    #[arg(value_name = "SOURCE", required_unless_present = "source_flag")]
    source: Option<PathBuf>,

    /// Path to the source PowerPoint (.pptx) file
    #[arg(short = 's', long = "source", id = "source_flag", conflicts_with = "source")]
    source_flag: Option<PathBuf>,

    /// Destination folder for PNG files. Defaults to the source location
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Fixed width for PNG. Height scales to keep the aspect ratio unless --height is given
    #[arg(short, long, allow_negative_numbers = true)]
    width: Option<i64>,

    /// Fixed height for PNG. Width scales to keep the aspect ratio unless --width is given
    #[arg(short = 'H', long, allow_negative_numbers = true)]
    height: Option<i64>,

    /// Enable logging of the file names being processed
    #[arg(short, long)]
    log: bool,

    /// Keep the native slide size when neither width nor height is given
    #[arg(long, conflicts_with = "default_width")]
    native_size: bool,

    /// Width used when neither width nor height is given
    #[arg(long, value_name = "PIXELS")]
    default_width: Option<u32>,
}

fn run(cli: Cli) -> anyhow::Result<usize> {
    let mut config = pptx2png::Config::from_env();
    if cli.native_size {
        config.size_policy = pptx2png::PolicyKind::Native;
    }
    if let Some(width) = cli.default_width {
        config.default_width = width;
        config.size_policy = pptx2png::PolicyKind::Scale;
    }

    let source = cli
        .source
        .or(cli.source_flag)
        .context("No source file given")?;

    let options =
        config.get_convert_options(source, cli.destination, cli.width, cli.height, cli.log)?;
    let summary = pptx2png::convert(&options, &pptx2png::PptxBackend::new())
        .with_context(|| format!("Failed to convert {}", options.source.display()))?;

    Ok(summary.files.len())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let log = cli.log;

    match run(cli) {
        Ok(count) => {
            if log {
                println!("Converted {} slides", count);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
