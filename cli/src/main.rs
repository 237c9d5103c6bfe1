//! pdf2jsonl CLI - PDF pages to catalog JSONL records

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2jsonl::{convert_file, CatalogMetadata, ConvertOptions};

const DEFAULT_OUTPUT: &str = "output.jsonl";

#[derive(Parser)]
#[command(name = "pdf2jsonl")]
#[command(version)]
#[command(about = "Convert each page of a PDF into one JSONL record", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output JSONL file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    flags: ConvertFlags,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF to JSONL, one record per page
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSONL file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        flags: ConvertFlags,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone, Default)]
struct ConvertFlags {
    /// Catalog metadata file (TOML)
    #[arg(long, value_name = "FILE", env = "PDF2JSONL_CATALOG")]
    catalog: Option<PathBuf>,

    /// Detect tables and add them to every record
    #[arg(long)]
    include_tables: bool,

    /// Skip pages that fail to extract instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Value written to metadata.fileUrl (defaults to the absolute input path)
    #[arg(long, value_name = "URL")]
    file_url: Option<String>,
}

impl ConvertFlags {
    fn to_options(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let catalog = match &self.catalog {
            Some(path) => CatalogMetadata::from_toml_file(path)?,
            None => CatalogMetadata::default(),
        };

        let mut options = ConvertOptions::new()
            .with_catalog(catalog)
            .with_tables(self.include_tables);
        if self.lenient {
            options = options.lenient();
        }
        if let Some(url) = &self.file_url {
            options = options.with_file_url(url);
        }
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            flags,
        }) => cmd_convert(&input, &output, &flags),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                let output = cli.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
                cmd_convert(&input, &output, &cli.flags)
            } else {
                println!("{}", "Usage: pdf2jsonl <FILE> [OUTPUT]".yellow());
                println!("       pdf2jsonl --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    flags: &ConvertFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = flags.to_options()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Converting {}...", input.display()));

    let summary = match convert_file(input, output, &options) {
        Ok(summary) => summary,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };
    pb.finish_and_clear();

    println!(
        "{} {} records to {}",
        "Saved".green(),
        summary.records,
        summary.output.display()
    );
    if (summary.records as u32) < summary.pages {
        println!(
            "{} {} of {} pages were skipped",
            "Warning:".yellow(),
            summary.pages - summary.records as u32,
            summary.pages
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf2jsonl".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF to catalog JSONL converter");
    println!();
    println!("License: MIT");
}
