//! barcode-sheet: print product barcodes grouped by price.
//!
//! ```bash
//! # Build a PDF from a JSON list of {"code": ..., "price": ...}
//! barcode-sheet generate items.json --config sheet.toml
//!
//! # Check how one code will look
//! barcode-sheet preview 7290000000011 --output code.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barcode_sheet::graphics::encode_png;
use barcode_sheet::item::load_items;
use barcode_sheet::{create_pdf_with_barcodes, BarcodeGenerator, Config, SymbolRenderer};

#[derive(Parser, Debug)]
#[command(author, version, about = "Lay out product barcodes on printable pages, grouped by price")]
struct Args {
    /// Configuration file (TOML); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the barcode PDF
    Generate {
        /// JSON file with an array of {"code", "price"} items
        items: PathBuf,

        /// Directory for the PDF (overrides the config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Date shown in page headers (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Write a single barcode as PNG
    Preview {
        code: String,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };

    match args.command {
        Command::Generate { items, output_dir, date } => generate(config, &items, output_dir, date),
        Command::Preview { code, output } => preview(&config, &code, &output),
    }
}

fn generate(config: Config, items_path: &Path, output_dir: Option<PathBuf>, date: Option<String>) -> Result<()> {
    let config = with_output_dir(config, output_dir);
    let generated_at = generation_time(date.as_deref())?;

    let items = load_items(items_path)
        .with_context(|| format!("Failed to read items: {}", items_path.display()))?;
    let report = create_pdf_with_barcodes(&items, &config, generated_at)
        .with_context(|| format!("Failed to write PDF to {}", config.output.directory.display()))?;

    match report.path {
        Some(path) => println!("{} ({} pages)", path.display(), report.pages),
        None => println!("No items to print; nothing written"),
    }
    Ok(())
}

fn with_output_dir(mut config: Config, output_dir: Option<PathBuf>) -> Config {
    if let Some(dir) = output_dir {
        config.output.directory = dir;
    }
    config
}

/// Now, or the given day at the current time of day.
fn generation_time(date: Option<&str>) -> Result<NaiveDateTime> {
    let now = Local::now().naive_local();
    let Some(date) = date else {
        return Ok(now);
    };
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => Ok(day.and_time(now.time())),
        Err(e) => bail!("Invalid date {date:?} (expected YYYY-MM-DD): {e}"),
    }
}

fn preview(config: &Config, code: &str, output: &Path) -> Result<()> {
    let generator = SymbolRenderer::new(config.barcode.symbology);
    let width = config.layout.barcode_width.round().max(1.0) as u32;
    let height = config.layout.barcode_height.round().max(1.0) as u32;

    let image = generator
        .generate(code, width, height)
        .with_context(|| format!("Cannot encode {code:?}"))?;
    let png = encode_png(&image).context("Failed to encode PNG")?;
    fs::write(output, png).with_context(|| format!("Failed to write {}", output.display()))?;

    info!(code, width = image.width(), height = image.height(), "barcode preview written");
    println!("{}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_flag_sets_the_day() {
        let at = generation_time(Some("2025-05-01")).unwrap();
        assert_eq!(at.date(), NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        assert!(generation_time(Some("01/05/2025")).is_err());
        assert!(generation_time(Some("2025-13-01")).is_err());
    }

    #[test]
    fn test_write_failure_names_the_output_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let items = temp_dir.path().join("items.json");
        fs::write(&items, r#"[{"code": "A1", "price": 1}]"#).unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();
        let out = blocker.join("sub");

        let err = generate(Config::default(), &items, Some(out.clone()), Some("2025-05-01".into())).unwrap_err();
        assert!(err.to_string().contains(&out.display().to_string()), "got {err:#}");
    }

    #[test]
    fn test_output_dir_flag_overrides_config() {
        let config = with_output_dir(Config::default(), Some(PathBuf::from("/tmp/sheets")));
        assert_eq!(config.output.directory, PathBuf::from("/tmp/sheets"));

        let default_dir = Config::default().output.directory;
        assert_eq!(with_output_dir(Config::default(), None).output.directory, default_dir);
    }
}
