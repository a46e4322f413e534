//! CLI binary for pdfpix.
//!
//! A thin shim over the library crate: maps flags to a `ConversionJob` and
//! `ConversionConfig`, runs the job on a `ConversionWorker`, prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfpix::{
    ConversionConfig, ConversionJob, ConversionResult, ConversionWorker, Converter,
    ConverterKind, OutputFormat,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every page of a PDF as PNG (page_1.png, page_2.png, …) next to the input
  pdfpix report.pdf --to png

  # Pages as JPEG into a chosen folder
  pdfpix report.pdf --to jpeg -o ./pages

  # Wrap a photo in a single-page PDF (photo.pdf)
  pdfpix photo.jpg --to pdf

  # Re-encode an image (logo.jpeg), higher JPEG quality
  pdfpix logo.png --to jpeg --jpeg-quality 92

  # Machine-readable result
  pdfpix scan.pdf --to png --json

  # What converts to what
  pdfpix --formats

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to an existing libpdfium — skips auto-download
  PDFIUM_CACHE_DIR        Override the pdfium cache root
  RUST_LOG                Log filter (overrides -v / -q)

SETUP:
  PDF conversions need PDFium (~30 MB). If no library is found it is
  downloaded once into the user cache directory (disable with --no-download).
"#;

/// Convert between PDF documents and raster images.
#[derive(Parser, Debug)]
#[command(
    name = "pdfpix",
    version,
    about = "Convert between PDF documents and raster images",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file: .pdf, .jpg, .jpeg or .png.
    #[arg(required_unless_present = "formats")]
    input: Option<PathBuf>,

    /// Target format: jpeg, png or pdf.
    #[arg(short, long = "to", env = "PDFPIX_FORMAT", required_unless_present = "formats")]
    to: Option<OutputFormat>,

    /// Output folder (created if absent). Default: the input's folder.
    #[arg(short, long, env = "PDFPIX_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Converter to use. Inferred from the input extension and target if omitted.
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFPIX_PASSWORD")]
    password: Option<String>,

    /// JPEG quality (1–100).
    #[arg(long, env = "PDFPIX_JPEG_QUALITY", default_value_t = 75,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Path to the PDFium shared library.
    #[arg(long, env = "PDFPIX_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,

    /// Never download PDFium; fail if no library is installed.
    #[arg(long, env = "PDFPIX_NO_DOWNLOAD")]
    no_download: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// List supported conversions and exit.
    #[arg(long)]
    formats: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFPIX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFPIX_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    PdfToImage,
    ImageToPdf,
    ImageToImage,
}

impl From<KindArg> for ConverterKind {
    fn from(v: KindArg) -> Self {
        match v {
            KindArg::PdfToImage => ConverterKind::PdfToImage,
            KindArg::ImageToPdf => ConverterKind::ImageToPdf,
            KindArg::ImageToImage => ConverterKind::ImageToImage,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.formats {
        print_formats();
        return Ok(());
    }

    let (input, target) = match (&cli.input, cli.to) {
        (Some(input), Some(target)) => (input.clone(), target),
        _ => anyhow::bail!("An input file and --to <FORMAT> are required"),
    };

    let kind = match cli.kind {
        Some(k) => k.into(),
        None => ConverterKind::infer(&input, target).with_context(|| {
            format!(
                "No converter turns '{}' into {target} (see --formats)",
                input.display()
            )
        })?,
    };

    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&input));

    let config = build_config(&cli)?;
    let job = validated_job(kind, input, output_dir.clone(), target)?;

    // ── Ensure PDFium engine is available ───────────────────────────────
    // Only the PDF-facing converters need it. A first run may download the
    // library; block_in_place keeps that off the async executor's hot path.
    if kind != ConverterKind::ImageToImage {
        tokio::task::block_in_place(|| prepare_engine(&config, cli.quiet || cli.json))?;
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let worker = ConversionWorker::new(config);
    let result = worker
        .submit(kind, job)?
        .wait()
        .await
        .context("Invalid conversion request")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
        println!("{json}");
        if !result.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    report(&result, kind, &output_dir, cli.quiet)
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .jpeg_quality(cli.jpeg_quality)
        .download_engine(!cli.no_download);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib.clone());
    }

    builder.build().context("Invalid configuration")
}

/// Build the job and run the converter's checks on it, so a bad input is
/// reported before any engine download starts.
fn validated_job(
    kind: ConverterKind,
    input: PathBuf,
    output_dir: PathBuf,
    target: OutputFormat,
) -> Result<ConversionJob> {
    let job = ConversionJob::new(input, output_dir, target);
    kind.converter()
        .validate(&job)
        .context("Invalid conversion request")?;
    Ok(job)
}

fn default_output_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Download PDFium into the cache if nothing usable is installed, showing a
/// byte-progress bar unless `silent`.
fn prepare_engine(config: &ConversionConfig, silent: bool) -> Result<()> {
    let locator = config.locator();
    if !locator
        .needs_download()
        .context("Cannot locate the PDF engine")?
    {
        return Ok(());
    }

    if silent {
        locator
            .fetch(None)
            .context("Failed to download PDF engine")?;
        return Ok(());
    }

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    bar.set_prefix("PDF engine");
    bar.enable_steady_tick(Duration::from_millis(80));

    let on_progress = |downloaded: u64, total: Option<u64>| {
        if let Some(t) = total {
            if bar.length() != Some(t) {
                bar.set_length(t);
            }
        }
        bar.set_position(downloaded);
    };
    locator
        .fetch(Some(&on_progress))
        .context("Failed to download PDF engine")?;

    bar.finish_with_message("ready ✓");
    Ok(())
}

fn report(
    result: &ConversionResult,
    kind: ConverterKind,
    output_dir: &Path,
    quiet: bool,
) -> Result<()> {
    if !result.success {
        anyhow::bail!(
            "{} {} failed: {}",
            red("✘"),
            kind,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    for path in &result.outputs {
        println!("{}", path.display());
    }
    if !quiet {
        eprintln!(
            "{} {} file(s) written to {}  {}",
            green("✔"),
            bold(&result.outputs.len().to_string()),
            bold(&output_dir.display().to_string()),
            dim(&format!("({kind})")),
        );
    }
    Ok(())
}

fn print_formats() {
    println!("{:<14} {:<22} {}", "CONVERTER", "INPUTS", "OUTPUTS");
    for kind in ConverterKind::ALL {
        let outputs: Vec<&str> = kind.supported_outputs().iter().map(|f| f.label()).collect();
        println!(
            "{:<14} {:<22} {}",
            kind.name(),
            kind.supported_inputs().join(", "),
            outputs.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfpix::ConvertError;

    #[test]
    fn missing_pdf_is_rejected_before_engine_setup() {
        let err = validated_job(
            ConverterKind::PdfToImage,
            PathBuf::from("/definitely/not/here.pdf"),
            PathBuf::from("/tmp"),
            OutputFormat::Png,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::NotFound { .. })
        ));
    }

    #[test]
    fn default_folder_reencode_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("logo.png");
        std::fs::write(&input, b"png bytes").unwrap();

        let err = validated_job(
            ConverterKind::ImageToImage,
            input.clone(),
            default_output_dir(&input),
            OutputFormat::Png,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::OutputOverwritesInput { .. })
        ));
    }

    #[test]
    fn default_output_dir_is_input_parent() {
        assert_eq!(default_output_dir(Path::new("a/b/c.pdf")), PathBuf::from("a/b"));
        assert_eq!(default_output_dir(Path::new("c.pdf")), PathBuf::from("."));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
