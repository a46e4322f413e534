//! # pdfpix
//!
//! Convert between PDF documents and raster images:
//!
//! | Converter      | Input                | Output                       |
//! |----------------|----------------------|------------------------------|
//! | PDF → Image    | `pdf`                | `page_<n>.jpeg` / `.png`, 3× |
//! | Image → PDF    | `jpg`, `jpeg`, `png` | `<stem>.pdf`, one page       |
//! | Image → Image  | `jpg`, `jpeg`, `png` | `<stem>.jpeg` / `.png`       |
//!
//! Each conversion is one validated, single-shot job. PDF rendering and PDF
//! creation go through [pdfium](https://pdfium.googlesource.com/pdfium/);
//! the library is located (or downloaded once) by the `pdfium-fetch` crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfpix::{convert, ConversionConfig, ConversionJob, ConverterKind, OutputFormat};
//!
//! fn main() -> Result<(), pdfpix::ConvertError> {
//!     let job = ConversionJob::new("report.pdf", "report_pages", OutputFormat::Png);
//!     let result = convert(ConverterKind::PdfToImage, &job, &ConversionConfig::default())?;
//!     if result.success {
//!         println!("wrote {} pages", result.outputs.len());
//!     } else {
//!         eprintln!("failed: {}", result.error.unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Validation problems (missing or empty input, wrong extension or target)
//! are returned as `Err`; failures inside the conversion come back as a
//! [`ConversionResult`] with `success == false`.
//!
//! For interactive front ends, [`ConversionWorker`] runs one job at a time
//! off the caller's thread and rejects submissions while busy.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfpix` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod converter;
pub mod engine;
pub mod error;
pub mod format;
pub mod job;
pub mod output;
pub mod validate;
pub mod worker;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, UPSCALE_FACTOR};
pub use convert::{convert, convert_async};
pub use converter::{Converter, ConverterKind, ImageToImage, ImageToPdf, PdfToImage};
pub use error::ConvertError;
pub use format::{OutputFormat, ParseFormatError};
pub use job::{ConversionJob, ConversionResult};
pub use validate::validate_input;
pub use worker::{ConversionWorker, PendingConversion};
