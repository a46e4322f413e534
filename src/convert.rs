//! Conversion entry points.
//!
//! [`convert`] is the boundary between the converters and their caller:
//!
//! * validation failures come back as `Err(ConvertError)` so the caller can
//!   show a specific message;
//! * everything that fails during the transform is caught here, logged, and
//!   returned as `Ok(ConversionResult { success: false, .. })`.
//!
//! [`convert_async`] runs the same call on tokio's blocking pool; pdfium is
//! not async-safe and rendering is CPU-bound.

use crate::config::ConversionConfig;
use crate::converter::ConverterKind;
use crate::error::ConvertError;
use crate::job::{ConversionJob, ConversionResult};
use std::time::Instant;
use tracing::{info, warn};

/// Validate `job` for `kind` and run it.
///
/// # Errors
/// Only validation errors (see [`ConvertError::is_validation`]).
/// Transform errors are reported inside the returned [`ConversionResult`].
///
/// # Example
/// ```rust,no_run
/// use pdfpix::{convert, ConversionConfig, ConversionJob, ConverterKind, OutputFormat};
///
/// let job = ConversionJob::new("scan.pdf", "pages", OutputFormat::Png);
/// let result = convert(ConverterKind::PdfToImage, &job, &ConversionConfig::default())?;
/// if !result.success {
///     eprintln!("conversion failed: {}", result.error.unwrap_or_default());
/// }
/// # Ok::<(), pdfpix::ConvertError>(())
/// ```
pub fn convert(
    kind: ConverterKind,
    job: &ConversionJob,
    config: &ConversionConfig,
) -> Result<ConversionResult, ConvertError> {
    let converter = kind.converter();
    converter.validate(job)?;

    let start = Instant::now();
    info!(
        converter = kind.name(),
        input = %job.input_path.display(),
        output = %job.output_folder.display(),
        format = job.output_format.label(),
        "Starting conversion"
    );

    match converter.convert(job, config) {
        Ok(outputs) => {
            info!(
                files = outputs.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Conversion complete"
            );
            Ok(ConversionResult::succeeded(outputs))
        }
        Err(e) => {
            warn!(error = %e, "Conversion failed");
            Ok(ConversionResult::failed(e.to_string()))
        }
    }
}

/// [`convert`] on a blocking worker thread.
pub async fn convert_async(
    kind: ConverterKind,
    job: ConversionJob,
    config: ConversionConfig,
) -> Result<ConversionResult, ConvertError> {
    tokio::task::spawn_blocking(move || convert(kind, &job, &config))
        .await
        .map_err(|e| ConvertError::Internal(format!("Conversion task panicked: {}", e)))?
}
