//! Error types for the pdfpix library.
//!
//! [`ConvertError`] covers two families of failure that callers treat
//! differently:
//!
//! * **Validation** — the job itself is unacceptable (missing or empty
//!   input, unsupported extension or target format). These are returned as
//!   `Err(ConvertError)` from [`crate::convert`] so the caller can show a
//!   specific message before anything is written.
//!
//! * **Transform** — the job was valid but the PDF or image library, or the
//!   filesystem, failed while converting. [`crate::convert`] catches these at
//!   the converter boundary and reports them inside a failed
//!   [`crate::ConversionResult`]; they never escape as `Err`.
//!
//! [`ConvertError::is_validation`] tells the two apart.

use std::path::PathBuf;
use thiserror::Error;

/// Every error the pdfpix library can produce.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// Input path does not exist.
    #[error("Input file not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The process may not stat or read the input.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// Input path exists but is a directory or other non-file.
    #[error("Input '{path}' is not a regular file")]
    NotAFile { path: PathBuf },

    /// Input file has zero bytes.
    #[error("Input file '{path}' is empty")]
    EmptyFile { path: PathBuf },

    /// Input extension is not accepted by the selected converter.
    #[error("Unsupported input '{path}': expected one of [{expected}], got '{extension}'")]
    UnsupportedInput {
        path: PathBuf,
        extension: String,
        expected: String,
    },

    /// Target format is not produced by the selected converter.
    #[error("{converter} cannot produce {format}; supported outputs: [{expected}]")]
    UnsupportedOutput {
        converter: String,
        format: String,
        expected: String,
    },

    /// The output file would replace the input itself.
    #[error("Output '{path}' would overwrite the input; choose another folder or format")]
    OutputOverwritesInput { path: PathBuf },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The PDF cannot be parsed.
    #[error("PDF '{path}' is corrupt or unreadable: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was configured.
    #[error("PDF '{path}' is encrypted and requires a password")]
    PasswordRequired { path: PathBuf },

    /// The configured password was rejected.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium failed to rasterise a page (1-based).
    #[error("Rendering failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// pdfium failed while assembling an output PDF.
    #[error("Failed to build PDF from '{path}': {detail}")]
    PdfBuildFailed { path: PathBuf, detail: String },

    // ── Image errors ──────────────────────────────────────────────────────
    /// The input image could not be read or decoded.
    #[error("Failed to decode image '{path}': {detail}")]
    ImageDecodeFailed { path: PathBuf, detail: String },

    /// An image could not be encoded to the target format.
    #[error("Failed to encode {format} for '{path}': {source}")]
    ImageEncodeFailed {
        path: PathBuf,
        format: String,
        #[source]
        source: image::ImageError,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Output folder could not be created.
    #[error("Cannot create output folder '{path}': {source}")]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Engine / config errors ────────────────────────────────────────────
    /// No PDFium library could be bound.
    #[error(
        "PDF engine unavailable: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or allow the automatic download."
    )]
    EngineUnavailable(String),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A job is already running on the worker.
    #[error("A conversion is already in progress")]
    WorkerBusy,

    /// Unexpected internal error (e.g. a panicked worker task).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// `true` for errors that reject the job before any transform starts.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConvertError::NotFound { .. }
                | ConvertError::PermissionDenied { .. }
                | ConvertError::NotAFile { .. }
                | ConvertError::EmptyFile { .. }
                | ConvertError::UnsupportedInput { .. }
                | ConvertError::UnsupportedOutput { .. }
                | ConvertError::OutputOverwritesInput { .. }
        )
    }
}

impl From<pdfium_fetch::FetchError> for ConvertError {
    fn from(e: pdfium_fetch::FetchError) -> Self {
        ConvertError::EngineUnavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_path() {
        let e = ConvertError::NotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("/tmp/missing.pdf"));
        assert!(e.is_validation());
    }

    #[test]
    fn unsupported_input_lists_expected_extensions() {
        let e = ConvertError::UnsupportedInput {
            path: PathBuf::from("scan.tiff"),
            extension: "tiff".into(),
            expected: "jpg, jpeg, png".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("jpg, jpeg, png"), "got: {msg}");
        assert!(msg.contains("'tiff'"), "got: {msg}");
    }

    #[test]
    fn render_failure_is_not_validation() {
        let e = ConvertError::RenderFailed {
            page: 4,
            detail: "bitmap allocation".into(),
        };
        assert!(e.to_string().contains("page 4"));
        assert!(!e.is_validation());
    }

    #[test]
    fn engine_error_carries_hint() {
        let e = ConvertError::EngineUnavailable("no library".into());
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
        assert!(!ConvertError::WorkerBusy.is_validation());
    }
}
