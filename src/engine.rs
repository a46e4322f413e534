//! PDFium access for the PDF-facing converters.
//!
//! Each job binds its own [`Pdfium`] and drops it when the job ends, so the
//! library handle and every document opened through it are released on both
//! the success and the failure path.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// Bind PDFium as described by `config`.
pub fn bind(config: &ConversionConfig) -> Result<Pdfium, ConvertError> {
    let pdfium = config.locator().bind()?;
    debug!("PDF engine ready");
    Ok(pdfium)
}

/// Open `path`, mapping pdfium's load errors to specific diagnostics.
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, ConvertError> {
    pdfium
        .load_pdf_from_file(path, password)
        .map_err(|e| load_error(path, &e, password.is_some()))
}

/// Classify a `load_pdf_from_file` failure. pdfium reports both a missing
/// and a rejected password as `PasswordError`; which one it was depends on
/// whether a password was supplied.
fn load_error(path: &Path, err: &PdfiumError, password_given: bool) -> ConvertError {
    let path = path.to_path_buf();
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            if password_given {
                ConvertError::WrongPassword { path }
            } else {
                ConvertError::PasswordRequired { path }
            }
        }
        other => ConvertError::CorruptPdf {
            path,
            detail: format!("{:?}", other),
        },
    }
}
