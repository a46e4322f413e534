//! The three converter variants behind one [`Converter`] interface.
//!
//! ```text
//!   ConverterKind ──converter()──▶ &dyn Converter
//!                                    ├─ validate   stat + extension + target checks
//!                                    └─ convert    one pdfium / image call, N outputs
//! ```
//!
//! | Variant        | Inputs               | Outputs       | Backend        |
//! |----------------|----------------------|---------------|----------------|
//! | [`PdfToImage`] | `pdf`                | `JPEG`, `PNG` | pdfium render  |
//! | [`ImageToPdf`] | `jpg`, `jpeg`, `png` | `pdf`         | pdfium create  |
//! | [`ImageToImage`] | `jpg`, `jpeg`, `png` | `JPEG`, `PNG` | `image` codecs |
//!
//! Callers pick a variant through [`ConverterKind`]; nothing inspects types
//! at runtime.

mod image_to_image;
mod image_to_pdf;
mod pdf_to_image;

pub use image_to_image::ImageToImage;
pub use image_to_pdf::ImageToPdf;
pub use pdf_to_image::PdfToImage;

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::job::{extension_of, ConversionJob};
use crate::validate::{check_extension, check_output, validate_input};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Raster inputs shared by the two image-reading variants.
pub(crate) const IMAGE_INPUTS: &[&str] = &["jpg", "jpeg", "png"];

/// Raster outputs shared by the two image-writing variants.
pub(crate) const RASTER_OUTPUTS: &[OutputFormat] = &[OutputFormat::Jpeg, OutputFormat::Png];

/// A single-shot file conversion.
pub trait Converter: Send + Sync {
    fn kind(&self) -> ConverterKind;

    /// Lowercase input extensions this variant accepts.
    fn supported_inputs(&self) -> &'static [&'static str];

    fn supported_outputs(&self) -> &'static [OutputFormat];

    /// Check every precondition of `job` for this variant.
    ///
    /// Stats the input; never opens it and writes nothing.
    fn validate(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        check_capabilities(self, job)
    }

    /// Perform the transform for an already-validated job and return the
    /// files written, in order. Creates the output folder when missing.
    fn convert(
        &self,
        job: &ConversionJob,
        config: &ConversionConfig,
    ) -> Result<Vec<PathBuf>, ConvertError>;
}

/// The checks every variant shares: the input file itself, its extension,
/// and the target format against the variant's capability lists.
pub(crate) fn check_capabilities<C: Converter + ?Sized>(
    converter: &C,
    job: &ConversionJob,
) -> Result<(), ConvertError> {
    validate_input(&job.input_path)?;
    check_extension(&job.input_path, converter.supported_inputs())?;
    check_output(
        converter.kind().name(),
        job.output_format,
        converter.supported_outputs(),
    )
}

/// Which conversion to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConverterKind {
    PdfToImage,
    ImageToPdf,
    ImageToImage,
}

impl ConverterKind {
    pub const ALL: [ConverterKind; 3] = [
        ConverterKind::PdfToImage,
        ConverterKind::ImageToPdf,
        ConverterKind::ImageToImage,
    ];

    pub fn converter(self) -> &'static dyn Converter {
        match self {
            ConverterKind::PdfToImage => &PdfToImage,
            ConverterKind::ImageToPdf => &ImageToPdf,
            ConverterKind::ImageToImage => &ImageToImage,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ConverterKind::PdfToImage => "PDF→Image",
            ConverterKind::ImageToPdf => "Image→PDF",
            ConverterKind::ImageToImage => "Image→Image",
        }
    }

    pub fn supported_inputs(self) -> &'static [&'static str] {
        self.converter().supported_inputs()
    }

    pub fn supported_outputs(self) -> &'static [OutputFormat] {
        self.converter().supported_outputs()
    }

    /// Choose a variant from the input's extension and the target format.
    ///
    /// Returns `None` when no variant handles the pair (e.g. `pdf` → `pdf`,
    /// or an unsupported extension).
    pub fn infer(input: &Path, target: OutputFormat) -> Option<Self> {
        let extension = extension_of(input)?;
        Self::ALL.into_iter().find(|kind| {
            kind.supported_inputs().contains(&extension.as_str())
                && kind.supported_outputs().contains(&target)
        })
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_lists_are_fixed() {
        assert_eq!(ConverterKind::PdfToImage.supported_inputs(), &["pdf"]);
        assert_eq!(
            ConverterKind::PdfToImage.supported_outputs(),
            &[OutputFormat::Jpeg, OutputFormat::Png]
        );
        assert_eq!(
            ConverterKind::ImageToPdf.supported_inputs(),
            &["jpg", "jpeg", "png"]
        );
        assert_eq!(
            ConverterKind::ImageToPdf.supported_outputs(),
            &[OutputFormat::Pdf]
        );
        assert_eq!(
            ConverterKind::ImageToImage.supported_inputs(),
            ConverterKind::ImageToPdf.supported_inputs()
        );
        assert_eq!(
            ConverterKind::ImageToImage.supported_outputs(),
            ConverterKind::PdfToImage.supported_outputs()
        );
    }

    #[test]
    fn converter_reports_its_own_kind() {
        for kind in ConverterKind::ALL {
            assert_eq!(kind.converter().kind(), kind);
        }
    }

    #[test]
    fn infer_by_extension_and_target() {
        let infer = |p: &str, f| ConverterKind::infer(Path::new(p), f);
        assert_eq!(infer("a.PDF", OutputFormat::Png), Some(ConverterKind::PdfToImage));
        assert_eq!(infer("a.jpg", OutputFormat::Pdf), Some(ConverterKind::ImageToPdf));
        assert_eq!(infer("a.png", OutputFormat::Jpeg), Some(ConverterKind::ImageToImage));
        assert_eq!(infer("a.pdf", OutputFormat::Pdf), None);
        assert_eq!(infer("a.gif", OutputFormat::Png), None);
        assert_eq!(infer("no_extension", OutputFormat::Png), None);
    }

    #[test]
    fn validate_accepts_every_supported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        for kind in ConverterKind::ALL {
            let target = kind.supported_outputs()[0];
            for ext in kind.supported_inputs() {
                let path = dir.path().join(format!("input.{ext}"));
                std::fs::write(&path, b"not empty").unwrap();
                let job = ConversionJob::new(&path, &out, target);
                kind.converter()
                    .validate(&job)
                    .unwrap_or_else(|e| panic!("{kind} rejected .{ext}: {e}"));
            }
        }
    }

    #[test]
    fn validate_rejects_wrong_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"not empty").unwrap();

        let job = ConversionJob::new(&path, dir.path(), OutputFormat::Pdf);
        let err = ConverterKind::ImageToImage.converter().validate(&job).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedOutput { .. }), "got: {err:?}");
    }

    #[test]
    fn validate_reports_missing_before_extension() {
        let job = ConversionJob::new("/nope/scan.gif", "/out", OutputFormat::Png);
        let err = ConverterKind::ImageToImage.converter().validate(&job).unwrap_err();
        assert!(matches!(err, ConvertError::NotFound { .. }), "got: {err:?}");
    }
}
