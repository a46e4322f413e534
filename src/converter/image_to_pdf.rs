//! Image → single-page PDF, assembled via pdfium.

use super::{Converter, ConverterKind, IMAGE_INPUTS};
use crate::config::ConversionConfig;
use crate::engine;
use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::job::ConversionJob;
use crate::output::{ensure_folder, stem_file_name, write_atomic};
use image::GenericImageView;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::debug;

use super::image_to_image::load_image;

/// Writes `<stem>.pdf` holding the image on one page whose size in points
/// equals the image's size in pixels, so rendering the page back at 1× gives
/// the original dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageToPdf;

impl Converter for ImageToPdf {
    fn kind(&self) -> ConverterKind {
        ConverterKind::ImageToPdf
    }

    fn supported_inputs(&self) -> &'static [&'static str] {
        IMAGE_INPUTS
    }

    fn supported_outputs(&self) -> &'static [OutputFormat] {
        &[OutputFormat::Pdf]
    }

    fn convert(
        &self,
        job: &ConversionJob,
        config: &ConversionConfig,
    ) -> Result<Vec<PathBuf>, ConvertError> {
        let image = load_image(&job.input_path)?;
        let (width_px, height_px) = image.dimensions();

        let pdfium = engine::bind(config)?;
        let build_failed = |e: PdfiumError| ConvertError::PdfBuildFailed {
            path: job.input_path.clone(),
            detail: format!("{:?}", e),
        };

        let mut document = pdfium.create_new_pdf().map_err(build_failed)?;

        let width = PdfPoints::new(width_px as f32);
        let height = PdfPoints::new(height_px as f32);

        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(width, height))
            .map_err(build_failed)?;

        let mut image_object = PdfPageImageObject::new(&document, &image).map_err(build_failed)?;
        image_object
            .scale(width.value, height.value)
            .map_err(build_failed)?;

        page.objects_mut()
            .add_object(PdfPageObject::Image(image_object))
            .map_err(build_failed)?;

        let bytes = document.save_to_bytes().map_err(build_failed)?;
        debug!(
            width_px,
            height_px,
            bytes = bytes.len(),
            "Built single-page PDF"
        );

        ensure_folder(&job.output_folder)?;
        let path = job
            .output_folder
            .join(stem_file_name(&job.input_stem(), OutputFormat::Pdf));
        Ok(vec![write_atomic(&path, &bytes)?])
    }
}
