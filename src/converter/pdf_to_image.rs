//! PDF → one raster image per page, rendered via pdfium.

use super::{Converter, ConverterKind, RASTER_OUTPUTS};
use crate::config::{ConversionConfig, UPSCALE_FACTOR};
use crate::engine;
use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::job::ConversionJob;
use crate::output::{encode_raster, ensure_folder, page_file_name, write_atomic};
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::{debug, info};

/// Renders every page at [`UPSCALE_FACTOR`]× its point size and writes
/// `page_1.<ext>` … `page_N.<ext>`.
///
/// The first page that fails aborts the job. Pages already written stay on
/// disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfToImage;

impl Converter for PdfToImage {
    fn kind(&self) -> ConverterKind {
        ConverterKind::PdfToImage
    }

    fn supported_inputs(&self) -> &'static [&'static str] {
        &["pdf"]
    }

    fn supported_outputs(&self) -> &'static [OutputFormat] {
        RASTER_OUTPUTS
    }

    fn convert(
        &self,
        job: &ConversionJob,
        config: &ConversionConfig,
    ) -> Result<Vec<PathBuf>, ConvertError> {
        let pdfium = engine::bind(config)?;
        let document =
            engine::open_document(&pdfium, &job.input_path, config.password.as_deref())?;

        let pages = document.pages();
        let total = pages.len() as usize;
        info!(pages = total, "PDF loaded");

        ensure_folder(&job.output_folder)?;
        let render_config = PdfRenderConfig::new().scale_page_by_factor(UPSCALE_FACTOR);
        let mut written = Vec::with_capacity(total);

        for (idx, page) in pages.iter().enumerate() {
            let page_num = idx + 1;
            let bitmap = page
                .render_with_config(&render_config)
                .map_err(|e| ConvertError::RenderFailed {
                    page: page_num,
                    detail: format!("{:?}", e),
                })?;
            let image = bitmap.as_image();
            debug!(
                "Rendered page {}/{} → {}x{} px",
                page_num,
                total,
                image.width(),
                image.height()
            );

            let path = job
                .output_folder
                .join(page_file_name(page_num, job.output_format));
            let bytes = encode_raster(&image, job.output_format, config.jpeg_quality, &path)?;
            written.push(write_atomic(&path, &bytes)?);
        }

        Ok(written)
    }
}
