//! Image → image re-encoding with the `image` codecs.

use super::{check_capabilities, Converter, ConverterKind, IMAGE_INPUTS, RASTER_OUTPUTS};
use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::job::ConversionJob;
use crate::output::{encode_raster, ensure_folder, stem_file_name, write_atomic};
use crate::validate::check_not_input;
use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes `<stem>.<ext>` with the same pixel dimensions as the input.
///
/// Re-encoding into the input's own folder and format would name the input
/// itself; such jobs fail validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageToImage;

impl Converter for ImageToImage {
    fn kind(&self) -> ConverterKind {
        ConverterKind::ImageToImage
    }

    fn supported_inputs(&self) -> &'static [&'static str] {
        IMAGE_INPUTS
    }

    fn supported_outputs(&self) -> &'static [OutputFormat] {
        RASTER_OUTPUTS
    }

    fn validate(&self, job: &ConversionJob) -> Result<(), ConvertError> {
        check_capabilities(self, job)?;
        check_not_input(&job.input_path, &output_path(job))
    }

    fn convert(
        &self,
        job: &ConversionJob,
        config: &ConversionConfig,
    ) -> Result<Vec<PathBuf>, ConvertError> {
        let image = load_image(&job.input_path)?;

        ensure_folder(&job.output_folder)?;
        let path = output_path(job);
        let bytes = encode_raster(&image, job.output_format, config.jpeg_quality, &path)?;
        Ok(vec![write_atomic(&path, &bytes)?])
    }
}

fn output_path(job: &ConversionJob) -> PathBuf {
    job.output_folder
        .join(stem_file_name(&job.input_stem(), job.output_format))
}

/// Decode the image at `path`, sniffing the format from its content so a
/// mislabelled `.jpg` that is really a PNG still loads.
pub(super) fn load_image(path: &Path) -> Result<DynamicImage, ConvertError> {
    let decode_failed = |detail: String| ConvertError::ImageDecodeFailed {
        path: path.to_path_buf(),
        detail,
    };

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| decode_failed(e.to_string()))?;

    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "Loaded image"
    );
    Ok(image)
}
