//! Output naming, raster encoding and file writing.
//!
//! Every output goes through [`write_atomic`]: bytes land in a temp file in
//! the destination folder and are renamed over the final name, so a failed
//! job never leaves a truncated file behind and a re-run replaces the
//! previous output in one step.

use crate::error::ConvertError;
use crate::format::OutputFormat;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::DynamicImage;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `page_<n>.<ext>` for 1-based page `n`.
pub fn page_file_name(page_num: usize, format: OutputFormat) -> String {
    format!("page_{page_num}.{}", format.extension())
}

/// `<stem>.<ext>`.
pub fn stem_file_name(stem: &str, format: OutputFormat) -> String {
    format!("{stem}.{}", format.extension())
}

/// Create `folder` (and parents) if it does not exist yet.
pub fn ensure_folder(folder: &Path) -> Result<(), ConvertError> {
    std::fs::create_dir_all(folder).map_err(|source| ConvertError::OutputFolder {
        path: folder.to_path_buf(),
        source,
    })
}

/// Encode `img` as JPEG or PNG.
///
/// JPEG has no alpha channel, so images are reduced to RGB8 first.
/// `Pdf` is not a raster format and is rejected.
pub fn encode_raster(
    img: &DynamicImage,
    format: OutputFormat,
    jpeg_quality: u8,
    dest: &Path,
) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::new();
    let encoded = match format {
        OutputFormat::Png => img.write_with_encoder(PngEncoder::new(&mut buf)),
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, jpeg_quality)),
        OutputFormat::Pdf => {
            return Err(ConvertError::Internal(
                "PDF is not a raster encoding".into(),
            ))
        }
    };
    encoded.map_err(|source| ConvertError::ImageEncodeFailed {
        path: dest.to_path_buf(),
        format: format.label().to_string(),
        source,
    })?;

    debug!(
        format = format.label(),
        bytes = buf.len(),
        width = img.width(),
        height = img.height(),
        "Encoded image"
    );
    Ok(buf)
}

/// Write `bytes` to `path`, replacing any existing file atomically.
///
/// The temp file is removed if anything fails before the final rename.
/// The result gets the same mode a plain `fs::write` would give it.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<PathBuf, ConvertError> {
    let write_failed = |source| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = temp_builder().tempfile_in(dir).map_err(write_failed)?;
    tmp.write_all(bytes).map_err(write_failed)?;
    tmp.as_file().sync_all().map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote output");
    Ok(path.to_path_buf())
}

/// Temp files default to 0600; request 0666 so the umask decides, as it
/// does for `fs::write`.
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".pdfpix-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn red_square() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 128])))
    }

    #[test]
    fn page_names_are_one_based_and_lowercase() {
        assert_eq!(page_file_name(1, OutputFormat::Png), "page_1.png");
        assert_eq!(page_file_name(12, OutputFormat::Jpeg), "page_12.jpeg");
        assert_eq!(stem_file_name("photo", OutputFormat::Pdf), "photo.pdf");
    }

    #[test]
    fn png_keeps_alpha_jpeg_drops_it() {
        let png = encode_raster(&red_square(), OutputFormat::Png, 75, Path::new("x.png")).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert!(decoded.color().has_alpha());

        let jpeg =
            encode_raster(&red_square(), OutputFormat::Jpeg, 75, Path::new("x.jpeg")).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert!(!decoded.color().has_alpha());
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
    }

    #[test]
    fn pdf_is_not_a_raster_target() {
        let err = encode_raster(&red_square(), OutputFormat::Pdf, 75, Path::new("x.pdf"));
        assert!(matches!(err, Err(ConvertError::Internal(_))));
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old contents").unwrap();

        write_atomic(&path, b"new").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temp file should have been renamed away");
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_uses_umask_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.bin");
        std::fs::write(&plain, b"x").unwrap();
        let page = dir.path().join("page_1.png");
        write_atomic(&page, b"x").unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&page), mode(&plain));
    }

    #[test]
    fn ensure_folder_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_folder(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
