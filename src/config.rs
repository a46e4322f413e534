//! Conversion settings shared by every converter.
//!
//! [`ConversionConfig`] is built with [`ConversionConfig::builder`] and is
//! cheap to clone, so the worker can move a copy onto its blocking thread.
//! Nothing here changes the shape of a job: the upscaling factor used for PDF
//! rendering is the fixed [`UPSCALE_FACTOR`].

use crate::error::ConvertError;
use pdfium_fetch::Locator;
use std::fmt;
use std::path::PathBuf;

/// Multiplier applied to a PDF page's point size when rasterising it.
///
/// A page of 612 × 792 pt renders to 1836 × 2376 px.
pub const UPSCALE_FACTOR: f32 = 3.0;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Settings for a conversion.
///
/// # Example
/// ```rust
/// use pdfpix::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .jpeg_quality(90)
///     .download_engine(false)
///     .build()
///     .unwrap();
/// assert_eq!(config.jpeg_quality, 90);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// User password for encrypted PDF inputs.
    pub password: Option<String>,

    /// JPEG encoder quality, 1–100. Default: 75.
    pub jpeg_quality: u8,

    /// Explicit path to the PDFium shared library. When set, no other
    /// location is tried.
    pub pdfium_library: Option<PathBuf>,

    /// Allow downloading PDFium into the cache when no library is found.
    /// Default: true.
    pub download_engine: bool,

    /// Override for the PDFium cache root.
    pub engine_cache_dir: Option<PathBuf>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            password: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            pdfium_library: None,
            download_engine: true,
            engine_cache_dir: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("jpeg_quality", &self.jpeg_quality)
            .field("pdfium_library", &self.pdfium_library)
            .field("download_engine", &self.download_engine)
            .field("engine_cache_dir", &self.engine_cache_dir)
            .finish()
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The PDFium [`Locator`] described by this config.
    pub fn locator(&self) -> Locator {
        let mut locator = Locator::new().allow_download(self.download_engine);
        if let Some(ref path) = self.pdfium_library {
            locator = locator.library_path(path);
        }
        if let Some(ref root) = self.engine_cache_dir {
            locator = locator.cache_root(root);
        }
        locator
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    /// Values above 100 are clamped; 0 is rejected by [`Self::build`].
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.min(100);
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn download_engine(mut self, allow: bool) -> Self {
        self.config.download_engine = allow;
        self
    }

    pub fn engine_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.engine_cache_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        if self.config.jpeg_quality == 0 {
            return Err(ConvertError::InvalidConfig(
                "JPEG quality must be 1–100, got 0".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.jpeg_quality, 75);
        assert!(c.download_engine);
        assert!(c.password.is_none());
    }

    #[test]
    fn quality_is_clamped_and_zero_rejected() {
        let c = ConversionConfig::builder().jpeg_quality(250).build().unwrap();
        assert_eq!(c.jpeg_quality, 100);

        let err = ConversionConfig::builder().jpeg_quality(0).build().unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"), "got: {dbg}");
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn locator_uses_configured_library() {
        let c = ConversionConfig::builder()
            .pdfium_library("/nonexistent/libpdfium.so")
            .build()
            .unwrap();
        assert!(matches!(
            c.locator().locate(),
            Err(pdfium_fetch::FetchError::Missing { .. })
        ));
    }
}
