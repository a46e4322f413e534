//! # pdfium-fetch
//!
//! Find a usable [PDFium](https://pdfium.googlesource.com/pdfium/) shared
//! library for `pdfium-render`, downloading a prebuilt copy when none is
//! installed.
//!
//! ## Resolution order
//!
//! [`Locator::bind`] tries each source in turn and binds the first that
//! works:
//!
//! 1. an explicit path set with [`Locator::library_path`]
//! 2. the `PDFIUM_LIB_PATH` environment variable
//! 3. the per-release cache directory (see [`Locator::cache_dir`])
//! 4. the directory containing the running executable
//! 5. the system library search path
//! 6. a fresh download from
//!    [bblanchon/pdfium-binaries](https://github.com/bblanchon/pdfium-binaries)
//!    into the cache, unless disabled with [`Locator::allow_download`]
//!
//! ```rust,no_run
//! use pdfium_fetch::Locator;
//!
//! let pdfium = Locator::new().allow_download(false).bind()?;
//! # Ok::<(), pdfium_fetch::FetchError>(())
//! ```
//!
//! ## Environment variables
//!
//! - `PDFIUM_LIB_PATH` — path to an existing library; skips the download.
//! - `PDFIUM_CACHE_DIR` — cache root used when [`Locator::cache_root`] is unset.

mod download;
mod platform;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pdfium_render::prelude::Pdfium;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use platform::Platform;

/// The pdfium-binaries `chromium/<release>` tag fetched on download.
pub const PDFIUM_RELEASE: &str = "7690";

/// Serialises downloads so concurrent callers fetch the archive once.
static FETCH_LOCK: Mutex<()> = Mutex::new(());

/// Errors raised while locating, fetching or binding PDFium.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No PDFium build is published for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// An explicitly configured library path does not exist.
    #[error("PDFium library not found at '{path}'")]
    Missing { path: PathBuf },

    #[error("Cannot prepare PDFium cache directory '{path}': {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("Cannot extract '{member}' from the PDFium archive: {reason}")]
    Extract { member: String, reason: String },

    #[error("Failed to bind PDFium from {source_desc}: {reason}")]
    Bind { source_desc: String, reason: String },
}

/// Where a bound PDFium library came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibrarySource {
    Explicit(PathBuf),
    Environment(PathBuf),
    Cached(PathBuf),
    Adjacent(PathBuf),
    Downloaded(PathBuf),
    System,
}

impl LibrarySource {
    /// Filesystem path of the library, `None` for the system search path.
    pub fn path(&self) -> Option<&Path> {
        match self {
            LibrarySource::Explicit(p)
            | LibrarySource::Environment(p)
            | LibrarySource::Cached(p)
            | LibrarySource::Adjacent(p)
            | LibrarySource::Downloaded(p) => Some(p),
            LibrarySource::System => None,
        }
    }
}

impl fmt::Display for LibrarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibrarySource::Explicit(p) => write!(f, "configured path '{}'", p.display()),
            LibrarySource::Environment(p) => write!(f, "PDFIUM_LIB_PATH '{}'", p.display()),
            LibrarySource::Cached(p) => write!(f, "cache '{}'", p.display()),
            LibrarySource::Adjacent(p) => write!(f, "executable directory '{}'", p.display()),
            LibrarySource::Downloaded(p) => write!(f, "fresh download '{}'", p.display()),
            LibrarySource::System => f.write_str("system library path"),
        }
    }
}

/// Resolves and binds the PDFium shared library.
#[derive(Debug, Clone)]
pub struct Locator {
    explicit: Option<PathBuf>,
    cache_root: Option<PathBuf>,
    allow_download: bool,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

impl Locator {
    pub fn new() -> Self {
        Self {
            explicit: None,
            cache_root: None,
            allow_download: true,
        }
    }

    /// Use this library file and nothing else.
    pub fn library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    pub fn cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = Some(root.into());
        self
    }

    pub fn allow_download(mut self, allow: bool) -> Self {
        self.allow_download = allow;
        self
    }

    /// Per-release directory holding a downloaded library.
    ///
    /// Defaults to `<user cache dir>/pdfpix/pdfium-<release>`.
    pub fn cache_dir(&self) -> PathBuf {
        let root = self
            .cache_root
            .clone()
            .or_else(|| std::env::var_os("PDFIUM_CACHE_DIR").map(PathBuf::from))
            .unwrap_or_else(|| {
                dirs::cache_dir()
                    .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
                    .unwrap_or_else(std::env::temp_dir)
                    .join("pdfpix")
            });
        root.join(format!("pdfium-{PDFIUM_RELEASE}"))
    }

    /// Look for a library file on disk without touching the network.
    ///
    /// Returns `Ok(None)` when only the system path or a download remain.
    pub fn locate(&self) -> Result<Option<LibrarySource>, FetchError> {
        if let Some(path) = &self.explicit {
            return if path.is_file() {
                Ok(Some(LibrarySource::Explicit(path.clone())))
            } else {
                Err(FetchError::Missing { path: path.clone() })
            };
        }

        if let Some(path) = std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from) {
            if path.is_file() {
                return Ok(Some(LibrarySource::Environment(path)));
            }
            warn!(path = %path.display(), "PDFIUM_LIB_PATH does not exist; ignoring");
        }

        let name = Pdfium::pdfium_platform_library_name();

        let cached = self.cache_dir().join(&name);
        if cached.is_file() {
            return Ok(Some(LibrarySource::Cached(cached)));
        }

        let adjacent = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(&name)));
        if let Some(path) = adjacent.filter(|p| p.is_file()) {
            return Ok(Some(LibrarySource::Adjacent(path)));
        }

        Ok(None)
    }

    /// Whether binding will have to download PDFium first.
    ///
    /// Probes the system library, so call it before starting a progress
    /// display rather than on a hot path.
    pub fn needs_download(&self) -> Result<bool, FetchError> {
        if self.locate()?.is_some() || !self.allow_download {
            return Ok(false);
        }
        Ok(Pdfium::bind_to_system_library().is_err())
    }

    /// Download the library into [`Self::cache_dir`] and return its path.
    ///
    /// `on_progress` receives `(bytes_so_far, total_bytes)` while the archive
    /// streams in. A library already present in the cache is reused.
    pub fn fetch(
        &self,
        on_progress: Option<&dyn Fn(u64, Option<u64>)>,
    ) -> Result<PathBuf, FetchError> {
        let platform = Platform::current()?;
        let dir = self.cache_dir();
        let dest = dir.join(platform.library_name());

        let _guard = FETCH_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if dest.is_file() {
            debug!(path = %dest.display(), "PDFium already cached");
            return Ok(dest);
        }

        std::fs::create_dir_all(&dir).map_err(|source| FetchError::CacheDir {
            path: dir.clone(),
            source,
        })?;
        let archive = download::fetch_archive(&download::archive_url(&platform), on_progress)?;
        download::unpack_member(&archive, platform.member, &dest)?;

        info!(path = %dest.display(), "PDFium cached");
        Ok(dest)
    }

    /// Resolve PDFium per the resolution order and bind it.
    pub fn bind(&self) -> Result<Pdfium, FetchError> {
        if let Some(source) = self.locate()? {
            return bind_source(&source);
        }

        match bind_source(&LibrarySource::System) {
            Ok(pdfium) => Ok(pdfium),
            Err(err) if self.allow_download => {
                debug!(%err, "No system PDFium; downloading");
                let path = self.fetch(None)?;
                bind_source(&LibrarySource::Downloaded(path))
            }
            Err(err) => Err(err),
        }
    }
}

/// Bind the library described by `source`.
pub fn bind_source(source: &LibrarySource) -> Result<Pdfium, FetchError> {
    let bindings = match source.path() {
        Some(path) => Pdfium::bind_to_library(path),
        None => Pdfium::bind_to_system_library(),
    };
    let bindings = bindings.map_err(|e| FetchError::Bind {
        source_desc: source.to_string(),
        reason: e.to_string(),
    })?;
    debug!(%source, "PDFium bound");
    Ok(Pdfium::new(bindings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_dir_is_release_scoped() {
        let locator = Locator::new().cache_root("/tmp/pdfpix-cache-test");
        let dir = locator.cache_dir();
        assert!(dir.starts_with("/tmp/pdfpix-cache-test"));
        assert!(dir.ends_with(format!("pdfium-{PDFIUM_RELEASE}")));
    }

    #[test]
    fn explicit_missing_path_is_reported() {
        let locator = Locator::new().library_path("/definitely/not/libpdfium.so");
        match locator.locate() {
            Err(FetchError::Missing { path }) => {
                assert_eq!(path, PathBuf::from("/definitely/not/libpdfium.so"))
            }
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn explicit_existing_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let lib = dir.path().join("libpdfium-test.so");
        std::fs::write(&lib, b"not really a library").unwrap();

        let source = Locator::new().library_path(&lib).locate().unwrap();
        assert_eq!(source, Some(LibrarySource::Explicit(lib)));
    }

    #[test]
    fn cached_library_is_found_without_network() {
        let root = tempfile::tempdir().unwrap();
        let locator = Locator::new().cache_root(root.path()).allow_download(false);
        let dir = locator.cache_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let lib = dir.join(Pdfium::pdfium_platform_library_name());
        std::fs::write(&lib, b"cached").unwrap();

        // PDFIUM_LIB_PATH, when set by the developer, legitimately takes priority.
        if std::env::var_os("PDFIUM_LIB_PATH").is_some() {
            return;
        }
        assert_eq!(locator.locate().unwrap(), Some(LibrarySource::Cached(lib)));
    }

    #[test]
    fn system_library_is_tried_before_giving_up() {
        if std::env::var_os("PDFIUM_LIB_PATH").is_some() {
            return;
        }
        let root = tempfile::tempdir().unwrap();
        let locator = Locator::new().cache_root(root.path()).allow_download(false);
        assert!(!locator.needs_download().unwrap());

        match locator.bind() {
            // A system-wide PDFium is installed.
            Ok(_) => {}
            Err(FetchError::Bind { source_desc, .. }) => {
                assert_eq!(source_desc, LibrarySource::System.to_string())
            }
            Err(other) => panic!("expected a system bind attempt, got {other:?}"),
        }
    }

    #[test]
    fn source_display_names_origin() {
        assert_eq!(LibrarySource::System.to_string(), "system library path");
        assert!(LibrarySource::Cached(PathBuf::from("/c/libpdfium.so"))
            .to_string()
            .contains("/c/libpdfium.so"));
        assert_eq!(LibrarySource::System.path(), None);
    }
}
