//! Fetching a pdfium-binaries release archive and unpacking the library.

use std::io::{self, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, info};

use crate::{FetchError, Platform, PDFIUM_RELEASE};

const RELEASES_URL: &str = "https://github.com/bblanchon/pdfium-binaries/releases/download";

/// Download URL of the archive for `platform` at the pinned release.
pub(crate) fn archive_url(platform: &Platform) -> String {
    format!(
        "{RELEASES_URL}/chromium%2F{PDFIUM_RELEASE}/{}",
        platform.archive
    )
}

/// A `Vec<u8>` writer that reports the running byte count.
struct CountingSink<'a> {
    buf: Vec<u8>,
    total: Option<u64>,
    on_progress: Option<&'a dyn Fn(u64, Option<u64>)>,
}

impl Write for CountingSink<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        if let Some(cb) = self.on_progress {
            cb(self.buf.len() as u64, self.total);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Download `url` fully into memory.
pub(crate) fn fetch_archive(
    url: &str,
    on_progress: Option<&dyn Fn(u64, Option<u64>)>,
) -> Result<Vec<u8>, FetchError> {
    let failed = |reason: String| FetchError::Download {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("pdfium-fetch/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    info!(url, "Downloading PDFium");
    let mut response = client.get(url).send().map_err(|e| failed(e.to_string()))?;
    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let total = response.content_length();
    let mut sink = CountingSink {
        buf: Vec::with_capacity(total.unwrap_or(32 * 1024 * 1024) as usize),
        total,
        on_progress,
    };
    io::copy(&mut response, &mut sink).map_err(|e| failed(format!("read error: {e}")))?;

    debug!(bytes = sink.buf.len(), "PDFium archive downloaded");
    Ok(sink.buf)
}

/// Extract the single entry `member` of a `.tgz` archive to `dest`.
///
/// The entry is unpacked next to `dest` first and renamed into place, so an
/// interrupted extraction never leaves a half-written library in the cache.
pub(crate) fn unpack_member(archive: &[u8], member: &str, dest: &Path) -> Result<(), FetchError> {
    let failed = |reason: String| FetchError::Extract {
        member: member.to_string(),
        reason,
    };

    let mut archive = Archive::new(GzDecoder::new(archive));
    let entries = archive.entries().map_err(|e| failed(e.to_string()))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| failed(e.to_string()))?;
        let is_member = entry
            .path()
            .map(|p| p.to_string_lossy() == member)
            .map_err(|e| failed(e.to_string()))?;
        if !is_member {
            continue;
        }

        let staging = dest.with_extension("partial");
        entry
            .unpack(&staging)
            .map_err(|e| failed(format!("unpack failed: {e}")))?;
        std::fs::rename(&staging, dest).map_err(|e| failed(format!("rename failed: {e}")))?;
        return Ok(());
    }

    Err(failed("not present in archive".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn tgz(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn archive_url_targets_pinned_release() {
        let platform = Platform::for_target("linux", "x86_64").unwrap();
        let url = archive_url(&platform);
        assert!(url.ends_with("/pdfium-linux-x64.tgz"), "got: {url}");
        assert!(url.contains(PDFIUM_RELEASE));
    }

    #[test]
    fn unpacks_only_the_requested_member() {
        let archive = tgz(&[
            ("include/fpdfview.h", &b"header"[..]),
            ("lib/libpdfium.so", &b"\x7fELF fake library"[..]),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("libpdfium.so");

        unpack_member(&archive, "lib/libpdfium.so", &dest).unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"\x7fELF fake library");
        assert!(!dest.with_extension("partial").exists());
    }

    #[test]
    fn missing_member_is_an_error() {
        let archive = tgz(&[("README", &b"nothing to see"[..])]);
        let dir = tempfile::tempdir().unwrap();

        let err = unpack_member(&archive, "lib/libpdfium.so", &dir.path().join("x")).unwrap_err();
        assert!(matches!(err, FetchError::Extract { .. }));
    }
}
