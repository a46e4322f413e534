//! Mapping from the running OS/architecture to a pdfium-binaries asset.

use crate::FetchError;

/// `(os, arch, archive asset, library path inside the archive)`.
const RELEASE_ASSETS: &[(&str, &str, &str, &str)] = &[
    ("macos", "aarch64", "pdfium-mac-arm64.tgz", "lib/libpdfium.dylib"),
    ("macos", "x86_64", "pdfium-mac-x64.tgz", "lib/libpdfium.dylib"),
    ("linux", "x86_64", "pdfium-linux-x64.tgz", "lib/libpdfium.so"),
    ("linux", "aarch64", "pdfium-linux-arm64.tgz", "lib/libpdfium.so"),
    ("windows", "x86_64", "pdfium-win-x64.tgz", "bin/pdfium.dll"),
    ("windows", "aarch64", "pdfium-win-arm64.tgz", "bin/pdfium.dll"),
    ("windows", "x86", "pdfium-win-x86.tgz", "bin/pdfium.dll"),
];

/// A platform for which a prebuilt PDFium archive is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Release asset name, e.g. `pdfium-linux-x64.tgz`.
    pub archive: &'static str,
    /// Path of the shared library inside the archive, e.g. `lib/libpdfium.so`.
    pub member: &'static str,
}

impl Platform {
    /// The platform this process is running on.
    pub fn current() -> Result<Self, FetchError> {
        Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn for_target(os: &str, arch: &str) -> Result<Self, FetchError> {
        RELEASE_ASSETS
            .iter()
            .find(|(o, a, _, _)| *o == os && *a == arch)
            .map(|&(_, _, archive, member)| Platform { archive, member })
            .ok_or_else(|| FetchError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            })
    }

    /// File name of the shared library once extracted (`libpdfium.so` etc.).
    pub fn library_name(&self) -> &'static str {
        self.member.rsplit('/').next().unwrap_or(self.member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_platform_is_published() {
        Platform::current().expect("CI platforms have a pdfium build");
    }

    #[test]
    fn library_name_strips_archive_directory() {
        let linux = Platform::for_target("linux", "x86_64").unwrap();
        assert_eq!(linux.library_name(), "libpdfium.so");

        let windows = Platform::for_target("windows", "x86").unwrap();
        assert_eq!(windows.archive, "pdfium-win-x86.tgz");
        assert_eq!(windows.library_name(), "pdfium.dll");
    }

    #[test]
    fn unknown_target_is_rejected() {
        let err = Platform::for_target("plan9", "mips").unwrap_err();
        assert!(err.to_string().contains("plan9/mips"), "got: {err}");
    }
}
