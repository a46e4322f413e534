//! Input preconditions, checked before any converter touches a file.

use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::job::extension_of;
use std::io::ErrorKind;
use std::path::Path;

/// Fail unless `path` names an existing, non-empty regular file.
///
/// Only stats the path; never opens it.
pub fn validate_input(path: &Path) -> Result<(), ConvertError> {
    let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ConvertError::NotFound {
            path: path.to_path_buf(),
        },
    })?;

    if !meta.is_file() {
        return Err(ConvertError::NotAFile {
            path: path.to_path_buf(),
        });
    }
    if meta.len() == 0 {
        return Err(ConvertError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Fail unless the extension of `path` (case-insensitive) is in `supported`.
pub(crate) fn check_extension(path: &Path, supported: &[&str]) -> Result<(), ConvertError> {
    let extension = extension_of(path).unwrap_or_default();
    if supported.contains(&extension.as_str()) {
        return Ok(());
    }
    Err(ConvertError::UnsupportedInput {
        path: path.to_path_buf(),
        extension,
        expected: supported.join(", "),
    })
}

/// Fail unless `format` is in `supported`.
pub(crate) fn check_output(
    converter: &str,
    format: OutputFormat,
    supported: &[OutputFormat],
) -> Result<(), ConvertError> {
    if supported.contains(&format) {
        return Ok(());
    }
    Err(ConvertError::UnsupportedOutput {
        converter: converter.to_string(),
        format: format.label().to_string(),
        expected: supported
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Fail if `dest` names the same file as `input`.
///
/// Both paths are canonicalised, so `./a.png` and `dir/../a.png` match. A
/// `dest` that does not exist yet can never be the input.
pub(crate) fn check_not_input(input: &Path, dest: &Path) -> Result<(), ConvertError> {
    match (input.canonicalize(), dest.canonicalize()) {
        (Ok(a), Ok(b)) if a == b => Err(ConvertError::OutputOverwritesInput {
            path: dest.to_path_buf(),
        }),
        _ => Ok(()),
    }
}
