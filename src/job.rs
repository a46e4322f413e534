//! The request and outcome of a single conversion.

use crate::format::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One conversion request: which file, where to, in what format.
///
/// Built by the caller right before converting and not modified afterwards;
/// the converters only ever borrow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionJob {
    pub input_path: PathBuf,
    pub output_folder: PathBuf,
    pub output_format: OutputFormat,
}

impl ConversionJob {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_folder: impl Into<PathBuf>,
        output_format: OutputFormat,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_folder: output_folder.into(),
            output_format,
        }
    }

    /// Input file name without directory or extension (`photo` for
    /// `/x/photo.jpg`). Falls back to `output` for paths with no file name.
    pub fn input_stem(&self) -> String {
        self.input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "output".to_string())
    }

    /// Lowercase extension of the input, if any.
    pub fn input_extension(&self) -> Option<String> {
        extension_of(&self.input_path)
    }
}

pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .filter(|e| !e.is_empty())
}

/// Outcome of a conversion that passed validation.
///
/// `success == false` means the transform failed; `error` then holds a
/// human-readable diagnostic and `outputs` is empty, although files written
/// before the failure may remain on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Files written, in creation order.
    pub outputs: Vec<PathBuf>,
}

impl ConversionResult {
    pub fn succeeded(outputs: Vec<PathBuf>) -> Self {
        Self {
            success: true,
            error: None,
            outputs,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            outputs: Vec::new(),
        }
    }
}
