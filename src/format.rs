//! Target formats a conversion can produce.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A target format. Raster targets are written by the image encoders, `Pdf`
/// by pdfium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::Pdf];

    /// Display name as listed in capability tables: `JPEG`, `PNG`, `pdf`.
    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// Lowercase file extension used for written outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn is_raster(self) -> bool {
        !matches!(self, OutputFormat::Pdf)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no known [`OutputFormat`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown output format '{0}' (expected JPEG, PNG or pdf)")]
pub struct ParseFormatError(pub String);

impl FromStr for OutputFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("JPEG".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("jpg".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!(" Png ".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert_eq!("PDF".parse::<OutputFormat>(), Ok(OutputFormat::Pdf));
        assert!("tiff".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn extension_is_lowercase_label() {
        for format in OutputFormat::ALL {
            assert_eq!(format.extension(), format.label().to_lowercase());
        }
    }

    #[test]
    fn serialises_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Jpeg).unwrap();
        assert_eq!(json, "\"jpeg\"");
    }
}
