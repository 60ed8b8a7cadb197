/// Target formats and media-type sniffing
///
/// The converter always writes one of the `TargetFormat`s; input files are
/// classified by a media type derived from their name.

use crate::error::{Result, SqueezeError};
use std::fmt;
use std::str::FromStr;

/// Supported output image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetFormat {
    /// WebP with lossy compression
    #[default]
    WebP,
    /// JPEG with lossy compression
    Jpeg,
    /// PNG, losslessly optimised with oxipng
    Png,
    /// AVIF with lossy compression
    Avif,
}

impl TargetFormat {
    /// Returns the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::WebP => "webp",
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::Avif => "avif",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            TargetFormat::WebP => "image/webp",
            TargetFormat::Jpeg => "image/jpeg",
            TargetFormat::Png => "image/png",
            TargetFormat::Avif => "image/avif",
        }
    }

    /// Whether `name` already carries this format's extension (case-insensitive).
    ///
    /// `.jpeg` counts as a JPEG extension as well as `.jpg`.
    pub fn matches_name(&self, name: &str) -> bool {
        let Some(ext) = extension_of(name) else {
            return false;
        };
        let ext = ext.to_lowercase();
        match self {
            TargetFormat::Jpeg => ext == "jpg" || ext == "jpeg",
            _ => ext == self.extension(),
        }
    }

    /// Format names for CLI help text
    pub fn format_names() -> Vec<&'static str> {
        vec!["webp", "jpeg", "png", "avif"]
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFormat::WebP => "WebP",
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::Png => "PNG",
            TargetFormat::Avif => "AVIF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TargetFormat {
    type Err = SqueezeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "webp" => Ok(TargetFormat::WebP),
            "jpeg" | "jpg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            "avif" => Ok(TargetFormat::Avif),
            _ => Err(SqueezeError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Text after the final `.` of a file name, if any.
pub fn extension_of(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => Some(&name[idx + 1..]),
        _ => None,
    }
}

/// Guess a media type from a file name's extension.
///
/// Unknown extensions yield `application/octet-stream`, which the
/// acceptance filter rejects.
pub fn media_type_for_name(name: &str) -> &'static str {
    let Some(ext) = extension_of(name) else {
        return "application/octet-stream";
    };
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_format_from_str() {
        assert_eq!(TargetFormat::from_str("webp").unwrap(), TargetFormat::WebP);
        assert_eq!(TargetFormat::from_str("WEBP").unwrap(), TargetFormat::WebP);
        assert_eq!(TargetFormat::from_str("jpg").unwrap(), TargetFormat::Jpeg);
        assert_eq!(TargetFormat::from_str("jpeg").unwrap(), TargetFormat::Jpeg);
        assert_eq!(TargetFormat::from_str("png").unwrap(), TargetFormat::Png);
        assert_eq!(TargetFormat::from_str("avif").unwrap(), TargetFormat::Avif);

        assert!(matches!(
            TargetFormat::from_str("heic"),
            Err(SqueezeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_default_is_webp() {
        assert_eq!(TargetFormat::default(), TargetFormat::WebP);
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        assert!(TargetFormat::WebP.matches_name("photo.webp"));
        assert!(TargetFormat::WebP.matches_name("photo.WebP"));
        assert!(!TargetFormat::WebP.matches_name("photo.png"));
        assert!(!TargetFormat::WebP.matches_name("webp"));
        assert!(TargetFormat::Jpeg.matches_name("scan.JPEG"));
        assert!(TargetFormat::Jpeg.matches_name("scan.jpg"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.b.png"), Some("png"));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_media_type_for_name() {
        assert_eq!(media_type_for_name("a.JPG"), "image/jpeg");
        assert_eq!(media_type_for_name("a.tif"), "image/tiff");
        assert_eq!(media_type_for_name("notes.txt"), "text/plain");
        assert_eq!(media_type_for_name("README"), "application/octet-stream");
    }

    #[test]
    fn test_display() {
        assert_eq!(TargetFormat::WebP.to_string(), "WebP");
        assert_eq!(TargetFormat::Avif.to_string(), "AVIF");
    }
}
