//! Supported source formats and their encoder settings.
//!
//! Thumbnails keep the source's format. Dispatch is a closed enum: a file
//! whose extension does not map to a variant has no decoder or encoder here
//! and is reported as unsupported by the caller.
//!
//! | Format | Extensions | Quality handling | Transparency |
//! |---|---|---|---|
//! | JPEG | `jpg`, `jpeg` | `quality` or default 80 | no |
//! | PNG | `png` | 0–100 input scaled to 0–9, default 8 | yes |
//! | GIF | `gif` | ignored | no |

use std::path::Path;

/// MIME types accepted as image input.
pub const SUPPORTED_CONTENT_TYPES: &[&str] = &["image/jpg", "image/jpeg", "image/png", "image/gif"];

/// Returns true if `content_type` is one of [`SUPPORTED_CONTENT_TYPES`].
pub fn is_supported_content_type(content_type: &str) -> bool {
    SUPPORTED_CONTENT_TYPES.contains(&content_type)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
}

/// Encoder settings resolved from a request's quality value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// JPEG quality, 1–100.
    Jpeg { quality: u8 },
    /// PNG zlib compression level, 0–9.
    Png { compression: u8 },
    Gif,
}

/// Fallbacks used when a request passes `quality = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingDefaults {
    pub jpeg_quality: u8,
    pub png_compression: u8,
}

impl Default for EncodingDefaults {
    fn default() -> Self {
        Self {
            jpeg_quality: 80,
            png_compression: 8,
        }
    }
}

impl SourceFormat {
    /// Map a file extension (case-insensitive) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Format of `path` by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Gif => image::ImageFormat::Gif,
        }
    }

    /// Whether the destination canvas must start fully transparent.
    pub fn preserves_alpha(self) -> bool {
        matches!(self, Self::Png)
    }

    /// Resolve a request quality into encoder settings.
    ///
    /// PNG treats values above 10 as a 0–100 scale and divides by ten first;
    /// zero (before or after scaling) falls back to the default level.
    pub fn encoding(self, quality: u32, defaults: EncodingDefaults) -> Encoding {
        match self {
            Self::Jpeg => Encoding::Jpeg {
                quality: if quality == 0 {
                    defaults.jpeg_quality
                } else {
                    quality.min(100) as u8
                },
            },
            Self::Png => {
                let level = if quality > 10 { quality / 10 } else { quality };
                Encoding::Png {
                    compression: if level == 0 {
                        defaults.png_compression
                    } else {
                        level.min(9) as u8
                    },
                }
            }
            Self::Gif => Encoding::Gif,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_to_formats() {
        assert_eq!(SourceFormat::from_extension("jpg"), Some(SourceFormat::Jpeg));
        assert_eq!(SourceFormat::from_extension("JPEG"), Some(SourceFormat::Jpeg));
        assert_eq!(SourceFormat::from_extension("png"), Some(SourceFormat::Png));
        assert_eq!(SourceFormat::from_extension("gif"), Some(SourceFormat::Gif));
        assert_eq!(SourceFormat::from_extension("webp"), None);
        assert_eq!(SourceFormat::from_extension(""), None);
    }

    #[test]
    fn from_path_without_extension_is_none() {
        assert_eq!(SourceFormat::from_path(Path::new("/img/photo")), None);
        assert_eq!(
            SourceFormat::from_path(Path::new("/img/photo.Png")),
            Some(SourceFormat::Png)
        );
    }

    #[test]
    fn content_types() {
        assert!(is_supported_content_type("image/jpeg"));
        assert!(is_supported_content_type("image/jpg"));
        assert!(is_supported_content_type("image/gif"));
        assert!(!is_supported_content_type("image/webp"));
        assert!(!is_supported_content_type("text/plain"));
    }

    #[test]
    fn only_png_preserves_alpha() {
        assert!(SourceFormat::Png.preserves_alpha());
        assert!(!SourceFormat::Jpeg.preserves_alpha());
        assert!(!SourceFormat::Gif.preserves_alpha());
    }

    #[test]
    fn jpeg_quality_zero_uses_default() {
        let d = EncodingDefaults::default();
        assert_eq!(SourceFormat::Jpeg.encoding(0, d), Encoding::Jpeg { quality: 80 });
        assert_eq!(SourceFormat::Jpeg.encoding(65, d), Encoding::Jpeg { quality: 65 });
    }

    #[test]
    fn png_quality_scale_is_divided() {
        let d = EncodingDefaults::default();
        assert_eq!(SourceFormat::Png.encoding(85, d), Encoding::Png { compression: 8 });
        assert_eq!(SourceFormat::Png.encoding(39, d), Encoding::Png { compression: 3 });
        assert_eq!(SourceFormat::Png.encoding(100, d), Encoding::Png { compression: 9 });
    }

    #[test]
    fn png_quality_zero_uses_default() {
        let d = EncodingDefaults::default();
        assert_eq!(SourceFormat::Png.encoding(0, d), Encoding::Png { compression: 8 });
    }

    #[test]
    fn png_small_quality_is_a_level() {
        let d = EncodingDefaults::default();
        assert_eq!(SourceFormat::Png.encoding(5, d), Encoding::Png { compression: 5 });
        // 10 is not > 10, so it is a level, clamped to 9
        assert_eq!(SourceFormat::Png.encoding(10, d), Encoding::Png { compression: 9 });
    }

    #[test]
    fn gif_ignores_quality() {
        let d = EncodingDefaults::default();
        assert_eq!(SourceFormat::Gif.encoding(0, d), Encoding::Gif);
        assert_eq!(SourceFormat::Gif.encoding(90, d), Encoding::Gif);
    }

    #[test]
    fn configured_defaults_apply() {
        let d = EncodingDefaults {
            jpeg_quality: 92,
            png_compression: 6,
        };
        assert_eq!(SourceFormat::Jpeg.encoding(0, d), Encoding::Jpeg { quality: 92 });
        assert_eq!(SourceFormat::Png.encoding(0, d), Encoding::Png { compression: 6 });
    }
}
