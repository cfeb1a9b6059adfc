//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take a resolved plan, drive the backend's canvas pipeline, and leave
//! caching decisions to the caller.

use super::backend::{BackendError, ImageBackend};
use super::calculations::proportional_size;
use super::format::{EncodingDefaults, SourceFormat};
use super::params::ResizePlan;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Probe `path` and scale its size by width, then height.
///
/// See [`proportional_size`] for the compounding rule.
pub fn get_proportional_size(
    backend: &impl ImageBackend,
    path: &Path,
    width: u32,
    height: u32,
) -> Result<(u32, u32)> {
    let source = get_dimensions(backend, path)?;
    Ok(proportional_size(source, width, height))
}

/// Render one thumbnail: decode `source`, draw the plan's source rectangle
/// into a fresh `target_width` x `target_height` canvas, and encode it to
/// `output` in the source's format.
///
/// The plan must already be validated. Both canvases are dropped before this
/// returns, whether it succeeds or not.
pub fn render_thumbnail<B: ImageBackend>(
    backend: &B,
    source: &Path,
    format: SourceFormat,
    plan: &ResizePlan,
    output: &Path,
    defaults: EncodingDefaults,
) -> Result<()> {
    let src = backend.decode(source, format)?;
    let mut dest = backend.new_canvas(plan.target_width, plan.target_height)?;

    if format.preserves_alpha() {
        backend.apply_transparency(&mut dest);
    }

    backend.resample(&mut dest, &src, &plan.resample())?;
    backend.encode(&dest, output, format.encoding(plan.quality, defaults))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::format::Encoding;
    use crate::imaging::params::Resample;

    fn plan(target: (u32, u32), quality: u32) -> ResizePlan {
        ResizePlan {
            target_width: target.0,
            target_height: target.1,
            source_crop_width: 800,
            source_crop_height: 600,
            crop_x: 0,
            crop_y: 0,
            quality,
        }
    }

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::new(1920, 1080);
        let dims = get_dimensions(&backend, Path::new("/test.jpg")).unwrap();
        assert_eq!(dims, (1920, 1080));
    }

    #[test]
    fn get_proportional_size_compounds() {
        let backend = MockBackend::new(1024, 768);
        let size = get_proportional_size(&backend, Path::new("/a.jpg"), 512, 100).unwrap();
        assert_eq!(size, (133, 100));
    }

    #[test]
    fn png_render_applies_transparency_before_resample() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("t.png");
        let backend = MockBackend::new(800, 600);

        render_thumbnail(
            &backend,
            Path::new("/src.png"),
            SourceFormat::Png,
            &plan((400, 300), 85),
            &out,
            EncodingDefaults::default(),
        )
        .unwrap();

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![
                RecordedOp::Decode {
                    source: "/src.png".into(),
                    format: SourceFormat::Png
                },
                RecordedOp::NewCanvas {
                    width: 400,
                    height: 300
                },
                RecordedOp::ApplyTransparency,
                RecordedOp::Resample(Resample {
                    src_x: 0,
                    src_y: 0,
                    src_width: 800,
                    src_height: 600,
                    dest_width: 400,
                    dest_height: 300,
                }),
                RecordedOp::Encode {
                    output: out.to_string_lossy().to_string(),
                    encoding: Encoding::Png { compression: 8 },
                },
            ]
        );
    }

    #[test]
    fn jpeg_render_skips_transparency() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::new(800, 600);

        render_thumbnail(
            &backend,
            Path::new("/src.jpg"),
            SourceFormat::Jpeg,
            &plan((400, 300), 0),
            &tmp.path().join("t.jpg"),
            EncodingDefaults::default(),
        )
        .unwrap();

        let ops = backend.get_operations();
        assert!(!ops.contains(&RecordedOp::ApplyTransparency));
        assert!(ops.iter().any(|op| matches!(
            op,
            RecordedOp::Encode {
                encoding: Encoding::Jpeg { quality: 80 },
                ..
            }
        )));
    }

    #[test]
    fn gif_render_ignores_quality() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::new(800, 600);

        render_thumbnail(
            &backend,
            Path::new("/src.gif"),
            SourceFormat::Gif,
            &plan((80, 60), 55),
            &tmp.path().join("t.gif"),
            EncodingDefaults::default(),
        )
        .unwrap();

        assert!(backend.get_operations().iter().any(|op| matches!(
            op,
            RecordedOp::Encode {
                encoding: Encoding::Gif,
                ..
            }
        )));
    }

    #[test]
    fn canvases_released_after_success() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::new(800, 600);

        render_thumbnail(
            &backend,
            Path::new("/src.jpg"),
            SourceFormat::Jpeg,
            &plan((40, 30), 0),
            &tmp.path().join("t.jpg"),
            EncodingDefaults::default(),
        )
        .unwrap();

        assert_eq!(backend.allocated(), 2);
        assert_eq!(backend.released(), 2);
    }

    #[test]
    fn canvases_released_after_encode_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::new(800, 600).failing_encode();

        let result = render_thumbnail(
            &backend,
            Path::new("/src.jpg"),
            SourceFormat::Jpeg,
            &plan((40, 30), 0),
            &tmp.path().join("t.jpg"),
            EncodingDefaults::default(),
        );

        assert!(result.is_err());
        assert_eq!(backend.allocated(), 2);
        assert_eq!(backend.released(), 2);
    }
}
