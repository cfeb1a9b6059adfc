//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two things the renderer needs from a
//! codec library: **probing** a source (dimensions, sniffed content type) and
//! the **canvas pipeline** used to build a thumbnail:
//!
//! ```text
//! decode(source) ─┐
//!                 ├─ resample(dest ← src rect) ─ encode(dest → artifact)
//! new_canvas() ───┘ (+ apply_transparency for PNG)
//! ```
//!
//! Canvases are owned values. Dropping one releases its pixel buffer, so a
//! canvas allocated inside a render call is freed on every exit path,
//! including early `?` returns.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::format::{Encoding, SourceFormat};
use super::params::Resample;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image codec backends.
///
/// `Sync` so a single backend can serve a parallel batch.
pub trait ImageBackend: Sync {
    /// In-memory pixel buffer. Released on drop.
    type Canvas;

    /// Get image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Sniff the file's MIME type from its contents.
    ///
    /// `Ok(None)` means the contents are not a recognised image.
    fn content_type(&self, path: &Path) -> Result<Option<String>, BackendError>;

    /// Decode a source file into a canvas.
    fn decode(&self, path: &Path, format: SourceFormat) -> Result<Self::Canvas, BackendError>;

    /// Allocate an opaque true-colour canvas with alpha blending enabled.
    fn new_canvas(&self, width: u32, height: u32) -> Result<Self::Canvas, BackendError>;

    /// Prepare `canvas` to keep an alpha channel: disable blending, enable
    /// saving alpha, and fill it with fully transparent white.
    fn apply_transparency(&self, canvas: &mut Self::Canvas);

    /// Scale the `geometry` source rectangle of `src` into `dest`.
    fn resample(
        &self,
        dest: &mut Self::Canvas,
        src: &Self::Canvas,
        geometry: &Resample,
    ) -> Result<(), BackendError>;

    /// Encode `canvas` to `output`.
    fn encode(
        &self,
        canvas: &Self::Canvas,
        output: &Path,
        encoding: Encoding,
    ) -> Result<(), BackendError>;
}
