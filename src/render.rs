//! Thumbnail rendering: the request pipeline.
//!
//! [`Renderer`] ties the pieces together. A request names a source image
//! (as a path or as its public URL) plus [`ResizeOptions`]; the renderer
//! validates the source, resolves a [`ResizePlan`], and either returns the
//! cached artifact or renders a new one.
//!
//! ```text
//! "https://example.com/img/beach.jpg", prowidth=200
//!   ├── strip base URL         → img/beach.jpg
//!   ├── exists? content type?  → ImageNotFound / InvalidImageFile
//!   ├── extension → format     → UnsupportedFormat
//!   ├── identify + resolve     → plan 200x150, validated
//!   ├── ensure img/thumbs/
//!   └── get_or_create(img/thumbs/beach-0x0px-200x150size.jpg)
//!         hit  → Cached
//!         miss → decode, canvas, resample, encode → Generated
//! ```
//!
//! Nothing here touches the cache directory before the request has been
//! fully validated: a missing file, a non-image, or an impossible geometry
//! leaves the filesystem untouched.

use crate::cache::{CacheStats, CacheStatus, ThumbCache};
use crate::config::ThumbConfig;
use crate::imaging::{
    BackendError, Dimensions, EncodingDefaults, ImageBackend, ResizeOptions, SourceFormat,
    format::is_supported_content_type, get_proportional_size, render_thumbnail, resolve_plan,
};
use crate::url::PublicUrl;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image not found: {}", .0.display())]
    ImageNotFound(PathBuf),
    #[error("Not a supported image file: {}", .0.display())]
    InvalidImageFile(PathBuf),
    #[error("Unsupported image format: {0:?}")]
    UnsupportedFormat(String),
    #[error("Invalid resize plan: {0}")]
    InvalidResizePlan(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Backend(#[from] BackendError),
}

/// A rendered (or previously rendered) thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumb {
    /// Public URL of the artifact.
    pub url: String,
    /// Filesystem path of the artifact.
    pub path: PathBuf,
    pub status: CacheStatus,
}

/// Result of [`Renderer::render_batch`].
#[derive(Debug)]
pub struct BatchOutcome {
    /// One entry per input, in input order.
    pub results: Vec<(String, Result<Thumb, RenderError>)>,
    pub stats: CacheStats,
}

impl BatchOutcome {
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_err()).count()
    }
}

pub struct Renderer<B: ImageBackend> {
    backend: B,
    cache: ThumbCache,
    public_url: PublicUrl,
    defaults: EncodingDefaults,
}

impl<B: ImageBackend> Renderer<B> {
    /// Renderer with stock settings: no base URL, `thumbs/` cache folders,
    /// JPEG quality 80 and PNG level 8.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: ThumbCache::default(),
            public_url: PublicUrl::default(),
            defaults: EncodingDefaults::default(),
        }
    }

    pub fn from_config(backend: B, config: &ThumbConfig) -> Self {
        Self {
            backend,
            cache: ThumbCache::new(config.cache.dir_name.clone()),
            public_url: PublicUrl::new(config.site.base_url.clone()),
            defaults: config.encoding.defaults(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &ThumbCache {
        &self.cache
    }

    /// Return the thumbnail of `file_path` described by `options`, rendering
    /// it only if it is not cached yet.
    ///
    /// `file_path` may carry the configured base URL; it is stripped before
    /// touching the filesystem.
    pub fn thumb(&self, file_path: &str, options: &ResizeOptions) -> Result<Thumb, RenderError> {
        let source = Path::new(self.public_url.strip(file_path));

        if !source.is_file() {
            warn!(path = %source.display(), "image not found");
            return Err(RenderError::ImageNotFound(source.to_path_buf()));
        }

        let content_type = self.backend.content_type(source)?;
        if !content_type.as_deref().is_some_and(is_supported_content_type) {
            warn!(path = %source.display(), ?content_type, "rejected non-image file");
            return Err(RenderError::InvalidImageFile(source.to_path_buf()));
        }

        let Some(format) = SourceFormat::from_path(source) else {
            let ext = source
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            warn!(path = %source.display(), %ext, "no codec for extension");
            return Err(RenderError::UnsupportedFormat(ext));
        };

        let dims = self.backend.identify(source)?;
        let plan = resolve_plan(options, dims.width, dims.height);
        debug!(
            path = %source.display(),
            source = ?(dims.width, dims.height),
            target = ?(plan.target_width, plan.target_height),
            crop = ?(plan.crop_x, plan.crop_y, plan.source_crop_width, plan.source_crop_height),
            "resolved plan"
        );
        if let Err(reason) = plan.validate(dims.width, dims.height) {
            warn!(path = %source.display(), %reason, "rejected resize plan");
            return Err(RenderError::InvalidResizePlan(reason));
        }

        self.cache
            .ensure_directory(&self.cache.directory_for(source))?;
        let artifact = self.cache.artifact_path(source, &plan);

        let status = self.cache.get_or_create(&artifact, || {
            render_thumbnail(
                &self.backend,
                source,
                format,
                &plan,
                &artifact,
                self.defaults,
            )
        })?;

        match status {
            CacheStatus::Cached => debug!(artifact = %artifact.display(), "cache hit"),
            CacheStatus::Generated => info!(artifact = %artifact.display(), "generated thumbnail"),
        }

        Ok(Thumb {
            url: self.public_url.to_url(&artifact),
            path: artifact,
            status,
        })
    }

    /// Size `file_path` would have after anchoring its width to `width` and
    /// then its height to `height`. Zero skips an axis.
    ///
    /// Only probes the source; nothing is decoded or cached.
    pub fn prosize(&self, file_path: &str, width: u32, height: u32) -> Result<Dimensions, RenderError> {
        let source = Path::new(self.public_url.strip(file_path));
        if !source.is_file() {
            return Err(RenderError::ImageNotFound(source.to_path_buf()));
        }
        let (width, height) = get_proportional_size(&self.backend, source, width, height)?;
        Ok(Dimensions { width, height })
    }

    /// Render the same variant of several sources in parallel on the current
    /// rayon pool. A failing source does not stop the others.
    pub fn render_batch(&self, files: &[String], options: &ResizeOptions) -> BatchOutcome {
        let results: Vec<(String, Result<Thumb, RenderError>)> = files
            .par_iter()
            .map(|file| (file.clone(), self.thumb(file, options)))
            .collect();

        let mut stats = CacheStats::default();
        for thumb in results.iter().filter_map(|(_, r)| r.as_ref().ok()) {
            stats.record(thumb.status);
        }
        debug!(%stats, failures = results.iter().filter(|(_, r)| r.is_err()).count(), "batch done");

        BatchOutcome { results, stats }
    }
}
