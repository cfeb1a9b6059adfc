//! # Thumbwright
//!
//! A thumbnail rendering-and-caching engine. Given a source image and a set of
//! resize/crop options it computes the target geometry, derives a stable cache
//! name for that variant, and either returns the artifact rendered earlier or
//! renders and stores a new one.
//!
//! ```text
//! request ──► resolve plan ──► artifact name ──► cached? ──yes──► URL
//!                                                   │
//!                                                   no
//!                                                   ▼
//!                            decode → canvas → resample → encode ──► URL
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Dimension math, option → plan resolution, formats, codec backend |
//! | [`naming`] | Deterministic artifact file names (the cache key) |
//! | [`cache`] | Per-directory `thumbs/` store with single-flight generation |
//! | [`render`] | The request pipeline: `thumb`, `prosize`, batches |
//! | [`url`] | Base-URL stripping and public URL construction |
//! | [`config`] | `thumbwright.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The File Name Is the Cache
//!
//! There is no index or manifest. A variant's file name encodes its crop
//! origin and target size, so a cache lookup is one `stat`. Deleting a
//! `thumbs/` directory is the whole invalidation story.
//!
//! ## Validate Before Touching Disk
//!
//! Missing sources, non-images, unsupported extensions and impossible
//! geometry are all rejected before the cache directory is created or a
//! codec runs. A bad request leaves no trace.
//!
//! ## Pure-Rust Imaging
//!
//! The default [`imaging::RustBackend`] uses the `image` crate for probing,
//! Lanczos3 resampling and JPEG/PNG/GIF encoding. No system libraries.
//! The [`imaging::ImageBackend`] trait keeps the pipeline testable with a
//! recording mock.

pub mod cache;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod render;
pub mod url;

pub use render::{RenderError, Renderer, Thumb};
