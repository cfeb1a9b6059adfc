//! Image processing in pure Rust on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Content sniffing** | `image::guess_format` |
//! | **Crop + scale** | `crop_imm` + Lanczos3 `resize` |
//! | **Encode** | JPEG / PNG / GIF encoders from the `image` crate |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for proportional dimension math (unit testable)
//! - **Parameters**: Request options, resolved plans, resample wiring
//! - **Plan**: The option → plan resolution rules
//! - **Format**: Supported formats and per-format quality handling
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod format;
pub mod operations;
mod params;
mod plan;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{Extent, proportional_size, scale_to_dimension};
pub use format::{Encoding, EncodingDefaults, SourceFormat};
pub use operations::{get_dimensions, get_proportional_size, render_thumbnail};
pub use params::{Resample, ResizeOptions, ResizePlan};
pub use plan::resolve_plan;
pub use rust_backend::RustBackend;
