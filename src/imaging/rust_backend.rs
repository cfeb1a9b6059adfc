//! Pure Rust codec backend built on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::with_guessed_format` + `into_dimensions` |
//! | Content sniffing | `image::guess_format` on the file header |
//! | Decode (JPEG, PNG, GIF) | `image::ImageReader` with the format forced |
//! | Resample | `imageops::crop_imm` + `imageops::resize` with `Lanczos3` |
//! | Composite | `imageops::overlay` (blending) / `imageops::replace` (no blending) |
//! | Encode | `JpegEncoder`, `PngEncoder`, `GifEncoder` |
//!
//! Artifacts are written to a uniquely named hidden sibling file and renamed
//! into place, so a concurrent reader either sees no file or a complete one,
//! and concurrent writers of the same artifact never share a file.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::format::{Encoding, SourceFormat};
use super::params::Resample;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, Rgba, RgbaImage};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Bytes read when sniffing a file's format.
const SNIFF_LEN: u64 = 32;

/// Background of a freshly allocated canvas: opaque black.
const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Fill used by [`ImageBackend::apply_transparency`].
const TRANSPARENT_WHITE: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// RGBA pixel buffer plus the two alpha flags that drive compositing and
/// encoding.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
    /// Blend drawn pixels over existing ones instead of replacing them.
    alpha_blending: bool,
    /// Keep the alpha channel when encoding.
    save_alpha: bool,
}

impl Canvas {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn processing(context: &str, path: &Path, e: impl std::fmt::Display) -> BackendError {
    BackendError::ProcessingFailed(format!("{context} {}: {e}", path.display()))
}

/// Fresh hidden sibling of `output` (`.name.XXXXXX.part`) for one encode
/// attempt. Every attempt gets its own file, also across processes, and the
/// file is removed if it is dropped without being persisted.
fn partial_file(output: &Path) -> io::Result<NamedTempFile> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    tempfile::Builder::new()
        .prefix(&format!(".{name}."))
        .suffix(".part")
        .tempfile_in(dir)
}

/// zlib level (0-9) handed to the PNG encoder as is.
fn png_compression(level: u8) -> CompressionType {
    CompressionType::Level(level.min(9))
}

fn write_encoded(
    canvas: &Canvas,
    writer: &mut impl Write,
    encoding: Encoding,
) -> image::ImageResult<()> {
    let (w, h) = (canvas.width(), canvas.height());
    match encoding {
        Encoding::Jpeg { quality } => {
            let rgb = DynamicImage::ImageRgba8(canvas.pixels.clone()).into_rgb8();
            JpegEncoder::new_with_quality(&mut *writer, quality).write_image(
                rgb.as_raw(),
                w,
                h,
                ExtendedColorType::Rgb8,
            )
        }
        Encoding::Png { compression } => {
            let encoder = PngEncoder::new_with_quality(
                &mut *writer,
                png_compression(compression),
                PngFilter::Adaptive,
            );
            if canvas.save_alpha {
                encoder.write_image(canvas.pixels.as_raw(), w, h, ExtendedColorType::Rgba8)
            } else {
                let rgb = DynamicImage::ImageRgba8(canvas.pixels.clone()).into_rgb8();
                encoder.write_image(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)
            }
        }
        Encoding::Gif => {
            let mut encoder = GifEncoder::new(&mut *writer);
            encoder.encode_frame(image::Frame::new(canvas.pixels.clone()))
        }
    }
}

impl ImageBackend for RustBackend {
    type Canvas = Canvas;

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)?
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| processing("Failed to read dimensions of", path, e))?;
        Ok(Dimensions { width, height })
    }

    fn content_type(&self, path: &Path) -> Result<Option<String>, BackendError> {
        let mut header = Vec::with_capacity(SNIFF_LEN as usize);
        File::open(path)?.take(SNIFF_LEN).read_to_end(&mut header)?;
        Ok(image::guess_format(&header)
            .ok()
            .map(|f| f.to_mime_type().to_string()))
    }

    fn decode(&self, path: &Path, format: SourceFormat) -> Result<Canvas, BackendError> {
        let mut reader = ImageReader::open(path)?;
        reader.set_format(format.image_format());
        let img = reader
            .decode()
            .map_err(|e| processing("Failed to decode", path, e))?;
        Ok(Canvas {
            pixels: img.into_rgba8(),
            alpha_blending: true,
            save_alpha: format.preserves_alpha(),
        })
    }

    fn new_canvas(&self, width: u32, height: u32) -> Result<Canvas, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Cannot allocate a {width}x{height} canvas"
            )));
        }
        Ok(Canvas {
            pixels: RgbaImage::from_pixel(width, height, OPAQUE_BLACK),
            alpha_blending: true,
            save_alpha: false,
        })
    }

    fn apply_transparency(&self, canvas: &mut Canvas) {
        canvas.alpha_blending = false;
        canvas.save_alpha = true;
        for pixel in canvas.pixels.pixels_mut() {
            *pixel = TRANSPARENT_WHITE;
        }
    }

    fn resample(
        &self,
        dest: &mut Canvas,
        src: &Canvas,
        geometry: &Resample,
    ) -> Result<(), BackendError> {
        let right = geometry.src_x as u64 + geometry.src_width as u64;
        let bottom = geometry.src_y as u64 + geometry.src_height as u64;
        if geometry.src_width == 0
            || geometry.src_height == 0
            || right > src.width() as u64
            || bottom > src.height() as u64
        {
            return Err(BackendError::ProcessingFailed(format!(
                "Source rectangle {}x{}+{}+{} is outside the {}x{} canvas",
                geometry.src_width,
                geometry.src_height,
                geometry.src_x,
                geometry.src_y,
                src.width(),
                src.height()
            )));
        }

        let region = imageops::crop_imm(
            &src.pixels,
            geometry.src_x,
            geometry.src_y,
            geometry.src_width,
            geometry.src_height,
        )
        .to_image();
        let scaled = imageops::resize(
            &region,
            geometry.dest_width,
            geometry.dest_height,
            FilterType::Lanczos3,
        );

        if dest.alpha_blending {
            imageops::overlay(&mut dest.pixels, &scaled, 0, 0);
        } else {
            imageops::replace(&mut dest.pixels, &scaled, 0, 0);
        }
        Ok(())
    }

    fn encode(
        &self,
        canvas: &Canvas,
        output: &Path,
        encoding: Encoding,
    ) -> Result<(), BackendError> {
        let mut partial = partial_file(output)?;
        {
            let mut writer = BufWriter::new(partial.as_file_mut());
            write_encoded(canvas, &mut writer, encoding)
                .map_err(|e| processing("Failed to encode", output, e))?;
            writer.flush()?;
        }
        // Replaces any artifact a concurrent writer persisted first.
        partial.persist(output).map_err(|e| e.error)?;
        Ok(())
    }
}
