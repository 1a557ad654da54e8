//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image` crate (pure Rust decoders) |
//! | EXIF orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Thumbnail crop | `DynamicImage::crop_imm` |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |
//! | Encode other formats | `DynamicImage::save_with_format`, format from the extension |
//!
//! Variants keep the source's format. A large variant whose source already
//! fits and needs no rotation is a byte copy of the source.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{large_plan, thumbnail_plan};
use super::params::{ResizeParams, ThumbnailParams};
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled() && fmt.writing_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the image file extensions that can be both decoded and re-encoded.
fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `filename` has an extension this backend can process (case-insensitive).
pub fn is_supported_filename(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Pure Rust backend using the `image` crate ecosystem.
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

fn processing_failed(path: &Path, action: &str, err: impl std::fmt::Display) -> BackendError {
    BackendError::ProcessingFailed(format!("Failed to {action} {}: {err}", path.display()))
}

/// Open a decoder and read its stored dimensions and EXIF orientation.
fn open_decoder(
    path: &Path,
) -> Result<(impl ImageDecoder, (u32, u32), Orientation), BackendError> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()
        .map_err(|e| processing_failed(path, "decode", e))?;
    let dims = decoder.dimensions();
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    Ok((decoder, dims, orientation))
}

/// Width and height after `orientation` is applied.
fn oriented_dimensions((w, h): (u32, u32), orientation: Orientation) -> (u32, u32) {
    match orientation {
        Orientation::Rotate90
        | Orientation::Rotate270
        | Orientation::Rotate90FlipH
        | Orientation::Rotate270FlipH => (h, w),
        _ => (w, h),
    }
}

/// Decode the whole image and rotate it upright.
fn decode_upright(
    path: &Path,
    decoder: impl ImageDecoder,
    orientation: Orientation,
) -> Result<DynamicImage, BackendError> {
    let mut img =
        DynamicImage::from_decoder(decoder).map_err(|e| processing_failed(path, "decode", e))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Save in the format implied by the output extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let format =
        ImageFormat::from_path(path).map_err(|e| processing_failed(path, "encode", e))?;

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let writer = std::io::BufWriter::new(file);
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality as u8);
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(|e| processing_failed(path, "encode", e))
        }
        other => img
            .save_with_format(path, other)
            .map_err(|e| processing_failed(path, "encode", e)),
    }
}

impl ImageBackend for RustBackend {
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let (decoder, stored, orientation) = open_decoder(&params.source)?;
        let upright = oriented_dimensions(stored, orientation);
        let target = large_plan(upright, params.size, params.mode);

        if target.is_none() && orientation == Orientation::NoTransforms {
            std::fs::copy(&params.source, &params.output)?;
            return Ok(());
        }

        let img = decode_upright(&params.source, decoder, orientation)?;
        let img = match target {
            Some((w, h)) => img.resize_exact(w, h, FilterType::Lanczos3),
            None => img,
        };
        save_image(&img, &params.output, params.quality.value())
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let (decoder, stored, orientation) = open_decoder(&params.source)?;
        let upright = oriented_dimensions(stored, orientation);
        let plan = thumbnail_plan(upright, params.size, params.mode);

        let img = decode_upright(&params.source, decoder, orientation)?;
        let (w, h) = plan.resize;
        let resized = img.resize_exact(w, h, FilterType::Lanczos3);
        let final_img = match plan.crop {
            Some(c) => resized.crop_imm(c.x, c.y, c.width, c.height),
            None => resized,
        };

        save_image(&final_img, &params.output, params.quality.value())
    }
}
