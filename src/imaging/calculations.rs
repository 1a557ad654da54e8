//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Dimensions are the *oriented* ones, i.e. after EXIF rotation is applied.

use super::params::SizeMode;

/// A crop window inside a resized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// How to turn a source into a thumbnail: resize to `resize`, then crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailPlan {
    pub resize: (u32, u32),
    pub crop: Option<CropRect>,
}

/// Scale so the shorter side equals `size`, then center-crop to `size`×`size`.
///
/// The crop offset is `(longer - shorter) / 2` along the axis that was longer:
/// landscape sources lose left/right margins, portrait sources lose top/bottom
/// margins, square sources lose nothing.
pub fn square_thumbnail_plan(source: (u32, u32), size: u32) -> ThumbnailPlan {
    let (src_w, src_h) = (source.0.max(1), source.1.max(1));
    let size = size.max(1);

    if src_w == src_h {
        return ThumbnailPlan {
            resize: (size, size),
            crop: None,
        };
    }

    if src_w > src_h {
        let w = ((src_w as f64 * size as f64 / src_h as f64).round() as u32).max(size);
        ThumbnailPlan {
            resize: (w, size),
            crop: Some(CropRect {
                x: (w - size) / 2,
                y: 0,
                width: size,
                height: size,
            }),
        }
    } else {
        let h = ((src_h as f64 * size as f64 / src_w as f64).round() as u32).max(size);
        ThumbnailPlan {
            resize: (size, h),
            crop: Some(CropRect {
                x: 0,
                y: (h - size) / 2,
                width: size,
                height: size,
            }),
        }
    }
}

/// Dimensions that fit within `max_edge` on the longer side, preserving aspect.
///
/// Returns `None` when the source already fits, i.e. no resize is needed.
pub fn fit_within(source: (u32, u32), max_edge: u32) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    if src_w <= max_edge && src_h <= max_edge {
        return None;
    }
    if src_w >= src_h {
        let h = (src_h as f64 * max_edge as f64 / src_w as f64).round() as u32;
        Some((max_edge, h.max(1)))
    } else {
        let w = (src_w as f64 * max_edge as f64 / src_h as f64).round() as u32;
        Some((w.max(1), max_edge))
    }
}

/// Dimensions scaled to `percent` of the source, never below 1×1.
pub fn scale_percent(source: (u32, u32), percent: u32) -> (u32, u32) {
    let scale = |v: u32| ((v as f64 * percent as f64 / 100.0).round() as u32).max(1);
    (scale(source.0), scale(source.1))
}

/// Thumbnail plan for the configured size mode.
pub fn thumbnail_plan(source: (u32, u32), size: u32, mode: SizeMode) -> ThumbnailPlan {
    match mode {
        SizeMode::Pixels => square_thumbnail_plan(source, size),
        SizeMode::Percent => ThumbnailPlan {
            resize: scale_percent(source, size),
            crop: None,
        },
    }
}

/// Target dimensions for the large variant, or `None` to pass the source through.
pub fn large_plan(source: (u32, u32), size: u32, mode: SizeMode) -> Option<(u32, u32)> {
    match mode {
        SizeMode::Pixels => fit_within(source, size),
        SizeMode::Percent if size >= 100 => None,
        SizeMode::Percent => Some(scale_percent(source, size)),
    }
}
