//! Image processing, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode + orient** | `image` decoders, EXIF orientation applied |
//! | **Large variant** | Lanczos3 shrink-to-fit, or byte copy when it already fits |
//! | **Thumbnail** | Lanczos3 fill + center crop to a square |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Skip-or-produce wrappers used by the resize scheduler

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use operations::{VariantStatus, ensure_large, ensure_thumbnail};
pub use params::{Quality, ResizeParams, SizeMode, ThumbnailParams};
pub use rust_backend::{RustBackend, is_supported_filename};
