//! Image processing backend trait.
//!
//! The [`ImageBackend`] trait defines the two pixel operations the build
//! needs: a square thumbnail and a display-size resize. Both read the source,
//! apply its EXIF orientation, and write the variant.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use
//! [`tests::MockBackend`], which records calls instead of touching pixels.

use super::params::{ResizeParams, ThumbnailParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// Implementations must be `Sync`: the resize scheduler calls them from
/// several worker threads at once.
pub trait ImageBackend: Sync {
    /// Produce a display-size variant (orient, shrink to fit, or pass through).
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Produce a thumbnail (orient, fill, center-crop).
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::{Quality, SizeMode};
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    ///
    /// With `write_outputs`, each successful call writes a placeholder file at
    /// the output path so existence-based caching can be observed.
    #[derive(Default)]
    pub struct MockBackend {
        pub operations: Mutex<Vec<RecordedOp>>,
        pub failing_sources: HashSet<PathBuf>,
        pub write_outputs: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Resize {
            source: String,
            output: String,
            size: u32,
            quality: u32,
        },
        Thumbnail {
            source: String,
            output: String,
            size: u32,
            quality: u32,
        },
    }

    impl RecordedOp {
        pub fn output(&self) -> &str {
            match self {
                RecordedOp::Resize { output, .. } | RecordedOp::Thumbnail { output, .. } => output,
            }
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// A mock that also creates each output file.
        pub fn writing() -> Self {
            Self {
                write_outputs: true,
                ..Self::default()
            }
        }

        /// Calls whose source is `path` fail with `ProcessingFailed`.
        pub fn failing_on(mut self, path: impl Into<PathBuf>) -> Self {
            self.failing_sources.insert(path.into());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn finish(&self, source: &Path, output: &Path) -> Result<(), BackendError> {
            if self.failing_sources.contains(source) {
                return Err(BackendError::ProcessingFailed(format!(
                    "mock failure for {}",
                    source.display()
                )));
            }
            if self.write_outputs {
                std::fs::write(output, b"mock")?;
            }
            Ok(())
        }
    }

    impl ImageBackend for MockBackend {
        fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                size: params.size,
                quality: params.quality.value(),
            });
            self.finish(&params.source, &params.output)
        }

        fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Thumbnail {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                size: params.size,
                quality: params.quality.value(),
            });
            self.finish(&params.source, &params.output)
        }
    }

    #[test]
    fn mock_records_resize() {
        let backend = MockBackend::new();

        backend
            .resize(&ResizeParams {
                source: "/source.jpg".into(),
                output: "/source_600.jpg".into(),
                size: 600,
                mode: SizeMode::Pixels,
                quality: Quality::new(90),
            })
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize {
                size: 600,
                quality: 90,
                ..
            }
        ));
    }

    #[test]
    fn mock_records_thumbnail() {
        let backend = MockBackend::new();

        backend
            .thumbnail(&ThumbnailParams {
                source: "/source.jpg".into(),
                output: "/source_100_100.jpg".into(),
                size: 100,
                mode: SizeMode::Pixels,
                quality: Quality::new(85),
            })
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].output(), "/source_100_100.jpg");
    }

    #[test]
    fn mock_fails_on_configured_source() {
        let backend = MockBackend::new().failing_on("/bad.jpg");

        let result = backend.thumbnail(&ThumbnailParams {
            source: "/bad.jpg".into(),
            output: "/bad_100_100.jpg".into(),
            size: 100,
            mode: SizeMode::Pixels,
            quality: Quality::default(),
        });

        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
        // The attempt is still recorded.
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn writing_mock_creates_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("a_600.jpg");
        let backend = MockBackend::writing();

        backend
            .resize(&ResizeParams {
                source: tmp.path().join("a.jpg"),
                output: output.clone(),
                size: 600,
                mode: SizeMode::Pixels,
                quality: Quality::default(),
            })
            .unwrap();

        assert!(output.exists());
    }
}
