#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// Frame rate counter for video processing.
pub mod fps_counter;

/// JPEG decoding for compressed camera frames.
pub mod jpeg;

/// Video4Linux2 (V4L2) camera capture (feature-gated, Linux only).
///
/// Direct access to Linux camera devices via the V4L2 API.
#[cfg(all(feature = "v4l", target_os = "linux"))]
pub mod v4l;

pub use crate::error::IoError;
