//! QR code detection and decoding for qrscan.
//!
//! This crate locates and decodes QR codes in RGB images. It uses the `rqrr`
//! crate for the actual decoding behind the [`QrDecoder`] trait, so callers can
//! swap in another detector.

use qrscan_image::{Image, ImageError};
use qrscan_imgproc::color::gray_from_rgb_u8;
use rqrr::PreparedImage;
use thiserror::Error;

/// Error type for QR code detection and decoding operations.
#[derive(Error, Debug)]
pub enum QrError {
    /// Error in image processing.
    #[error("Image processing error: {0}")]
    ImageProcessingError(#[from] ImageError),
}

/// The four corners of a detected QR code, as `[x, y]` pixel coordinates.
pub type QrCorners = [[f32; 2]; 4];

/// Information about a detected QR code.
#[derive(Debug, Clone, PartialEq)]
pub struct QrDetection {
    /// The decoded content of the QR code. Empty when the code was located but
    /// could not be decoded.
    pub content: String,
    /// The corner points of the QR code in the image.
    pub corners: QrCorners,
    /// Error correction level of the QR code.
    pub ecc_level: u16,
    /// Masking pattern used in the QR code.
    pub mask: u16,
    /// Version of the QR code.
    pub version: usize,
}

impl QrDetection {
    /// Whether the code was successfully decoded into non-empty text.
    #[inline]
    pub fn is_decoded(&self) -> bool {
        !self.content.is_empty()
    }
}

/// A capability to locate and decode QR codes in an RGB image.
pub trait QrDecoder {
    /// Detects and decodes all QR codes in the image.
    ///
    /// Returns one [`QrDetection`] per located code, in detection order.
    /// Finding no code is not an error.
    fn detect_and_decode(&mut self, image: &Image<u8, 3>) -> Result<Vec<QrDetection>, QrError>;
}

/// QR code detector and decoder backed by `rqrr`.
///
/// Keeps the grayscale buffer between calls to avoid reallocating it for
/// every frame of the same size.
#[derive(Default)]
pub struct QrDetector {
    gray: Option<Image<u8, 1>>,
}

impl QrDetector {
    /// Creates a new detector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl QrDecoder for QrDetector {
    fn detect_and_decode(&mut self, image: &Image<u8, 3>) -> Result<Vec<QrDetection>, QrError> {
        let gray = match self.gray.take() {
            Some(gray) if gray.size() == image.size() => self.gray.insert(gray),
            _ => self.gray.insert(Image::from_size_val(image.size(), 0u8)?),
        };
        gray_from_rgb_u8(image, gray)?;

        let (width, data) = (gray.width(), gray.as_slice());
        let mut prepared =
            PreparedImage::prepare_from_greyscale(width, gray.height(), |x, y| data[y * width + x]);

        let detections = prepared
            .detect_grids()
            .into_iter()
            .map(|grid| {
                let corners = grid.bounds.map(|p| [p.x as f32, p.y as f32]);
                match grid.decode() {
                    Ok((meta, content)) => QrDetection {
                        content,
                        corners,
                        ecc_level: meta.ecc_level,
                        mask: meta.mask,
                        version: meta.version.0,
                    },
                    Err(err) => {
                        log::debug!("Located a QR code but failed to decode it: {err}");
                        QrDetection {
                            content: String::new(),
                            corners,
                            ecc_level: 0,
                            mask: 0,
                            version: 0,
                        }
                    }
                }
            })
            .collect();

        Ok(detections)
    }
}

#[cfg(test)]
mod tests;
