use std::borrow::Cow;

use crate::config::ScannerConfig;
use qrscan_image::{Image, ImageError};
use qrscan_imgproc::{draw::draw_polygon, interpolation::InterpolationMode, resize};
use qrscan_qr::{QrDecoder, QrError};

/// Errors raised while processing a frame.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Resizing or drawing failed.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The decoder failed.
    #[error(transparent)]
    Qr(#[from] QrError),
}

/// Outline of a detected code as `[x, y]` vertices.
pub type Polygon = Vec<[f32; 2]>;

/// Result of processing one camera frame.
#[derive(Debug)]
pub struct ProcessedFrame {
    /// Non-empty decoded texts, in detection order.
    pub texts: Vec<String>,
    /// Outline of every located code, in decode-resolution coordinates.
    pub polygons: Vec<Polygon>,
    /// Downscaled frame with the outlines drawn on it.
    pub display: Image<u8, 3>,
}

impl ProcessedFrame {
    /// The text reported for this frame, the last decoded one.
    pub fn newest_text(&self) -> Option<&str> {
        self.texts.last().map(String::as_str)
    }
}

/// Decode QR codes in camera frames and prepare them for display.
pub struct FrameProcessor<D: QrDecoder> {
    decoder: D,
    decode_scale: f32,
    display_scale: f32,
    outline_color: [u8; 3],
    outline_thickness: usize,
}

impl<D: QrDecoder> FrameProcessor<D> {
    /// Create a processor using the scales and outline style of `config`.
    pub fn new(decoder: D, config: &ScannerConfig) -> Self {
        Self {
            decoder,
            decode_scale: config.decode_scale,
            display_scale: config.display_scale,
            outline_color: config.outline_color,
            outline_thickness: config.outline_thickness,
        }
    }

    /// Run the decoder on `frame` and build the display frame.
    ///
    /// The frame is resized by the decode scale with area interpolation
    /// before decoding. The display frame is the raw frame resized by
    /// the display scale, with every located code outlined.
    pub fn process(&mut self, frame: &Image<u8, 3>) -> Result<ProcessedFrame, ProcessError> {
        let decode_frame = rescale(frame, self.decode_scale)?;
        let detections = self.decoder.detect_and_decode(&decode_frame)?;

        let mut texts = Vec::new();
        let mut polygons = Vec::with_capacity(detections.len());
        for detection in detections {
            polygons.push(detection.corners.to_vec());
            if detection.is_decoded() {
                texts.push(detection.content);
            }
        }

        let mut display = rescale(frame, self.display_scale)?.into_owned();
        let factor = self.display_scale / self.decode_scale;
        for polygon in &polygons {
            draw_polygon(
                &mut display,
                &scale_polygon(polygon, factor),
                self.outline_color,
                self.outline_thickness,
            );
        }

        Ok(ProcessedFrame {
            texts,
            polygons,
            display,
        })
    }
}

fn rescale(frame: &Image<u8, 3>, scale: f32) -> Result<Cow<'_, Image<u8, 3>>, ImageError> {
    if scale == 1.0 {
        return Ok(Cow::Borrowed(frame));
    }
    let resized = resize::resize_by_scale(frame, scale, InterpolationMode::Area)?;
    Ok(Cow::Owned(resized))
}

/// Multiply every vertex by `factor`, truncating to integer pixel coordinates.
pub fn scale_polygon(polygon: &[[f32; 2]], factor: f32) -> Vec<(i64, i64)> {
    polygon
        .iter()
        .map(|&[x, y]| ((x * factor) as i64, (y * factor) as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrscan_image::ImageSize;
    use qrscan_qr::QrDetection;

    /// Decoder returning fixed detections and recording the input size.
    struct FakeDecoder {
        detections: Vec<QrDetection>,
        seen: Option<ImageSize>,
    }

    impl QrDecoder for FakeDecoder {
        fn detect_and_decode(&mut self, image: &Image<u8, 3>) -> Result<Vec<QrDetection>, QrError> {
            self.seen = Some(image.size());
            Ok(self.detections.clone())
        }
    }

    fn detection(content: &str, corners: [[f32; 2]; 4]) -> QrDetection {
        QrDetection {
            content: content.to_string(),
            corners,
            ecc_level: 0,
            mask: 0,
            version: 1,
        }
    }

    const SQUARE: [[f32; 2]; 4] = [[80.0, 160.0], [160.0, 160.0], [160.0, 240.0], [80.0, 240.0]];

    #[test]
    fn scales_and_outlines() -> Result<(), ProcessError> {
        let decoder = FakeDecoder {
            detections: vec![detection("hello", SQUARE)],
            seen: None,
        };
        let mut processor = FrameProcessor::new(decoder, &ScannerConfig::default());

        let frame = Image::<u8, 3>::from_size_val([64, 64].into(), 0)?;
        let processed = processor.process(&frame)?;

        assert_eq!(processor.decoder.seen, Some(ImageSize::from([256, 256])));
        assert_eq!(processed.display.size(), ImageSize::from([32, 32]));
        assert_eq!(processed.texts, vec!["hello".to_string()]);
        assert_eq!(processed.newest_text(), Some("hello"));
        assert_eq!(processed.polygons, vec![SQUARE.to_vec()]);

        let green = |x: usize, y: usize| -> Result<[u8; 3], ImageError> {
            Ok([
                *processed.display.get_pixel(x, y, 0)?,
                *processed.display.get_pixel(x, y, 1)?,
                *processed.display.get_pixel(x, y, 2)?,
            ])
        };
        assert_eq!(green(10, 20)?, [0, 255, 0]);
        assert_eq!(green(15, 20)?, [0, 255, 0]);
        assert_eq!(green(15, 25)?, [0, 0, 0]);
        Ok(())
    }

    #[test]
    fn undecoded_codes_keep_outline_only() -> Result<(), ProcessError> {
        let decoder = FakeDecoder {
            detections: vec![detection("first", SQUARE), detection("", SQUARE)],
            seen: None,
        };
        let mut processor = FrameProcessor::new(decoder, &ScannerConfig::default());

        let frame = Image::<u8, 3>::from_size_val([64, 64].into(), 0)?;
        let processed = processor.process(&frame)?;

        assert_eq!(processed.texts, vec!["first".to_string()]);
        assert_eq!(processed.polygons.len(), 2);
        Ok(())
    }

    #[test]
    fn newest_text_is_last() -> Result<(), ProcessError> {
        let decoder = FakeDecoder {
            detections: vec![detection("a", SQUARE), detection("b", SQUARE)],
            seen: None,
        };
        let config = ScannerConfig {
            decode_scale: 1.0,
            display_scale: 1.0,
            ..Default::default()
        };
        let mut processor = FrameProcessor::new(decoder, &config);

        let frame = Image::<u8, 3>::from_size_val([20, 10].into(), 7)?;
        let processed = processor.process(&frame)?;

        assert_eq!(processor.decoder.seen, Some(ImageSize::from([20, 10])));
        assert_eq!(processed.display.size(), frame.size());
        assert_eq!(processed.newest_text(), Some("b"));
        Ok(())
    }

    #[test]
    fn no_detection() -> Result<(), ProcessError> {
        let decoder = FakeDecoder {
            detections: vec![],
            seen: None,
        };
        let mut processor = FrameProcessor::new(decoder, &ScannerConfig::default());

        let frame = Image::<u8, 3>::from_size_val([8, 8].into(), 50)?;
        let processed = processor.process(&frame)?;

        assert!(processed.texts.is_empty());
        assert!(processed.polygons.is_empty());
        assert_eq!(processed.newest_text(), None);
        assert!(processed.display.as_slice().iter().all(|&v| v == 50));
        Ok(())
    }

    #[test]
    fn empty_frame_is_an_error() -> Result<(), ImageError> {
        let decoder = FakeDecoder {
            detections: vec![],
            seen: None,
        };
        let mut processor = FrameProcessor::new(decoder, &ScannerConfig::default());
        let frame = Image::<u8, 3>::new([0, 0].into(), vec![])?;

        assert!(matches!(
            processor.process(&frame),
            Err(ProcessError::Image(_))
        ));
        Ok(())
    }

    #[test]
    fn polygon_truncation() {
        let scaled = scale_polygon(&[[10.9, 3.2], [-1.5, 7.99]], 1.0);
        assert_eq!(scaled, vec![(10, 3), (-1, 7)]);
        assert!(scale_polygon(&[], 2.0).is_empty());
    }
}
