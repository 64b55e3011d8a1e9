use crate::{QrDecoder, QrDetector, QrError};
use qrcode::{Color, QrCode};
use qrscan_image::{Image, ImageSize};

const QUIET_ZONE: usize = 4;

/// Render `codes` side by side on a white RGB canvas, `scale` pixels per module.
fn render_codes(contents: &[&str], scale: usize) -> Image<u8, 3> {
    let codes: Vec<QrCode> = contents
        .iter()
        .map(|c| QrCode::new(c.as_bytes()).expect("valid qr payload"))
        .collect();

    let cell = codes.iter().map(QrCode::width).max().unwrap_or(0) + 2 * QUIET_ZONE;
    let size = ImageSize {
        width: cell * scale * codes.len(),
        height: cell * scale,
    };
    let mut image = Image::<u8, 3>::from_size_val(size, 255).expect("valid image size");

    for (i, code) in codes.iter().enumerate() {
        let width = code.width();
        let x_offset = i * cell * scale;
        for (idx, color) in code.to_colors().into_iter().enumerate() {
            if color != Color::Dark {
                continue;
            }
            let (mx, my) = (idx % width + QUIET_ZONE, idx / width + QUIET_ZONE);
            for y in my * scale..(my + 1) * scale {
                for x in mx * scale..(mx + 1) * scale {
                    let offset = (y * size.width + x_offset + x) * 3;
                    image.as_slice_mut()[offset..offset + 3].copy_from_slice(&[0, 0, 0]);
                }
            }
        }
    }

    image
}

#[test]
fn test_qr_detection() -> Result<(), QrError> {
    let scale = 6;
    let image = render_codes(&["https://example.com/qrscan"], scale);

    let detections = QrDetector::new().detect_and_decode(&image)?;

    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].content, "https://example.com/qrscan");
    assert!(detections[0].is_decoded());
    assert!(detections[0].version >= 1);

    // every corner must sit on the symbol, inside the quiet zone border
    let lo = (QUIET_ZONE - 1) * scale;
    let hi = image.width() - lo;
    for [x, y] in detections[0].corners {
        assert!((lo as f32..=hi as f32).contains(&x), "x = {x}");
        assert!((lo as f32..=hi as f32).contains(&y), "y = {y}");
    }
    Ok(())
}

#[test]
fn test_qr_detection_multiple() -> Result<(), QrError> {
    let image = render_codes(&["first", "second"], 5);

    let mut detector = QrDetector::new();
    let mut contents: Vec<String> = detector
        .detect_and_decode(&image)?
        .into_iter()
        .map(|d| d.content)
        .collect();
    contents.sort();

    assert_eq!(contents, vec!["first".to_string(), "second".to_string()]);
    Ok(())
}

#[test]
fn test_qr_detection_blank() -> Result<(), QrError> {
    let image = Image::<u8, 3>::from_size_val([64, 48].into(), 255)?;
    let mut detector = QrDetector::new();

    assert!(detector.detect_and_decode(&image)?.is_empty());

    // reusing the detector with a different frame size must not fail
    let image = Image::<u8, 3>::from_size_val([32, 32].into(), 0)?;
    assert!(detector.detect_and_decode(&image)?.is_empty());
    Ok(())
}
