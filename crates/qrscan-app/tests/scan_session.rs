use std::collections::VecDeque;

use qrcode::{Color, QrCode};
use qrscan_app::camera::{CameraError, CameraSource};
use qrscan_app::config::ScannerConfig;
use qrscan_app::session::{ScanEvent, ScanState, Scanner, ScannerError, Schedule, Status};
use qrscan_image::{Image, ImageSize};
use qrscan_qr::QrDetector;

const QUIET_ZONE: usize = 4;

/// Camera replaying a fixed queue of frames, then blank ones.
struct QueueCamera {
    frames: VecDeque<Image<u8, 3>>,
    opened: bool,
}

impl CameraSource for QueueCamera {
    fn open(&mut self, _index: u32) -> Result<(), CameraError> {
        self.opened = true;
        Ok(())
    }

    fn read(&mut self) -> Result<Image<u8, 3>, CameraError> {
        if !self.opened {
            return Err(CameraError::NotOpened);
        }
        match self.frames.pop_front() {
            Some(frame) => Ok(frame),
            None => blank(),
        }
    }

    fn release(&mut self) {
        self.opened = false;
    }

    fn is_opened(&self) -> bool {
        self.opened
    }
}

fn blank() -> Result<Image<u8, 3>, CameraError> {
    Ok(Image::from_size_val([120, 120].into(), 255)?)
}

/// Render `content` as a black on white QR code, `scale` pixels per module.
fn qr_frame(content: &str, scale: usize) -> Image<u8, 3> {
    let code = QrCode::new(content.as_bytes()).expect("valid qr payload");
    let width = code.width();
    let side = (width + 2 * QUIET_ZONE) * scale;
    let size = ImageSize {
        width: side,
        height: side,
    };

    let mut data = vec![255u8; size.area() * 3];
    for (idx, color) in code.to_colors().into_iter().enumerate() {
        if color != Color::Dark {
            continue;
        }
        let (mx, my) = (idx % width + QUIET_ZONE, idx / width + QUIET_ZONE);
        for y in my * scale..(my + 1) * scale {
            for x in mx * scale..(mx + 1) * scale {
                let offset = (y * side + x) * 3;
                data[offset..offset + 3].fill(0);
            }
        }
    }

    Image::new(size, data).expect("valid image")
}

#[test]
fn detect_pause_resume() -> Result<(), ScannerError> {
    let camera = QueueCamera {
        frames: VecDeque::from([blank()?, qr_frame("hello", 4), qr_frame("hello", 4)]),
        opened: false,
    };
    let config = ScannerConfig {
        decode_scale: 2.0,
        display_scale: 0.5,
        ..Default::default()
    };
    let mut scanner = Scanner::new(config, camera, QrDetector::new())?;

    // blank frame
    let tick = scanner.tick();
    assert_eq!(tick.event, None);
    assert!(matches!(tick.schedule, Schedule::After(_)));
    assert_eq!(scanner.status(), Status::Waiting);
    assert!(scanner.history().is_empty());

    // first detection
    let tick = scanner.tick();
    assert_eq!(tick.event, Some(ScanEvent::Detected("hello".to_string())));
    assert_eq!(tick.schedule, Schedule::Stop);
    assert_eq!(scanner.state(), ScanState::Paused);
    assert_eq!(scanner.status().to_string(), "QR detected - camera stopped");
    assert_eq!(scanner.history().render(), "hello");
    assert!(scanner.latest_frame().is_some());

    // the same code is reported again after resuming
    scanner.resume()?;
    assert_eq!(scanner.state(), ScanState::Scanning);
    let tick = scanner.tick();
    assert_eq!(tick.event, Some(ScanEvent::Detected("hello".to_string())));
    assert_eq!(scanner.history().len(), 2);

    scanner.shutdown();
    assert_eq!(scanner.state(), ScanState::Closed);
    Ok(())
}

#[test]
fn display_frame_is_downscaled() -> Result<(), ScannerError> {
    let camera = QueueCamera {
        frames: VecDeque::new(),
        opened: false,
    };
    let mut scanner = Scanner::new(ScannerConfig::default(), camera, QrDetector::new())?;

    scanner.tick();

    let frame = scanner.latest_frame().map(|frame| frame.size());
    assert_eq!(frame, Some(ImageSize::from([60, 60])));
    assert_eq!(scanner.status().to_string(), "Waiting for QR code...");
    Ok(())
}
