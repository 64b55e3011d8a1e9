use qrscan_image::{Image, ImageError};
use qrscan_io::IoError;

/// Errors raised by a [`CameraSource`].
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// The device could not be opened.
    #[error("Cannot open camera index {index}: {reason}")]
    Open {
        /// Index of the device.
        index: u32,
        /// Backend description of the failure.
        reason: String,
    },

    /// A frame was requested while no device is open.
    #[error("Camera is not opened")]
    NotOpened,

    /// The device did not deliver a frame.
    #[error("Camera read failed: {0}")]
    Read(String),

    /// A compressed frame could not be decoded.
    #[error("Failed to decode camera frame. {0}")]
    Decode(#[from] IoError),

    /// A raw frame could not be converted to RGB.
    #[error("Failed to convert camera frame. {0}")]
    Convert(#[from] ImageError),

    /// No capture backend is available on this platform.
    #[error("Camera capture is not supported on this platform")]
    Unsupported,
}

/// A video capture device producing RGB frames.
///
/// At most one device handle is held at a time.
pub trait CameraSource {
    /// Open the device with the given index, releasing any handle held before.
    fn open(&mut self, index: u32) -> Result<(), CameraError>;

    /// Read the next frame. Failures are transient and the caller may retry.
    fn read(&mut self) -> Result<Image<u8, 3>, CameraError>;

    /// Release the device. Does nothing when already released.
    fn release(&mut self);

    /// Whether a device handle is currently held.
    fn is_opened(&self) -> bool;
}

#[cfg(all(feature = "v4l", target_os = "linux"))]
pub use self::v4l_camera::V4lCamera as DefaultCamera;

#[cfg(not(all(feature = "v4l", target_os = "linux")))]
pub use self::UnsupportedCamera as DefaultCamera;

#[cfg(all(feature = "v4l", target_os = "linux"))]
mod v4l_camera {
    use super::{CameraError, CameraSource};
    use qrscan_image::Image;
    use qrscan_imgproc::color::rgb_from_yuyv;
    use qrscan_io::jpeg::decode_image_jpeg_rgb8;
    use qrscan_io::v4l::{PixelFormat, V4LCameraConfig, V4LVideoCapture};

    /// Camera backed by a Video4Linux2 device, `/dev/video{index}`.
    #[derive(Default)]
    pub struct V4lCamera {
        capture: Option<V4LVideoCapture>,
    }

    impl CameraSource for V4lCamera {
        fn open(&mut self, index: u32) -> Result<(), CameraError> {
            self.release();

            let capture = V4LVideoCapture::new(V4LCameraConfig::from_index(index)).map_err(
                |err| CameraError::Open {
                    index,
                    reason: err.to_string(),
                },
            )?;
            self.capture = Some(capture);
            Ok(())
        }

        fn read(&mut self) -> Result<Image<u8, 3>, CameraError> {
            let capture = self.capture.as_mut().ok_or(CameraError::NotOpened)?;
            let frame = capture
                .grab()
                .map_err(|err| CameraError::Read(err.to_string()))?;

            let mut rgb = Image::from_size_val(frame.size, 0u8)?;
            match frame.pixel_format {
                PixelFormat::YUYV => rgb_from_yuyv(frame.buffer, &mut rgb)?,
                PixelFormat::MJPG => decode_image_jpeg_rgb8(frame.buffer, &mut rgb)?,
                other => {
                    return Err(CameraError::Read(format!("unsupported pixel format {other}")))
                }
            }

            Ok(rgb)
        }

        fn release(&mut self) {
            if self.capture.take().is_some() {
                log::info!("Camera released");
            }
        }

        fn is_opened(&self) -> bool {
            self.capture.is_some()
        }
    }
}

/// Camera used where no capture backend is compiled in. Opening always fails.
#[derive(Debug, Default)]
pub struct UnsupportedCamera;

impl CameraSource for UnsupportedCamera {
    fn open(&mut self, _index: u32) -> Result<(), CameraError> {
        Err(CameraError::Unsupported)
    }

    fn read(&mut self) -> Result<Image<u8, 3>, CameraError> {
        Err(CameraError::NotOpened)
    }

    fn release(&mut self) {}

    fn is_opened(&self) -> bool {
        false
    }
}
