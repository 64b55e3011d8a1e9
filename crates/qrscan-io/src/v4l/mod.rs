mod pixel_format;

pub use pixel_format::PixelFormat;

use qrscan_image::ImageSize;
use std::time::Duration;
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::MmapStream;
use v4l::video::capture::Parameters;
use v4l::video::Capture;
use v4l::{Device, Format};

/// Error types for the v4l module.
#[derive(Debug, thiserror::Error)]
pub enum V4L2Error {
    /// Failed to talk to the device
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// The device only offers formats that cannot be converted to RGB
    #[error("Unsupported pixel format {0}")]
    UnsupportedPixelFormat(PixelFormat),
}

/// Configuration for V4L video capture.
#[derive(Debug, Clone)]
pub struct V4LCameraConfig {
    /// The camera device path
    pub device_path: String,
    /// The preferred image size
    pub size: ImageSize,
    /// The preferred frames per second
    pub fps: u32,
    /// The preferred pixel format
    pub format: PixelFormat,
    /// Maximum time to wait for a frame
    pub timeout: Duration,
}

impl V4LCameraConfig {
    /// Configuration for the camera `/dev/video{index}` with default settings.
    pub fn from_index(index: u32) -> Self {
        Self {
            device_path: format!("/dev/video{index}"),
            ..Default::default()
        }
    }
}

impl Default for V4LCameraConfig {
    fn default() -> Self {
        Self {
            device_path: "/dev/video0".to_string(),
            size: ImageSize {
                width: 640,
                height: 480,
            },
            fps: 30,
            format: PixelFormat::default(),
            timeout: Duration::from_secs(1),
        }
    }
}

/// V4L video capture.
///
/// The device is streaming from construction until the capture is dropped.
pub struct V4LVideoCapture {
    // NOTE: the stream must be dropped before the device
    stream: MmapStream<'static>,
    pixel_format: PixelFormat,
    size: ImageSize,
    _device: Device,
}

/// A captured frame, borrowed from the capture buffers.
pub struct EncodedFrame<'a> {
    /// The payload of the frame
    pub buffer: &'a [u8],
    /// The pixel format of the payload
    pub pixel_format: PixelFormat,
    /// The frame size in pixels
    pub size: ImageSize,
}

impl V4LVideoCapture {
    /// Open the device and start streaming.
    ///
    /// The configured size and format are a hint: if the device rejects them
    /// the capture falls back to the device's current format, as long as it
    /// is one of the supported pixel formats.
    pub fn new(config: V4LCameraConfig) -> Result<Self, V4L2Error> {
        let device = Device::with_path(&config.device_path)?;

        let format = negotiate_format(&device, &config)?;
        let pixel_format = PixelFormat::from_fourcc(format.fourcc);
        let size = ImageSize {
            width: format.width as usize,
            height: format.height as usize,
        };

        if let Err(err) = device.set_params(&Parameters::with_fps(config.fps)) {
            log::warn!("Failed to set {} fps on {}: {err}", config.fps, config.device_path);
        }

        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, 4)?;
        stream.set_timeout(config.timeout);

        log::info!(
            "Opened {} with {} {}x{}",
            config.device_path,
            pixel_format,
            size.width,
            size.height
        );

        Ok(Self {
            stream,
            pixel_format,
            size,
            _device: device,
        })
    }

    /// Grab a frame from the camera, waiting at most the configured timeout.
    pub fn grab(&mut self) -> Result<EncodedFrame<'_>, V4L2Error> {
        let (buffer, metadata) = self.stream.next()?;

        let used = match metadata.bytesused as usize {
            0 => buffer.len(),
            n => n.min(buffer.len()),
        };

        Ok(EncodedFrame {
            buffer: &buffer[..used],
            pixel_format: self.pixel_format,
            size: self.size,
        })
    }
}

fn negotiate_format(device: &Device, config: &V4LCameraConfig) -> Result<Format, V4L2Error> {
    let requested = Format::new(
        config.size.width as u32,
        config.size.height as u32,
        config.format.to_fourcc(),
    );

    let format = match device.set_format(&requested) {
        Ok(format) => format,
        Err(err) => {
            log::warn!(
                "Device {} rejected {} {}x{} ({err}), using its current format",
                config.device_path,
                config.format,
                config.size.width,
                config.size.height
            );
            device.format()?
        }
    };

    if PixelFormat::from_fourcc(format.fourcc).is_supported() {
        return Ok(format);
    }

    // last resort: most UVC cameras stream raw YUYV
    let yuyv = Format::new(format.width, format.height, PixelFormat::YUYV.to_fourcc());
    let format = device.set_format(&yuyv)?;
    let pixel_format = PixelFormat::from_fourcc(format.fourcc);
    if !pixel_format.is_supported() {
        return Err(V4L2Error::UnsupportedPixelFormat(pixel_format));
    }

    Ok(format)
}
