use argh::FromArgs;
use std::time::Duration;

/// Errors raised by an invalid [`ScannerConfig`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// A scale factor is zero, negative or not finite.
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidScale {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The history cannot hold any entry.
    #[error("history size must be at least 1")]
    EmptyHistory,
}

/// Settings of a scanning session.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerConfig {
    /// Index of the capture device.
    pub camera_index: u32,
    /// Maximum number of decoded texts kept in the history.
    pub history_size: usize,
    /// Resize factor applied before running the detector.
    pub decode_scale: f32,
    /// Resize factor applied before rendering.
    pub display_scale: f32,
    /// Delay between two ticks while scanning.
    pub frame_interval: Duration,
    /// Delay before retrying after a failed tick.
    pub retry_delay: Duration,
    /// RGB color of the detection outline.
    pub outline_color: [u8; 3],
    /// Thickness of the detection outline in pixels.
    pub outline_thickness: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            history_size: 20,
            // upsampling helps the detector with small codes
            decode_scale: 4.0,
            display_scale: 0.5,
            frame_interval: Duration::from_millis(10),
            retry_delay: Duration::from_millis(200),
            outline_color: [0, 255, 0],
            outline_thickness: 2,
        }
    }
}

impl ScannerConfig {
    /// Check that the settings describe a usable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("decode_scale", self.decode_scale),
            ("display_scale", self.display_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidScale { name, value });
            }
        }

        if self.history_size == 0 {
            return Err(ConfigError::EmptyHistory);
        }

        Ok(())
    }

    /// Factor mapping decode-resolution coordinates to display resolution.
    #[inline]
    pub fn polygon_scale(&self) -> f32 {
        self.display_scale / self.decode_scale
    }
}

/// Scans QR codes from a live camera
#[derive(Debug, FromArgs)]
pub struct Args {
    /// camera index (default: 0)
    #[argh(option, short = 'c', default = "0")]
    pub camera: u32,
}

impl From<Args> for ScannerConfig {
    fn from(args: Args) -> Self {
        Self {
            camera_index: args.camera,
            ..Default::default()
        }
    }
}
