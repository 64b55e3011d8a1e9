//! Pixel format definitions for V4L2 cameras
use std::str::FromStr;
use v4l::FourCC;

/// Camera pixel formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// YUYV 4:2:2 format (uncompressed, high bandwidth)
    YUYV,
    /// Motion JPEG (compressed, lower bandwidth)
    MJPG,
    /// Any other format, identified by its FourCC bytes
    Custom([u8; 4]),
}

impl PixelFormat {
    /// Convert to V4L2 FourCC
    pub fn to_fourcc(&self) -> FourCC {
        match self {
            Self::YUYV => FourCC::new(b"YUYV"),
            Self::MJPG => FourCC::new(b"MJPG"),
            Self::Custom(bytes) => FourCC::new(bytes),
        }
    }

    /// Create PixelFormat from V4L2 FourCC
    pub fn from_fourcc(fourcc: FourCC) -> Self {
        match fourcc.str() {
            Ok("YUYV") => Self::YUYV,
            Ok("MJPG") => Self::MJPG,
            _ => Self::Custom(fourcc.repr),
        }
    }

    /// Whether frames in this format can be converted to RGB.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        // compressed frames keep the bandwidth low at higher resolutions
        Self::MJPG
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YUYV => write!(f, "YUYV"),
            Self::MJPG => write!(f, "MJPG"),
            Self::Custom(bytes) => {
                let fourcc_str = std::str::from_utf8(bytes).unwrap_or("????");
                write!(f, "{fourcc_str}")
            }
        }
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YUYV" => Ok(Self::YUYV),
            "MJPG" => Ok(Self::MJPG),
            _ => Err(format!("Invalid pixel format: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PixelFormat;

    #[test]
    fn pixel_format_fourcc() {
        for format in [PixelFormat::YUYV, PixelFormat::MJPG] {
            assert_eq!(PixelFormat::from_fourcc(format.to_fourcc()), format);
            assert!(format.is_supported());
        }

        let nv12 = PixelFormat::from_fourcc(v4l::FourCC::new(b"NV12"));
        assert_eq!(nv12, PixelFormat::Custom(*b"NV12"));
        assert!(!nv12.is_supported());
        assert_eq!(nv12.to_string(), "NV12");
    }

    #[test]
    fn pixel_format_from_str() {
        assert_eq!("YUYV".parse::<PixelFormat>(), Ok(PixelFormat::YUYV));
        assert_eq!("MJPG".parse::<PixelFormat>(), Ok(PixelFormat::MJPG));
        assert!("RGB3".parse::<PixelFormat>().is_err());
    }
}
