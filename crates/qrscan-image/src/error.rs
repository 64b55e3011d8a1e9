/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when the image size is not valid for the operation.
    #[error("Invalid image size ({0}x{1}), expected ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when an image has zero width or height.
    #[error("Image size must be non-zero, got {0}x{1}")]
    EmptyImage(usize, usize),

    /// Error when a scale factor is not a positive finite number.
    #[error("Invalid scale factor {0}")]
    InvalidScale(f32),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel buffers are not compatible with the backend.
    #[error("Incompatible pixel buffer: {0}")]
    IncompatiblePixelBuffer(String),
}
