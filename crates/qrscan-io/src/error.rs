/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error from the underlying device or file.
    #[error("I/O failure. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode the JPEG image.
    #[error("Error with Jpeg decoding. {0}")]
    JpegDecodingError(#[from] zune_jpeg::errors::DecodeErrors),

    /// Error when the decoded resolution does not match the destination image.
    #[error("Decoded image size ({0}x{1}) does not match the destination ({2}x{3})")]
    DecodeMismatchResolution(usize, usize, usize, usize),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] qrscan_image::ImageError),
}
