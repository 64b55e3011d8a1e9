use crate::error::IoError;
use qrscan_image::{Image, ImageSize};

/// Read the size of a JPEG image from its headers without decoding it.
///
/// # Arguments
///
/// - `src` - Raw bytes of the jpeg image
pub fn decode_image_jpeg_size(src: &[u8]) -> Result<ImageSize, IoError> {
    let mut decoder = zune_jpeg::JpegDecoder::new(src);
    decoder.decode_headers()?;

    let image_info = decoder.info().ok_or_else(|| {
        IoError::JpegDecodingError(zune_jpeg::errors::DecodeErrors::Format(String::from(
            "Failed to find image info from its metadata",
        )))
    })?;

    Ok(ImageSize {
        width: image_info.width as usize,
        height: image_info.height as usize,
    })
}

/// Decodes a JPEG image with three channel (rgb8) from raw bytes.
///
/// # Arguments
///
/// - `src` - Raw bytes of the jpeg image
/// - `dst` - A mutable reference to the destination `Image`, sized like the jpeg
pub fn decode_image_jpeg_rgb8(src: &[u8], dst: &mut Image<u8, 3>) -> Result<(), IoError> {
    let size = decode_image_jpeg_size(src)?;
    if size != dst.size() {
        return Err(IoError::DecodeMismatchResolution(
            size.width,
            size.height,
            dst.width(),
            dst.height(),
        ));
    }

    let mut decoder = zune_jpeg::JpegDecoder::new(src);
    decoder.decode_into(dst.as_slice_mut())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpeg_encoder::{ColorType, Encoder};

    fn encode_solid(width: u16, height: u16, rgb: [u8; 3]) -> Vec<u8> {
        let data = rgb.repeat(width as usize * height as usize);
        let mut bytes = Vec::new();
        Encoder::new(&mut bytes, 95)
            .encode(&data, width, height, ColorType::Rgb)
            .unwrap();
        bytes
    }

    #[test]
    fn decode_jpeg() -> Result<(), IoError> {
        let bytes = encode_solid(16, 8, [200, 40, 40]);
        assert_eq!(decode_image_jpeg_size(&bytes)?, ImageSize::from([16, 8]));

        let mut image = Image::<u8, 3>::from_size_val([16, 8].into(), 0)?;
        decode_image_jpeg_rgb8(&bytes, &mut image)?;

        for pixel in image.as_slice().chunks_exact(3) {
            assert!(pixel[0].abs_diff(200) <= 4, "{pixel:?}");
            assert!(pixel[1].abs_diff(40) <= 4, "{pixel:?}");
            assert!(pixel[2].abs_diff(40) <= 4, "{pixel:?}");
        }
        Ok(())
    }

    #[test]
    fn decode_jpeg_mismatch() -> Result<(), IoError> {
        let bytes = encode_solid(16, 8, [0, 0, 0]);
        let mut image = Image::<u8, 3>::from_size_val([8, 8].into(), 0)?;

        let res = decode_image_jpeg_rgb8(&bytes, &mut image);
        assert!(matches!(
            res,
            Err(IoError::DecodeMismatchResolution(16, 8, 8, 8))
        ));
        Ok(())
    }

    #[test]
    fn decode_jpeg_garbage() {
        assert!(decode_image_jpeg_size(&[0u8, 1, 2, 3]).is_err());
    }
}
