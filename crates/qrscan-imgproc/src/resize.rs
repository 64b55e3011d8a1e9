use crate::interpolation::InterpolationMode;
use fast_image_resize as fr;
use qrscan_image::{Image, ImageError, ImageSize};

/// Compute the size of an image scaled by a factor.
///
/// Each side is rounded to the nearest integer and clamped to at least one
/// pixel.
///
/// # Errors
///
/// Returns an error if the scale is not a positive finite number or if the
/// input size is empty.
///
/// # Example
///
/// ```
/// use qrscan_image::ImageSize;
/// use qrscan_imgproc::resize::scale_size;
///
/// let size = scale_size([640, 480].into(), 0.5).unwrap();
/// assert_eq!(size, ImageSize { width: 320, height: 240 });
/// ```
pub fn scale_size(size: ImageSize, scale: f32) -> Result<ImageSize, ImageError> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ImageError::InvalidScale(scale));
    }
    if size.width == 0 || size.height == 0 {
        return Err(ImageError::EmptyImage(size.width, size.height));
    }

    let scale_dim = |dim: usize| ((dim as f32 * scale).round() as usize).max(1);

    Ok(ImageSize {
        width: scale_dim(size.width),
        height: scale_dim(size.height),
    })
}

/// Resize an image using the [fast_image_resize](https://crates.io/crates/fast_image_resize) crate.
///
/// The destination image defines the output size. Supports u8 images with
/// 1 to 4 channels.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use qrscan_image::{Image, ImageSize};
/// use qrscan_imgproc::interpolation::InterpolationMode;
/// use qrscan_imgproc::resize::resize_fast;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0u8; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0).unwrap();
///
/// resize_fast(&image, &mut image_resized, InterpolationMode::Area).unwrap();
///
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
///
/// # Errors
///
/// The function returns an error if either image is empty or the channel
/// count is not supported.
pub fn resize_fast<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    for size in [src.size(), dst.size()] {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::EmptyImage(size.width, size.height));
        }
    }

    let pixel_type = pixel_type::<C>()?;
    let (dst_width, dst_height) = (dst.width() as u32, dst.height() as u32);

    let src_image = fr::images::ImageRef::new(
        src.width() as u32,
        src.height() as u32,
        src.as_slice(),
        pixel_type,
    )
    .map_err(|e| ImageError::IncompatiblePixelBuffer(e.to_string()))?;

    let mut dst_image =
        fr::images::Image::from_slice_u8(dst_width, dst_height, dst.as_slice_mut(), pixel_type)
            .map_err(|e| ImageError::IncompatiblePixelBuffer(e.to_string()))?;

    let resize_alg = match interpolation {
        InterpolationMode::Nearest => fr::ResizeAlg::Nearest,
        InterpolationMode::Bilinear => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
        InterpolationMode::Area => fr::ResizeAlg::Convolution(fr::FilterType::Box),
    };
    let options = fr::ResizeOptions::new().resize_alg(resize_alg);

    let mut resizer = fr::Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| ImageError::IncompatiblePixelBuffer(e.to_string()))?;

    Ok(())
}

/// Resize an image by a scale factor and return the new image.
///
/// # Errors
///
/// Returns an error if the scale is invalid or the resize fails.
pub fn resize_by_scale<const C: usize>(
    src: &Image<u8, C>,
    scale: f32,
    interpolation: InterpolationMode,
) -> Result<Image<u8, C>, ImageError> {
    let new_size = scale_size(src.size(), scale)?;
    let mut dst = Image::from_size_val(new_size, 0u8)?;
    resize_fast(src, &mut dst, interpolation)?;
    Ok(dst)
}

fn pixel_type<const C: usize>() -> Result<fr::PixelType, ImageError> {
    match C {
        1 => Ok(fr::PixelType::U8),
        2 => Ok(fr::PixelType::U8x2),
        3 => Ok(fr::PixelType::U8x3),
        4 => Ok(fr::PixelType::U8x4),
        _ => Err(ImageError::IncompatiblePixelBuffer(format!(
            "unsupported channel count {C}"
        ))),
    }
}
