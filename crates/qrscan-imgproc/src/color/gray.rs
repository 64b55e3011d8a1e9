use crate::parallel;
use qrscan_image::{Image, ImageError};

/// Convert an RGB8 image to grayscale using the formula:
///
/// Y = (77 * R + 150 * G + 29 * B) >> 8
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use qrscan_image::{Image, ImageSize};
/// use qrscan_imgproc::color::gray_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![255, 255, 255, 0, 0, 0],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255, 0]);
/// ```
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let r = src_pixel[0] as u16;
        let g = src_pixel[1] as u16;
        let b = src_pixel[2] as u16;
        dst_pixel[0] = ((r * 77 + g * 150 + b * 29) >> 8) as u8;
    });

    Ok(())
}
