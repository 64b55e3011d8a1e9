use qrscan_image::{Image, ImageError};
use rayon::prelude::*;

/// Convert a packed YUYV 4:2:2 buffer into an RGB8 image.
///
/// Every 4 input bytes `[Y0, U, Y1, V]` describe two horizontally adjacent
/// pixels sharing the same chroma. The conversion uses BT.601 coefficients in
/// fixed point arithmetic (scaled by 32).
///
/// # Arguments
///
/// * `src` - The raw YUYV buffer, 2 bytes per pixel.
/// * `dst` - The output RGB image. Its size defines how the buffer is read.
///
/// # Errors
///
/// Returns an error if the buffer is shorter than `width * height * 2` bytes.
pub fn rgb_from_yuyv(src: &[u8], dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    let (cols, rows) = (dst.cols(), dst.rows());
    let expected = cols * rows * 2;
    if src.len() < expected {
        return Err(ImageError::InvalidChannelShape(src.len(), expected));
    }
    if cols == 0 {
        return Ok(());
    }

    src[..expected]
        .par_chunks_exact(cols * 2)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(cols * 3))
        .for_each(|(src_row, dst_row)| {
            src_row
                .chunks_exact(4)
                .zip(dst_row.chunks_exact_mut(6))
                .for_each(|(yuyv, rgb)| {
                    let y0 = (yuyv[0] as i32) << 5;
                    let u = yuyv[1] as i32 - 128;
                    let y1 = (yuyv[2] as i32) << 5;
                    let v = yuyv[3] as i32 - 128;

                    // shared chroma terms: 1.402 ≈ 45/32, 0.344 ≈ 11/32, 0.714 ≈ 23/32, 1.772 ≈ 57/32
                    let r_off = 45 * v;
                    let g_off = -11 * u - 23 * v;
                    let b_off = 57 * u;

                    rgb[0] = ((y0 + r_off) >> 5).clamp(0, 255) as u8;
                    rgb[1] = ((y0 + g_off) >> 5).clamp(0, 255) as u8;
                    rgb[2] = ((y0 + b_off) >> 5).clamp(0, 255) as u8;
                    rgb[3] = ((y1 + r_off) >> 5).clamp(0, 255) as u8;
                    rgb[4] = ((y1 + g_off) >> 5).clamp(0, 255) as u8;
                    rgb[5] = ((y1 + b_off) >> 5).clamp(0, 255) as u8;
                });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use qrscan_image::{Image, ImageError, ImageSize};

    #[test]
    fn rgb_from_yuyv_neutral_chroma() -> Result<(), ImageError> {
        let yuyv = [255u8, 128, 0, 128, 128, 128, 128, 128];
        let mut rgb = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;

        super::rgb_from_yuyv(&yuyv, &mut rgb)?;

        assert_eq!(
            rgb.as_slice(),
            &[255, 255, 255, 0, 0, 0, 128, 128, 128, 128, 128, 128]
        );
        Ok(())
    }

    #[test]
    fn rgb_from_yuyv_red() -> Result<(), ImageError> {
        let yuyv = [76u8, 85, 76, 255];
        let mut rgb = Image::<u8, 3>::from_size_val([2, 1].into(), 0)?;

        super::rgb_from_yuyv(&yuyv, &mut rgb)?;

        assert_eq!(rgb.get_pixel(0, 0, 0)?, &254);
        assert_eq!(rgb.get_pixel(0, 0, 1)?, &0);
        assert_eq!(rgb.get_pixel(0, 0, 2)?, &0);
        Ok(())
    }

    #[test]
    fn rgb_from_yuyv_short_buffer() -> Result<(), ImageError> {
        let mut rgb = Image::<u8, 3>::from_size_val([4, 2].into(), 0)?;
        assert_eq!(
            super::rgb_from_yuyv(&[0u8; 10], &mut rgb),
            Err(ImageError::InvalidChannelShape(10, 16))
        );
        Ok(())
    }
}
