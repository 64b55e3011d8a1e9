use qrscan_image::Image;

/// Set a pixel's color, ignoring coordinates outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x < 0 || y < 0 || x >= img.cols() as i64 || y >= img.rows() as i64 {
        return;
    }
    let start = (y as usize * img.cols() + x as usize) * C;
    img.as_slice_mut()[start..start + C].copy_from_slice(&color);
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// Points outside the image are clipped.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line in pixels. Each point is drawn
///   as a `thickness` x `thickness` square brush; even widths extend one
///   pixel further to the right and bottom. Zero is drawn as one pixel.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;

    let width = thickness.max(1) as i64;
    let (lo, hi) = (-(width - 1) / 2, width / 2);

    loop {
        for i in lo..=hi {
            for j in lo..=hi {
                set_pixel(img, x0 + i, y0 + j, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a closed polygon outline on an image inplace.
///
/// Consecutive points are joined by lines and the last point is joined back
/// to the first one. A single point draws a dot, no points draw nothing.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `points` - The polygon vertices as (x, y) tuples.
/// * `color` - The color of the outline.
/// * `thickness` - The thickness of the lines.
pub fn draw_polygon<const C: usize>(
    img: &mut Image<u8, C>,
    points: &[(i64, i64)],
    color: [u8; C],
    thickness: usize,
) {
    for (i, &p0) in points.iter().enumerate() {
        let p1 = points[(i + 1) % points.len()];
        draw_line(img, p0, p1, color, thickness);
    }
}
