/// Interpolation mode for the resize operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    /// Nearest neighbor interpolation
    Nearest,
    /// Bilinear interpolation
    Bilinear,
    /// Area averaging. Each destination pixel is the mean of the source pixels
    /// it covers, which keeps detail when downsampling.
    #[default]
    Area,
}
