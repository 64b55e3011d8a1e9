use std::time::Instant;

/// The smoothing factor for the FPS calculation.
const SMOOTHING: f32 = 0.95;

/// A simple frame per second (FPS) counter.
///
/// # Examples
///
/// ```
/// use qrscan_io::fps_counter::FpsCounter;
///
/// let mut fps_counter = FpsCounter::new();
///
/// for _ in 0..100 {
///    fps_counter.update();
/// }
/// ```
pub struct FpsCounter {
    last_time: Option<Instant>,
    fps: f32,
}

impl FpsCounter {
    /// Creates a new `FpsCounter`.
    pub fn new() -> Self {
        Self {
            last_time: None,
            fps: 0.0,
        }
    }

    /// Returns the current FPS.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Forget the previous frames, e.g. after the capture was paused.
    pub fn reset(&mut self) {
        self.last_time = None;
        self.fps = 0.0;
    }

    /// Registers a new frame and updates the smoothed FPS.
    pub fn update(&mut self) {
        let now = Instant::now();
        let Some(last_time) = self.last_time.replace(now) else {
            return;
        };

        let elapsed = now.duration_since(last_time).as_secs_f32();
        if elapsed <= f32::EPSILON {
            return;
        }

        let instant_fps = 1.0 / elapsed;
        self.fps = if self.fps == 0.0 {
            instant_fps
        } else {
            self.fps * SMOOTHING + instant_fps * (1.0 - SMOOTHING)
        };
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
