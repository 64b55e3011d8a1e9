use std::time::Duration;

use crate::camera::{CameraError, CameraSource};
use crate::config::{ConfigError, ScannerConfig};
use crate::history::History;
use crate::processor::{FrameProcessor, ProcessError};
use qrscan_image::Image;
use qrscan_io::fps_counter::FpsCounter;
use qrscan_qr::QrDecoder;

/// Lifecycle of a scanning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Frames are read and decoded on every tick.
    Scanning,
    /// A code was detected and the camera is released until resumed.
    Paused,
    /// The session was shut down. Terminal.
    Closed,
}

/// Status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No code decoded in the last frame.
    Waiting,
    /// The camera did not deliver a usable frame.
    ReadFailed,
    /// A new code was detected and the camera stopped.
    Detected,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let text = match self {
            Status::Waiting => "Waiting for QR code...",
            Status::ReadFailed => "Camera read failed",
            Status::Detected => "QR detected - camera stopped",
        };
        f.write_str(text)
    }
}

/// When the next tick is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Tick again after the given delay.
    After(Duration),
    /// Do not tick until the session is resumed.
    Stop,
}

/// Event raised by a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A text different from the previous detection was decoded.
    Detected(String),
}

/// Outcome of [`Scanner::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    /// Event raised by this tick, if any.
    pub event: Option<ScanEvent>,
    /// When the next tick is due.
    pub schedule: Schedule,
}

impl Tick {
    fn after(delay: Duration) -> Self {
        Self {
            event: None,
            schedule: Schedule::After(delay),
        }
    }

    fn stop() -> Self {
        Self {
            event: None,
            schedule: Schedule::Stop,
        }
    }
}

/// Errors raised by a [`Scanner`].
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The camera could not be opened.
    #[error(transparent)]
    Camera(#[from] CameraError),

    /// The session was already shut down.
    #[error("Scanner is closed")]
    Closed,
}

/// A scanning session: camera, decoder, history and status.
///
/// The session is driven by [`Scanner::tick`], which performs one detection
/// attempt and tells the caller when to call it again.
pub struct Scanner<C: CameraSource, D: QrDecoder> {
    config: ScannerConfig,
    camera: C,
    processor: FrameProcessor<D>,
    history: History,
    state: ScanState,
    status: Status,
    last_result: Option<String>,
    frame: Option<Image<u8, 3>>,
    fps: FpsCounter,
}

impl<C: CameraSource, D: QrDecoder> Scanner<C, D> {
    /// Create a session and open the configured camera.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the camera cannot
    /// be opened.
    pub fn new(config: ScannerConfig, mut camera: C, decoder: D) -> Result<Self, ScannerError> {
        config.validate()?;
        camera.open(config.camera_index)?;
        log::info!("Opened camera index {}", config.camera_index);

        Ok(Self {
            processor: FrameProcessor::new(decoder, &config),
            history: History::new(config.history_size),
            config,
            camera,
            state: ScanState::Scanning,
            status: Status::Waiting,
            last_result: None,
            frame: None,
            fps: FpsCounter::new(),
        })
    }

    /// Read a frame, decode it and update the session.
    ///
    /// Does nothing unless scanning.
    pub fn tick(&mut self) -> Tick {
        if self.state != ScanState::Scanning {
            return Tick::stop();
        }

        let frame = match self.camera.read() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("Failed to read camera frame: {err}");
                self.status = Status::ReadFailed;
                return Tick::after(self.config.retry_delay);
            }
        };

        let processed = match self.processor.process(&frame) {
            Ok(processed) => processed,
            Err(err) => {
                self.on_process_error(err);
                return Tick::after(self.config.retry_delay);
            }
        };

        let text = processed.newest_text().map(str::to_owned);
        self.frame = Some(processed.display);
        self.fps.update();

        let Some(text) = text else {
            self.status = Status::Waiting;
            return Tick::after(self.config.frame_interval);
        };

        if self.last_result.as_deref() == Some(text.as_str()) {
            return Tick::after(self.config.frame_interval);
        }

        log::info!("Detected QR code: {text}");
        self.last_result = Some(text.clone());
        self.history.append(text.as_str());
        self.status = Status::Detected;
        self.state = ScanState::Paused;
        self.camera.release();

        Tick {
            event: Some(ScanEvent::Detected(text)),
            schedule: Schedule::Stop,
        }
    }

    fn on_process_error(&mut self, err: ProcessError) {
        log::warn!("Failed to process camera frame: {err}");
        self.status = Status::ReadFailed;
    }

    /// Reopen the camera and start scanning again after a detection.
    ///
    /// Returns when the next tick is due. Does nothing unless paused.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is closed or the camera cannot be
    /// reopened, in which case the session stays paused.
    pub fn resume(&mut self) -> Result<Schedule, ScannerError> {
        match self.state {
            ScanState::Closed => return Err(ScannerError::Closed),
            ScanState::Scanning => return Ok(Schedule::After(Duration::ZERO)),
            ScanState::Paused => {}
        }

        self.camera.open(self.config.camera_index)?;
        log::info!("Reopened camera index {}", self.config.camera_index);

        self.last_result = None;
        self.state = ScanState::Scanning;
        self.status = Status::Waiting;
        self.fps.reset();
        Ok(Schedule::After(Duration::ZERO))
    }

    /// Stop the session and release the camera. Calling it again does nothing.
    pub fn shutdown(&mut self) {
        if self.state == ScanState::Closed {
            return;
        }
        self.state = ScanState::Closed;
        if self.camera.is_opened() {
            self.camera.release();
        }
        log::info!("Scanner closed");
    }

    /// Current lifecycle state.
    #[inline]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Current status.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Decoded texts, oldest first.
    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The last display frame, with detections outlined.
    #[inline]
    pub fn latest_frame(&self) -> Option<&Image<u8, 3>> {
        self.frame.as_ref()
    }

    /// Smoothed number of processed frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    /// Index of the camera used by the session.
    #[inline]
    pub fn camera_index(&self) -> u32 {
        self.config.camera_index
    }
}

impl<C: CameraSource, D: QrDecoder> Drop for Scanner<C, D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
