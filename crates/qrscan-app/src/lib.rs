#![deny(missing_docs)]
//! Desktop QR code scanner.
//!
//! A [`session::Scanner`] reads frames from a [`camera::CameraSource`], runs
//! them through a [`processor::FrameProcessor`] and keeps the decoded texts in
//! a [`history::History`]. The [`ui::ScannerApp`] drives the session from the
//! egui frame loop.

/// Camera capture behind the [`camera::CameraSource`] trait.
pub mod camera;

/// Session settings and command line arguments.
pub mod config;

/// Bounded history of decoded texts.
pub mod history;

/// Frame resizing, decoding and outline drawing.
pub mod processor;

/// Scanning session state machine.
pub mod session;

/// The eframe application.
pub mod ui;
