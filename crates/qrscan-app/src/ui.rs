use std::time::Instant;

use eframe::egui::{self, Align2, CentralPanel, Color32, RichText, ScrollArea, TextEdit};

use crate::camera::CameraSource;
use crate::session::{ScanEvent, ScanState, Scanner, Schedule};
use qrscan_qr::QrDecoder;

/// Title of the main window.
pub const WINDOW_TITLE: &str = "QR Code Scanner";

const HISTORY_HEIGHT: f32 = 160.0;

/// Window options shared by the scanner and the startup error windows.
pub fn native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([480.0, 520.0]),
        ..Default::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Dialog {
    Detected(String),
    CameraError(String),
}

/// The scanner window: live frame, status, history and resume control.
pub struct ScannerApp<C: CameraSource, D: QrDecoder> {
    scanner: Scanner<C, D>,
    texture: Option<egui::TextureHandle>,
    /// Instant at which the next tick is due, `None` while stopped.
    next_tick: Option<Instant>,
    dialog: Option<Dialog>,
}

impl<C: CameraSource, D: QrDecoder> ScannerApp<C, D> {
    /// Wrap an opened session. The first tick runs on the first frame.
    pub fn new(scanner: Scanner<C, D>) -> Self {
        Self {
            scanner,
            texture: None,
            next_tick: Some(Instant::now()),
            dialog: None,
        }
    }

    /// Draw one frame of the window, running the scanner if a tick is due.
    pub fn show(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.scanner.shutdown();
            self.next_tick = None;
            return;
        }

        self.run_due_tick(ctx);

        let enabled = self.dialog.is_none();
        CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.show_scanner(ui));
        });

        self.show_dialog(ctx);
    }

    fn run_due_tick(&mut self, ctx: &egui::Context) {
        let Some(due) = self.next_tick else {
            return;
        };

        let now = Instant::now();
        if now < due {
            ctx.request_repaint_after(due - now);
            return;
        }

        let tick = self.scanner.tick();
        if let Some(ScanEvent::Detected(text)) = tick.event {
            self.dialog = Some(Dialog::Detected(text));
        }
        self.upload_frame(ctx);
        self.schedule(ctx, tick.schedule);
    }

    fn schedule(&mut self, ctx: &egui::Context, schedule: Schedule) {
        match schedule {
            Schedule::After(delay) => {
                self.next_tick = Some(Instant::now() + delay);
                ctx.request_repaint_after(delay);
            }
            Schedule::Stop => self.next_tick = None,
        }
    }

    fn upload_frame(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.scanner.latest_frame() else {
            return;
        };

        let color_image =
            egui::ColorImage::from_rgb([frame.width(), frame.height()], frame.as_slice());
        match self.texture.as_mut() {
            Some(texture) => texture.set(color_image, egui::TextureOptions::default()),
            None => {
                self.texture = Some(ctx.load_texture(
                    "camera_frame",
                    color_image,
                    egui::TextureOptions::default(),
                ));
            }
        }
    }

    fn show_scanner(&mut self, ui: &mut egui::Ui) {
        if let Some(texture) = &self.texture {
            ui.image(egui::load::SizedTexture::from_handle(texture));
        }

        ui.label(RichText::new(self.scanner.status().to_string()).color(Color32::BLUE));
        ui.label(format!("FPS: {:.1}", self.scanner.fps()));

        let history = self.scanner.history().render();
        ScrollArea::vertical()
            .max_height(HISTORY_HEIGHT)
            .show(ui, |ui| {
                ui.add(
                    TextEdit::multiline(&mut history.as_str())
                        .text_color(Color32::GREEN)
                        .desired_width(f32::INFINITY),
                );
            });

        let paused = self.scanner.state() == ScanState::Paused;
        let button =
            egui::Button::new("Resume Scan").min_size(egui::vec2(ui.available_width(), 0.0));
        if ui.add_enabled(paused, button).clicked() {
            self.resume(ui.ctx());
        }
    }

    fn resume(&mut self, ctx: &egui::Context) {
        match self.scanner.resume() {
            Ok(schedule) => self.schedule(ctx, schedule),
            Err(err) => {
                log::error!("Failed to resume scanning: {err}");
                self.dialog = Some(Dialog::CameraError(format!(
                    "Cannot open camera index {}",
                    self.scanner.camera_index()
                )));
            }
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let dismissed = match &self.dialog {
            Some(Dialog::Detected(text)) => message_window(ctx, "QR detected", text),
            Some(Dialog::CameraError(message)) => message_window(ctx, "Camera Error", message),
            None => false,
        };
        if dismissed {
            self.dialog = None;
        }
    }
}

impl<C: CameraSource, D: QrDecoder> eframe::App for ScannerApp<C, D> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

/// Window shown instead of the scanner when the camera cannot be opened at
/// startup. Dismissing it closes the application.
pub struct StartupErrorApp {
    message: String,
}

impl StartupErrorApp {
    /// Error window for the camera with the given index.
    pub fn new(camera_index: u32) -> Self {
        Self {
            message: format!("Cannot open camera index {camera_index}"),
        }
    }
}

impl eframe::App for StartupErrorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        CentralPanel::default().show(ctx, |_ui| {});
        if message_window(ctx, "Camera Error", &self.message) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

/// Modal message with an OK button. Returns whether it was dismissed.
fn message_window(ctx: &egui::Context, title: &str, message: &str) -> bool {
    let mut dismissed = false;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            ui.vertical_centered(|ui| {
                dismissed = ui.button("OK").clicked();
            });
        });
    dismissed
}
