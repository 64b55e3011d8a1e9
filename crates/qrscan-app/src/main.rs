use qrscan_app::camera::DefaultCamera;
use qrscan_app::config::{Args, ScannerConfig};
use qrscan_app::session::Scanner;
use qrscan_app::ui::{self, ScannerApp, StartupErrorApp, WINDOW_TITLE};
use qrscan_qr::QrDetector;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Args = argh::from_env();
    let config = ScannerConfig::from(args);
    let camera_index = config.camera_index;

    match Scanner::new(config, DefaultCamera::default(), QrDetector::new()) {
        Ok(scanner) => {
            eframe::run_native(
                WINDOW_TITLE,
                ui::native_options(),
                Box::new(move |_cc| Ok(Box::new(ScannerApp::new(scanner)))),
            )
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        }
        Err(err) => {
            log::error!("Failed to start the scanner: {err}");
            eframe::run_native(
                WINDOW_TITLE,
                ui::native_options(),
                Box::new(move |_cc| Ok(Box::new(StartupErrorApp::new(camera_index)))),
            )
            .map_err(|e| anyhow::anyhow!("{e}"))?;
            std::process::exit(1);
        }
    }

    Ok(())
}
