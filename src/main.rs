mod app;
mod color;
mod state;
mod ui;

use app::BaselineApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional pattern to open on start-up.
    let initial = std::env::args_os().nth(1).map(std::path::PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "XRD Baseline",
        options,
        Box::new(|_cc| Ok(Box::new(BaselineApp::with_initial_file(initial)))),
    )
}
