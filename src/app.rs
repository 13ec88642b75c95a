use std::path::PathBuf;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct BaselineApp {
    pub state: AppState,
}

impl BaselineApp {
    /// Start with `path` already loaded, if given.
    pub fn with_initial_file(path: Option<PathBuf>) -> Self {
        let mut app = Self::default();
        if let Some(path) = path {
            panels::open_pattern(&mut app.state, &path);
        }
        app
    }
}

impl eframe::App for BaselineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: method and parameters ----
        egui::SidePanel::left("method_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::pattern_plot(ui, &self.state);
        });
    }
}
