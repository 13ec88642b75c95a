use eframe::egui::{Color32, Ui};
use egui_plot::{Line, Plot};
use xrd_baseline::data::model::INTENSITY_COLUMN;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Pattern plot (central panel)
// ---------------------------------------------------------------------------

/// Render the raw pattern, its background and the corrected trace.
pub fn pattern_plot(ui: &mut Ui, state: &AppState) {
    let spectrum = match &state.spectrum {
        Some(sp) => sp,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a pattern to start  (File → Open pattern…)");
            });
            return;
        }
    };

    let angle = spectrum.angle();
    let correction = state.correction.as_ref();
    let trace = |y: &[f64], name: &str, color: Color32| {
        Line::new(xy(angle, y)).name(name).color(color).width(1.5)
    };

    Plot::new("pattern_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("2θ (deg)")
        .y_axis_label("Intensity")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if state.show_raw {
                if let Some(raw) = spectrum.column(INTENSITY_COLUMN) {
                    plot_ui.line(trace(raw, INTENSITY_COLUMN, state.colors.raw));
                }
            }
            if let Some(c) = correction {
                if state.show_background {
                    plot_ui.line(trace(&c.background, "background", state.colors.background));
                }
                if state.show_corrected {
                    plot_ui.line(trace(&c.corrected, "corrected", state.colors.corrected));
                }
            }
        });
}

fn xy(x: &[f64], y: &[f64]) -> Vec<[f64; 2]> {
    x.iter().zip(y.iter()).map(|(&xi, &yi)| [xi, yi]).collect()
}
