use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, Ui};
use xrd_baseline::baseline::als::AlsParams;
use xrd_baseline::baseline::linear::LinearParams;
use xrd_baseline::baseline::median::MedianParams;
use xrd_baseline::baseline::savgol::SavgolParams;
use xrd_baseline::{load_data, write_correction_csv, CorrectionMethod, Settings};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – method and parameter widgets
// ---------------------------------------------------------------------------

/// Render the left method panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Baseline");
    ui.separator();

    // ---- Loader ----
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Header lines");
        let response =
            ui.add(egui::DragValue::new(&mut state.settings.header_lines).range(0..=1000));
        // reload once per edit, not on every frame of a drag
        if (response.changed() && !response.dragged()) || response.drag_stopped() {
            reload(state);
        }
        if state.spectrum.is_some() && ui.small_button("Reload").clicked() {
            reload(state);
        }
    });
    ui.separator();

    // ---- Method selector ----
    ui.strong("Method");
    let current = state.settings.method;
    egui::ComboBox::from_id_salt("method")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for candidate in CorrectionMethod::all_defaults() {
                if ui
                    .selectable_label(current.same_kind(&candidate), candidate.label())
                    .clicked()
                    && !current.same_kind(&candidate)
                {
                    state.set_method(candidate);
                }
            }
        });
    ui.add_space(4.0);

    // ---- Parameters (edited on a copy, applied on change) ----
    let mut method = state.settings.method;
    let changed = match &mut method {
        CorrectionMethod::Als(p) => als_params(ui, p),
        CorrectionMethod::Savgol(p) => savgol_params(ui, p),
        CorrectionMethod::Median(p) => median_params(ui, p),
        CorrectionMethod::Linear(p) => linear_params(ui, p),
    };
    if changed {
        state.set_method(method);
    }

    ui.add_space(4.0);
    if ui.button("Apply").clicked() {
        state.recompute();
    }
    ui.separator();

    // ---- Display toggles ----
    ui.strong("Show");
    let colors = state.colors;
    ui.checkbox(&mut state.show_raw, RichText::new("Raw intensity").color(colors.raw));
    ui.checkbox(
        &mut state.show_background,
        RichText::new("Background").color(colors.background),
    );
    ui.checkbox(
        &mut state.show_corrected,
        RichText::new("Corrected").color(colors.corrected),
    );

    if let Some(r) = state.roughness {
        ui.separator();
        ui.label(format!("Background roughness: {r:.4e}"));
    }
}

fn als_params(ui: &mut Ui, p: &mut AlsParams) -> bool {
    let mut changed = false;
    changed |= ui
        .add(egui::Slider::new(&mut p.lam, 1.0..=1e10).logarithmic(true).text("λ"))
        .changed();
    changed |= ui
        .add(egui::Slider::new(&mut p.p, 1e-4..=0.5).logarithmic(true).text("p"))
        .changed();
    changed |= ui
        .add(egui::DragValue::new(&mut p.niter).range(1..=200).prefix("iterations: "))
        .changed();
    changed
}

fn savgol_params(ui: &mut Ui, p: &mut SavgolParams) -> bool {
    let mut changed = false;
    changed |= ui
        .add(egui::DragValue::new(&mut p.window_length).range(1..=5001).prefix("window: "))
        .changed();
    if p.window_length % 2 == 0 {
        p.window_length += 1;
    }
    changed |= ui
        .add(egui::DragValue::new(&mut p.polyorder).range(0..=10).prefix("order: "))
        .changed();
    changed
}

fn median_params(ui: &mut Ui, p: &mut MedianParams) -> bool {
    let changed = ui
        .add(egui::DragValue::new(&mut p.kernel_size).range(1..=5001).prefix("kernel: "))
        .changed();
    if p.kernel_size % 2 == 0 {
        p.kernel_size += 1;
    }
    changed
}

fn linear_params(ui: &mut Ui, p: &mut LinearParams) -> bool {
    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        for order in [0, 1] {
            changed |= ui
                .radio_value(&mut p.order, order, format!("order {order}"))
                .changed();
        }
    });
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open pattern…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.correction.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export corrected…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Load settings…").clicked() {
                load_settings_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save settings…").clicked() {
                save_settings_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(sp) = &state.spectrum {
            let name = sp
                .source
                .as_deref()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "pattern".to_string());
            match sp.angle_range() {
                Some((lo, hi)) => ui.label(format!("{name}: {} points, 2θ {lo:.2}–{hi:.2}°", sp.len())),
                None => ui.label(format!("{name}: empty")),
            };
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Load `path` with the current header count and make it the active pattern.
pub fn open_pattern(state: &mut AppState, path: &Path) {
    let header_lines = state.settings.header_lines;
    let loaded = load_data(Some(path), Some(header_lines))
        .with_context(|| format!("loading {}", path.display()));

    match loaded {
        Ok(spectrum) => state.set_spectrum(spectrum),
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

/// Re-read the active pattern from disk with the current header count.
fn reload(state: &mut AppState) {
    let source = state.spectrum.as_ref().and_then(|sp| sp.source.clone());
    if let Some(path) = source {
        open_pattern(state, &path);
    }
}

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open diffraction pattern")
        .add_filter("Text patterns", &["txt", "xy", "dat"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        open_pattern(state, &path);
    }
}

fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export corrected pattern")
        .add_filter("CSV", &["csv"])
        .set_file_name("corrected.csv")
        .save_file();

    if let Some(path) = file {
        let exported = export(state, &path);
        report(state, exported, "export");
    }
}

fn export(state: &AppState, path: &Path) -> Result<()> {
    let spectrum = state.spectrum.as_ref().context("no pattern loaded")?;
    let correction = state.correction.as_ref().context("no correction computed")?;
    write_correction_csv(path, spectrum, correction)
        .with_context(|| format!("writing {}", path.display()))
}

fn load_settings_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load settings")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        let loaded = Settings::load(&path).with_context(|| format!("reading {}", path.display()));
        match loaded {
            Ok(settings) => state.set_settings(settings),
            Err(e) => report(state, Err(e), "load settings"),
        }
    }
}

fn save_settings_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save settings")
        .add_filter("JSON", &["json"])
        .set_file_name("baseline_settings.json")
        .save_file();

    if let Some(path) = file {
        let saved = state
            .settings
            .save(&path)
            .with_context(|| format!("writing {}", path.display()));
        report(state, saved, "save settings");
    }
}

fn report(state: &mut AppState, result: Result<()>, what: &str) {
    if let Err(e) = result {
        log::error!("Failed to {what}: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
