use eframe::egui::{self, Color32, Grid, RichText, ScrollArea, Ui};

use crate::state::{AppState, Notice};

/// Button clicks the app turns into worker requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Upload,
    Process,
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) -> Option<Action> {
    let mut action = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Select spectra…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            let can_export = state.chart.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export chart…"))
                .clicked()
            {
                super::plot::export_chart_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.button("Upload").clicked() {
            action = Some(Action::Upload);
        }
        if ui.button("Process & plot").clicked() {
            action = Some(Action::Process);
        }

        ui.separator();

        if state.pending > 0 {
            ui.spinner();
        }
        ui.label(&state.status);
    });

    action
}

// ---------------------------------------------------------------------------
// Left side panel – selected files and processing options
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Files");
            ui.separator();
            if state.selection.is_empty() {
                ui.label("No files selected.");
            }
            for (file, preview) in state.selection.iter().zip(&state.previews) {
                let detail = match preview {
                    Ok(p) => RichText::new(format!(
                        "{} points, {:.1}–{:.1}",
                        p.points, p.min_freq, p.max_freq
                    )),
                    Err(e) => RichText::new(e).color(Color32::YELLOW),
                };
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.strong(&file.name);
                    ui.label(detail);
                });
            }
            if ui.button("Select spectra…").clicked() {
                open_files_dialog(state);
            }

            ui.add_space(8.0);
            ui.heading("Processing");
            ui.separator();

            let form = &mut state.form;
            ui.checkbox(&mut form.remove_baseline, "Remove baseline");
            ui.checkbox(&mut form.apply_smoothing, "Smoothing");
            ui.checkbox(&mut form.normalize, "Normalize (SNV)");
            ui.checkbox(&mut form.find_peaks, "Find peaks");

            ui.add_space(6.0);
            Grid::new("processing_params")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    param_row(ui, "Baseline λ", &mut form.lam);
                    param_row(ui, "Asymmetry p", &mut form.p);
                    param_row(ui, "Window length", &mut form.window_length);
                    param_row(ui, "Polynomial order", &mut form.polyorder);
                    param_row(ui, "Peak width", &mut form.width);
                    param_row(ui, "Peak prominence", &mut form.prominence);
                    param_row(ui, "Min frequency", &mut form.min_freq);
                    param_row(ui, "Max frequency", &mut form.max_freq);
                });

            if let Some(ds) = state.session.dataset() {
                ui.add_space(8.0);
                ui.label(format!("{} spectra cached, {} points", ds.len(), ds.total_points()));
            }
        });
}

fn param_row(ui: &mut Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(90.0));
    ui.end_row();
}

// ---------------------------------------------------------------------------
// Notice window
// ---------------------------------------------------------------------------

/// Show the pending notice until the user dismisses it.
pub fn notice_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(Notice { title, message }) = state.notice.clone() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(message);
            ui.add_space(6.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        state.notice = None;
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Select spectrum files")
        .add_filter("Spectra", &["txt", "dat", "csv"])
        .add_filter("All files", &["*"])
        .pick_files();

    if let Some(paths) = files {
        state.select_files(&paths);
    }
}
