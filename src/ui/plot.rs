use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::render::{Chart, TraceMode};
use crate::state::{AppState, Notice};

// ---------------------------------------------------------------------------
// Spectrum plot (central panel)
// ---------------------------------------------------------------------------

/// Render the current chart in the central panel.
pub fn spectrum_plot(ui: &mut Ui, state: &AppState) {
    let chart = match &state.chart {
        Some(chart) => chart,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Select spectra, upload them, then Process & plot");
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(&chart.title);
    });

    // The plot id stays fixed so a new chart replaces the previous one.
    Plot::new("spectrum_plot")
        .legend(Legend::default())
        .x_axis_label(chart.x_title.clone())
        .y_axis_label(chart.y_title.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for trace in &chart.traces {
                let points: PlotPoints = trace
                    .x
                    .iter()
                    .zip(trace.y.iter())
                    .map(|(&xi, &yi)| [xi, yi])
                    .collect();

                match trace.mode {
                    TraceMode::Lines => plot_ui.line(
                        Line::new(points)
                            .name(&trace.name)
                            .color(trace.color)
                            .width(1.5),
                    ),
                    TraceMode::Markers => plot_ui.points(
                        Points::new(points)
                            .name(&trace.name)
                            .color(trace.color)
                            .radius(trace.marker_size / 2.0),
                    ),
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write the chart as a Plotly figure JSON.
pub fn export_chart(chart: &Chart, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(&chart.to_plotly()).context("serializing chart")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn export_chart_dialog(state: &mut AppState) {
    let Some(chart) = &state.chart else {
        return;
    };
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export chart")
        .add_filter("Plotly JSON", &["json"])
        .set_file_name("spectrum_plot.json")
        .save_file()
    else {
        return;
    };

    match export_chart(chart, &path) {
        Ok(()) => {
            log::info!("Exported chart to {}", path.display());
            state.status = format!("Exported chart to {}", path.display());
        }
        Err(e) => {
            log::error!("Chart export failed: {e:#}");
            state.notice = Some(Notice {
                title: "Export failed".into(),
                message: format!("{e:#}"),
            });
        }
    }
}
