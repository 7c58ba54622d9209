use eframe::egui::Color32;
use serde_json::{json, Value as JsonValue};

use crate::color::{series_color, to_hex, PEAK_MARKER_COLOR};
use crate::error::{ClientError, Result};

pub const X_AXIS_TITLE: &str = "Frequency";
pub const Y_AXIS_TITLE: &str = "Amplitude";
const PEAK_MARKER_SIZE: f32 = 8.0;

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceMode {
    Lines,
    Markers,
}

/// One visual series.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub mode: TraceMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Color32,
    /// Marker diameter in points; unused for lines.
    pub marker_size: f32,
}

/// Everything the plot widget needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub traces: Vec<Trace>,
}

impl Chart {
    pub fn lines(&self) -> impl Iterator<Item = &Trace> {
        self.traces.iter().filter(|t| t.mode == TraceMode::Lines)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Trace> {
        self.traces.iter().filter(|t| t.mode == TraceMode::Markers)
    }

    /// Plotly figure (`data` + `layout`) for exporting.
    pub fn to_plotly(&self) -> JsonValue {
        let data: Vec<JsonValue> = self
            .traces
            .iter()
            .map(|t| match t.mode {
                TraceMode::Lines => json!({
                    "x": t.x,
                    "y": t.y,
                    "type": "scatter",
                    "mode": "lines",
                    "name": t.name,
                    "line": { "color": to_hex(t.color) },
                }),
                TraceMode::Markers => json!({
                    "x": t.x,
                    "y": t.y,
                    "type": "scatter",
                    "mode": "markers",
                    "name": t.name,
                    "marker": { "color": to_hex(t.color), "size": t.marker_size },
                }),
            })
            .collect();

        json!({
            "data": data,
            "layout": {
                "title": self.title,
                "xaxis": { "title": self.x_title },
                "yaxis": { "title": self.y_title },
                "showlegend": true,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Values of `frequencies`/`amplitudes` selected by `peaks`.
fn peak_points(
    entry: usize,
    frequencies: &[f64],
    amplitudes: &[f64],
    peaks: &[usize],
) -> Result<(Vec<f64>, Vec<f64>)> {
    peaks
        .iter()
        .map(|&i| match (frequencies.get(i), amplitudes.get(i)) {
            (Some(&x), Some(&y)) => Ok((x, y)),
            _ => Err(ClientError::Render(format!(
                "spectrum {}: peak index {i} is out of range (length {})",
                entry + 1,
                amplitudes.len()
            ))),
        })
        .collect::<Result<Vec<_>>>()
        .map(|points| points.into_iter().unzip())
}

fn check_aligned(entry: usize, frequencies: &[f64], amplitudes: &[f64]) -> Result<()> {
    if frequencies.len() != amplitudes.len() {
        return Err(ClientError::Render(format!(
            "spectrum {}: {} frequencies but {} amplitudes",
            entry + 1,
            frequencies.len(),
            amplitudes.len()
        )));
    }
    Ok(())
}

/// Build a chart with one line per spectrum and, where peaks exist, one
/// marker trace in the same colour.
///
/// `names` labels the traces; missing names fall back to "Spectrum N".
/// `peaks` may be shorter than the spectra; missing entries mean no peaks.
pub fn plot_combined_spectrum(
    names: &[String],
    frequencies: &[Vec<f64>],
    amplitudes: &[Vec<f64>],
    peaks: &[Vec<usize>],
) -> Result<Chart> {
    if frequencies.len() != amplitudes.len() {
        return Err(ClientError::Render(format!(
            "{} frequency series but {} amplitude series",
            frequencies.len(),
            amplitudes.len()
        )));
    }

    let mut traces = Vec::with_capacity(frequencies.len() * 2);

    for (idx, (freq, ampl)) in frequencies.iter().zip(amplitudes).enumerate() {
        check_aligned(idx, freq, ampl)?;

        let color = series_color(idx);
        let name = names
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("Spectrum {}", idx + 1));

        traces.push(Trace {
            name: name.clone(),
            mode: TraceMode::Lines,
            x: freq.clone(),
            y: ampl.clone(),
            color,
            marker_size: 0.0,
        });

        let entry_peaks = peaks.get(idx).map(Vec::as_slice).unwrap_or(&[]);
        if !entry_peaks.is_empty() {
            let (x, y) = peak_points(idx, freq, ampl, entry_peaks)?;
            traces.push(Trace {
                name: format!("Peaks: {name}"),
                mode: TraceMode::Markers,
                x,
                y,
                color,
                marker_size: PEAK_MARKER_SIZE,
            });
        }
    }

    Ok(Chart {
        title: "Processed spectra".into(),
        x_title: X_AXIS_TITLE.into(),
        y_title: Y_AXIS_TITLE.into(),
        traces,
    })
}

/// Single-series chart: the spectrum line plus red peak markers.
pub fn plot_spectrum(frequencies: &[f64], amplitudes: &[f64], peaks: &[usize]) -> Result<Chart> {
    check_aligned(0, frequencies, amplitudes)?;

    let mut traces = vec![Trace {
        name: "Spectrum".into(),
        mode: TraceMode::Lines,
        x: frequencies.to_vec(),
        y: amplitudes.to_vec(),
        color: series_color(0),
        marker_size: 0.0,
    }];

    if !peaks.is_empty() {
        let (x, y) = peak_points(0, frequencies, amplitudes, peaks)?;
        traces.push(Trace {
            name: "Peaks".into(),
            mode: TraceMode::Markers,
            x,
            y,
            color: PEAK_MARKER_COLOR,
            marker_size: PEAK_MARKER_SIZE,
        });
    }

    Ok(Chart {
        title: "Spectrum".into(),
        x_title: X_AXIS_TITLE.into(),
        y_title: Y_AXIS_TITLE.into(),
        traces,
    })
}
