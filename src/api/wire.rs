use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::data::model::{Dataset, SeriesLayout, Spectrum};
use crate::data::options::ProcessingOptions;
use crate::error::{ClientError, Result};

// ---------------------------------------------------------------------------
// Series shapes
// ---------------------------------------------------------------------------

/// Numeric arrays as the server sends them: one flat series or one per file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Series {
    Flat(Vec<f64>),
    Nested(Vec<Vec<f64>>),
}

impl Series {
    pub fn from_entries(layout: SeriesLayout, mut entries: Vec<Vec<f64>>) -> Self {
        match layout {
            SeriesLayout::Flat if entries.len() == 1 => Series::Flat(entries.remove(0)),
            _ => Series::Nested(entries),
        }
    }

    pub fn layout(&self) -> SeriesLayout {
        match self {
            Series::Flat(_) => SeriesLayout::Flat,
            Series::Nested(_) => SeriesLayout::Nested,
        }
    }

    pub fn into_entries(self) -> Vec<Vec<f64>> {
        match self {
            Series::Flat(values) => vec![values],
            Series::Nested(entries) => entries,
        }
    }
}

/// Peak indices: a flat list for a single series, or one list per series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeakSeries {
    Flat(Vec<usize>),
    Nested(Vec<Vec<usize>>),
}

impl PeakSeries {
    pub fn into_entries(self) -> Vec<Vec<usize>> {
        match self {
            PeakSeries::Flat(indices) => vec![indices],
            PeakSeries::Nested(entries) => entries,
        }
    }
}

/// Decode an optional field. `Ok(None)` when absent or `null`.
fn field<T: for<'de> Deserialize<'de>>(body: &JsonValue, name: &str) -> Result<Option<T>> {
    match body.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ClientError::Contract(format!("'{name}' is malformed: {e}"))),
    }
}

/// The `error` string a server may attach to any reply.
pub fn server_error(body: &JsonValue) -> Option<String> {
    body.get("error")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// /upload_files
// ---------------------------------------------------------------------------

/// Turn a successful upload reply into a [`Dataset`].
///
/// Requires `frequencies` and `amplitudes` with matching shapes and
/// per-file lengths. `files` (names) is optional.
pub fn parse_upload(body: &JsonValue) -> Result<Dataset> {
    let frequencies: Option<Series> = field(body, "frequencies")?;
    let amplitudes: Option<Series> = field(body, "amplitudes")?;
    let (frequencies, amplitudes) = match (frequencies, amplitudes) {
        (Some(f), Some(a)) => (f, a),
        _ => {
            return Err(ClientError::Contract(
                "server did not return frequencies and amplitudes".into(),
            ))
        }
    };

    if frequencies.layout() != amplitudes.layout() {
        return Err(ClientError::Contract(
            "frequencies and amplitudes have different shapes".into(),
        ));
    }
    let layout = frequencies.layout();
    let freq_entries = frequencies.into_entries();
    let ampl_entries = amplitudes.into_entries();

    if freq_entries.len() != ampl_entries.len() {
        return Err(ClientError::Contract(format!(
            "{} frequency series but {} amplitude series",
            freq_entries.len(),
            ampl_entries.len()
        )));
    }

    let file_names: Vec<String> = field::<Vec<JsonValue>>(body, "files")?
        .unwrap_or_default()
        .iter()
        .map(|v| match v {
            JsonValue::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();

    let names = series_names(&file_names, freq_entries.len());

    let spectra = freq_entries
        .into_iter()
        .zip(ampl_entries)
        .zip(names)
        .enumerate()
        .map(|(i, ((frequencies, amplitudes), name))| {
            if frequencies.len() != amplitudes.len() {
                return Err(ClientError::Contract(format!(
                    "series {i}: {} frequencies but {} amplitudes",
                    frequencies.len(),
                    amplitudes.len()
                )));
            }
            Ok(Spectrum {
                name,
                frequencies,
                amplitudes,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let uploaded_files = if file_names.is_empty() {
        spectra.len()
    } else {
        file_names.len()
    };

    Ok(Dataset {
        spectra,
        layout,
        uploaded_files,
    })
}

/// Legend names for `count` series given the uploaded file names.
fn series_names(file_names: &[String], count: usize) -> Vec<String> {
    if file_names.len() == count {
        return file_names.to_vec();
    }
    if count == 1 && !file_names.is_empty() {
        // Server merged every file into one series.
        return vec![file_names.join(", ")];
    }
    (1..=count).map(|i| format!("Spectrum {i}")).collect()
}

// ---------------------------------------------------------------------------
// /process_data
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ProcessRequest {
    pub frequencies: Series,
    pub amplitudes: Series,
    #[serde(flatten)]
    pub options: ProcessingOptions,
}

impl ProcessRequest {
    pub fn new(dataset: &Dataset, options: ProcessingOptions) -> Self {
        let frequencies = dataset.spectra.iter().map(|sp| sp.frequencies.clone()).collect();
        let amplitudes = dataset.spectra.iter().map(|sp| sp.amplitudes.clone()).collect();
        Self {
            frequencies: Series::from_entries(dataset.layout, frequencies),
            amplitudes: Series::from_entries(dataset.layout, amplitudes),
            options,
        }
    }
}

/// Decoded `/process_data` success body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReply {
    pub processed_amplitudes: Vec<Vec<f64>>,
    /// One list per series, padded with empty lists.
    pub peaks: Vec<Vec<usize>>,
    /// Replacement frequencies, when the server cropped the range.
    pub frequencies: Option<Vec<Vec<f64>>>,
}

/// Decode a successful `/process_data` reply.
///
/// A missing or non-array `processed_amplitudes` is reported as
/// [`ClientError::Server`] when the server supplied an `error` message.
pub fn parse_process(body: &JsonValue) -> Result<ProcessReply> {
    let processed: Option<Series> = match field(body, "processed_amplitudes") {
        Ok(series) => series,
        Err(e) => {
            return Err(match server_error(body) {
                Some(msg) => ClientError::Server(msg),
                None => e,
            })
        }
    };
    let processed_amplitudes = match processed {
        Some(series) => series.into_entries(),
        None => {
            return Err(match server_error(body) {
                Some(msg) => ClientError::Server(msg),
                None => ClientError::Contract("response is missing processed_amplitudes".into()),
            })
        }
    };

    let mut peaks = field::<PeakSeries>(body, "peaks")?
        .map(PeakSeries::into_entries)
        .unwrap_or_default();
    if peaks.len() > processed_amplitudes.len() {
        return Err(ClientError::Contract(format!(
            "{} peak lists for {} processed series",
            peaks.len(),
            processed_amplitudes.len()
        )));
    }
    peaks.resize(processed_amplitudes.len(), Vec::new());

    let frequencies = field::<Series>(body, "frequencies")?.map(Series::into_entries);

    Ok(ProcessReply {
        processed_amplitudes,
        peaks,
        frequencies,
    })
}

// ---------------------------------------------------------------------------
// /plot_spectrum
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PlotRequest<'a> {
    pub frequencies: &'a [f64],
    pub amplitudes: &'a [f64],
    pub peaks: &'a [usize],
}
