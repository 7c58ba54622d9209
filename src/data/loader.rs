use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::model::SelectedFile;
use crate::error::ClientError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read every picked file into memory so it can be uploaded.
pub fn read_selection(paths: &[PathBuf]) -> crate::error::Result<Vec<SelectedFile>> {
    paths.iter().map(|path| read_one(path)).collect()
}

fn read_one(path: &Path) -> crate::error::Result<SelectedFile> {
    let bytes = std::fs::read(path).map_err(|source| ClientError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile { name, bytes })
}

// ---------------------------------------------------------------------------
// Local preview
// ---------------------------------------------------------------------------

/// Summary of a two-column spectrum file, shown before upload.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumPreview {
    pub points: usize,
    pub min_freq: f64,
    pub max_freq: f64,
}

/// Parse a text spectrum: whitespace-separated `frequency amplitude` rows.
///
/// Non-numeric lines before the first data row are treated as a header.
/// Once data has started, every non-blank line must be a numeric pair.
pub fn preview(bytes: &[u8]) -> Result<SpectrumPreview> {
    let text = std::str::from_utf8(bytes).context("file is not valid UTF-8 text")?;

    let mut points = 0usize;
    let mut min_freq = f64::INFINITY;
    let mut max_freq = f64::NEG_INFINITY;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_row(line) {
            Some((freq, _ampl)) => {
                points += 1;
                min_freq = min_freq.min(freq);
                max_freq = max_freq.max(freq);
            }
            None if points == 0 => continue,
            None => bail!("line {}: '{line}' is not a frequency/amplitude pair", line_no + 1),
        }
    }

    if points == 0 {
        bail!("no frequency/amplitude rows found");
    }

    Ok(SpectrumPreview {
        points,
        min_freq,
        max_freq,
    })
}

fn parse_row(line: &str) -> Option<(f64, f64)> {
    let mut cols = line.split_whitespace();
    let freq = cols.next()?.parse::<f64>().ok()?;
    let ampl = cols.next()?.parse::<f64>().ok()?;
    if cols.next().is_some() {
        return None;
    }
    Some((freq, ampl))
}
