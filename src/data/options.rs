use std::str::FromStr;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Defaults for every numeric processing parameter
// ---------------------------------------------------------------------------

pub const DEFAULT_LAM: f64 = 1000.0;
pub const DEFAULT_P: f64 = 0.001;
pub const DEFAULT_WINDOW_LENGTH: u32 = 25;
pub const DEFAULT_POLYORDER: u32 = 2;
pub const DEFAULT_WIDTH: f64 = 1.0;
pub const DEFAULT_PROMINENCE: f64 = 1.0;
pub const DEFAULT_MIN_FREQ: f64 = 0.0;
pub const DEFAULT_MAX_FREQ: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// OptionsForm – raw widget state
// ---------------------------------------------------------------------------

/// What the option widgets hold: toggles plus free text for every number.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsForm {
    pub remove_baseline: bool,
    pub apply_smoothing: bool,
    pub normalize: bool,
    pub find_peaks: bool,
    pub lam: String,
    pub p: String,
    pub window_length: String,
    pub polyorder: String,
    pub width: String,
    pub prominence: String,
    pub min_freq: String,
    pub max_freq: String,
}

impl Default for OptionsForm {
    fn default() -> Self {
        Self {
            remove_baseline: false,
            apply_smoothing: false,
            normalize: false,
            find_peaks: false,
            lam: DEFAULT_LAM.to_string(),
            p: DEFAULT_P.to_string(),
            window_length: DEFAULT_WINDOW_LENGTH.to_string(),
            polyorder: DEFAULT_POLYORDER.to_string(),
            width: DEFAULT_WIDTH.to_string(),
            prominence: DEFAULT_PROMINENCE.to_string(),
            min_freq: DEFAULT_MIN_FREQ.to_string(),
            max_freq: DEFAULT_MAX_FREQ.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProcessingOptions – validated record sent to /process_data
// ---------------------------------------------------------------------------

/// Field names match the `/process_data` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingOptions {
    pub remove_baseline: bool,
    pub apply_smoothing: bool,
    pub normalize: bool,
    pub find_peaks: bool,
    /// Baseline smoothness (ALS λ).
    pub lam: f64,
    /// Baseline asymmetry.
    pub p: f64,
    /// Savitzky–Golay window length.
    pub window_length: u32,
    /// Savitzky–Golay polynomial order.
    pub polyorder: u32,
    /// Minimum peak width.
    pub width: f64,
    /// Minimum peak prominence.
    pub prominence: f64,
    pub min_freq: f64,
    pub max_freq: f64,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self::from_form(&OptionsForm {
            lam: String::new(),
            p: String::new(),
            window_length: String::new(),
            polyorder: String::new(),
            width: String::new(),
            prominence: String::new(),
            min_freq: String::new(),
            max_freq: String::new(),
            ..OptionsForm::default()
        })
    }
}

impl ProcessingOptions {
    /// Normalize the form into a complete options record.
    ///
    /// Every numeric field that is empty, unparseable or non-finite is
    /// replaced by its documented default.
    pub fn from_form(form: &OptionsForm) -> Self {
        Self {
            remove_baseline: form.remove_baseline,
            apply_smoothing: form.apply_smoothing,
            normalize: form.normalize,
            find_peaks: form.find_peaks,
            lam: float_or("lam", &form.lam, DEFAULT_LAM),
            p: float_or("p", &form.p, DEFAULT_P),
            window_length: parse_or("window_length", &form.window_length, DEFAULT_WINDOW_LENGTH),
            polyorder: parse_or("polyorder", &form.polyorder, DEFAULT_POLYORDER),
            width: float_or("width", &form.width, DEFAULT_WIDTH),
            prominence: float_or("prominence", &form.prominence, DEFAULT_PROMINENCE),
            min_freq: float_or("min_freq", &form.min_freq, DEFAULT_MIN_FREQ),
            max_freq: float_or("max_freq", &form.max_freq, DEFAULT_MAX_FREQ),
        }
    }
}

fn parse_or<T>(field: &str, raw: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return default;
    }
    match raw.parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            log::warn!("{field}: '{raw}' is not a valid value, using default {default}");
            default
        }
    }
}

fn float_or(field: &str, raw: &str, default: f64) -> f64 {
    let value = parse_or(field, raw, default);
    if value.is_finite() {
        value
    } else {
        log::warn!("{field}: '{}' is not finite, using default {default}", raw.trim());
        default
    }
}
