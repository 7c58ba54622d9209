// ---------------------------------------------------------------------------
// SelectedFile – one file picked by the user, ready to upload
// ---------------------------------------------------------------------------

/// Raw contents of a user-selected spectrum file.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    /// File name sent with the multipart part (no directory).
    pub name: String,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Spectrum – one uploaded file as returned by the server
// ---------------------------------------------------------------------------

/// A single spectrum: index-aligned frequency and amplitude arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Legend label, usually the uploaded file name.
    pub name: String,
    /// Frequency axis (x).
    pub frequencies: Vec<f64>,
    /// Amplitude axis (y) – same length as `frequencies`.
    pub amplitudes: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// How the server laid out the arrays: one flat series or one array per file.
/// Processing requests are sent back in the same layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesLayout {
    Flat,
    Nested,
}

// ---------------------------------------------------------------------------
// Dataset – cached result of the latest successful upload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub spectra: Vec<Spectrum>,
    pub layout: SeriesLayout,
    /// Number of files the server reported as uploaded.
    pub uploaded_files: usize,
}

impl Dataset {
    /// Number of spectra.
    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    /// True when there is no point to process at all.
    pub fn is_empty(&self) -> bool {
        self.spectra.iter().all(Spectrum::is_empty)
    }

    /// Total number of points across all spectra.
    pub fn total_points(&self) -> usize {
        self.spectra.iter().map(Spectrum::len).sum()
    }

    pub fn names(&self) -> Vec<String> {
        self.spectra.iter().map(|sp| sp.name.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// ProcessedResult – server output for one render cycle
// ---------------------------------------------------------------------------

/// Processed spectra, aligned entry-by-entry with the dataset that was sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessedResult {
    pub names: Vec<String>,
    pub frequencies: Vec<Vec<f64>>,
    pub amplitudes: Vec<Vec<f64>>,
    /// Peak indices per entry; empty when none were found or requested.
    pub peaks: Vec<Vec<usize>>,
}

impl ProcessedResult {
    pub fn is_single(&self) -> bool {
        self.amplitudes.len() == 1
    }
}
