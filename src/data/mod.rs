/// Data layer: core types, local file handling, and option normalization.
///
/// Architecture:
/// ```text
///  selected .txt files
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read bytes → SelectedFile (+ local preview)
///   └──────────┘
///        │  upload
///        ▼
///   ┌──────────┐
///   │  Dataset  │  per-file frequencies / amplitudes from the server
///   └──────────┘
///        │  process (+ ProcessingOptions from `options`)
///        ▼
///   ┌────────────────┐
///   │ ProcessedResult │  processed amplitudes + peak indices
///   └────────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod options;
