use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Series palette
// ---------------------------------------------------------------------------

/// Number of distinct colours before series colours repeat.
pub const PALETTE_SIZE: usize = 10;

/// Colour used for peak markers in the single-series chart.
pub const PEAK_MARKER_COLOR: Color32 = Color32::RED;

/// Colour for the `slot`-th of `n` evenly spaced hues.
fn hue_color(slot: usize, n: usize) -> Color32 {
    let hue = (slot as f32 / n as f32) * 360.0;
    let hsl = Hsl::new(hue, 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Colour of the series at `index`, cycling through the fixed palette.
pub fn series_color(index: usize) -> Color32 {
    hue_color(index % PALETTE_SIZE, PALETTE_SIZE)
}

/// `#rrggbb` form used when exporting charts.
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
