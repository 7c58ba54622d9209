//! Writes synthetic two-column spectra (`frequency amplitude` per line) for
//! trying the client against a processing server.
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (default: `sample_spectra`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Gaussian peaks on a sloped baseline, plus noise.
fn generate_spectrum(
    frequencies: &[f64],
    peaks: &[(f64, f64, f64)],
    baseline: (f64, f64),
    noise_level: f64,
    noise: &mut Noise,
) -> Vec<f64> {
    let (offset, slope) = baseline;
    frequencies
        .iter()
        .map(|&f| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(f, mu, sigma, amp))
                .sum();
            signal + offset + slope * f + noise.normal(noise_level)
        })
        .collect()
}

/// Seeded splitmix64 stream; the same seed always writes the same files.
struct Noise {
    state: u64,
}

impl Noise {
    fn seeded(seed: u64) -> Self {
        Noise { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in (0, 1].
    fn unit(&mut self) -> f64 {
        ((self.next_u64() >> 11) + 1) as f64 / (1u64 << 53) as f64
    }

    /// Zero-mean normal sample (Box-Muller).
    fn normal(&mut self, std_dev: f64) -> f64 {
        let radius = (-2.0 * self.unit().ln()).sqrt();
        let angle = std::f64::consts::TAU * self.unit();
        std_dev * radius * angle.cos()
    }
}

/// Tab-separated rows, no header: the upload endpoint splits on whitespace.
fn write_spectrum(path: &Path, frequencies: &[f64], amplitudes: &[f64]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for (f, a) in frequencies.iter().zip(amplitudes) {
        writer
            .write_record([format!("{f:.2}"), format!("{a:.6}")])
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_spectra"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut noise = Noise::seeded(42);

    // Raman-like shift axis: 200 → 3198 cm⁻¹, step 2
    let frequencies: Vec<f64> = (0..1500).map(|i| 200.0 + i as f64 * 2.0).collect();

    let samples: [(&str, Vec<(f64, f64, f64)>, (f64, f64)); 3] = [
        ("sample_a", vec![(520.0, 8.0, 40.0), (1001.0, 10.0, 25.0), (1600.0, 20.0, 15.0)], (5.0, 0.004)),
        ("sample_b", vec![(785.0, 12.0, 30.0), (1450.0, 18.0, 22.0), (2930.0, 25.0, 35.0)], (12.0, -0.002)),
        ("sample_c", vec![(1085.0, 9.0, 50.0), (1350.0, 30.0, 18.0), (2450.0, 15.0, 10.0)], (2.0, 0.008)),
    ];

    for (name, peaks, baseline) in &samples {
        let amplitudes = generate_spectrum(&frequencies, peaks, *baseline, 0.4, &mut noise);
        let path = out_dir.join(format!("{name}.txt"));
        write_spectrum(&path, &frequencies, &amplitudes)?;
        println!("Wrote {} ({} points)", path.display(), frequencies.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_reproducible_and_bounded() {
        let mut a = Noise::seeded(7);
        let mut b = Noise::seeded(7);
        for _ in 0..1000 {
            let u = a.unit();
            assert_eq!(u, b.unit());
            assert!(u > 0.0 && u <= 1.0);
        }
        assert!(Noise::seeded(1).normal(0.5).is_finite());
    }
}
