use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn generate_spectrum(
    wavelengths: &[f64],
    peaks: &[(f64, f64, f64)],
    baseline: f64,
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&wl| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wl, mu, sigma, amp))
                .sum();
            baseline + signal + rng.gauss(0.0, noise_level)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// `HH:MM:SS.fff` for a time of day given in milliseconds.
fn clock(millis: u64) -> String {
    let (h, rem) = (millis / 3_600_000, millis % 3_600_000);
    let (m, rem) = (rem / 60_000, rem % 60_000);
    format!("{h:02}:{m:02}:{:02}.{:03}", rem / 1000, rem % 1000)
}

/// Writes a synthetic OceanView time-series export: a band at 520 nm that
/// grows while one at 650 nm decays, sampled once per second.
fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let output_path = out_dir.join("USB4F12345__0__13-42-52-946.txt");

    let mut rng = SimpleRng::new(42);

    // Wavelengths: 400 → 799.5 nm, step 0.5
    let wavelengths: Vec<f64> = (0..800).map(|i| 400.0 + i as f64 * 0.5).collect();
    let n_spectra = 120u64;
    let start_ms = ((13 * 60 + 42) * 60 + 52) * 1000 + 946;

    let file = File::create(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    let mut out = BufWriter::new(file);

    writeln!(out, "Data from USB4F12345__0__13-42-52-946.txt Node")?;
    writeln!(out)?;
    writeln!(out, "Date: Mon Aug 18 13:42:52 CEST 2025")?;
    writeln!(out, "User: lab")?;
    writeln!(out, "Spectrometer: USB4F12345")?;
    writeln!(out, "Trigger mode: 0")?;
    writeln!(out, "Integration Time (sec): 1.000000E-1")?;
    writeln!(out, "Scans to average: 1")?;
    writeln!(out, "Nonlinearity correction enabled: true")?;
    writeln!(out, "Boxcar width: 0")?;
    writeln!(out, "XAxis mode: Wavelengths")?;
    writeln!(out, "Number of Pixels in Spectrum: {}", wavelengths.len())?;
    writeln!(out, ">>>>>Begin Spectral Data<<<<<")?;

    let header: Vec<String> = wavelengths.iter().map(|w| format!("{w:.3}")).collect();
    writeln!(out, "{}", header.join("\t"))?;

    for i in 0..n_spectra {
        let progress = i as f64 / (n_spectra - 1) as f64;
        let peaks = [
            (520.0, 18.0, 900.0 * progress),
            (650.0, 25.0, 700.0 * (1.0 - progress)),
        ];
        let y = generate_spectrum(&wavelengths, &peaks, 1200.0, 4.0, &mut rng);
        let values: Vec<String> = y.iter().map(|v| format!("{v:.2}")).collect();
        writeln!(out, "{}\t{}", clock(start_ms + i * 1000), values.join("\t"))?;
    }
    out.flush().context("flushing export")?;

    info!(
        "Wrote {n_spectra} spectra ({} wavelengths each) to {}",
        wavelengths.len(),
        output_path.display()
    );
    Ok(())
}
