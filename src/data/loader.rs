use std::path::Path;

use log::{debug, info, warn};

use super::error::{ReadError, Result};
use super::model::{DataSeries, Field, SeriesClass, SpectrumSeries, TimeSeries};
use super::timestamp::{filename_millis, parse_decimal, parse_row_time, HeaderDate};
use crate::config::ReaderConfig;

/// Technique tag attached to every series this reader produces.
pub const TECHNIQUE: &str = "Optical";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an OceanView time-series export with the default configuration.
pub fn load_file(path: &Path) -> Result<SpectrumSeries> {
    OceanViewReader::default().read(path, None, None)
}

/// Reader for OceanView "Data from ... Node" time-series text exports.
///
/// Expected layout:
///
/// ```text
/// Data from USB4F12345__0__13-42-52-946.txt Node
/// Date: Mon Aug 18 13:42:52 CEST 2025
/// ...
/// >>>>>Begin Spectral Data<<<<<
/// 400.0	400.5	401.0	...
/// 13:42:52.946	812.3	790.1	805.6	...
/// 13:42:53.946	815.0	792.4	801.2	...
/// ```
#[derive(Debug, Clone, Default)]
pub struct OceanViewReader {
    config: ReaderConfig,
}

impl OceanViewReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Read `path` into a spectrum series.
    ///
    /// `name` defaults to the file stem. A `class` outside the
    /// spectrum-series family is replaced by the configured fallback.
    pub fn read(
        &self,
        path: &Path,
        name: Option<&str>,
        class: Option<SeriesClass>,
    ) -> Result<SpectrumSeries> {
        let bytes = std::fs::read(path)?;
        let text = decode_lossy(&bytes);
        self.read_str(&text, path, name, class)
    }

    /// Parse export text already in memory. `path` only supplies the default
    /// name and the filename clock segment.
    pub fn read_str(
        &self,
        text: &str,
        path: &Path,
        name: Option<&str>,
        class: Option<SeriesClass>,
    ) -> Result<SpectrumSeries> {
        let name = match name {
            Some(n) => n.to_string(),
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let class = self.resolve_class(class);
        let lines: Vec<&str> = text.lines().collect();

        // ---- Header date, refined by the filename clock ----
        let mut header_date = self.header_date(&lines)?;
        if let Some(millis) = filename_millis(&path.to_string_lossy()) {
            debug!("Using {millis} ms from filename for '{name}'");
            header_date = header_date.with_millis(millis);
        }
        let tstamp = header_date.epoch_seconds();

        // ---- Spectral data section ----
        let marker = find_data_marker(&lines).ok_or(ReadError::NoSpectralData)?;
        let wl_line = marker + 1;
        let wavelengths = parse_values(lines[wl_line], wl_line + 1)?;
        if wavelengths.is_empty() {
            return Err(ReadError::EmptyWavelengthAxis { line: wl_line + 1 });
        }

        let mut rel_times = Vec::new();
        let mut spectra = Vec::new();
        for (i, line) in lines.iter().enumerate().skip(wl_line + 1) {
            if line.trim().is_empty() {
                continue;
            }
            let (stamp, values) = split_row(line);
            rel_times.push(parse_row_time(stamp));
            spectra.push(parse_values(values, i + 1)?);
        }

        let Some(&t0) = rel_times.first() else {
            return Err(ReadError::NoDataRows);
        };
        let unparsed = rel_times.iter().filter(|t| t.is_nan()).count();
        if unparsed > 0 {
            warn!("{unparsed} row timestamp(s) in '{name}' could not be parsed and are NaN");
        }
        for t in &mut rel_times {
            *t -= t0;
        }

        info!(
            "Read '{name}': {} spectra x {} wavelengths",
            spectra.len(),
            wavelengths.len()
        );

        // ---- Wrap into series objects ----
        let cfg = &self.config;
        let xseries = DataSeries::new("wavelength", cfg.wavelength_unit.as_str(), wavelengths);
        let tseries = TimeSeries::new("time", cfg.time_unit.as_str(), rel_times, tstamp);
        let field = Field::new(
            "intensity",
            cfg.intensity_unit.as_str(),
            spectra,
            tseries,
            xseries,
        )?;

        Ok(SpectrumSeries::new(name, class, TECHNIQUE, tstamp, field, true))
    }

    fn resolve_class(&self, requested: Option<SeriesClass>) -> SeriesClass {
        let fallback = if self.config.fallback_class.is_spectrum_series() {
            self.config.fallback_class
        } else {
            SeriesClass::default()
        };
        match requested {
            Some(class) if class.is_spectrum_series() => class,
            Some(class) => {
                warn!("{class} is not a spectrum series, reading as {fallback}");
                fallback
            }
            None => fallback,
        }
    }

    fn header_date(&self, lines: &[&str]) -> Result<HeaderDate> {
        let scanned = self.config.header_scan_lines;
        let line = lines
            .iter()
            .take(scanned)
            .find(|ln| ln.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("date:")))
            .ok_or(ReadError::MissingHeaderDate { scanned })?;
        let date = HeaderDate::parse(line[5..].trim())?;
        debug!("Header date {} (offset {:?})", date.naive, date.offset);
        Ok(date)
    }
}

// ---------------------------------------------------------------------------
// Line helpers
// ---------------------------------------------------------------------------

/// Decode UTF-8, dropping invalid byte sequences.
fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Index of the first "Begin Spectral Data" line followed by a numeric line.
fn find_data_marker(lines: &[&str]) -> Option<usize> {
    lines.windows(2).position(|pair| {
        is_data_marker(pair[0])
            && pair[1]
                .trim_start()
                .starts_with(|c: char| c.is_ascii_digit())
    })
}

fn is_data_marker(line: &str) -> bool {
    let words: Vec<String> = line
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();
    words.join(" ").contains("begin spectral data")
}

/// Split a data row into its timestamp and the rest.
///
/// A tab separates the two when present, since row datetimes may contain a
/// space. Otherwise the first whitespace run does.
fn split_row(line: &str) -> (&str, &str) {
    if let Some(parts) = line.split_once('\t') {
        return parts;
    }
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim_start()),
        None => (line, ""),
    }
}

fn parse_values(s: &str, line: usize) -> Result<Vec<f64>> {
    s.split_whitespace()
        .map(|tok| {
            parse_decimal(tok).ok_or_else(|| ReadError::InvalidNumber {
                line,
                token: tok.to_string(),
            })
        })
        .collect()
}
