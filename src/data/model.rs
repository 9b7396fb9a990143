use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SeriesClass – the requested output subtype
// ---------------------------------------------------------------------------

/// Output container classes a caller may ask the reader for.
///
/// Only the spectrum-series family can hold a time × wavelength field; the
/// other classes exist so a caller's request can be checked and substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesClass {
    /// Generic spectrum series.
    Spectrum,
    /// UV-Vis / optical spectrum series.
    #[default]
    OpticalSpectrum,
    Measurement,
    ValueSeries,
    TimeSeries,
}

impl SeriesClass {
    /// Whether the class belongs to the spectrum-series family.
    pub fn is_spectrum_series(self) -> bool {
        matches!(self, SeriesClass::Spectrum | SeriesClass::OpticalSpectrum)
    }
}

impl fmt::Display for SeriesClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeriesClass::Spectrum => "SpectrumSeries",
            SeriesClass::OpticalSpectrum => "OpticalSpectrumSeries",
            SeriesClass::Measurement => "Measurement",
            SeriesClass::ValueSeries => "ValueSeries",
            SeriesClass::TimeSeries => "TimeSeries",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// A named, unit-tagged 1-D series (e.g. the wavelength axis).
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    pub name: String,
    pub unit_name: String,
    pub data: Vec<f64>,
}

impl DataSeries {
    pub fn new(name: impl Into<String>, unit_name: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            unit_name: unit_name.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A 1-D series of relative times anchored at an absolute epoch timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub name: String,
    pub unit_name: String,
    /// Seconds relative to `tstamp`.
    pub data: Vec<f64>,
    /// Unix epoch seconds of the anchor.
    pub tstamp: f64,
}

impl TimeSeries {
    pub fn new(
        name: impl Into<String>,
        unit_name: impl Into<String>,
        data: Vec<f64>,
        tstamp: f64,
    ) -> Self {
        Self {
            name: name.into(),
            unit_name: unit_name.into(),
            data,
            tstamp,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Epoch seconds of every sample.
    pub fn absolute_times(&self) -> Vec<f64> {
        self.data.iter().map(|t| self.tstamp + t).collect()
    }
}

// ---------------------------------------------------------------------------
// Field – 2-D intensity matrix on (time, wavelength) axes
// ---------------------------------------------------------------------------

/// Reasons rows cannot be stacked into a [`Field`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("time axis has {axis} points but field has {rows} rows")]
    TimeAxis { axis: usize, rows: usize },
    #[error("wavelength axis has {axis} points but field has {columns} columns")]
    WavelengthAxis { axis: usize, columns: usize },
}

/// Row-major matrix: one row per time point, one column per wavelength bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub unit_name: String,
    data: Vec<f64>,
    shape: (usize, usize),
    tseries: TimeSeries,
    xseries: DataSeries,
}

impl Field {
    /// Stack `rows` and check them against both axes.
    pub fn new(
        name: impl Into<String>,
        unit_name: impl Into<String>,
        rows: Vec<Vec<f64>>,
        tseries: TimeSeries,
        xseries: DataSeries,
    ) -> Result<Self, ShapeError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(xseries.len(), Vec::len);

        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n_cols {
                return Err(ShapeError::RaggedRow {
                    row,
                    expected: n_cols,
                    found: values.len(),
                });
            }
            data.extend(values);
        }

        if tseries.len() != n_rows {
            return Err(ShapeError::TimeAxis {
                axis: tseries.len(),
                rows: n_rows,
            });
        }
        if xseries.len() != n_cols {
            return Err(ShapeError::WavelengthAxis {
                axis: xseries.len(),
                columns: n_cols,
            });
        }

        Ok(Self {
            name: name.into(),
            unit_name: unit_name.into(),
            data,
            shape: (n_rows, n_cols),
            tseries,
            xseries,
        })
    }

    /// `(time points, wavelength bins)`.
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Flat row-major values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Intensities of one time point.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        let (rows, cols) = self.shape;
        (i < rows).then(|| &self.data[i * cols..(i + 1) * cols])
    }

    pub fn tseries(&self) -> &TimeSeries {
        &self.tseries
    }

    pub fn xseries(&self) -> &DataSeries {
        &self.xseries
    }
}

// ---------------------------------------------------------------------------
// SpectrumSeries – the reader's output
// ---------------------------------------------------------------------------

/// A time-resolved series of spectra.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSeries {
    pub name: String,
    pub class: SeriesClass,
    pub technique: String,
    /// Unix epoch seconds of the first spectrum.
    pub tstamp: f64,
    pub continuous: bool,
    field: Field,
}

impl SpectrumSeries {
    pub fn new(
        name: impl Into<String>,
        class: SeriesClass,
        technique: impl Into<String>,
        tstamp: f64,
        field: Field,
        continuous: bool,
    ) -> Self {
        Self {
            name: name.into(),
            class,
            technique: technique.into(),
            tstamp,
            continuous,
            field,
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Time axis.
    pub fn tseries(&self) -> &TimeSeries {
        self.field.tseries()
    }

    /// Wavelength axis.
    pub fn xseries(&self) -> &DataSeries {
        self.field.xseries()
    }

    /// Number of spectra.
    pub fn len(&self) -> usize {
        self.field.shape().0
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wavelengths (x) and intensities (y) of the `i`-th spectrum.
    pub fn spectrum(&self, i: usize) -> Option<(&[f64], &[f64])> {
        self.field.row(i).map(|y| (self.xseries().data.as_slice(), y))
    }
}
