use super::model::ShapeError;

/// Errors that can occur while reading an OceanView export.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No `Date:` line in the scanned header window
    #[error("no 'Date:' line found in the first {scanned} lines")]
    MissingHeaderDate { scanned: usize },

    /// The header date matched none of the known layouts
    #[error("could not parse header date: {raw:?}")]
    HeaderDate { raw: String },

    /// No "Begin Spectral Data" marker followed by a numeric line
    #[error("no spectral data section found")]
    NoSpectralData,

    /// The wavelength row after the marker held no values
    #[error("wavelength row on line {line} is empty")]
    EmptyWavelengthAxis { line: usize },

    /// A wavelength or intensity token is not a number
    #[error("line {line}: '{token}' is not a number")]
    InvalidNumber { line: usize, token: String },

    /// Data section has a wavelength axis but no spectra
    #[error("spectral data section has no data rows")]
    NoDataRows,

    /// Rows could not be stacked onto the axes
    #[error("inconsistent spectral data: {0}")]
    Shape(#[from] ShapeError),

    /// Reader configuration could not be parsed
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReadError>;
