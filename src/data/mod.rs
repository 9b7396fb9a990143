/// Data layer: output types, timestamp grammars, and the export reader.
///
/// Architecture:
/// ```text
///  OceanView "Data from ... Node" .txt export
///        │
///        ▼
///   ┌──────────┐   ┌───────────┐
///   │  loader   │──▶│ timestamp  │  header date, row times, filename ms
///   └──────────┘   └───────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ SpectrumSeries  │  time axis × wavelength axis → intensity field
///   └────────────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod timestamp;
