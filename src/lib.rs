//! Reader for Ocean Insight OceanView time-series text exports.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let series = oceanview_reader::load_file(Path::new("USB4F__0__13-42-52-946.txt"))?;
//! println!("{} spectra starting at {}", series.len(), series.tstamp);
//! # Ok::<(), oceanview_reader::ReadError>(())
//! ```

pub mod config;
pub mod data;

pub use config::ReaderConfig;
pub use data::error::{ReadError, Result};
pub use data::loader::{load_file, OceanViewReader, TECHNIQUE};
pub use data::model::{DataSeries, Field, SeriesClass, ShapeError, SpectrumSeries, TimeSeries};
pub use data::timestamp::HeaderDate;
