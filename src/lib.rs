//! Rayleigh-wave ellipticity estimation from single-station
//! three-component records.
//!
//! The pipeline splits a record into windows, bandpasses each window
//! around every frequency of a logarithmic grid, locates vertical cycles
//! at upward zero crossings and stacks vertical and projected horizontal
//! motion weighted by their squared correlation. The ratio of stacked
//! amplitudes is the ellipticity estimate.

pub mod config;
pub mod constants;
pub mod curve;
pub mod ellipticity;
pub mod error;
pub mod grid;
pub mod output;
pub mod record;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::RaydecConfig;
pub use curve::{CellEstimate, EllipticityCurve};
pub use ellipticity::{RaydecProcessor, raydec};
pub use error::{RaydecError, Result};
pub use grid::{AnalysisContext, FrequencyGrid};
pub use record::Record;
