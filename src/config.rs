//! Configuration for a RayDec run.
//!
//! Parameters can be built in code or loaded from TOML:
//!
//! ```toml
//! fmin = 0.2
//! fmax = 20.0
//! fsteps = 50
//! cycles = 10
//! dfpar = 0.1
//! nwind = 6
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RaydecError, Result};

/// Parameters of a single-station RayDec analysis
///
/// # Example
/// ```
/// use raydec::config::RaydecConfig;
///
/// let mut config = RaydecConfig::default();
/// config.fmin = 0.5;
/// config.fmax = 15.0;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaydecConfig {
    /// Lowest requested frequency in Hz (clipped to 1/30 Hz from below)
    pub fmin: f64,
    /// Highest requested frequency in Hz (clipped to Nyquist from above)
    pub fmax: f64,
    /// Number of logarithmically spaced frequencies
    pub fsteps: usize,
    /// Number of periods stacked per cycle snippet (10 recommended)
    pub cycles: usize,
    /// Relative bandwidth of the per-frequency bandpass (0.1 recommended)
    pub dfpar: f64,
    /// Number of equal-length time windows the record is cut into
    pub nwind: usize,
    /// Worker threads for window processing. `None` uses the available
    /// parallelism, `Some(1)` processes windows inline.
    pub workers: Option<usize>,
}

impl Default for RaydecConfig {
    fn default() -> Self {
        Self {
            fmin: 0.1,
            fmax: 10.0,
            fsteps: 100,
            cycles: 10,
            dfpar: 0.1,
            nwind: 1,
            workers: None,
        }
    }
}

impl RaydecConfig {
    /// Parse a configuration from TOML text. Missing keys take their
    /// default values. The result is validated before it is returned.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check the boundary rules on every parameter.
    ///
    /// Nyquist clipping is checked later, once the record's sample
    /// interval is known.
    pub fn validate(&self) -> Result<()> {
        if !(self.fmin.is_finite() && self.fmin > 0.0) {
            return Err(RaydecError::InvalidFrequencyRange(format!(
                "fmin must be positive, got {}",
                self.fmin
            )));
        }
        if !self.fmax.is_finite() || self.fmax <= self.fmin {
            return Err(RaydecError::InvalidFrequencyRange(format!(
                "fmax ({}) must exceed fmin ({})",
                self.fmax, self.fmin
            )));
        }
        if self.fsteps < 2 {
            return Err(RaydecError::Config(format!(
                "fsteps must be at least 2, got {}",
                self.fsteps
            )));
        }
        if self.cycles == 0 {
            return Err(RaydecError::Config("cycles must be positive".to_string()));
        }
        if !(self.dfpar.is_finite() && self.dfpar > 0.0) {
            return Err(RaydecError::Config(format!(
                "dfpar must be positive, got {}",
                self.dfpar
            )));
        }
        if self.nwind == 0 {
            return Err(RaydecError::Config("nwind must be at least 1".to_string()));
        }
        if self.workers == Some(0) {
            return Err(RaydecError::Config(
                "workers must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of worker threads to use for `windows` windows
    pub fn worker_count(&self, windows: usize) -> usize {
        let available = self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        available.clamp(1, windows.max(1))
    }
}
