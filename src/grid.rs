//! Run parameters derived from the record and the logarithmic frequency grid.

use crate::config::RaydecConfig;
use crate::constants::MAX_PERIOD_SECS;
use crate::error::{RaydecError, Result};
use crate::record::Record;

/// Immutable parameters shared by every stage of a run
///
/// Built once from a validated [`RaydecConfig`] and the record's sample
/// interval and length, then passed by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisContext {
    /// Sample interval in seconds
    pub tau: f64,
    /// Nyquist frequency `1 / (2 tau)`
    pub fnyq: f64,
    /// Lowest analysed frequency, `max(fmin, 1/30)`
    pub fstart: f64,
    /// Highest analysed frequency, `min(fmax, fnyq)`
    pub fend: f64,
    pub fsteps: usize,
    pub cycles: usize,
    pub dfpar: f64,
    pub nwind: usize,
    /// Samples per window, `floor(len / nwind)`
    pub window_len: usize,
}

impl AnalysisContext {
    pub fn new(config: &RaydecConfig, record: &Record) -> Result<Self> {
        let window_len = record.window_len(config.nwind)?;
        Self::from_parts(config, record.sample_interval(), window_len)
    }

    /// Derive the run parameters from a sample interval and window length
    pub fn from_parts(config: &RaydecConfig, tau: f64, window_len: usize) -> Result<Self> {
        config.validate()?;
        if !(tau.is_finite() && tau > 0.0) {
            return Err(RaydecError::InvalidInputShape(format!(
                "sample interval must be positive, got {}",
                tau
            )));
        }

        let fnyq = 1.0 / (2.0 * tau);
        let fstart = config.fmin.max(1.0 / MAX_PERIOD_SECS);
        let fend = config.fmax.min(fnyq);
        if fend <= fstart {
            return Err(RaydecError::InvalidFrequencyRange(format!(
                "clipped range is empty: fstart {:.6} Hz >= fend {:.6} Hz (Nyquist {:.6} Hz)",
                fstart, fend, fnyq
            )));
        }

        Ok(Self {
            tau,
            fnyq,
            fstart,
            fend,
            fsteps: config.fsteps,
            cycles: config.cycles,
            dfpar: config.dfpar,
            nwind: config.nwind,
            window_len,
        })
    }

    /// Geometric frequency grid from `fstart` to `fend`
    pub fn frequency_grid(&self) -> FrequencyGrid {
        FrequencyGrid::logarithmic(self.fstart, self.fend, self.fsteps)
    }

    /// Stacked duration `DT = cycles / f` in seconds
    pub fn stack_duration(&self, frequency: f64) -> f64 {
        self.cycles as f64 / frequency
    }

    /// Snippet length `wl = round(DT / tau)` in samples
    pub fn snippet_len(&self, frequency: f64) -> usize {
        (self.stack_duration(frequency) / self.tau).round() as usize
    }

    /// A quarter period at `frequency`, in samples (fractional)
    pub fn quarter_period(&self, frequency: f64) -> f64 {
        1.0 / (4.0 * frequency * self.tau)
    }
}

/// Strictly increasing, logarithmically spaced target frequencies
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    frequencies: Vec<f64>,
}

impl FrequencyGrid {
    /// `f[k] = fstart * r^k` with `r = (fend / fstart)^(1 / (steps - 1))`.
    ///
    /// The last point is pinned to `fend` so rounding never pushes it past
    /// the Nyquist clip.
    pub fn logarithmic(fstart: f64, fend: f64, steps: usize) -> Self {
        let ratio = (fend / fstart).powf(1.0 / (steps as f64 - 1.0));
        let frequencies = (0..steps)
            .map(|k| (fstart * ratio.powi(k as i32)).min(fend))
            .collect();
        Self { frequencies }
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Index of the grid point closest to `frequency` on a log scale
    pub fn nearest_index(&self, frequency: f64) -> Option<usize> {
        let target = frequency.ln();
        self.frequencies
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.ln() - target)
                    .abs()
                    .total_cmp(&(b.ln() - target).abs())
            })
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(fmin: f64, fmax: f64, fsteps: usize) -> RaydecConfig {
        RaydecConfig {
            fmin,
            fmax,
            fsteps,
            ..Default::default()
        }
    }

    #[test]
    fn test_grid_strictly_increasing_with_endpoints() {
        let ctx = AnalysisContext::from_parts(&config(0.2, 20.0, 40), 0.01, 1000).unwrap();
        let grid = ctx.frequency_grid();
        assert_eq!(grid.len(), 40);
        assert!(grid.frequencies().windows(2).all(|w| w[1] > w[0]));
        assert!((grid.frequencies()[0] - 0.2).abs() < 1e-12);
        assert!((grid.frequencies()[39] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_is_geometric() {
        let grid = FrequencyGrid::logarithmic(1.0, 16.0, 5);
        let expected = [1.0, 2.0, 4.0, 8.0, 16.0];
        for (f, e) in grid.frequencies().iter().zip(expected) {
            assert!((f - e).abs() < 1e-12, "{} vs {}", f, e);
        }
    }

    #[test]
    fn test_fmin_clipped_to_longest_period() {
        let ctx = AnalysisContext::from_parts(&config(0.001, 5.0, 10), 0.01, 1000).unwrap();
        assert!((ctx.fstart - 1.0 / 30.0).abs() < 1e-15);
    }

    #[test]
    fn test_fmax_clipped_to_nyquist() {
        let ctx = AnalysisContext::from_parts(&config(1.0, 500.0, 10), 0.01, 1000).unwrap();
        assert!((ctx.fnyq - 50.0).abs() < 1e-12);
        assert!((ctx.fend - 50.0).abs() < 1e-12);
        let grid = ctx.frequency_grid();
        assert!(grid.frequencies().iter().all(|&f| f <= ctx.fnyq));
    }

    #[test]
    fn test_empty_clipped_range_fails_fast() {
        // Nyquist at 0.5 Hz lies below fmin.
        let err = AnalysisContext::from_parts(&config(2.0, 10.0, 10), 1.0, 1000).unwrap_err();
        assert!(matches!(err, RaydecError::InvalidFrequencyRange(_)));
    }

    #[test]
    fn test_snippet_and_quarter_period() {
        let ctx = AnalysisContext::from_parts(&config(0.5, 5.0, 10), 0.01, 1000).unwrap();
        assert_eq!(ctx.snippet_len(1.0), 1000);
        assert_eq!(ctx.snippet_len(2.0), 500);
        assert!((ctx.quarter_period(1.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_index() {
        let grid = FrequencyGrid::logarithmic(1.0, 16.0, 5);
        assert_eq!(grid.nearest_index(3.9), Some(2));
        assert_eq!(grid.nearest_index(100.0), Some(4));
    }
}
