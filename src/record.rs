//! Three-component seismic records and their time windows.

use crate::constants::TIME_SPACING_TOLERANCE;
use crate::error::{RaydecError, Result};
use crate::signal_processing::detrend;

/// A fully buffered single-station record
///
/// Vertical, north and east ground motion sampled on a common, uniformly
/// spaced time base.
#[derive(Debug, Clone)]
pub struct Record {
    vertical: Vec<f64>,
    north: Vec<f64>,
    east: Vec<f64>,
    time: Vec<f64>,
}

impl Record {
    /// Build a record from three channels and their common time base
    ///
    /// The sample interval is `time[1] - time[0]`; every other interval must
    /// match it to within a relative tolerance.
    ///
    /// # Errors
    /// * `RaydecError::LengthMismatch` if the four sequences differ in length
    /// * `RaydecError::InsufficientData` for fewer than two samples
    /// * `RaydecError::NonMonotonicTime` if the time base does not strictly
    ///   increase
    /// * `RaydecError::InvalidInputShape` if the time base is not uniformly
    ///   spaced
    pub fn new(vertical: Vec<f64>, north: Vec<f64>, east: Vec<f64>, time: Vec<f64>) -> Result<Self> {
        let len = vertical.len();
        if north.len() != len || east.len() != len || time.len() != len {
            return Err(RaydecError::LengthMismatch {
                vertical: len,
                north: north.len(),
                east: east.len(),
                time: time.len(),
            });
        }
        if len < 2 {
            return Err(RaydecError::InsufficientData {
                needed: 2,
                available: len,
            });
        }
        if let Some(index) = time
            .windows(2)
            .position(|pair| !(pair[1] > pair[0]) || !pair[1].is_finite())
        {
            return Err(RaydecError::NonMonotonicTime { index: index + 1 });
        }

        let tau = time[1] - time[0];
        if let Some(index) = time
            .windows(2)
            .position(|pair| ((pair[1] - pair[0]) - tau).abs() > TIME_SPACING_TOLERANCE * tau)
        {
            return Err(RaydecError::InvalidInputShape(format!(
                "time base is not uniformly spaced: interval {} at index {} differs from {}",
                time[index + 1] - time[index],
                index + 1,
                tau
            )));
        }

        let record = Self {
            vertical,
            north,
            east,
            time,
        };
        Ok(record)
    }

    /// Build a record from a sample interval, with time starting at zero
    ///
    /// # Errors
    /// Returns `RaydecError::InvalidInputShape` for a non-positive sample
    /// interval, otherwise the errors of [`Record::new`]
    pub fn from_sample_interval(
        vertical: Vec<f64>,
        north: Vec<f64>,
        east: Vec<f64>,
        sample_interval: f64,
    ) -> Result<Self> {
        if !(sample_interval.is_finite() && sample_interval > 0.0) {
            return Err(RaydecError::InvalidInputShape(format!(
                "sample interval must be positive, got {}",
                sample_interval
            )));
        }
        let time = (0..vertical.len())
            .map(|i| i as f64 * sample_interval)
            .collect();
        Self::new(vertical, north, east, time)
    }

    pub fn len(&self) -> usize {
        self.vertical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty()
    }

    /// Sample spacing `tau = time[1] - time[0]`
    pub fn sample_interval(&self) -> f64 {
        self.time[1] - self.time[0]
    }

    pub fn vertical(&self) -> &[f64] {
        &self.vertical
    }

    pub fn north(&self) -> &[f64] {
        &self.north
    }

    pub fn east(&self) -> &[f64] {
        &self.east
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Length of each of `nwind` windows, `floor(len / nwind)`.
    ///
    /// Fails if the windows would be shorter than two samples.
    pub fn window_len(&self, nwind: usize) -> Result<usize> {
        if nwind == 0 {
            return Err(RaydecError::InvalidInputShape(
                "number of windows must be at least 1".to_string(),
            ));
        }
        let window_len = self.len() / nwind;
        if window_len < 2 {
            return Err(RaydecError::InsufficientData {
                needed: 2 * nwind,
                available: self.len(),
            });
        }
        Ok(window_len)
    }

    /// Cut out window `index` of length `window_len` and remove its mean
    pub fn window(&self, index: usize, window_len: usize) -> WindowSegment {
        let start = index * window_len;
        let range = start..start + window_len;
        WindowSegment {
            index,
            start_time: self.time[start],
            vertical: detrend(&self.vertical[range.clone()]),
            north: detrend(&self.north[range.clone()]),
            east: detrend(&self.east[range]),
        }
    }
}

/// One detrended time window of a record
#[derive(Debug, Clone)]
pub struct WindowSegment {
    pub index: usize,
    pub start_time: f64,
    pub vertical: Vec<f64>,
    pub north: Vec<f64>,
    pub east: Vec<f64>,
}

impl WindowSegment {
    pub fn len(&self) -> usize {
        self.vertical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty()
    }
}
