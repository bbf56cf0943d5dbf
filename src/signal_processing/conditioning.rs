use super::filters::BandpassFilter;
use super::math::mean;
use crate::constants::TAPER_DIVISOR;
use crate::record::WindowSegment;

/// Remove the mean of a signal
pub fn detrend(signal: &[f64]) -> Vec<f64> {
    let offset = mean(signal);
    signal.iter().map(|x| x - offset).collect()
}

/// Trapezoidal edge taper of exactly `len` samples
///
/// A linear ramp from 0 to 1 over `ceil(len / 100)` samples, a plateau of
/// ones, and the mirrored ramp. Windows too short to hold two ramps of at
/// least two samples are left untapered.
pub fn taper(len: usize) -> Vec<f64> {
    let ramp_len = len.div_ceil(TAPER_DIVISOR).max(2).min(len / 2);
    if ramp_len < 2 {
        return vec![1.0; len];
    }

    let ramp: Vec<f64> = (0..ramp_len)
        .map(|i| i as f64 / (ramp_len - 1) as f64)
        .collect();
    let plateau = len - 2 * ramp_len;

    let mut window = Vec::with_capacity(len);
    window.extend_from_slice(&ramp);
    window.extend(std::iter::repeat_n(1.0, plateau));
    window.extend(ramp.iter().rev());
    window
}

/// Detrended and tapered channels of one window, ready for filtering
#[derive(Debug, Clone)]
pub struct TaperedWindow {
    pub vertical: Vec<f64>,
    pub north: Vec<f64>,
    pub east: Vec<f64>,
}

impl TaperedWindow {
    pub fn new(segment: &WindowSegment) -> Self {
        let window = taper(segment.len());
        let apply = |channel: &[f64]| -> Vec<f64> {
            channel.iter().zip(&window).map(|(x, w)| x * w).collect()
        };
        Self {
            vertical: apply(&segment.vertical),
            north: apply(&segment.north),
            east: apply(&segment.east),
        }
    }

    pub fn len(&self) -> usize {
        self.vertical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty()
    }

    /// Run the same bandpass over all three channels
    pub fn filter(&self, filter: &BandpassFilter) -> FilteredChannels {
        FilteredChannels {
            vertical: filter.apply(&self.vertical),
            north: filter.apply(&self.north),
            east: filter.apply(&self.east),
        }
    }
}

/// Bandpassed channels for one (window, frequency) cell
#[derive(Debug, Clone)]
pub struct FilteredChannels {
    pub vertical: Vec<f64>,
    pub north: Vec<f64>,
    pub east: Vec<f64>,
}

impl FilteredChannels {
    pub fn len(&self) -> usize {
        self.vertical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty()
    }
}
