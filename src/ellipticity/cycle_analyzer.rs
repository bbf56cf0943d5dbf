use std::f64::consts::PI;

use crate::constants::CORRELATION_TOLERANCE;
use crate::grid::AnalysisContext;
use crate::signal_processing::{FilteredChannels, dot, signum, sum_of_squares, wrap_two_pi};

/// One accepted cycle, borrowed for the duration of a visit
#[derive(Debug, Clone, Copy)]
pub struct CycleRecord<'a> {
    /// Sample index of the first positive vertical sample after the crossing
    pub index: usize,
    /// Propagation azimuth in [0, 2pi), measured from north towards east
    pub azimuth: f64,
    /// Normalised vertical/horizontal cross-correlation, in [-1, 0]
    pub correlation: f64,
    pub vertical: &'a [f64],
    pub horizontal: &'a [f64],
}

/// Tally of one scan over a filtered window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleCounts {
    /// Negative-to-positive crossings inside the scan range
    pub crossings: usize,
    pub accepted: usize,
    /// Crossings dropped because the correlation was not a number
    /// (zero-energy snippets) or fell below -1
    pub rejected: usize,
}

/// Locates cycles on the filtered vertical channel and estimates the
/// polarization of each one
///
/// Horizontal snippets start a quarter period before the vertical
/// snippet, compensating the 90° phase lag of Rayleigh-wave motion.
#[derive(Debug, Clone)]
pub struct CycleAnalyzer {
    frequency: f64,
    snippet_len: usize,
    first_index: usize,
    phase_shift: usize,
}

impl CycleAnalyzer {
    pub fn new(frequency: f64, ctx: &AnalysisContext) -> Self {
        let quarter = ctx.quarter_period(frequency);
        Self {
            frequency,
            snippet_len: ctx.snippet_len(frequency).max(1),
            first_index: (quarter.ceil() as usize).max(1),
            phase_shift: quarter.floor() as usize,
        }
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Snippet length `wl` in samples
    pub fn snippet_len(&self) -> usize {
        self.snippet_len
    }

    /// Visit every accepted cycle in `channels`.
    ///
    /// The horizontal projection buffer is allocated once per call and
    /// reused for every cycle.
    pub fn for_each_cycle<F>(&self, channels: &FilteredChannels, mut visit: F) -> CycleCounts
    where
        F: FnMut(&CycleRecord<'_>),
    {
        let wl = self.snippet_len;
        let vertical = &channels.vertical;
        let end = channels.len().saturating_sub(wl);
        let mut horizontal = vec![0.0; wl];
        let mut counts = CycleCounts::default();

        for index in self.first_index..end {
            if signum(vertical[index]) - signum(vertical[index - 1]) != 2 {
                continue;
            }
            counts.crossings += 1;

            let h_start = index - self.phase_shift;
            let vsig = &vertical[index..index + wl];
            let esig = &channels.east[h_start..h_start + wl];
            let nsig = &channels.north[h_start..h_start + wl];

            let theta = azimuth(vsig, nsig, esig);
            project(theta, nsig, esig, &mut horizontal);

            let corr = correlation(vsig, &horizontal);
            if !(corr >= -1.0 - CORRELATION_TOLERANCE) {
                counts.rejected += 1;
                continue;
            }
            counts.accepted += 1;

            visit(&CycleRecord {
                index,
                azimuth: theta,
                correlation: corr.max(-1.0),
                vertical: vsig,
                horizontal: &horizontal,
            });
        }

        counts
    }
}

/// Azimuth of the horizontal motion that best matches `vertical`, turned
/// by pi under the retrograde assumption and reduced to [0, 2pi).
///
/// A vanishing north integral gives the limiting azimuth of ±pi/2 rather
/// than a division by zero.
pub fn azimuth(vertical: &[f64], north: &[f64], east: &[f64]) -> f64 {
    let integral_east = dot(vertical, east);
    let integral_north = dot(vertical, north);
    wrap_two_pi(integral_east.atan2(integral_north) + PI)
}

/// Horizontal motion projected onto `theta`
pub fn project(theta: f64, north: &[f64], east: &[f64], out: &mut [f64]) {
    let (sin, cos) = theta.sin_cos();
    for ((h, &e), &n) in out.iter_mut().zip(east).zip(north) {
        *h = sin * e + cos * n;
    }
}

/// Normalised cross-correlation; NaN when either snippet has no energy
pub fn correlation(vertical: &[f64], horizontal: &[f64]) -> f64 {
    let energy = sum_of_squares(vertical) * sum_of_squares(horizontal);
    if energy <= 0.0 {
        return f64::NAN;
    }
    dot(vertical, horizontal) / energy.sqrt()
}
