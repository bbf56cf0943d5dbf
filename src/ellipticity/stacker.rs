use super::cycle_analyzer::CycleRecord;
use crate::signal_processing::sum_of_squares;

/// Correlation-weighted stack of vertical and projected horizontal cycles
///
/// Each accepted cycle adds `corr² · snippet` to the running sums, so
/// cycles with weak retrograde polarization contribute little.
#[derive(Debug, Clone)]
pub struct Stacker {
    vertical: Vec<f64>,
    horizontal: Vec<f64>,
    klimit: usize,
    cycles: usize,
}

impl Stacker {
    /// `snippet_len` is the cycle length `wl`; only the first `klimit`
    /// stacked samples enter the amplitudes.
    pub fn new(snippet_len: usize, klimit: usize) -> Self {
        Self {
            vertical: vec![0.0; snippet_len],
            horizontal: vec![0.0; snippet_len],
            klimit,
            cycles: 0,
        }
    }

    pub fn accumulate(&mut self, cycle: &CycleRecord<'_>) {
        let weight = cycle.correlation * cycle.correlation;
        for (sum, &v) in self.vertical.iter_mut().zip(cycle.vertical) {
            *sum += weight * v;
        }
        for (sum, &h) in self.horizontal.iter_mut().zip(cycle.horizontal) {
            *sum += weight * h;
        }
        self.cycles += 1;
    }

    /// Number of cycles stacked so far
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn vertical_sum(&self) -> &[f64] {
        &self.vertical
    }

    pub fn horizontal_sum(&self) -> &[f64] {
        &self.horizontal
    }

    /// Root-sum-square amplitudes of the truncated stacks
    pub fn amplitudes(&self) -> StackedAmplitudes {
        let k = self.klimit.min(self.vertical.len());
        StackedAmplitudes {
            vertical: sum_of_squares(&self.vertical[..k]).sqrt(),
            horizontal: sum_of_squares(&self.horizontal[..k]).sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedAmplitudes {
    pub vertical: f64,
    pub horizontal: f64,
}

impl StackedAmplitudes {
    /// Horizontal over vertical amplitude.
    ///
    /// An empty stack gives NaN (0/0) and a vanishing vertical stack gives
    /// infinity; neither is replaced.
    pub fn ellipticity(&self) -> f64 {
        self.horizontal / self.vertical
    }
}
