//! Output tables indexed by (frequency step, window).

use serde::Serialize;

/// Dense row-major table, one row per frequency step and one column per
/// window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<T> {
    rows: usize,
    cols: usize,
    values: Vec<T>,
}

impl<T: Copy> Table<T> {
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            values: vec![value; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.values[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.values[row * self.cols + col] = value;
    }

    /// All windows at frequency step `row`
    pub fn row(&self, row: usize) -> &[T] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    /// All frequency steps of window `col`
    pub fn column(&self, col: usize) -> Vec<T> {
        (0..self.rows).map(|row| self.get(row, col)).collect()
    }
}

/// Result of one cell of the analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellEstimate {
    pub frequency: f64,
    pub ellipticity: f64,
    pub vertical_amplitude: f64,
    pub horizontal_amplitude: f64,
    pub accepted_cycles: usize,
}

/// Ellipticity estimates of a run
///
/// `frequencies` and `ellipticity` are the two primary tables; amplitudes
/// and cycle counts are kept per cell for diagnostics. Cells without a
/// usable stack hold non-finite ellipticities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EllipticityCurve {
    pub frequencies: Table<f64>,
    pub ellipticity: Table<f64>,
    pub vertical_amplitude: Table<f64>,
    pub horizontal_amplitude: Table<f64>,
    pub accepted_cycles: Table<usize>,
}

impl EllipticityCurve {
    pub fn new(fsteps: usize, nwind: usize) -> Self {
        Self {
            frequencies: Table::filled(fsteps, nwind, f64::NAN),
            ellipticity: Table::filled(fsteps, nwind, f64::NAN),
            vertical_amplitude: Table::filled(fsteps, nwind, f64::NAN),
            horizontal_amplitude: Table::filled(fsteps, nwind, f64::NAN),
            accepted_cycles: Table::filled(fsteps, nwind, 0),
        }
    }

    pub fn fsteps(&self) -> usize {
        self.frequencies.rows()
    }

    pub fn nwind(&self) -> usize {
        self.frequencies.cols()
    }

    /// Store the estimates of window `window`, one per frequency step
    pub fn set_window(&mut self, window: usize, cells: &[CellEstimate]) {
        for (step, cell) in cells.iter().enumerate() {
            self.frequencies.set(step, window, cell.frequency);
            self.ellipticity.set(step, window, cell.ellipticity);
            self.vertical_amplitude
                .set(step, window, cell.vertical_amplitude);
            self.horizontal_amplitude
                .set(step, window, cell.horizontal_amplitude);
            self.accepted_cycles.set(step, window, cell.accepted_cycles);
        }
    }

    pub fn cell(&self, step: usize, window: usize) -> CellEstimate {
        CellEstimate {
            frequency: self.frequencies.get(step, window),
            ellipticity: self.ellipticity.get(step, window),
            vertical_amplitude: self.vertical_amplitude.get(step, window),
            horizontal_amplitude: self.horizontal_amplitude.get(step, window),
            accepted_cycles: self.accepted_cycles.get(step, window),
        }
    }

    /// A cell is valid when its ellipticity is finite
    pub fn is_valid(&self, step: usize, window: usize) -> bool {
        self.ellipticity.get(step, window).is_finite()
    }

    /// `(step, window)` of every cell with a non-finite ellipticity
    pub fn invalid_cells(&self) -> Vec<(usize, usize)> {
        (0..self.fsteps())
            .flat_map(|step| (0..self.nwind()).map(move |window| (step, window)))
            .filter(|&(step, window)| !self.is_valid(step, window))
            .collect()
    }

    /// Mean ellipticity per frequency step over the valid windows, NaN
    /// where no window is valid
    pub fn mean_ellipticity(&self) -> Vec<f64> {
        (0..self.fsteps())
            .map(|step| {
                let finite: Vec<f64> = self
                    .ellipticity
                    .row(step)
                    .iter()
                    .copied()
                    .filter(|e| e.is_finite())
                    .collect();
                if finite.is_empty() {
                    f64::NAN
                } else {
                    finite.iter().sum::<f64>() / finite.len() as f64
                }
            })
            .collect()
    }
}
