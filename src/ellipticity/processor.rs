use crossbeam_channel::unbounded;

use super::cycle_analyzer::CycleAnalyzer;
use super::stacker::Stacker;
use crate::config::RaydecConfig;
use crate::curve::{CellEstimate, EllipticityCurve};
use crate::error::{RaydecError, Result};
use crate::grid::{AnalysisContext, FrequencyGrid};
use crate::record::Record;
use crate::signal_processing::{BandpassFilter, TaperedWindow, design_bandpass};

/// Estimate the ellipticity curve of `record`
///
/// # Errors
/// Fails on an invalid configuration, or for the reasons listed on
/// [`RaydecProcessor::process`]
///
/// # Example
/// ```
/// use raydec::{RaydecConfig, Record, raydec};
///
/// let tau = 0.01;
/// let n = 6000;
/// let omega = 2.0 * std::f64::consts::PI * 2.0;
/// let vertical: Vec<f64> = (0..n).map(|i| (omega * i as f64 * tau).cos()).collect();
/// let north: Vec<f64> = (0..n).map(|i| 0.5 * (omega * i as f64 * tau).sin()).collect();
/// let east = vec![0.0; n];
/// let record = Record::from_sample_interval(vertical, north, east, tau).unwrap();
///
/// let config = RaydecConfig { fmin: 1.0, fmax: 4.0, fsteps: 3, ..Default::default() };
/// let curve = raydec(&record, &config).unwrap();
/// assert!((curve.ellipticity.get(1, 0) - 0.5).abs() < 0.05);
/// ```
pub fn raydec(record: &Record, config: &RaydecConfig) -> Result<EllipticityCurve> {
    RaydecProcessor::new(config.clone())?.process(record)
}

/// Runs the full pipeline over every window of a record
pub struct RaydecProcessor {
    config: RaydecConfig,
}

impl RaydecProcessor {
    /// # Errors
    /// Returns `RaydecError::Config` or `RaydecError::InvalidFrequencyRange`
    /// if `config` fails validation
    pub fn new(config: RaydecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RaydecConfig {
        &self.config
    }

    /// Process all windows.
    ///
    /// Every bandpass is designed before any window is touched, so an
    /// invalid configuration fails without partial output.
    ///
    /// # Errors
    /// * `RaydecError::InsufficientData` if the record is too short for the
    ///   requested number of windows
    /// * `RaydecError::InvalidFrequencyRange` if nothing of the requested
    ///   range survives clipping to `[1/30 Hz, Nyquist]`
    /// * `RaydecError::FilterDesign` if any grid frequency cannot be given
    ///   a stable bandpass
    /// * `RaydecError::Worker` if a worker thread fails to report its window
    pub fn process(&self, record: &Record) -> Result<EllipticityCurve> {
        let ctx = AnalysisContext::new(&self.config, record)?;
        let grid = ctx.frequency_grid();
        let filters = grid
            .frequencies()
            .iter()
            .map(|&f| design_bandpass(f, &ctx))
            .collect::<Result<Vec<_>>>()?;

        let workers = self.config.worker_count(ctx.nwind);
        log::info!(
            "RayDec: {} samples, {} windows of {} samples, {} frequencies {:.4}-{:.4} Hz, {} worker(s)",
            record.len(),
            ctx.nwind,
            ctx.window_len,
            ctx.fsteps,
            ctx.fstart,
            ctx.fend,
            workers
        );

        let mut curve = EllipticityCurve::new(ctx.fsteps, ctx.nwind);
        if workers <= 1 {
            for window in 0..ctx.nwind {
                let cells = analyze_window(record, window, &grid, &filters, &ctx);
                curve.set_window(window, &cells);
            }
            return Ok(curve);
        }

        let (job_tx, job_rx) = unbounded::<usize>();
        let (result_tx, result_rx) = unbounded::<(usize, Vec<CellEstimate>)>();
        for window in 0..ctx.nwind {
            job_tx
                .send(window)
                .map_err(|e| RaydecError::Worker(e.to_string()))?;
        }
        drop(job_tx);

        let (grid, filters, ctx_ref) = (&grid, &filters, &ctx);
        std::thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for window in job_rx.iter() {
                        let cells = analyze_window(record, window, grid, filters, ctx_ref);
                        if result_tx.send((window, cells)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        let mut completed = 0;
        for (window, cells) in result_rx.iter() {
            curve.set_window(window, &cells);
            completed += 1;
        }
        if completed != ctx.nwind {
            return Err(RaydecError::Worker(format!(
                "{} of {} windows completed",
                completed, ctx.nwind
            )));
        }
        Ok(curve)
    }
}

/// Detrend, taper and analyse one window at every grid frequency
pub fn analyze_window(
    record: &Record,
    window: usize,
    grid: &FrequencyGrid,
    filters: &[BandpassFilter],
    ctx: &AnalysisContext,
) -> Vec<CellEstimate> {
    let segment = record.window(window, ctx.window_len);
    let tapered = TaperedWindow::new(&segment);
    log::debug!(
        "Window {}: samples {}..{}, starting at {:.2}s",
        window,
        window * ctx.window_len,
        (window + 1) * ctx.window_len,
        segment.start_time
    );

    grid.frequencies()
        .iter()
        .zip(filters)
        .map(|(&frequency, filter)| {
            let cell = analyze_cell(&tapered, frequency, filter, ctx);
            if !cell.ellipticity.is_finite() {
                log::warn!(
                    "Window {}: no usable stack at {:.4} Hz ({} cycles)",
                    window,
                    frequency,
                    cell.accepted_cycles
                );
            }
            cell
        })
        .collect()
}

/// Filter, scan for cycles and stack one (window, frequency) cell
pub fn analyze_cell(
    tapered: &TaperedWindow,
    frequency: f64,
    filter: &BandpassFilter,
    ctx: &AnalysisContext,
) -> CellEstimate {
    let channels = tapered.filter(filter);
    let analyzer = CycleAnalyzer::new(frequency, ctx);
    let klimit = ctx.snippet_len(frequency);
    let mut stacker = Stacker::new(analyzer.snippet_len(), klimit);

    let counts = analyzer.for_each_cycle(&channels, |cycle| stacker.accumulate(cycle));
    let amplitudes = stacker.amplitudes();
    log::debug!(
        "{:.4} Hz: {} crossings, {} stacked, {} rejected",
        frequency,
        counts.crossings,
        counts.accepted,
        counts.rejected
    );

    CellEstimate {
        frequency,
        ellipticity: amplitudes.ellipticity(),
        vertical_amplitude: amplitudes.vertical,
        horizontal_amplitude: amplitudes.horizontal,
        accepted_cycles: counts.accepted,
    }
}
