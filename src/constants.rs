//! Numeric constants for the RayDec pipeline

/// Longest period considered, in seconds. The lowest analysed frequency
/// is never below `1 / MAX_PERIOD_SECS`.
pub const MAX_PERIOD_SECS: f64 = 30.0;

/// Maximum passband ripple of the per-frequency bandpass, in dB.
pub const PASSBAND_RIPPLE_DB: f64 = 1.0;

/// Minimum stopband attenuation of the per-frequency bandpass, in dB.
pub const STOPBAND_ATTENUATION_DB: f64 = 5.0;

/// Fraction of the clipped band used to place the passband and stopband
/// edges inside and outside the band limits.
pub const BAND_EDGE_FRACTION: f64 = 0.1;

/// Highest Chebyshev prototype order the designer accepts.
pub const MAX_FILTER_ORDER: usize = 16;

/// Taper ramps span one hundredth of the window.
pub const TAPER_DIVISOR: usize = 100;

/// Tolerance on the lower correlation bound of -1. Correlations that
/// undershoot -1 by less than this are rounding noise and are clamped.
pub const CORRELATION_TOLERANCE: f64 = 1e-9;

/// Relative deviation of any sample interval from the first one before a
/// record is rejected as non-uniformly spaced.
pub const TIME_SPACING_TOLERANCE: f64 = 1e-3;
