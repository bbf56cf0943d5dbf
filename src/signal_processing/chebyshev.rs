//! Chebyshev Type I bandpass design
//!
//! Order selection follows the classic minimum-order formula on
//! pre-warped band edges. The design maps the analog lowpass prototype to
//! a bandpass and applies the bilinear transform. The digital zeros sit at
//! `z = +1` and `z = -1`, `N` of each; pairing into second-order sections
//! is left to `iir_filters`.

use num_complex::Complex64;
use std::f64::consts::PI;

use super::filters::BandpassFilter;
use crate::constants::{
    BAND_EDGE_FRACTION, MAX_FILTER_ORDER, PASSBAND_RIPPLE_DB, STOPBAND_ATTENUATION_DB,
};
use crate::error::{RaydecError, Result};
use crate::grid::AnalysisContext;

/// Band limits for one target frequency, all in Hz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandpassSpec {
    pub frequency: f64,
    /// Clipped band `[max(fstart, f - df/2), min(fnyq, f + df/2)]`
    pub band: (f64, f64),
    /// Band narrowed by 10% of its width on each side
    pub passband: (f64, f64),
    /// Band widened by 10% of its width on each side, kept inside `(0, fnyq)`
    pub stopband: (f64, f64),
    pub fnyq: f64,
}

impl BandpassSpec {
    /// Derive the band edges for `frequency`.
    ///
    /// A stopband edge that would reach 0 Hz or Nyquist is pulled back to
    /// the midpoint between the passband edge and that limit. A band that
    /// collapses to zero width after clipping is a design failure.
    pub fn for_frequency(frequency: f64, ctx: &AnalysisContext) -> Result<Self> {
        let df = ctx.dfpar * frequency;
        let low = ctx.fstart.max(frequency - df / 2.0);
        let high = ctx.fnyq.min(frequency + df / 2.0);
        let width = high - low;
        if !(width.is_finite() && width > 0.0) {
            return Err(RaydecError::FilterDesign {
                frequency,
                reason: format!("band collapsed after clipping: [{}, {}] Hz", low, high),
            });
        }

        let margin = width * BAND_EDGE_FRACTION;
        let passband = (low + margin, high - margin);

        let mut stop_low = low - margin;
        if stop_low <= 0.0 {
            stop_low = passband.0 / 2.0;
        }
        let mut stop_high = high + margin;
        if stop_high >= ctx.fnyq {
            stop_high = (passband.1 + ctx.fnyq) / 2.0;
        }

        Ok(Self {
            frequency,
            band: (low, high),
            passband,
            stopband: (stop_low, stop_high),
            fnyq: ctx.fnyq,
        })
    }

    /// Passband edges normalised to Nyquist
    pub fn normalized_passband(&self) -> (f64, f64) {
        (self.passband.0 / self.fnyq, self.passband.1 / self.fnyq)
    }

    /// Stopband edges normalised to Nyquist
    pub fn normalized_stopband(&self) -> (f64, f64) {
        (self.stopband.0 / self.fnyq, self.stopband.1 / self.fnyq)
    }
}

/// Minimum Chebyshev Type I order meeting the ripple and attenuation
/// targets at the given band edges.
pub fn chebyshev1_order(spec: &BandpassSpec, ripple_db: f64, attenuation_db: f64) -> Result<usize> {
    let (wp_low, wp_high) = spec.normalized_passband();
    let (ws_low, ws_high) = spec.normalized_stopband();
    let passb = [prewarp(wp_low), prewarp(wp_high)];
    let stopb = [prewarp(ws_low), prewarp(ws_high)];

    let nat = stopb
        .iter()
        .map(|&s| ((s * s - passb[0] * passb[1]) / (s * (passb[0] - passb[1]))).abs())
        .fold(f64::INFINITY, f64::min);
    if !(nat.is_finite() && nat > 1.0) {
        return Err(RaydecError::FilterDesign {
            frequency: spec.frequency,
            reason: format!("stopband does not enclose passband (selectivity {})", nat),
        });
    }

    let gstop = 10.0_f64.powf(0.1 * attenuation_db.abs());
    let gpass = 10.0_f64.powf(0.1 * ripple_db.abs());
    let v_pass_stop = ((gstop - 1.0) / (gpass - 1.0)).sqrt().acosh();
    let order = (v_pass_stop / nat.acosh()).ceil();

    if !(order.is_finite() && order >= 1.0) || order as usize > MAX_FILTER_ORDER {
        return Err(RaydecError::FilterDesign {
            frequency: spec.frequency,
            reason: format!("required order {} outside 1..={}", order, MAX_FILTER_ORDER),
        });
    }
    Ok(order as usize)
}

/// Design the bandpass for one target frequency
///
/// # Arguments
/// * `frequency` - Target frequency in Hz
/// * `ctx` - Run parameters (Nyquist, `fstart`, relative bandwidth)
///
/// # Errors
/// Returns `RaydecError::FilterDesign` if the band collapses after
/// clipping, the required order exceeds the supported maximum, or the
/// designed filter is unstable
pub fn design_bandpass(frequency: f64, ctx: &AnalysisContext) -> Result<BandpassFilter> {
    let spec = BandpassSpec::for_frequency(frequency, ctx)?;
    let order = chebyshev1_order(&spec, PASSBAND_RIPPLE_DB, STOPBAND_ATTENUATION_DB)?;
    let filter = chebyshev1_bandpass(order, PASSBAND_RIPPLE_DB, spec.normalized_passband())
        .map_err(|reason| RaydecError::FilterDesign { frequency, reason })?;

    log::debug!(
        "Bandpass for {:.4} Hz: passband {:.4}-{:.4} Hz, stopband {:.4}-{:.4} Hz, order {}",
        frequency,
        spec.passband.0,
        spec.passband.1,
        spec.stopband.0,
        spec.stopband.1,
        order
    );
    Ok(filter)
}

/// Chebyshev Type I bandpass with edges `wn` normalised to Nyquist.
///
/// # Arguments
/// * `order` - Prototype order `N`; the bandpass has `2N` poles
/// * `ripple_db` - Maximum passband ripple in dB
/// * `wn` - Passband edges as fractions of Nyquist
///
/// # Errors
/// Returns a description of the failure if the order is zero, the edges
/// are not `0 < low < high < 1`, pole pairing fails, or the result is
/// unstable
pub fn chebyshev1_bandpass(
    order: usize,
    ripple_db: f64,
    wn: (f64, f64),
) -> std::result::Result<BandpassFilter, String> {
    if order == 0 {
        return Err("order must be positive".to_string());
    }
    if !(0.0 < wn.0 && wn.0 < wn.1 && wn.1 < 1.0) {
        return Err(format!("edges must satisfy 0 < low < high < 1, got {:?}", wn));
    }

    let (prototype, prototype_gain) = chebyshev1_prototype(order, ripple_db);

    // Analog bandpass at the pre-warped edges (bilinear transform with fs = 2).
    let low = 4.0 * prewarp(wn.0);
    let high = 4.0 * prewarp(wn.1);
    let bw = high - low;
    let wo2 = low * high;

    let mut analog_poles = Vec::with_capacity(2 * order);
    for &p in &prototype {
        let p_lp = p * (bw / 2.0);
        let root = (p_lp * p_lp - wo2).sqrt();
        analog_poles.push(p_lp + root);
        analog_poles.push(p_lp - root);
    }
    let analog_gain = prototype_gain * bw.powi(order as i32);

    // Bilinear transform: N analog zeros at s = 0 map to z = 1; the
    // remaining N zeros land at z = -1.
    let fs2: f64 = 4.0;
    let denominator = analog_poles
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (fs2 - p));
    let gain = analog_gain * (Complex64::new(fs2.powi(order as i32), 0.0) / denominator).re;
    let digital_poles: Vec<Complex64> = analog_poles
        .iter()
        .map(|&p| (fs2 + p) / (fs2 - p))
        .collect();

    let one = Complex64::new(1.0, 0.0);
    let mut digital_zeros = vec![one; order];
    digital_zeros.extend(std::iter::repeat_n(-one, order));

    let filter = BandpassFilter::from_zpk(digital_zeros, digital_poles, gain, order)?;
    if !filter.is_stable() {
        return Err("designed filter is unstable".to_string());
    }
    Ok(filter)
}

/// Analog lowpass prototype poles and gain, unit passband edge
fn chebyshev1_prototype(order: usize, ripple_db: f64) -> (Vec<Complex64>, f64) {
    let eps = (10.0_f64.powf(0.1 * ripple_db) - 1.0).sqrt();
    let mu = (1.0 / eps).asinh() / order as f64;
    let n = order as f64;

    let poles: Vec<Complex64> = (0..order)
        .map(|i| {
            let m = -n + 1.0 + 2.0 * i as f64;
            let theta = PI * m / (2.0 * n);
            -Complex64::new(mu, theta).sinh()
        })
        .collect();

    let mut gain = poles
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * -p)
        .re;
    if order % 2 == 0 {
        gain /= (1.0 + eps * eps).sqrt();
    }
    (poles, gain)
}

/// `tan(pi w / 2)` for a Nyquist-normalised frequency `w`
fn prewarp(w: f64) -> f64 {
    (PI * w / 2.0).tan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RaydecConfig;

    fn context(fmin: f64, fmax: f64, dfpar: f64) -> AnalysisContext {
        let config = RaydecConfig {
            fmin,
            fmax,
            dfpar,
            fsteps: 10,
            ..Default::default()
        };
        AnalysisContext::from_parts(&config, 0.01, 60_000).unwrap()
    }

    #[test]
    fn test_band_edges_nest() {
        let ctx = context(0.2, 20.0, 0.1);
        let spec = BandpassSpec::for_frequency(1.0, &ctx).unwrap();
        assert!((spec.band.0 - 0.95).abs() < 1e-12);
        assert!((spec.band.1 - 1.05).abs() < 1e-12);
        assert!((spec.passband.0 - 0.96).abs() < 1e-12);
        assert!((spec.passband.1 - 1.04).abs() < 1e-12);
        assert!((spec.stopband.0 - 0.94).abs() < 1e-12);
        assert!((spec.stopband.1 - 1.06).abs() < 1e-12);
    }

    #[test]
    fn test_band_clipped_at_fstart() {
        let ctx = context(0.5, 20.0, 0.1);
        let spec = BandpassSpec::for_frequency(0.5, &ctx).unwrap();
        assert_eq!(spec.band.0, 0.5);
        assert!(spec.stopband.0 < spec.passband.0);
    }

    #[test]
    fn test_stopband_clamped_below_nyquist() {
        let ctx = context(1.0, 100.0, 0.1);
        let spec = BandpassSpec::for_frequency(ctx.fnyq, &ctx).unwrap();
        assert_eq!(spec.band.1, ctx.fnyq);
        assert!(spec.stopband.1 < ctx.fnyq);
        assert!(spec.stopband.1 > spec.passband.1);
        assert!(design_bandpass(ctx.fnyq, &ctx).is_ok());
    }

    #[test]
    fn test_stopband_clamped_above_zero() {
        // A very wide relative bandwidth pushes the widened band below 0 Hz.
        let ctx = context(0.05, 10.0, 10.0);
        let spec = BandpassSpec::for_frequency(0.1, &ctx).unwrap();
        assert!(spec.stopband.0 > 0.0);
        assert!(spec.stopband.0 < spec.passband.0);
        assert!(design_bandpass(0.1, &ctx).is_ok());
    }

    #[test]
    fn test_collapsed_band_is_design_failure() {
        let ctx = context(1.0, 10.0, 0.1);
        // Above Nyquist by more than half the band: nothing survives clipping.
        let err = BandpassSpec::for_frequency(ctx.fnyq * 1.2, &ctx).unwrap_err();
        assert!(matches!(err, RaydecError::FilterDesign { .. }));
    }

    #[test]
    fn test_order_for_ten_percent_band() {
        let ctx = context(0.2, 20.0, 0.1);
        let spec = BandpassSpec::for_frequency(1.0, &ctx).unwrap();
        let order = chebyshev1_order(&spec, PASSBAND_RIPPLE_DB, STOPBAND_ATTENUATION_DB).unwrap();
        assert_eq!(order, 2);
    }

    #[test]
    fn test_design_meets_tolerances() {
        let ctx = context(0.2, 20.0, 0.1);
        let sample_rate = 1.0 / ctx.tau;
        for frequency in [0.3, 1.0, 4.0, 15.0] {
            let spec = BandpassSpec::for_frequency(frequency, &ctx).unwrap();
            let filter = design_bandpass(frequency, &ctx).unwrap();
            assert!(filter.is_stable());

            for k in 0..=20 {
                let f = spec.passband.0 + (spec.passband.1 - spec.passband.0) * k as f64 / 20.0;
                let db = filter.magnitude_response_db(f, sample_rate);
                assert!(
                    (-PASSBAND_RIPPLE_DB - 1e-6..=1e-6).contains(&db),
                    "passband gain {} dB at {} Hz (centre {})",
                    db,
                    f,
                    frequency
                );
            }
            for f in [spec.stopband.0, spec.stopband.1] {
                let db = filter.magnitude_response_db(f, sample_rate);
                assert!(
                    db <= -STOPBAND_ATTENUATION_DB + 1e-6,
                    "stopband gain {} dB at {} Hz (centre {})",
                    db,
                    f,
                    frequency
                );
            }
        }
    }

    #[test]
    fn test_odd_order_peaks_at_unity() {
        let filter = chebyshev1_bandpass(3, 1.0, (0.2, 0.3)).unwrap();
        assert_eq!(filter.num_sections(), 3);
        assert_eq!(filter.zeros().len(), 6);
        let peak = (0..=200)
            .map(|k| 0.2 + 0.1 * k as f64 / 200.0)
            .map(|w| filter.frequency_response(w, 2.0).norm())
            .fold(0.0, f64::max);
        assert!((peak - 1.0).abs() < 1e-3, "peak {}", peak);
    }

    #[test]
    fn test_invalid_edges_rejected() {
        assert!(chebyshev1_bandpass(2, 1.0, (0.3, 0.2)).is_err());
        assert!(chebyshev1_bandpass(2, 1.0, (0.0, 0.2)).is_err());
        assert!(chebyshev1_bandpass(0, 1.0, (0.1, 0.2)).is_err());
    }
}
