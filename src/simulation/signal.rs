use std::f64::consts::PI;

use crate::error::{RaydecError, Result};
use crate::record::Record;

/// A single retrograde Rayleigh wave
///
/// Vertical motion is `A·cos(ωt + φ)`; radial motion is `A·E·sin(ωt + φ)`
/// along the propagation azimuth, so the particle orbit is an ellipse with
/// horizontal-to-vertical ratio `E`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct RayleighWave {
    pub frequency_hz: f64,
    pub ellipticity: f64,
    /// Propagation azimuth, clockwise from north
    pub azimuth_degrees: f64,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    #[serde(default)]
    pub phase: f64,
}

fn default_amplitude() -> f64 {
    1.0
}

impl RayleighWave {
    pub fn new(frequency_hz: f64, ellipticity: f64, azimuth_degrees: f64) -> Self {
        Self {
            frequency_hz,
            ellipticity,
            azimuth_degrees,
            amplitude: default_amplitude(),
            phase: 0.0,
        }
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// (vertical, north, east) displacement at time `t`
    pub fn sample(&self, t: f64) -> (f64, f64, f64) {
        let (sin_az, cos_az) = self.azimuth_degrees.to_radians().sin_cos();
        let (sin, cos) = (2.0 * PI * self.frequency_hz * t + self.phase).sin_cos();
        let radial = self.amplitude * self.ellipticity * sin;
        (self.amplitude * cos, radial * cos_az, radial * sin_az)
    }
}

/// Superpose `waves` over `num_samples` samples spaced `sample_interval`
/// seconds apart
pub fn rayleigh_channels(
    num_samples: usize,
    sample_interval: f64,
    waves: &[RayleighWave],
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut vertical = vec![0.0; num_samples];
    let mut north = vec![0.0; num_samples];
    let mut east = vec![0.0; num_samples];

    for wave in waves {
        for i in 0..num_samples {
            let (v, n, e) = wave.sample(i as f64 * sample_interval);
            vertical[i] += v;
            north[i] += n;
            east[i] += e;
        }
    }

    (vertical, north, east)
}

/// Generate a record of `duration_secs` seconds holding the superposition
/// of `waves`
pub fn generate_rayleigh_record(
    duration_secs: f64,
    sample_interval: f64,
    waves: &[RayleighWave],
) -> Result<Record> {
    if !(duration_secs.is_finite() && duration_secs > 0.0) {
        return Err(RaydecError::InvalidInputShape(format!(
            "duration must be positive, got {}",
            duration_secs
        )));
    }
    if !(sample_interval.is_finite() && sample_interval > 0.0) {
        return Err(RaydecError::InvalidInputShape(format!(
            "sample interval must be positive, got {}",
            sample_interval
        )));
    }
    let num_samples = (duration_secs / sample_interval).round() as usize;
    let (vertical, north, east) = rayleigh_channels(num_samples, sample_interval, waves);
    Record::from_sample_interval(vertical, north, east, sample_interval)
}
