use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{RaydecError, Result};
use crate::record::Record;

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub additive: Option<AdditiveNoiseConfig>,
    pub impulse: Option<ImpulseNoiseConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_awgn(mut self, snr_db: f64) -> Self {
        self.additive = Some(AdditiveNoiseConfig { snr_db });
        self
    }

    pub fn with_impulse(mut self, rate_hz: f64, amplitude: f64, duration_samples: usize) -> Self {
        self.impulse = Some(ImpulseNoiseConfig {
            rate_hz,
            amplitude,
            duration_samples,
        });
        self
    }
}

/// White Gaussian noise at a signal-to-noise ratio relative to the
/// channel's own mean power
#[derive(Clone, Debug, serde::Deserialize)]
pub struct AdditiveNoiseConfig {
    pub snr_db: f64,
}

/// Rectangular spikes of random sign at random intervals
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ImpulseNoiseConfig {
    pub rate_hz: f64,
    pub amplitude: f64,
    pub duration_samples: usize,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

pub fn signal_power(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f64>() / signal.len() as f64
}

fn apply_additive_noise(
    signal: &mut [f64],
    config: &AdditiveNoiseConfig,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    let sig_power = signal_power(signal);
    if sig_power == 0.0 {
        return Ok(());
    }

    let snr_linear = 10.0_f64.powf(config.snr_db / 10.0);
    let noise_std = (sig_power / snr_linear).sqrt();
    let normal = Normal::new(0.0, noise_std)
        .map_err(|e| RaydecError::Config(format!("invalid noise level: {}", e)))?;

    for sample in signal.iter_mut() {
        *sample += normal.sample(rng);
    }
    Ok(())
}

fn apply_impulse_noise(
    signal: &mut [f64],
    config: &ImpulseNoiseConfig,
    sample_rate: f64,
    rng: &mut ChaCha8Rng,
) {
    let n = signal.len();
    if n == 0 || config.rate_hz <= 0.0 {
        return;
    }

    let avg_samples_between_impulses = sample_rate / config.rate_hz;

    let mut pos = 0usize;
    loop {
        let interval = (rng.random::<f64>() * 2.0 * avg_samples_between_impulses) as usize;
        pos += interval.max(1);

        if pos >= n {
            break;
        }

        let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
        let end = (pos + config.duration_samples).min(n);

        for sample in signal[pos..end].iter_mut() {
            *sample += sign * config.amplitude;
        }
    }
}

fn contaminate(
    signal: &mut [f64],
    config: &NoiseConfig,
    sample_rate: f64,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    if let Some(ref additive_config) = config.additive {
        apply_additive_noise(signal, additive_config, rng)?;
    }
    if let Some(ref impulse_config) = config.impulse {
        apply_impulse_noise(signal, impulse_config, sample_rate, rng);
    }
    Ok(())
}

/// Noisy copy of a single channel
pub fn apply_noise(clean_signal: &[f64], config: &NoiseConfig, sample_rate: f64) -> Result<Vec<f64>> {
    let mut signal = clean_signal.to_vec();
    let mut rng = create_rng(config.seed);
    contaminate(&mut signal, config, sample_rate, &mut rng)?;
    Ok(signal)
}

/// Noisy copy of a record.
///
/// Each channel receives independent noise scaled to its own power; a
/// single generator is drawn in vertical, north, east order so a seed
/// reproduces the whole record.
pub fn apply_noise_to_record(record: &Record, config: &NoiseConfig) -> Result<Record> {
    let sample_rate = 1.0 / record.sample_interval();
    let mut rng = create_rng(config.seed);

    let mut vertical = record.vertical().to_vec();
    let mut north = record.north().to_vec();
    let mut east = record.east().to_vec();
    for channel in [&mut vertical, &mut north, &mut east] {
        contaminate(channel, config, sample_rate, &mut rng)?;
    }

    Record::new(vertical, north, east, record.time().to_vec())
}
