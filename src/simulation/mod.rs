//! Synthetic three-component records for tests and benchmarks.

mod noise;
mod signal;

pub use noise::{
    AdditiveNoiseConfig, ImpulseNoiseConfig, NoiseConfig, apply_noise, apply_noise_to_record,
    signal_power,
};
pub use signal::{RayleighWave, generate_rayleigh_record, rayleigh_channels};
