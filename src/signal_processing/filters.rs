use iir_filters::filter::{DirectForm2Transposed, Filter};
use iir_filters::filter_design::ZPKCoeffs;
use iir_filters::sos::{Sos, zpk2sos};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Designed bandpass in zero-pole-gain form, run as a cascade of
/// second-order sections
///
/// The coefficients are immutable once designed. Each call to
/// [`BandpassFilter::apply`] starts from a zero state, so the same filter
/// can be shared between threads and reused across channels.
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    zeros: Vec<Complex64>,
    poles: Vec<Complex64>,
    gain: f64,
    order: usize,
    sos: Sos,
}

impl BandpassFilter {
    /// Pair the digital zeros and poles into second-order sections
    ///
    /// # Arguments
    /// * `zeros` - Digital zeros, conjugate pairs complete
    /// * `poles` - Digital poles, conjugate pairs complete
    /// * `gain` - Overall gain, applied in the first section
    /// * `order` - Prototype order the zeros and poles were derived from
    ///
    /// # Errors
    /// Returns the pairing error message if the zeros or poles do not form
    /// conjugate pairs
    pub fn from_zpk(
        zeros: Vec<Complex64>,
        poles: Vec<Complex64>,
        gain: f64,
        order: usize,
    ) -> std::result::Result<Self, String> {
        let zpk = ZPKCoeffs {
            z: zeros.clone(),
            p: poles.clone(),
            k: gain,
        };
        let sos = zpk2sos(&zpk, None).map_err(|e| format!("{:?}", e))?;
        Ok(Self {
            zeros,
            poles,
            gain,
            order,
            sos,
        })
    }

    /// Prototype order `N` (the bandpass has `2N` poles)
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn num_sections(&self) -> usize {
        self.sos.num_sections()
    }

    pub fn zeros(&self) -> &[Complex64] {
        &self.zeros
    }

    pub fn poles(&self) -> &[Complex64] {
        &self.poles
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// All poles strictly inside the unit circle
    pub fn is_stable(&self) -> bool {
        self.poles.iter().all(|p| p.norm() < 1.0)
    }

    /// Causal filtering from rest (transposed direct form II per section)
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        let mut output = input.to_vec();
        self.process_buffer(&mut output);
        output
    }

    /// Filter entire buffer in-place, starting from a zero state
    pub fn process_buffer(&self, buffer: &mut [f64]) {
        let mut filter = DirectForm2Transposed::new(&self.sos);
        for sample in buffer.iter_mut() {
            *sample = filter.filter(*sample);
        }
    }

    /// Expanded transfer function `(b, a)` in powers of `z^-1`
    pub fn transfer_function(&self) -> (Vec<f64>, Vec<f64>) {
        let b = poly_from_roots(&self.zeros)
            .iter()
            .map(|c| self.gain * c.re)
            .collect();
        let a = poly_from_roots(&self.poles).iter().map(|c| c.re).collect();
        (b, a)
    }

    /// Complex response at `freq_hz` for a sampling rate of `sample_rate`
    pub fn frequency_response(&self, freq_hz: f64, sample_rate: f64) -> Complex64 {
        let z = Complex64::from_polar(1.0, 2.0 * PI * freq_hz / sample_rate);
        let num = self
            .zeros
            .iter()
            .fold(Complex64::new(self.gain, 0.0), |acc, &q| acc * (z - q));
        let den = self
            .poles
            .iter()
            .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (z - p));
        num / den
    }

    /// Magnitude response in dB
    pub fn magnitude_response_db(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        20.0 * self.frequency_response(freq_hz, sample_rate).norm().log10()
    }
}

/// Monic polynomial with the given roots, highest power first
fn poly_from_roots(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * root;
        }
        coeffs = next;
    }
    coeffs
}
