use std::f64::consts::PI;

/// Sum of elementwise products over the common length
pub fn dot(lhs: &[f64], rhs: &[f64]) -> f64 {
    lhs.iter().zip(rhs).map(|(a, b)| a * b).sum()
}

pub fn sum_of_squares(signal: &[f64]) -> f64 {
    signal.iter().map(|x| x * x).sum()
}

/// Arithmetic mean, zero for an empty slice
pub fn mean(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().sum::<f64>() / signal.len() as f64
}

/// Sign as -1, 0 or 1 (NaN maps to 0)
pub fn signum(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Reduce an angle to [0, 2pi)
pub fn wrap_two_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * PI);
    // rem_euclid can round up to exactly 2pi for tiny negative inputs.
    if wrapped >= 2.0 * PI { 0.0 } else { wrapped }
}
