// src/math_utils.rs
use std::f64::consts::{PI, SQRT_2};

// Abramowitz & Stegun 7.1.26 coefficients, |error| < 1.5e-7
const AS_P: f64 = 0.327_591_1;
const AS_A1: f64 = 0.254_829_592;
const AS_A2: f64 = -0.284_496_736;
const AS_A3: f64 = 1.421_413_741;
const AS_A4: f64 = -1.453_152_027;
const AS_A5: f64 = 1.061_405_429;

/// Error function via the Abramowitz–Stegun polynomial approximation
///
/// # Formula
/// ```text
/// t = 1 / (1 + p|x|)
/// erf(x) ≈ sign(x) * (1 - (a₁t + a₂t² + a₃t³ + a₄t⁴ + a₅t⁵) * e^(-x²))
/// ```
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + AS_P * x);
    let poly = ((((AS_A5 * t + AS_A4) * t + AS_A3) * t + AS_A2) * t + AS_A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal CDF Φ(x) built on [`erf`]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Standard normal density φ(x) = e^(-x²/2) / √(2π)
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_erf_matches_statrs() {
        for i in -40..=40 {
            let x = i as f64 * 0.1;
            assert_abs_diff_eq!(erf(x), statrs::function::erf::erf(x), epsilon = 2e-7);
        }
    }

    #[test]
    fn test_erf_is_odd() {
        for &x in &[0.1, 0.5, 1.3, 2.7] {
            assert_abs_diff_eq!(erf(-x), -erf(x), epsilon = 1e-15);
        }
    }

    #[test]
    fn test_norm_cdf_reference_points() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(norm_cdf(1.96), 0.975_002_1, epsilon = 1e-6);
        assert_abs_diff_eq!(norm_cdf(-1.96), 0.024_997_9, epsilon = 1e-6);
    }

    #[test]
    fn test_norm_pdf_peak() {
        assert_abs_diff_eq!(norm_pdf(0.0), 0.398_942_280_401_432_7, epsilon = 1e-15);
        assert!(norm_pdf(3.0) < norm_pdf(1.0));
    }
}
