// src/math_utils.rs
//! Standard normal distribution helpers and a wall-clock timer.
//!
//! `norm_cdf` uses Hart's double-precision rational approximation (as
//! popularised by West, "Better approximations to cumulative normal
//! functions"), accurate to roughly 1e-14 absolute error over the real line.

use std::f64::consts::PI;

const SQRT_2PI: f64 = 2.506628274631;

/// Standard normal cumulative distribution function Φ(x)
pub fn norm_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let x_abs = x.abs();
    let tail = if x_abs > 37.0 {
        0.0
    } else {
        let exponential = (-0.5 * x_abs * x_abs).exp();
        if x_abs < 7.07106781186547 {
            let mut num = 3.52624965998911e-02 * x_abs + 0.700383064443688;
            num = num * x_abs + 6.37396220353165;
            num = num * x_abs + 33.912866078383;
            num = num * x_abs + 112.079291497871;
            num = num * x_abs + 221.213596169931;
            num = num * x_abs + 220.206867912376;

            let mut den = 8.83883476483184e-02 * x_abs + 1.75566716318264;
            den = den * x_abs + 16.064177579207;
            den = den * x_abs + 86.7807322029461;
            den = den * x_abs + 296.564248779674;
            den = den * x_abs + 637.333633378831;
            den = den * x_abs + 793.826512519948;
            den = den * x_abs + 440.413735824752;

            exponential * num / den
        } else {
            // continued fraction for the far tail
            let mut cf = x_abs + 0.65;
            cf = x_abs + 4.0 / cf;
            cf = x_abs + 3.0 / cf;
            cf = x_abs + 2.0 / cf;
            cf = x_abs + 1.0 / cf;
            exponential / cf / SQRT_2PI
        }
    };

    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Standard normal probability density function
///
/// # Formula
/// ```text
/// φ(x) = (1/√(2π)) * exp(-x²/2)
/// ```
pub fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::function::erf;
    use std::f64::consts::SQRT_2;

    fn reference_cdf(x: f64) -> f64 {
        0.5 * erf::erfc(-x / SQRT_2)
    }

    #[test]
    fn test_norm_cdf_matches_erf_reference() {
        let mut x = -12.0;
        while x <= 12.0 {
            let diff = (norm_cdf(x) - reference_cdf(x)).abs();
            assert!(diff < 1e-12, "norm_cdf({}) off by {}", x, diff);
            x += 0.01;
        }
    }

    #[test]
    fn test_norm_cdf_symmetry_and_center() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
        for &x in &[0.1, 0.5, 1.0, 2.5, 6.0, 8.0, 20.0] {
            assert!((norm_cdf(x) + norm_cdf(-x) - 1.0).abs() < 1e-14);
        }
        assert_eq!(norm_cdf(-40.0), 0.0);
        assert_eq!(norm_cdf(40.0), 1.0);
    }

    #[test]
    fn test_norm_pdf_peak() {
        assert!((norm_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-15);
        assert!((norm_pdf(1.3) - norm_pdf(-1.3)).abs() < 1e-18);
    }
}
