// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes-Merton formulas for European options and Greeks
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes-Merton model with continuous dividend yield q,
//! the underlying follows:
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//!
//! For European options the risk-neutral expectation has closed-form
//! solutions involving the cumulative normal distribution function Φ(x).
//!
//! Every function here is pure and assumes `sigma > 0` and `t > 0`; callers
//! clamp time to maturity and bound volatility before reaching this module.

use crate::math_utils::{norm_cdf, norm_pdf};
use std::fmt;

/// Call or put
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// Single-character code used in option-chain files
    pub fn as_char(&self) -> char {
        match self {
            OptionKind::Call => 'C',
            OptionKind::Put => 'P',
        }
    }

    /// Strict decoding: `C`/`P`, case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(OptionKind::Call),
            'P' => Some(OptionKind::Put),
            _ => None,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The five standard sensitivities
///
/// Units: theta per year of calendar time, vega per unit volatility
/// (1.0 = 100 vol points), rho per unit rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
    pub rho: f64,
}

/// d₁ and d₂
///
/// # Formula
/// ```text
/// d₁ = [ln(S/K) + (r - q + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
#[inline]
pub fn d1_d2(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> (f64, f64) {
    let sig_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Black-Scholes-Merton European call option price
///
/// # Formula
/// ```text
/// C = S*e^(-qT)*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
///
/// # Parameters
/// - `s`: Current underlying price
/// - `k`: Strike price
/// - `r`: Risk-free rate (continuously compounded)
/// - `q`: Dividend yield (continuously compounded)
/// - `sigma`: Volatility
/// - `t`: Time to expiration in years
pub fn bs_call_price(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, q, sigma, t);
    s * (-q * t).exp() * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Black-Scholes-Merton European put option price
///
/// # Formula
/// ```text
/// P = K*e^(-rT)*Φ(-d₂) - S*e^(-qT)*Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, q, sigma, t);
    k * (-r * t).exp() * norm_cdf(-d2) - s * (-q * t).exp() * norm_cdf(-d1)
}

/// Present value for either kind
pub fn bs_price(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64, kind: OptionKind) -> f64 {
    match kind {
        OptionKind::Call => bs_call_price(s, k, r, q, sigma, t),
        OptionKind::Put => bs_put_price(s, k, r, q, sigma, t),
    }
}

/// Delta (∂V/∂S)
///
/// # Formula
/// ```text
/// Δ_call = e^(-qT) Φ(d₁)
/// Δ_put  = e^(-qT) (Φ(d₁) - 1)
/// ```
pub fn bs_delta(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64, kind: OptionKind) -> f64 {
    let (d1, _) = d1_d2(s, k, r, q, sigma, t);
    let df_q = (-q * t).exp();
    match kind {
        OptionKind::Call => df_q * norm_cdf(d1),
        OptionKind::Put => df_q * (norm_cdf(d1) - 1.0),
    }
}

/// Gamma (∂²V/∂S²), identical for calls and puts
///
/// # Formula
/// ```text
/// Γ = e^(-qT) φ(d₁) / (S σ √T)
/// ```
pub fn bs_gamma(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, _) = d1_d2(s, k, r, q, sigma, t);
    (-q * t).exp() * norm_pdf(d1) / (s * sigma * t.sqrt())
}

/// Vega (∂V/∂σ), identical for calls and puts
///
/// # Formula
/// ```text
/// ν = S e^(-qT) φ(d₁) √T
/// ```
///
/// Strictly positive for σ, T > 0; used as the Newton-Raphson derivative
/// by the implied volatility solver.
pub fn bs_vega(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, _) = d1_d2(s, k, r, q, sigma, t);
    s * (-q * t).exp() * norm_pdf(d1) * t.sqrt()
}

/// Theta (∂V/∂t), per year
///
/// # Formula
/// ```text
/// Θ_call = -S e^(-qT) φ(d₁) σ/(2√T) + q S e^(-qT) Φ(d₁)  - r K e^(-rT) Φ(d₂)
/// Θ_put  = -S e^(-qT) φ(d₁) σ/(2√T) - q S e^(-qT) Φ(-d₁) + r K e^(-rT) Φ(-d₂)
/// ```
pub fn bs_theta(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64, kind: OptionKind) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, q, sigma, t);
    let fwd_s = s * (-q * t).exp();
    let df_k = k * (-r * t).exp();
    let decay = -fwd_s * norm_pdf(d1) * sigma / (2.0 * t.sqrt());
    match kind {
        OptionKind::Call => decay + q * fwd_s * norm_cdf(d1) - r * df_k * norm_cdf(d2),
        OptionKind::Put => decay - q * fwd_s * norm_cdf(-d1) + r * df_k * norm_cdf(-d2),
    }
}

/// Rho (∂V/∂r)
///
/// # Formula
/// ```text
/// ρ_call =  K T e^(-rT) Φ(d₂)
/// ρ_put  = -K T e^(-rT) Φ(-d₂)
/// ```
pub fn bs_rho(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64, kind: OptionKind) -> f64 {
    let (_, d2) = d1_d2(s, k, r, q, sigma, t);
    let df_k_t = k * t * (-r * t).exp();
    match kind {
        OptionKind::Call => df_k_t * norm_cdf(d2),
        OptionKind::Put => -df_k_t * norm_cdf(-d2),
    }
}

/// All five Greeks from a single d₁/d₂ evaluation
pub fn bs_greeks(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64, kind: OptionKind) -> Greeks {
    let (d1, d2) = d1_d2(s, k, r, q, sigma, t);
    let sqrt_t = t.sqrt();
    let df_q = (-q * t).exp();
    let df_r = (-r * t).exp();
    let pdf_d1 = norm_pdf(d1);

    let gamma = df_q * pdf_d1 / (s * sigma * sqrt_t);
    let vega = s * df_q * pdf_d1 * sqrt_t;
    let decay = -s * df_q * pdf_d1 * sigma / (2.0 * sqrt_t);

    match kind {
        OptionKind::Call => Greeks {
            delta: df_q * norm_cdf(d1),
            gamma,
            vega,
            theta: decay + q * s * df_q * norm_cdf(d1) - r * k * df_r * norm_cdf(d2),
            rho: k * t * df_r * norm_cdf(d2),
        },
        OptionKind::Put => Greeks {
            delta: df_q * (norm_cdf(d1) - 1.0),
            gamma,
            vega,
            theta: decay - q * s * df_q * norm_cdf(-d1) + r * k * df_r * norm_cdf(-d2),
            rho: -k * t * df_r * norm_cdf(-d2),
        },
    }
}
