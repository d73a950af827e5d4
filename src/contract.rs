// src/contract.rs
//! Input contracts, the per-evaluation market snapshot, and valuation results.

use crate::analytics::bs_analytic::{bs_greeks, bs_price, Greeks, OptionKind};
use std::fmt;

/// One quoted European option, as read from an option-chain record
///
/// Dates are kept as the raw strings of the record so that a malformed date
/// only fails the evaluation of this contract.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionContract {
    pub trade_date: String,
    pub underlying: String,
    pub spot: f64,
    /// Continuously compounded risk-free rate, may be negative
    pub r: f64,
    /// Continuously compounded dividend yield
    pub q: f64,
    pub kind: OptionKind,
    pub maturity_date: String,
    pub strike: f64,
    pub market_price: f64,
}

/// Market inputs for one pricing call
///
/// Built fresh for the final reprice of each contract; there is no shared
/// evaluation date or curve object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketEnvironment {
    pub spot: f64,
    pub r: f64,
    pub q: f64,
    /// Year fraction, strictly positive
    pub ttm: f64,
    pub sigma: f64,
}

impl MarketEnvironment {
    pub fn new(contract: &OptionContract, ttm: f64, sigma: f64) -> Self {
        MarketEnvironment {
            spot: contract.spot,
            r: contract.r,
            q: contract.q,
            ttm,
            sigma,
        }
    }

    pub fn price(&self, strike: f64, kind: OptionKind) -> f64 {
        bs_price(self.spot, strike, self.r, self.q, self.sigma, self.ttm, kind)
    }

    pub fn greeks(&self, strike: f64, kind: OptionKind) -> Greeks {
        bs_greeks(self.spot, strike, self.r, self.q, self.sigma, self.ttm, kind)
    }
}

/// Why the fallback volatility was used
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// Iteration budget exhausted
    NonConvergence { iterations: usize, last_error: f64 },
    /// Market price not attainable inside the volatility bounds
    PriceOutOfBounds,
    /// Solver refused the inputs (e.g. non-finite market price)
    InvalidInput(String),
}

impl FallbackReason {
    /// Short machine-readable tag for the output file
    pub fn tag(&self) -> &'static str {
        match self {
            FallbackReason::NonConvergence { .. } => "non_convergence",
            FallbackReason::PriceOutOfBounds => "price_out_of_bounds",
            FallbackReason::InvalidInput(_) => "invalid_input",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NonConvergence {
                iterations,
                last_error,
            } => write!(
                f,
                "no convergence after {} iterations (last error {:.6e})",
                iterations, last_error
            ),
            FallbackReason::PriceOutOfBounds => {
                write!(f, "market price outside attainable range")
            }
            FallbackReason::InvalidInput(msg) => write!(f, "invalid solver input: {}", msg),
        }
    }
}

/// Outcome of volatility calibration for one contract
#[derive(Debug, Clone, PartialEq)]
pub enum VolCalibration {
    Converged { sigma: f64, iterations: usize },
    Fallback { sigma: f64, reason: FallbackReason },
}

impl VolCalibration {
    /// Volatility used for the final reprice
    pub fn sigma(&self) -> f64 {
        match self {
            VolCalibration::Converged { sigma, .. } | VolCalibration::Fallback { sigma, .. } => {
                *sigma
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, VolCalibration::Fallback { .. })
    }

    /// `converged` or `fallback:<reason>`
    pub fn status_label(&self) -> String {
        match self {
            VolCalibration::Converged { .. } => "converged".to_string(),
            VolCalibration::Fallback { reason, .. } => format!("fallback:{}", reason.tag()),
        }
    }
}

/// Valuation of one contract at its calibrated (or fallback) volatility
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationResult {
    pub contract: OptionContract,
    pub ttm: f64,
    pub calibration: VolCalibration,
    pub model_price: f64,
    /// model price - market price
    pub error: f64,
    pub greeks: Greeks,
}

impl ValuationResult {
    pub fn iv(&self) -> f64 {
        self.calibration.sigma()
    }
}
