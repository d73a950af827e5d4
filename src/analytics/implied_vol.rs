// src/analytics/implied_vol.rs
//! Implied volatility root-finding
//!
//! # Algorithm
//!
//! Newton-Raphson on σ using analytic vega as the derivative:
//! ```text
//! σ_{n+1} = σ_n - (V(σ_n) - V_mkt) / ν(σ_n)
//! ```
//!
//! Price is strictly increasing in σ for S, T > 0, so every evaluation also
//! tightens a bracket `[lo, hi]` around the root. Whenever vega is too small
//! or the Newton step would leave the bracket, the iteration falls back to a
//! bisection step. The result is quadratic convergence near the money and
//! guaranteed progress for deep in/out-of-the-money contracts.
//!
//! Before iterating, the target is checked against the prices attainable at
//! the volatility bounds; a target outside that range is reported as
//! [`PricerError::PriceOutOfBounds`] instead of being chased to a bound.

use super::bs_analytic::{bs_price, bs_vega, OptionKind};
use crate::error::{validation::*, PricerError, PricerResult};
use tracing::{debug, trace};

/// Vega below this is treated as zero and triggers a bisection step
const MIN_VEGA: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub initial_guess: f64,
    /// Absolute tolerance on |model price - market price|
    pub tolerance: f64,
    pub max_iterations: usize,
    pub vol_lower: f64,
    pub vol_upper: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            initial_guess: 0.20,
            tolerance: 1e-7,
            max_iterations: 100,
            vol_lower: 1e-6,
            vol_upper: 5.0,
        }
    }
}

impl SolverConfig {
    /// Validate the solver configuration
    pub fn validate(&self) -> PricerResult<()> {
        validate_positive("tolerance", self.tolerance)?;
        validate_positive("vol_lower", self.vol_lower)?;
        validate_finite("vol_upper", self.vol_upper)?;
        if self.vol_upper <= self.vol_lower {
            return Err(PricerError::InvalidConfiguration {
                field: "vol_upper".to_string(),
                reason: format!(
                    "must be greater than vol_lower ({} <= {})",
                    self.vol_upper, self.vol_lower
                ),
            });
        }
        validate_range(
            "initial_guess",
            self.initial_guess,
            self.vol_lower,
            self.vol_upper,
        )?;
        if self.max_iterations == 0 {
            return Err(PricerError::InvalidConfiguration {
                field: "max_iterations".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// A converged implied volatility
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVol {
    pub sigma: f64,
    /// Pricing evaluations inside the iteration loop
    pub iterations: usize,
    /// model price - market price at `sigma`
    pub price_error: f64,
}

/// Solve for σ such that `|bs_price(σ) - market_price| < cfg.tolerance`.
///
/// # Errors
///
/// - `InvalidParameters` for non-positive spot, strike or time, or a
///   non-finite market price
/// - `InvalidConfiguration` for an inconsistent `cfg`
/// - `PriceOutOfBounds` when no σ in `[vol_lower, vol_upper]` can reproduce
///   the market price
/// - `NonConvergence` when the iteration budget is exhausted
#[allow(clippy::too_many_arguments)]
pub fn implied_volatility(
    market_price: f64,
    s: f64,
    k: f64,
    r: f64,
    q: f64,
    t: f64,
    kind: OptionKind,
    cfg: &SolverConfig,
) -> PricerResult<ImpliedVol> {
    cfg.validate()?;
    validate_finite("market_price", market_price)?;
    validate_positive("spot", s)?;
    validate_positive("strike", k)?;
    validate_positive("t", t)?;
    validate_finite("r", r)?;
    validate_finite("q", q)?;

    let price_at = |sigma: f64| bs_price(s, k, r, q, sigma, t, kind);

    let min_price = price_at(cfg.vol_lower);
    let max_price = price_at(cfg.vol_upper);
    if market_price < min_price - cfg.tolerance || market_price > max_price + cfg.tolerance {
        return Err(PricerError::PriceOutOfBounds {
            market_price,
            lower: min_price,
            upper: max_price,
        });
    }

    let mut lo = cfg.vol_lower;
    let mut hi = cfg.vol_upper;
    let mut sigma = cfg.initial_guess.clamp(lo, hi);
    let mut last_error = f64::INFINITY;

    for iteration in 1..=cfg.max_iterations {
        let diff = price_at(sigma) - market_price;
        last_error = diff;
        trace!(iteration, sigma, diff, "implied vol iteration");

        if diff.abs() < cfg.tolerance {
            debug!(sigma, iterations = iteration, "implied vol converged");
            return Ok(ImpliedVol {
                sigma,
                iterations: iteration,
                price_error: diff,
            });
        }

        if diff > 0.0 {
            hi = sigma;
        } else {
            lo = sigma;
        }

        let vega = bs_vega(s, k, r, q, sigma, t);
        let newton = sigma - diff / vega;
        sigma = if vega > MIN_VEGA && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        // bracket collapsed to machine precision without meeting tolerance
        if hi - lo <= f64::EPSILON * hi {
            debug!(lo, hi, "implied vol bracket collapsed");
            return Err(PricerError::NonConvergence {
                iterations: iteration,
                last_error,
            });
        }
    }

    Err(PricerError::NonConvergence {
        iterations: cfg.max_iterations,
        last_error,
    })
}
