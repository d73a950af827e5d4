// src/evaluator.rs
//! Per-contract valuation and parallel batch evaluation.
//!
//! A contract is valued in four steps:
//! 1. year fraction trade date -> maturity (Actual/365 Fixed), clamped to `min_ttm`
//! 2. implied volatility from the market price
//! 3. on solver failure, the configured fallback volatility, flagged as such
//! 4. reprice and Greeks at the final volatility
//!
//! Contracts share no mutable state, so a batch is evaluated with Rayon and
//! the error metrics are combined with a commutative reduction.

use crate::analytics::implied_vol::{implied_volatility, SolverConfig};
use crate::contract::{
    FallbackReason, MarketEnvironment, OptionContract, ValuationResult, VolCalibration,
};
use crate::daycount::{clamp_time_to_maturity, Actual365Fixed};
use crate::error::{validation::*, PricerError, PricerResult};
use crate::metrics::ErrorMetrics;
use rayon::prelude::*;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluatorConfig {
    pub initial_guess: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub vol_lower: f64,
    pub vol_upper: f64,
    /// Volatility used when calibration fails
    pub fallback_vol: f64,
    /// Replacement for a non-positive time to maturity
    pub min_ttm: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        let solver = SolverConfig::default();
        EvaluatorConfig {
            initial_guess: solver.initial_guess,
            tolerance: solver.tolerance,
            max_iterations: solver.max_iterations,
            vol_lower: solver.vol_lower,
            vol_upper: solver.vol_upper,
            fallback_vol: 0.20,
            min_ttm: 1.0 / 365.0,
        }
    }
}

impl EvaluatorConfig {
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            initial_guess: self.initial_guess,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            vol_lower: self.vol_lower,
            vol_upper: self.vol_upper,
        }
    }

    /// Validate the evaluator configuration
    pub fn validate(&self) -> PricerResult<()> {
        self.solver_config().validate()?;
        validate_positive("fallback_vol", self.fallback_vol)?;
        validate_finite("fallback_vol", self.fallback_vol)?;
        validate_positive("min_ttm", self.min_ttm)?;
        validate_finite("min_ttm", self.min_ttm)?;
        Ok(())
    }
}

/// Values one contract.
///
/// # Errors
///
/// Fails, and the contract should be skipped, when a date cannot be parsed
/// or when spot/strike/rates/market price are outside the model's domain. Solver failures
/// are not errors: they produce a [`VolCalibration::Fallback`] result.
pub fn evaluate_contract(
    contract: &OptionContract,
    cfg: &EvaluatorConfig,
) -> PricerResult<ValuationResult> {
    validate_positive("spot", contract.spot)?;
    validate_finite("spot", contract.spot)?;
    validate_positive("strike", contract.strike)?;
    validate_finite("strike", contract.strike)?;
    validate_finite("r", contract.r)?;
    validate_finite("q", contract.q)?;
    validate_finite("market_price", contract.market_price)?;

    let raw_ttm = Actual365Fixed.year_fraction_str(&contract.trade_date, &contract.maturity_date)?;
    let ttm = clamp_time_to_maturity(raw_ttm, cfg.min_ttm);

    let calibration = match implied_volatility(
        contract.market_price,
        contract.spot,
        contract.strike,
        contract.r,
        contract.q,
        ttm,
        contract.kind,
        &cfg.solver_config(),
    ) {
        Ok(iv) => VolCalibration::Converged {
            sigma: iv.sigma,
            iterations: iv.iterations,
        },
        Err(err @ PricerError::InvalidConfiguration { .. }) => return Err(err),
        Err(err) => {
            let reason = match err {
                PricerError::NonConvergence {
                    iterations,
                    last_error,
                } => FallbackReason::NonConvergence {
                    iterations,
                    last_error,
                },
                PricerError::PriceOutOfBounds { .. } => FallbackReason::PriceOutOfBounds,
                other => FallbackReason::InvalidInput(other.to_string()),
            };
            warn!(
                underlying = %contract.underlying,
                strike = contract.strike,
                kind = %contract.kind,
                market_price = contract.market_price,
                fallback_vol = cfg.fallback_vol,
                %reason,
                "implied vol fallback"
            );
            VolCalibration::Fallback {
                sigma: cfg.fallback_vol,
                reason,
            }
        }
    };

    let env = MarketEnvironment::new(contract, ttm, calibration.sigma());
    let model_price = env.price(contract.strike, contract.kind);
    let greeks = env.greeks(contract.strike, contract.kind);

    Ok(ValuationResult {
        contract: contract.clone(),
        ttm,
        calibration,
        model_price,
        error: model_price - contract.market_price,
        greeks,
    })
}

/// A contract that could not be valued
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedContract {
    /// Position in the input batch
    pub index: usize,
    pub underlying: String,
    pub error: PricerError,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Valued contracts, in input order
    pub results: Vec<ValuationResult>,
    pub skipped: Vec<SkippedContract>,
    pub metrics: ErrorMetrics,
}

impl BatchReport {
    pub fn converged_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.calibration.is_fallback())
            .count()
    }

    pub fn fallback_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.calibration.is_fallback())
            .count()
    }
}

/// Values every contract in parallel.
///
/// Contracts that fail evaluation are reported in [`BatchReport::skipped`]
/// rather than aborting the batch. Only an invalid configuration is fatal.
pub fn evaluate_batch(
    contracts: &[OptionContract],
    cfg: &EvaluatorConfig,
) -> PricerResult<BatchReport> {
    cfg.validate()?;

    let outcomes: Vec<PricerResult<ValuationResult>> = contracts
        .par_iter()
        .map(|contract| evaluate_contract(contract, cfg))
        .collect();

    let mut report = BatchReport::default();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(result) => report.results.push(result),
            Err(error) => {
                let underlying = contracts[index].underlying.clone();
                warn!(index, %underlying, %error, "skipping contract");
                report.skipped.push(SkippedContract {
                    index,
                    underlying,
                    error,
                });
            }
        }
    }

    report.metrics = report
        .results
        .par_iter()
        .fold(ErrorMetrics::new, |mut acc, r| {
            acc.push(r.model_price, r.contract.market_price);
            acc
        })
        .reduce(ErrorMetrics::new, ErrorMetrics::merge);

    info!(
        evaluated = report.results.len(),
        converged = report.converged_count(),
        fallback = report.fallback_count(),
        skipped = report.skipped.len(),
        "batch evaluated"
    );

    Ok(report)
}
