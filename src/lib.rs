//! # fast-iv: Black-Scholes-Merton Pricing and Implied Volatility
//!
//! A Rust library for valuing batches of European vanilla options from market
//! quotes: each contract's implied volatility is recovered from its market
//! price, then the contract is repriced and its Greeks computed at that
//! volatility.
//!
//! ## Key Features
//!
//! - **Analytic Pricing**: Black-Scholes-Merton with continuous dividend yield
//! - **Robust Calibration**: Newton-Raphson on vega with a bisection safeguard
//! - **Explicit Fallbacks**: unconverged contracts are flagged, never disguised
//! - **Complete Greeks**: Delta, Gamma, Vega, Theta, Rho in closed form
//! - **Parallel Batches**: contracts are independent and evaluated with Rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use fast_iv::analytics::bs_analytic::OptionKind;
//! use fast_iv::contract::OptionContract;
//! use fast_iv::evaluator::{evaluate_contract, EvaluatorConfig};
//!
//! let contract = OptionContract {
//!     trade_date: "2025-01-02".to_string(),
//!     underlying: "SPX".to_string(),
//!     spot: 100.0,
//!     r: 0.02,
//!     q: 0.0,
//!     kind: OptionKind::Call,
//!     maturity_date: "2026-01-02".to_string(),
//!     strike: 100.0,
//!     market_price: 8.9160,
//! };
//!
//! let result = evaluate_contract(&contract, &EvaluatorConfig::default()).expect("valid contract");
//! assert!(!result.calibration.is_fallback());
//! println!("IV = {:.4}, delta = {:.4}", result.iv(), result.greeks.delta);
//! ```
//!
//! ## Mathematical Foundation
//!
//! Prices follow the Black-Scholes-Merton closed form under the risk-neutral
//! measure. Price is strictly increasing in volatility, which makes the
//! implied volatility unique and lets the solver keep a shrinking bracket
//! around it.

// Module declarations
pub mod error;
pub mod math_utils;
pub mod daycount;
pub mod analytics;
pub mod contract;
pub mod evaluator;
pub mod metrics;
pub mod input;
pub mod output;

// Re-export commonly used types for convenience
pub use analytics::bs_analytic::{Greeks, OptionKind};
pub use contract::{OptionContract, ValuationResult, VolCalibration};
pub use error::{PricerError, PricerResult};
pub use evaluator::{evaluate_batch, evaluate_contract, BatchReport, EvaluatorConfig};
