// demos/error_handling_demo.rs
use fast_iv::analytics::bs_analytic::OptionKind;
use fast_iv::analytics::implied_vol::{implied_volatility, SolverConfig};
use fast_iv::contract::{OptionContract, VolCalibration};
use fast_iv::error::PricerError;
use fast_iv::evaluator::{evaluate_batch, evaluate_contract, EvaluatorConfig};
use fast_iv::input::{read_option_chain, ParsePolicy};

fn contract(trade: &str, maturity: &str, market_price: f64) -> OptionContract {
    OptionContract {
        trade_date: trade.to_string(),
        underlying: "DEMO".to_string(),
        spot: 100.0,
        r: 0.02,
        q: 0.0,
        kind: OptionKind::Call,
        maturity_date: maturity.to_string(),
        strike: 100.0,
        market_price,
    }
}

fn main() {
    println!("Error Handling Demo for fast-iv");
    println!("===============================\n");

    // 1. Invalid solver configuration
    println!("1. Testing inverted volatility bounds...");
    let bad_cfg = SolverConfig {
        vol_lower: 3.0,
        vol_upper: 1.0,
        initial_guess: 2.0,
        ..Default::default()
    };
    match implied_volatility(8.9, 100.0, 100.0, 0.02, 0.0, 1.0, OptionKind::Call, &bad_cfg) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // 2. Unattainable market price
    println!("\n2. Testing a call quoted above the spot...");
    match implied_volatility(
        150.0,
        100.0,
        100.0,
        0.02,
        0.0,
        1.0,
        OptionKind::Call,
        &SolverConfig::default(),
    ) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(PricerError::PriceOutOfBounds { lower, upper, .. }) => {
            println!("   ✓ Caught PriceOutOfBounds: attainable [{:.4}, {:.4}]", lower, upper)
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // 3. Same contract through the evaluator: flagged fallback, not an error
    println!("\n3. Evaluating the same quote as a contract...");
    match evaluate_contract(&contract("2025-01-01", "2026-01-01", 150.0), &EvaluatorConfig::default()) {
        Ok(res) => match &res.calibration {
            VolCalibration::Fallback { sigma, reason } => {
                println!("   ✓ Fallback σ = {} ({}), model price {:.4}", sigma, reason, res.model_price)
            }
            VolCalibration::Converged { .. } => println!("   Unexpected: converged!"),
        },
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // 4. Same-day maturity
    println!("\n4. Evaluating a same-day expiry...");
    match evaluate_contract(&contract("2025-06-02", "2025-06-02", 0.4), &EvaluatorConfig::default()) {
        Ok(res) => println!("   ✓ TTM clamped to {:.6}, IV = {:.4}", res.ttm, res.iv()),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // 5. Bad date inside a batch
    println!("\n5. Batch with an unparseable date...");
    let batch = vec![
        contract("2025-01-01", "2026-01-01", 8.916),
        contract("01/01/2025", "2026-01-01", 8.916),
    ];
    match evaluate_batch(&batch, &EvaluatorConfig::default()) {
        Ok(report) => {
            println!("   ✓ Valued {} contract(s)", report.results.len());
            for s in &report.skipped {
                println!("   ✓ Skipped row {}: {}", s.index, s.error);
            }
        }
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // 6. Strict vs lenient parsing
    println!("\n6. Parsing a short row under both policies...");
    let text = "trade_date,underlying,spot,r,q,option_type,maturity_date,strike,market_price\n\
                2025-01-01,DEMO,100,0.02\n";
    match read_option_chain(text.as_bytes(), ParsePolicy::lenient(), "inline") {
        Ok(rows) => println!("   ✓ Lenient: {} row(s) kept", rows.len()),
        Err(e) => println!("   Unexpected error: {}", e),
    }
    match read_option_chain(text.as_bytes(), ParsePolicy::strict(), "inline") {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Strict: {}", e),
    }

    println!("\n✓ Error handling demo complete!");
}
