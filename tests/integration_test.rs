// tests/integration_test.rs
use fast_iv::analytics::bs_analytic::{bs_call_price, OptionKind};
use fast_iv::contract::{FallbackReason, OptionContract, VolCalibration};
use fast_iv::error::PricerError;
use fast_iv::evaluator::{evaluate_batch, evaluate_contract, EvaluatorConfig};
use fast_iv::input::{read_option_chain, read_option_chain_csv, ParsePolicy};
use fast_iv::output::{write_results, RESULT_COLUMNS};
use std::path::Path;

fn sample_chain_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data/option_chain_sample.csv")
}

fn atm_contract(trade: &str, maturity: &str, market_price: f64) -> OptionContract {
    OptionContract {
        trade_date: trade.to_string(),
        underlying: "SPX".to_string(),
        spot: 100.0,
        r: 0.02,
        q: 0.0,
        kind: OptionKind::Call,
        maturity_date: maturity.to_string(),
        strike: 100.0,
        market_price,
    }
}

#[test]
fn test_reference_contract_calibrates() {
    // 2025-01-01 -> 2026-01-01 is exactly one Act/365 year
    let price = bs_call_price(100.0, 100.0, 0.02, 0.0, 0.20, 1.0);
    let c = atm_contract("2025-01-01", "2026-01-01", price);
    let res = evaluate_contract(&c, &EvaluatorConfig::default()).unwrap();

    assert!((res.ttm - 1.0).abs() < 1e-15);
    assert!(matches!(res.calibration, VolCalibration::Converged { .. }));
    assert!((res.iv() - 0.20).abs() < 1e-6);
    assert!(res.error.abs() < 1e-7);
    assert!((res.model_price - 8.9160).abs() < 5e-5);
}

#[test]
fn test_same_day_maturity_is_clamped() {
    let c = atm_contract("2025-06-02", "2025-06-02", 0.5);
    let res = evaluate_contract(&c, &EvaluatorConfig::default()).expect("no domain error");

    assert_eq!(res.ttm, 1.0 / 365.0);
    assert!(res.model_price.is_finite());
    assert!(res.greeks.gamma.is_finite() && res.greeks.vega > 0.0);
}

#[test]
fn test_past_maturity_is_clamped() {
    let c = atm_contract("2025-06-02", "2025-05-01", 0.5);
    let res = evaluate_contract(&c, &EvaluatorConfig::default()).unwrap();
    assert_eq!(res.ttm, 1.0 / 365.0);
}

#[test]
fn test_unattainable_price_is_flagged_fallback() {
    let c = atm_contract("2025-01-01", "2026-01-01", 500.0);
    let res = evaluate_contract(&c, &EvaluatorConfig::default()).unwrap();

    assert_eq!(
        res.calibration,
        VolCalibration::Fallback {
            sigma: 0.20,
            reason: FallbackReason::PriceOutOfBounds
        }
    );
    assert_eq!(res.iv(), 0.20);
    // repriced at the fallback volatility
    assert!((res.model_price - 8.9160).abs() < 5e-5);
    assert!((res.error - (res.model_price - 500.0)).abs() < 1e-12);
}

#[test]
fn test_exhausted_iteration_budget_is_flagged_fallback() {
    let cfg = EvaluatorConfig {
        initial_guess: 4.0,
        max_iterations: 1,
        ..Default::default()
    };
    let price = bs_call_price(100.0, 100.0, 0.02, 0.0, 0.20, 1.0);
    let c = atm_contract("2025-01-01", "2026-01-01", price);
    let res = evaluate_contract(&c, &cfg).unwrap();

    assert!(matches!(
        res.calibration,
        VolCalibration::Fallback {
            reason: FallbackReason::NonConvergence { iterations: 1, .. },
            ..
        }
    ));
    assert_eq!(res.iv(), cfg.fallback_vol);
    assert_eq!(res.calibration.status_label(), "fallback:non_convergence");

    let mut buf = Vec::new();
    write_results(&mut buf, std::slice::from_ref(&res)).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.lines().nth(1).unwrap().ends_with(",fallback:non_convergence"));
}

#[test]
fn test_batch_preserves_order_and_skips_bad_dates() {
    let contracts = vec![
        atm_contract("2025-01-01", "2026-01-01", 8.9160),
        atm_contract("not-a-date", "2026-01-01", 8.9160),
        atm_contract("2025-01-01", "2025-07-02", 6.0),
        atm_contract("2025-01-01", "2026-01-01", 500.0),
    ];
    let report = evaluate_batch(&contracts, &EvaluatorConfig::default()).unwrap();

    assert_eq!(report.results.len(), 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].index, 1);
    assert!(matches!(report.skipped[0].error, PricerError::DateParse { .. }));

    assert_eq!(report.results[0].contract.maturity_date, "2026-01-01");
    assert_eq!(report.results[1].contract.maturity_date, "2025-07-02");
    assert_eq!(report.results[2].contract.market_price, 500.0);

    assert_eq!(report.converged_count(), 2);
    assert_eq!(report.fallback_count(), 1);
    assert_eq!(report.metrics.count, 3);
    assert!(report.metrics.mae() > 100.0);
}

#[test]
fn test_non_finite_quotes_are_skipped_and_metrics_stay_finite() {
    let body = "trade_date,underlying,spot,r,q,option_type,maturity_date,strike,market_price\n\
                2025-01-01,A,100,0.02,0,C,2026-01-01,100,8.9160\n\
                2025-01-01,B,inf,0.02,0,C,2026-01-01,100,8.9160\n\
                2025-01-01,C,100,0.02,0,C,2026-01-01,100,nan\n";

    assert!(matches!(
        read_option_chain(body.as_bytes(), ParsePolicy::strict(), "non-finite"),
        Err(PricerError::InputFormat { line: 3, .. })
    ));

    let contracts = read_option_chain(body.as_bytes(), ParsePolicy::lenient(), "non-finite").unwrap();
    assert_eq!(contracts.len(), 3);

    let report = evaluate_batch(&contracts, &EvaluatorConfig::default()).unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].contract.underlying, "A");
    let skipped: Vec<usize> = report.skipped.iter().map(|s| s.index).collect();
    assert_eq!(skipped, vec![1, 2]);

    assert_eq!(report.metrics.count, 1);
    assert!(report.metrics.mae().is_finite());
    assert!(report.metrics.rmse().is_finite());
    assert!(report.metrics.mape().is_finite());
}

#[test]
fn test_invalid_configuration_aborts_batch() {
    let cfg = EvaluatorConfig {
        vol_lower: 1.0,
        vol_upper: 0.5,
        ..Default::default()
    };
    let contracts = vec![atm_contract("2025-01-01", "2026-01-01", 8.9)];
    assert!(evaluate_batch(&contracts, &cfg).is_err());
}

#[test]
fn test_sample_chain_end_to_end() {
    let contracts = read_option_chain_csv(sample_chain_path(), ParsePolicy::lenient())
        .expect("sample chain readable");
    // the blank line and the short trailing row are dropped
    assert_eq!(contracts.len(), 18);

    let report = evaluate_batch(&contracts, &EvaluatorConfig::default()).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(report.fallback_count(), 1);

    let same_day = &report.results[16];
    assert_eq!(same_day.ttm, 1.0 / 365.0);

    let overpriced = &report.results[17];
    assert!(overpriced.calibration.is_fallback());

    for res in report.results.iter().filter(|r| !r.calibration.is_fallback()) {
        assert!(res.error.abs() < 1e-7, "row not repriced: {:?}", res);
        assert!(res.iv() > 0.05 && res.iv() < 1.0);
    }

    println!(
        "\nMAE={} RMSE={} MAPE={}%",
        report.metrics.mae(),
        report.metrics.rmse(),
        report.metrics.mape()
    );

    let mut buf = Vec::new();
    write_results(&mut buf, &report.results).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 19);
    assert_eq!(lines[0], RESULT_COLUMNS.join(","));
    assert!(lines[1].starts_with("2025-09-19,AAPL,245.50000000,0.04250000,0.00450000,C,2025-10-17,230.00000000,17.91000000,0.07671233,"));
    assert!(lines[1].ends_with(",converged"));
    assert!(lines[18].ends_with(",fallback:price_out_of_bounds"));
    for line in &lines[1..] {
        assert_eq!(line.split(',').count(), RESULT_COLUMNS.len());
    }
}

#[test]
fn test_strict_policy_rejects_sample_chain() {
    let result = read_option_chain_csv(sample_chain_path(), ParsePolicy::strict());
    assert!(matches!(result, Err(PricerError::InputFormat { .. })));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = read_option_chain_csv("does/not/exist.csv", ParsePolicy::lenient());
    assert!(matches!(result, Err(PricerError::Io { .. })));
}

#[test]
fn test_empty_batch_writes_header_only() {
    let contracts = read_option_chain(
        "trade_date,underlying,spot,r,q,option_type,maturity_date,strike,market_price\n".as_bytes(),
        ParsePolicy::lenient(),
        "header-only",
    )
    .unwrap();
    let report = evaluate_batch(&contracts, &EvaluatorConfig::default()).unwrap();
    assert_eq!(report.metrics.mae(), 0.0);

    let mut buf = Vec::new();
    write_results(&mut buf, &report.results).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
}
