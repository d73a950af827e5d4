//! Batch pricer for European option chains.
//!
//! ```text
//! bs_pricer --chain data/option_chain_sample.csv --out results.csv
//! bs_pricer --chain chain.csv --out results.csv --strict --fallback-vol 0.25
//! ```
//!
//! Reads the option chain, calibrates implied volatility per contract, writes
//! one valuation row per contract and prints MAE / RMSE / MAPE and the
//! converged / fallback / skipped counts to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use fast_iv::evaluator::{evaluate_batch, EvaluatorConfig};
use fast_iv::input::{read_option_chain_csv, ParsePolicy};
use fast_iv::math_utils::Timer;
use fast_iv::output::write_results_to_csv;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "bs_pricer")]
#[command(about = "Price European options and solve implied volatility for an option chain")]
#[command(version)]
struct Cli {
    /// Input option chain CSV
    #[arg(long)]
    chain: PathBuf,

    /// Output CSV with one valuation row per contract
    #[arg(long)]
    out: PathBuf,

    /// Reject malformed rows instead of dropping or zero-filling them
    #[arg(long)]
    strict: bool,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Newton-Raphson starting volatility
    #[arg(long, default_value_t = 0.20)]
    initial_guess: f64,

    /// Absolute price tolerance for the implied vol solver
    #[arg(long, default_value_t = 1e-7)]
    tolerance: f64,

    /// Solver iteration budget
    #[arg(long, default_value_t = 100)]
    max_iterations: usize,

    /// Lower volatility bound
    #[arg(long, default_value_t = 1e-6)]
    vol_min: f64,

    /// Upper volatility bound
    #[arg(long, default_value_t = 5.0)]
    vol_max: f64,

    /// Volatility used (and flagged) when calibration fails
    #[arg(long, default_value_t = 0.20)]
    fallback_vol: f64,

    /// Year fraction substituted for same-day or expired contracts
    #[arg(long, default_value_t = 1.0 / 365.0)]
    min_ttm: f64,
}

impl Cli {
    fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            initial_guess: self.initial_guess,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            vol_lower: self.vol_min,
            vol_upper: self.vol_max,
            fallback_vol: self.fallback_vol,
            min_ttm: self.min_ttm,
        }
    }

    fn parse_policy(&self) -> ParsePolicy {
        if self.strict {
            ParsePolicy::strict()
        } else {
            ParsePolicy::lenient()
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fast_iv=info,bs_pricer=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let threads = cli.threads.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("failed to configure worker pool")?;

    let cfg = cli.evaluator_config();
    let mut timer = Timer::new();
    timer.start();

    let contracts = read_option_chain_csv(&cli.chain, cli.parse_policy())
        .with_context(|| format!("reading option chain {}", cli.chain.display()))?;
    info!(contracts = contracts.len(), threads, "option chain loaded");

    let report = evaluate_batch(&contracts, &cfg).context("invalid pricer configuration")?;

    write_results_to_csv(&cli.out, &report.results)
        .with_context(|| format!("writing results {}", cli.out.display()))?;

    for skipped in &report.skipped {
        eprintln!(
            "skipped row {} ({}): {}",
            skipped.index + 1,
            skipped.underlying,
            skipped.error
        );
    }

    println!("MAE={}", report.metrics.mae());
    println!("RMSE={}", report.metrics.rmse());
    println!("MAPE={}%", report.metrics.mape());
    println!(
        "evaluated={} converged={} fallback={} skipped={}",
        report.results.len(),
        report.converged_count(),
        report.fallback_count(),
        report.skipped.len()
    );

    info!(
        elapsed_ms = timer.elapsed_ms(),
        out = %cli.out.display(),
        "done"
    );

    Ok(())
}
