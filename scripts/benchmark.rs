// scripts/benchmark.rs
//! Throughput benchmark for batch implied-volatility calibration.
//!
//! Generates synthetic option chains priced at known volatilities, runs the
//! batch evaluator over them and reports contracts/sec together with the
//! worst recovered-volatility error.

use fast_iv::analytics::bs_analytic::{bs_price, OptionKind};
use fast_iv::contract::OptionContract;
use fast_iv::evaluator::{evaluate_batch, EvaluatorConfig};
use fast_iv::math_utils::Timer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal, Uniform};
use std::env;
use std::fs::File;
use std::io::Write;
use std::process::Command;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rust_version: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        let rust_version = Command::new("rustc")
            .arg("--version")
            .output()
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .unwrap_or_else(|_| "Unknown Rust version".to_string());

        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rust_version,
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    contracts: usize,
    time_ms: f64,
    throughput_per_sec: f64,
    fallback: usize,
    max_weighted_vol_error: f64,
}

/// Contracts with moneyness in [0.7, 1.3], 1 week to 2 years, vols around 25%
fn synthetic_chain(n: usize, seed: u64) -> (Vec<OptionContract>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let moneyness = Uniform::new(0.7, 1.3);
    let days = Uniform::new_inclusive(7i64, 730);
    let vol = LogNormal::new((0.25f64).ln(), 0.4).expect("valid lognormal parameters");
    let trade = chrono::NaiveDate::from_ymd_opt(2025, 1, 2).expect("valid date");

    let mut contracts = Vec::with_capacity(n);
    let mut vols = Vec::with_capacity(n);
    for _ in 0..n {
        let spot = 100.0;
        let strike = spot * moneyness.sample(&mut rng);
        let d = days.sample(&mut rng);
        let t = d as f64 / 365.0;
        let sigma: f64 = vol.sample(&mut rng).clamp(0.05, 1.5);
        let r = rng.gen_range(-0.01..0.06);
        let q = rng.gen_range(0.0..0.03);
        let kind = if rng.gen_bool(0.5) {
            OptionKind::Call
        } else {
            OptionKind::Put
        };

        contracts.push(OptionContract {
            trade_date: trade.format("%Y-%m-%d").to_string(),
            underlying: "SYN".to_string(),
            spot,
            r,
            q,
            kind,
            maturity_date: (trade + chrono::Duration::days(d)).format("%Y-%m-%d").to_string(),
            strike,
            market_price: bs_price(spot, strike, r, q, sigma, t, kind),
        });
        vols.push(sigma);
    }
    (contracts, vols)
}

fn run_batch_benchmarks() -> Vec<BenchmarkResult> {
    let cfg = EvaluatorConfig::default();
    let mut results = Vec::new();

    for &n in &[1_000, 10_000, 100_000] {
        println!("Running batch calibration with {} contracts...", n);
        let (contracts, vols) = synthetic_chain(n, 42);

        let mut timer = Timer::new();
        timer.start();
        let report = evaluate_batch(&contracts, &cfg).expect("Valid configuration");
        let time_ms = timer.elapsed_ms();

        // deep OTM short-dated quotes can sit below the price tolerance; exclude fallbacks
        let max_weighted_vol_error = report
            .results
            .iter()
            .zip(&vols)
            .filter(|(r, _)| !r.calibration.is_fallback())
            .map(|(r, v)| (r.iv() - v).abs() * r.greeks.vega)
            .fold(0.0, f64::max);

        results.push(BenchmarkResult {
            name: format!("Batch IV ({}k contracts)", n / 1000),
            contracts: n,
            time_ms,
            throughput_per_sec: n as f64 / (time_ms / 1000.0),
            fallback: report.fallback_count(),
            max_weighted_vol_error,
        });
    }

    results
}

fn write_results_to_csv(results: &[BenchmarkResult], system_info: &SystemInfo, filename: &str) -> std::io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rust Version: {}", system_info.rust_version)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "Benchmark,Contracts,Time_ms,Throughput_per_sec,Fallback,Max_Vega_Weighted_Vol_Error")?;

    for result in results {
        writeln!(
            file,
            "{},{},{:.2},{:.0},{},{:.3e}",
            result.name,
            result.contracts,
            result.time_ms,
            result.throughput_per_sec,
            result.fallback,
            result.max_weighted_vol_error
        )?;
    }
    Ok(())
}

fn main() {
    println!("fast-iv Batch Calibration Benchmark");
    println!("===================================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rust Version: {}", system_info.rust_version);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let results = run_batch_benchmarks();

    println!("\n{:=<80}", "");
    println!(
        "{:<30} {:>10} {:>12} {:>14} {:>9}",
        "Benchmark", "Contracts", "Time (ms)", "Contracts/s", "Fallback"
    );
    println!("{:-<80}", "");
    for result in &results {
        println!(
            "{:<30} {:>10} {:>12.2} {:>14.0} {:>9}",
            result.name, result.contracts, result.time_ms, result.throughput_per_sec, result.fallback
        );
    }
    println!("{:=<80}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    match write_results_to_csv(&results, &system_info, &filename) {
        Ok(()) => println!("\nResults saved to: {}", filename),
        Err(e) => eprintln!("\nCould not write {}: {}", filename, e),
    }
}
