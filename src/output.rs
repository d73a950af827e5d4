// src/output.rs
use crate::contract::ValuationResult;
use crate::error::{PricerError, PricerResult};
use csv::WriterBuilder;
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output columns, in order
pub const RESULT_COLUMNS: [&str; 19] = [
    "trade_date",
    "underlying",
    "spot",
    "r",
    "q",
    "option_type",
    "maturity_date",
    "strike",
    "market_price",
    "ttm",
    "iv",
    "model_price",
    "error",
    "delta",
    "gamma",
    "vega",
    "theta",
    "rho",
    "iv_status",
];

/// Fixed-point rendering with 8 decimals
fn fixed8<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{:.8}", value))
}

#[derive(Serialize)]
struct ResultRecord<'a> {
    trade_date: &'a str,
    underlying: &'a str,
    #[serde(serialize_with = "fixed8")]
    spot: f64,
    #[serde(serialize_with = "fixed8")]
    r: f64,
    #[serde(serialize_with = "fixed8")]
    q: f64,
    option_type: char,
    maturity_date: &'a str,
    #[serde(serialize_with = "fixed8")]
    strike: f64,
    #[serde(serialize_with = "fixed8")]
    market_price: f64,
    #[serde(serialize_with = "fixed8")]
    ttm: f64,
    #[serde(serialize_with = "fixed8")]
    iv: f64,
    #[serde(serialize_with = "fixed8")]
    model_price: f64,
    #[serde(serialize_with = "fixed8")]
    error: f64,
    #[serde(serialize_with = "fixed8")]
    delta: f64,
    #[serde(serialize_with = "fixed8")]
    gamma: f64,
    #[serde(serialize_with = "fixed8")]
    vega: f64,
    #[serde(serialize_with = "fixed8")]
    theta: f64,
    #[serde(serialize_with = "fixed8")]
    rho: f64,
    iv_status: String,
}

impl<'a> From<&'a ValuationResult> for ResultRecord<'a> {
    fn from(res: &'a ValuationResult) -> Self {
        let c = &res.contract;
        ResultRecord {
            trade_date: &c.trade_date,
            underlying: &c.underlying,
            spot: c.spot,
            r: c.r,
            q: c.q,
            option_type: c.kind.as_char(),
            maturity_date: &c.maturity_date,
            strike: c.strike,
            market_price: c.market_price,
            ttm: res.ttm,
            iv: res.iv(),
            model_price: res.model_price,
            error: res.error,
            delta: res.greeks.delta,
            gamma: res.greeks.gamma,
            vega: res.greeks.vega,
            theta: res.greeks.theta,
            rho: res.greeks.rho,
            iv_status: res.calibration.status_label(),
        }
    }
}

fn io_error(path: &Path, e: impl std::fmt::Display) -> PricerError {
    PricerError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Writes the header and one row per result, in the order given.
///
/// The header is written even for an empty batch.
pub fn write_results<W: Write>(writer: W, results: &[ValuationResult]) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(RESULT_COLUMNS)?;
    for res in results {
        wtr.serialize(ResultRecord::from(res))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_results_to_csv<P: AsRef<Path>>(path: P, results: &[ValuationResult]) -> PricerResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    write_results(file, results).map_err(|e| io_error(path, e))
}
