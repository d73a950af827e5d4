// src/input.rs
//! Option-chain CSV reader.
//!
//! Expected columns, header row required:
//! ```text
//! trade_date,underlying,spot,r,q,option_type,maturity_date,strike,market_price
//! ```
//! Blank lines are skipped and fields are trimmed. How malformed rows are
//! treated is controlled by [`ParsePolicy`].

use crate::analytics::bs_analytic::OptionKind;
use crate::contract::OptionContract;
use crate::error::{PricerError, PricerResult};
use bitflags::bitflags;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Number of columns an option-chain record must provide
pub const CHAIN_COLUMNS: usize = 9;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParsePolicy: u32 {
        /// Unparseable numeric fields become 0.0 instead of failing
        const LENIENT_NUMBERS     = 1 << 0;
        /// Rows with fewer than nine fields are dropped instead of failing
        const DROP_SHORT_ROWS     = 1 << 1;
        /// Any option type other than C is read as a put
        const LENIENT_OPTION_TYPE = 1 << 2;
    }
}

impl ParsePolicy {
    /// Accept everything the reader can make sense of
    pub fn lenient() -> Self {
        ParsePolicy::all()
    }

    /// Reject every malformed row
    pub fn strict() -> Self {
        ParsePolicy::empty()
    }
}

impl Default for ParsePolicy {
    fn default() -> Self {
        ParsePolicy::lenient()
    }
}

/// Reads an option chain from a file.
///
/// # Errors
///
/// `Io` when the file cannot be opened, `EmptyInput` when it has no header
/// row, and `InputFormat` for rows rejected by `policy`.
pub fn read_option_chain_csv<P: AsRef<Path>>(
    path: P,
    policy: ParsePolicy,
) -> PricerResult<Vec<OptionContract>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PricerError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    read_option_chain(file, policy, &path.display().to_string())
}

/// Reads an option chain from any reader; `source` names it in errors.
pub fn read_option_chain<R: Read>(
    reader: R,
    policy: ParsePolicy,
    source: &str,
) -> PricerResult<Vec<OptionContract>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| PricerError::Io {
        path: source.to_string(),
        reason: e.to_string(),
    })?;
    if headers.is_empty() {
        return Err(PricerError::EmptyInput {
            path: source.to_string(),
        });
    }

    let mut contracts = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| PricerError::InputFormat {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // whitespace-only line
        if record.iter().all(str::is_empty) {
            continue;
        }

        if record.len() < CHAIN_COLUMNS {
            if policy.contains(ParsePolicy::DROP_SHORT_ROWS) {
                debug!(line, fields = record.len(), "dropping short row");
                continue;
            }
            return Err(PricerError::InputFormat {
                line,
                reason: format!(
                    "expected {} fields, found {}",
                    CHAIN_COLUMNS,
                    record.len()
                ),
            });
        }

        contracts.push(parse_record(&record, line, policy)?);
    }

    debug!(source, rows = contracts.len(), "option chain loaded");
    Ok(contracts)
}

fn parse_record(record: &StringRecord, line: u64, policy: ParsePolicy) -> PricerResult<OptionContract> {
    let field = |i: usize| record.get(i).unwrap_or("");
    let number = |i: usize, name: &str| parse_number(field(i), name, line, policy);

    Ok(OptionContract {
        trade_date: field(0).to_string(),
        underlying: field(1).to_string(),
        spot: number(2, "spot")?,
        r: number(3, "r")?,
        q: number(4, "q")?,
        kind: parse_option_kind(field(5), line, policy)?,
        maturity_date: field(6).to_string(),
        strike: number(7, "strike")?,
        market_price: number(8, "market_price")?,
    })
}

/// `inf` and `nan` parse as floats; strict reading rejects them as well
fn parse_number(raw: &str, name: &str, line: u64, policy: ParsePolicy) -> PricerResult<f64> {
    let lenient = policy.contains(ParsePolicy::LENIENT_NUMBERS);
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() || lenient => Ok(v),
        Ok(_) => Err(PricerError::InputFormat {
            line,
            reason: format!("field '{}' = '{}': not a finite number", name, raw),
        }),
        Err(_) if lenient => Ok(0.0),
        Err(e) => Err(PricerError::InputFormat {
            line,
            reason: format!("field '{}' = '{}': {}", name, raw, e),
        }),
    }
}

/// Empty defaults to a call
fn parse_option_kind(raw: &str, line: u64, policy: ParsePolicy) -> PricerResult<OptionKind> {
    let Some(c) = raw.chars().next() else {
        return Ok(OptionKind::Call);
    };
    match OptionKind::from_char(c) {
        Some(kind) if raw.len() == 1 || policy.contains(ParsePolicy::LENIENT_OPTION_TYPE) => {
            Ok(kind)
        }
        _ if policy.contains(ParsePolicy::LENIENT_OPTION_TYPE) => Ok(OptionKind::Put),
        _ => Err(PricerError::InputFormat {
            line,
            reason: format!("option_type '{}' is not C or P", raw),
        }),
    }
}
