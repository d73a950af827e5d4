// src/metrics.rs
//! Aggregate pricing-error statistics over a batch.
//!
//! All state is sums and counts, so partial accumulators built on different
//! threads can be combined in any order with [`ErrorMetrics::merge`].

/// Market prices at or below this magnitude are excluded from the MAPE sum
pub const MAPE_PRICE_FLOOR: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ErrorMetrics {
    pub count: usize,
    pub sum_abs_error: f64,
    pub sum_sq_error: f64,
    pub sum_abs_pct_error: f64,
}

impl ErrorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, model_price: f64, market_price: f64) {
        let e = model_price - market_price;
        self.count += 1;
        self.sum_abs_error += e.abs();
        self.sum_sq_error += e * e;
        if market_price.abs() > MAPE_PRICE_FLOOR {
            self.sum_abs_pct_error += e.abs() / market_price.abs();
        }
    }

    pub fn merge(mut self, other: ErrorMetrics) -> ErrorMetrics {
        self.count += other.count;
        self.sum_abs_error += other.sum_abs_error;
        self.sum_sq_error += other.sum_sq_error;
        self.sum_abs_pct_error += other.sum_abs_pct_error;
        self
    }

    /// Mean absolute error, 0 for an empty batch
    pub fn mae(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum_abs_error / self.count as f64
        }
    }

    /// Root mean squared error, 0 for an empty batch
    pub fn rmse(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.sum_sq_error / self.count as f64).sqrt()
        }
    }

    /// Mean absolute percentage error in percent.
    ///
    /// The denominator is the full row count, including rows whose market
    /// price was too small to contribute a term.
    pub fn mape(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            100.0 * self.sum_abs_pct_error / self.count as f64
        }
    }
}

impl FromIterator<(f64, f64)> for ErrorMetrics {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let mut metrics = ErrorMetrics::new();
        for (model, market) in iter {
            metrics.push(model, market);
        }
        metrics
    }
}
