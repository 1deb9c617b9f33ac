use serde::{Deserialize, Serialize};

/// A symbol-keyed tradable unit quoted at a single price.
///
/// Prices move multiplicatively: `rise(p)` scales by `1 + p`, `fall(p)` by `1 - p`.
/// No clamping is applied, so `fall` with `p > 1` drives the price negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    symbol: String,
    price: f64,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        self.symbol = symbol.into();
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn set_price(&mut self, price: f64) {
        self.price = price;
    }

    pub fn rise(&mut self, pct: f64) {
        self.price *= 1.0 + pct;
    }

    pub fn fall(&mut self, pct: f64) {
        self.price *= 1.0 - pct;
    }
}
