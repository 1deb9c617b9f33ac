use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

/// An executed trade against the quoted price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub side: Side,
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
}

impl Fill {
    pub fn new(side: Side, symbol: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self {
            side,
            symbol: symbol.into(),
            quantity,
            price,
        }
    }

    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }
}
