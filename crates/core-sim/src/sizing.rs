use serde::{Deserialize, Serialize};

/// Relative slack allowed when a quantity or amount has been through a
/// division by price and comes back one rounding step off.
pub(crate) const ROUNDING_TOLERANCE: f64 = 1e-12;

pub(crate) fn within_rounding(a: f64, b: f64) -> bool {
    (a - b).abs() <= ROUNDING_TOLERANCE * a.abs().max(b.abs())
}

/// Whether trades may use fractional quantities or only whole units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LotMode {
    #[default]
    Fractional,
    Whole,
}

impl LotMode {
    pub fn apply(self, quantity: f64) -> f64 {
        match self {
            Self::Fractional => quantity,
            Self::Whole => {
                let nearest = quantity.round();
                if within_rounding(quantity, nearest) {
                    nearest
                } else {
                    quantity.floor()
                }
            }
        }
    }
}

/// Which side of the book a rebalance may trade on.
///
/// Multi-instrument rebalances run a `SellOnly` pass before a `BuyOnly` pass
/// so the cash freed by sells is available to the buys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    Both,
    BuyOnly,
    SellOnly,
}

impl Direction {
    pub fn allows_buy(self) -> bool {
        matches!(self, Self::Both | Self::BuyOnly)
    }

    pub fn allows_sell(self) -> bool {
        matches!(self, Self::Both | Self::SellOnly)
    }
}
