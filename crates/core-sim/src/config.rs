use serde::{Deserialize, Serialize};

use crate::sizing::LotMode;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub seed: u64,
    pub initial_cash: f64,
    /// Half-width of the default random-walk price move per tick.
    pub max_price_move: f64,
    pub lot_mode: LotMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_cash: 1_000.0,
            max_price_move: 0.05,
            lot_mode: LotMode::Fractional,
        }
    }
}
