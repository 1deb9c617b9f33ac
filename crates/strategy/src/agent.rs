use core_sim::{Catalog, Fill, Ledger, LedgerError};
use rand::RngCore;

use crate::dispatch::Strategy;

/// A ledger driven by a strategy.
///
/// Cloning copies the holdings map, so trades on a clone never reach the
/// original. Equality compares cash, holdings and strategy tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    ledger: Ledger,
    strategy: Strategy,
}

impl Agent {
    pub fn new(ledger: Ledger, strategy: Strategy) -> Self {
        Self { ledger, strategy }
    }

    pub fn with_cash(cash: f64, strategy: Strategy) -> Self {
        Self::new(Ledger::new(cash), strategy)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    pub fn cash(&self) -> f64 {
        self.ledger.cash()
    }

    pub fn portfolio_value(&self, catalog: &Catalog) -> Result<f64, LedgerError> {
        self.ledger.portfolio_value(catalog)
    }

    pub fn execute_strategy(
        &mut self,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Fill>, LedgerError> {
        self.strategy.execute(&mut self.ledger, catalog, rng)
    }
}
