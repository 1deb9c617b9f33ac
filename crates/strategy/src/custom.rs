use std::{fmt, sync::Arc};

use core_sim::{Catalog, Fill, Ledger, LedgerError};
use rand::RngCore;

pub type StrategyRule =
    dyn Fn(&mut Ledger, &Catalog, &mut dyn RngCore) -> Result<Vec<Fill>, LedgerError> + Send + Sync;

/// A caller-supplied decision rule identified by an explicit key.
///
/// Two custom strategies are equal when their keys are equal; the closures
/// themselves are never compared. Clones share the same closure.
#[derive(Clone)]
pub struct CustomStrategy {
    key: String,
    rule: Arc<StrategyRule>,
}

impl CustomStrategy {
    pub fn new<F>(key: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&mut Ledger, &Catalog, &mut dyn RngCore) -> Result<Vec<Fill>, LedgerError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            key: key.into(),
            rule: Arc::new(rule),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn execute(
        &self,
        ledger: &mut Ledger,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Fill>, LedgerError> {
        (self.rule)(ledger, catalog, rng)
    }
}

impl PartialEq for CustomStrategy {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CustomStrategy {}

impl fmt::Debug for CustomStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomStrategy")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
