use std::str::FromStr;

use core_sim::{Catalog, Fill, Ledger, LedgerError, LotMode};
use rand::RngCore;
use thiserror::Error;

use crate::custom::CustomStrategy;
use crate::rules;

/// The decision rule an agent applies once per tick.
///
/// Strategies compare by tag: built-ins by variant and lot mode, custom rules
/// by their key.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Random,
    EqualWeight { lots: LotMode },
    BuyAndHold { lots: LotMode },
    Custom(CustomStrategy),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy `{0}`; expected one of: random, equal-weight, buy-and-hold")]
pub struct ParseStrategyError(String);

impl Strategy {
    pub fn equal_weight() -> Self {
        Self::EqualWeight {
            lots: LotMode::Fractional,
        }
    }

    pub fn buy_and_hold() -> Self {
        Self::BuyAndHold {
            lots: LotMode::Fractional,
        }
    }

    pub fn custom<F>(key: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&mut Ledger, &Catalog, &mut dyn RngCore) -> Result<Vec<Fill>, LedgerError>
            + Send
            + Sync
            + 'static,
    {
        Self::Custom(CustomStrategy::new(key, rule))
    }

    /// Rebinds the lot mode of a built-in rule. `Random` always trades whole
    /// units and custom rules choose their own sizing, so both are unchanged.
    pub fn with_lots(self, lots: LotMode) -> Self {
        match self {
            Self::EqualWeight { .. } => Self::EqualWeight { lots },
            Self::BuyAndHold { .. } => Self::BuyAndHold { lots },
            other => other,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Random => "random",
            Self::EqualWeight { .. } => "equal-weight",
            Self::BuyAndHold { .. } => "buy-and-hold",
            Self::Custom(custom) => custom.key(),
        }
    }

    pub fn execute(
        &self,
        ledger: &mut Ledger,
        catalog: &Catalog,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Fill>, LedgerError> {
        match self {
            Self::Random => Ok(rules::random_trades(ledger, catalog, rng)),
            Self::EqualWeight { lots } => rules::equal_weight(ledger, catalog, *lots),
            Self::BuyAndHold { lots } => Ok(rules::buy_and_hold(ledger, catalog, *lots)),
            Self::Custom(custom) => custom.execute(ledger, catalog, rng),
        }
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "random" => Ok(Self::Random),
            "equal-weight" => Ok(Self::equal_weight()),
            "buy-and-hold" => Ok(Self::buy_and_hold()),
            other => Err(ParseStrategyError(other.to_owned())),
        }
    }
}
