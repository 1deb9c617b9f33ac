use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::LedgerError;
use crate::fills::{Fill, Side};
use crate::instrument::Instrument;
use crate::sizing::{within_rounding, Direction, LotMode};

/// Cash plus per-symbol holdings.
///
/// Trades execute in full against the instrument's quoted price or not at all:
/// a buy needs `cash >= price * quantity`, a sell needs the full quantity on
/// hand. Both checks allow one rounding step of slack, so spending all the
/// cash or selling a whole position by value always goes through. Every
/// skipped trade returns `None` and leaves the ledger untouched.
///
/// A symbol is present in `holdings` exactly when its quantity is positive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    cash: f64,
    holdings: BTreeMap<String, f64>,
}

impl Ledger {
    pub fn new(cash: f64) -> Self {
        Self {
            cash,
            holdings: BTreeMap::new(),
        }
    }

    /// Non-positive quantities are dropped.
    pub fn with_holdings<S, I>(cash: f64, holdings: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        let holdings = holdings
            .into_iter()
            .map(|(symbol, quantity)| (symbol.into(), quantity))
            .filter(|(_, quantity)| *quantity > 0.0)
            .collect();

        Self { cash, holdings }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn set_cash(&mut self, cash: f64) {
        self.cash = cash;
    }

    pub fn holdings(&self) -> &BTreeMap<String, f64> {
        &self.holdings
    }

    pub fn holds(&self, symbol: &str) -> bool {
        self.holdings.contains_key(symbol)
    }

    /// Zero when the symbol is not held.
    pub fn quantity(&self, symbol: &str) -> f64 {
        self.holdings.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn buy(&mut self, instrument: &Instrument, quantity: f64, lots: LotMode) -> Option<Fill> {
        if !is_tradable(quantity) {
            return None;
        }
        let quantity = lots.apply(quantity);
        if quantity <= 0.0 {
            return None;
        }

        let symbol = instrument.symbol();
        let fill = Fill::new(Side::Buy, symbol, quantity, instrument.price());
        let notional = fill.notional();
        if notional > self.cash && !within_rounding(notional, self.cash) {
            debug!(symbol, quantity, notional, cash = self.cash, "buy skipped: insufficient cash");
            return None;
        }

        // A notional one rounding step over cash spends exactly the cash.
        self.cash = (self.cash - notional).max(0.0);
        *self.holdings.entry(symbol.to_owned()).or_insert(0.0) += quantity;
        self.prune(symbol);

        Some(fill)
    }

    pub fn sell(&mut self, instrument: &Instrument, quantity: f64, lots: LotMode) -> Option<Fill> {
        if !is_tradable(quantity) {
            return None;
        }
        let quantity = lots.apply(quantity);
        if quantity <= 0.0 {
            return None;
        }

        let symbol = instrument.symbol();
        let held = self.holdings.get_mut(symbol)?;
        let quantity = if within_rounding(quantity, *held) {
            *held
        } else {
            quantity
        };
        if *held < quantity {
            debug!(symbol, quantity, held = *held, "sell skipped: insufficient holdings");
            return None;
        }

        let fill = Fill::new(Side::Sell, symbol, quantity, instrument.price());
        *held -= quantity;
        self.cash += fill.notional();
        self.prune(symbol);

        Some(fill)
    }

    /// Buys as many units as `amount` pays for at the quoted price.
    pub fn buy_worth(
        &mut self,
        instrument: &Instrument,
        amount: f64,
        lots: LotMode,
    ) -> Option<Fill> {
        if !is_tradable(amount) {
            return None;
        }
        let quantity = lots.apply(amount / instrument.price());
        self.buy(instrument, quantity, lots)
    }

    /// Sells as many units as are worth `amount` at the quoted price.
    pub fn sell_worth(
        &mut self,
        instrument: &Instrument,
        amount: f64,
        lots: LotMode,
    ) -> Option<Fill> {
        if !is_tradable(amount) {
            return None;
        }
        let quantity = lots.apply(amount / instrument.price());
        self.sell(instrument, quantity, lots)
    }

    /// Cash plus every holding marked at its catalog price.
    pub fn portfolio_value(&self, catalog: &Catalog) -> Result<f64, LedgerError> {
        self.holdings
            .iter()
            .try_fold(self.cash, |value, (symbol, quantity)| {
                Ok(value + quantity * listed_price(catalog, symbol)?)
            })
    }

    /// Trades toward holding exactly `target` units.
    ///
    /// An instrument that is not held is always bought up to `target`, even
    /// under `Direction::SellOnly`.
    pub fn adjust_to(
        &mut self,
        instrument: &Instrument,
        target: f64,
        direction: Direction,
        lots: LotMode,
    ) -> Option<Fill> {
        let Some(&current) = self.holdings.get(instrument.symbol()) else {
            return self.buy(instrument, target, lots);
        };

        let delta = target - current;
        if delta > 0.0 && direction.allows_buy() {
            self.buy(instrument, delta, lots)
        } else if delta < 0.0 && direction.allows_sell() {
            self.sell(instrument, -delta, lots)
        } else {
            None
        }
    }

    /// Trades toward holding `fraction` of total portfolio value in `instrument`.
    pub fn adjust_to_percentage(
        &mut self,
        instrument: &Instrument,
        fraction: f64,
        catalog: &Catalog,
        direction: Direction,
        lots: LotMode,
    ) -> Result<Option<Fill>, LedgerError> {
        let total_value = self.portfolio_value(catalog)?;
        let symbol = instrument.symbol();
        let current_value = listed_price(catalog, symbol)? * self.quantity(symbol);
        let delta = total_value * fraction - current_value;

        let fill = if delta > 0.0 {
            if direction.allows_buy() {
                self.buy_worth(instrument, delta, lots)
            } else {
                None
            }
        } else if direction.allows_sell() {
            self.sell_worth(instrument, -delta, lots)
        } else {
            None
        };

        Ok(fill)
    }

    fn prune(&mut self, symbol: &str) {
        if self.holdings.get(symbol).is_some_and(|quantity| *quantity <= 0.0) {
            self.holdings.remove(symbol);
        }
    }
}

fn is_tradable(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

fn listed_price(catalog: &Catalog, symbol: &str) -> Result<f64, LedgerError> {
    catalog
        .price(symbol)
        .ok_or_else(|| LedgerError::MissingInstrument {
            symbol: symbol.to_owned(),
        })
}
