use core_sim::{Catalog, Direction, Fill, Instrument, Ledger, LedgerError, LotMode};
use rand::{Rng, RngCore};
use tracing::debug;

const MAX_RANDOM_QTY: u32 = 10;

/// Flips a fair coin per instrument, then buys or sells `0..10` whole units.
pub fn random_trades(ledger: &mut Ledger, catalog: &Catalog, rng: &mut dyn RngCore) -> Vec<Fill> {
    let mut fills = Vec::new();

    for instrument in catalog.iter() {
        let buy = rng.gen_bool(0.5);
        let quantity = f64::from(rng.gen_range(0..MAX_RANDOM_QTY));
        let fill = if buy {
            ledger.buy(instrument, quantity, LotMode::Whole)
        } else {
            ledger.sell(instrument, quantity, LotMode::Whole)
        };
        fills.extend(fill);
    }

    fills
}

/// Rebalances every listing to `1/N` of portfolio value: a sell-only pass
/// first, so freed cash is available to the buy-only pass that follows.
pub fn equal_weight(
    ledger: &mut Ledger,
    catalog: &Catalog,
    lots: LotMode,
) -> Result<Vec<Fill>, LedgerError> {
    let mut fills = Vec::new();
    if catalog.is_empty() {
        return Ok(fills);
    }

    let target = 1.0 / catalog.len() as f64;
    for direction in [Direction::SellOnly, Direction::BuyOnly] {
        for instrument in catalog.iter() {
            let fill = ledger.adjust_to_percentage(instrument, target, catalog, direction, lots)?;
            fills.extend(fill);
        }
    }

    Ok(fills)
}

/// Splits current cash evenly across listings not yet held. Held positions
/// are never topped up or trimmed.
pub fn buy_and_hold(ledger: &mut Ledger, catalog: &Catalog, lots: LotMode) -> Vec<Fill> {
    let unheld: Vec<&Instrument> = catalog
        .iter()
        .filter(|instrument| !ledger.holds(instrument.symbol()))
        .collect();
    if unheld.is_empty() {
        return Vec::new();
    }

    let budget = ledger.cash() / unheld.len() as f64;
    debug!(unheld = unheld.len(), budget, "buy-and-hold entering positions");
    unheld
        .into_iter()
        .filter_map(|instrument| ledger.buy_worth(instrument, budget, lots))
        .collect()
}
