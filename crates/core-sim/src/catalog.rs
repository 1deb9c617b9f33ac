use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::instrument::Instrument;

/// Symbol-keyed set of tradable instruments.
///
/// Iteration is ordered by symbol, so two catalogs holding the same symbols
/// are always walked in the same order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Instrument>", into = "Vec<Instrument>")]
pub struct Catalog {
    instruments: BTreeMap<String, Instrument>,
}

/// Mutable view of a listed instrument. Prices can move, the symbol cannot,
/// so an instrument always stays keyed under its own symbol.
#[derive(Debug)]
pub struct InstrumentMut<'a> {
    inner: &'a mut Instrument,
}

impl InstrumentMut<'_> {
    pub fn symbol(&self) -> &str {
        self.inner.symbol()
    }

    pub fn price(&self) -> f64 {
        self.inner.price()
    }

    pub fn set_price(&mut self, price: f64) {
        self.inner.set_price(price);
    }

    pub fn rise(&mut self, pct: f64) {
        self.inner.rise(pct);
    }

    pub fn fall(&mut self, pct: f64) {
        self.inner.fall(pct);
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists `instrument` under its symbol, returning whatever it displaced.
    pub fn add(&mut self, instrument: Instrument) -> Option<Instrument> {
        self.instruments
            .insert(instrument.symbol().to_owned(), instrument)
    }

    pub fn remove(&mut self, symbol: &str) -> Option<Instrument> {
        self.instruments.remove(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.get(symbol)
    }

    pub fn get_mut(&mut self, symbol: &str) -> Option<InstrumentMut<'_>> {
        self.instruments
            .get_mut(symbol)
            .map(|inner| InstrumentMut { inner })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.instruments.contains_key(symbol)
    }

    pub fn price(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).map(Instrument::price)
    }

    /// Returns `false` when `symbol` is not listed.
    pub fn update_price(&mut self, symbol: &str, price: f64) -> bool {
        match self.instruments.get_mut(symbol) {
            Some(instrument) => {
                instrument.set_price(price);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = InstrumentMut<'_>> {
        self.instruments
            .values_mut()
            .map(|inner| InstrumentMut { inner })
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.instruments.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .instruments
                .iter()
                .all(|(symbol, instrument)| other.price(symbol) == Some(instrument.price()))
    }
}

impl FromIterator<Instrument> for Catalog {
    fn from_iter<I: IntoIterator<Item = Instrument>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for instrument in iter {
            catalog.add(instrument);
        }
        catalog
    }
}

impl From<Vec<Instrument>> for Catalog {
    fn from(instruments: Vec<Instrument>) -> Self {
        instruments.into_iter().collect()
    }
}

impl From<Catalog> for Vec<Instrument> {
    fn from(catalog: Catalog) -> Self {
        catalog.instruments.into_values().collect()
    }
}
