mod catalog;
mod config;
mod error;
mod fills;
mod instrument;
mod ledger;
mod sizing;

pub use catalog::{Catalog, InstrumentMut};
pub use config::SimConfig;
pub use error::LedgerError;
pub use fills::{Fill, Side};
pub use instrument::Instrument;
pub use ledger::Ledger;
pub use sizing::{Direction, LotMode};
