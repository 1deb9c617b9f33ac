use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("instrument `{symbol}` is not listed in the catalog")]
    MissingInstrument { symbol: String },
}
