pub mod benchmark;
pub mod engine;
pub mod events;
pub mod logging;
pub mod metrics;
pub mod price_rule;
pub mod replay;
pub mod snapshot;

pub use engine::{SimError, Simulation};
pub use price_rule::{CustomPriceRule, ParsePriceRuleError, PriceRule};
pub use snapshot::{AgentSnapshot, SimulationSnapshot};

/// Tick rate the benches report against for a small catalog and a handful
/// of agents.
pub const TARGET_TICKS_PER_SEC: u64 = 100_000;
