mod agent;
mod custom;
mod dispatch;
pub mod rules;

pub use agent::Agent;
pub use custom::{CustomStrategy, StrategyRule};
pub use dispatch::{ParseStrategyError, Strategy};
