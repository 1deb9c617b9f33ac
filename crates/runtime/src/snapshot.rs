use std::collections::BTreeMap;

use core_sim::Instrument;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub strategy: String,
    pub cash: f64,
    pub holdings: BTreeMap<String, f64>,
    pub portfolio_value: f64,
}

/// Point-in-time view of a simulation, suitable for printing as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub time: u64,
    pub price_rule: String,
    pub instruments: Vec<Instrument>,
    pub agents: Vec<AgentSnapshot>,
}

impl SimulationSnapshot {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use core_sim::Instrument;

    use super::{AgentSnapshot, SimulationSnapshot};

    #[test]
    fn serializes_holdings_by_symbol() {
        let snapshot = SimulationSnapshot {
            time: 3,
            price_rule: "flat".to_owned(),
            instruments: vec![Instrument::new("AAPL", 100.0)],
            agents: vec![AgentSnapshot {
                strategy: "buy-and-hold".to_owned(),
                cash: 0.0,
                holdings: BTreeMap::from([("AAPL".to_owned(), 12.0)]),
                portfolio_value: 1_200.0,
            }],
        };

        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["time"], 3);
        assert_eq!(value["instruments"][0]["symbol"], "AAPL");
        assert_eq!(value["agents"][0]["holdings"]["AAPL"], 12.0);

        let restored: SimulationSnapshot =
            serde_json::from_str(&snapshot.to_json_pretty().unwrap()).unwrap();
        assert_eq!(restored, snapshot);
    }
}
