use core_sim::{Catalog, Instrument, LedgerError, SimConfig};
use rand::{rngs::StdRng, SeedableRng};
use strategy::Agent;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    events::{RuntimeEvent, RuntimeStage},
    logging::RunLogWriter,
    price_rule::PriceRule,
    snapshot::{AgentSnapshot, SimulationSnapshot},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("agent {agent} strategy failed at tick {tick}: {source}")]
    Strategy {
        agent: usize,
        tick: u64,
        source: LedgerError,
    },
    #[error("agent {agent} cannot be valued: {source}")]
    Valuation { agent: usize, source: LedgerError },
}

/// Discrete-time driver: each tick every agent acts against the current
/// prices in insertion order, then the clock advances and the price rule
/// moves the catalog.
///
/// Cloning deep-copies agents and catalog and copies the RNG state, so a
/// clone replays exactly what the original would have done. Custom price
/// rules are shared between clones.
#[derive(Debug, Clone)]
pub struct Simulation {
    time: u64,
    catalog: Catalog,
    agents: Vec<Agent>,
    price_rule: PriceRule,
    rng: StdRng,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(&SimConfig::default())
    }
}

impl Simulation {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            time: 0,
            catalog: Catalog::new(),
            agents: Vec::new(),
            price_rule: PriceRule::random_walk(config.max_price_move),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    pub fn with_time(mut self, time: u64) -> Self {
        self.time = time;
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_agents(mut self, agents: Vec<Agent>) -> Self {
        self.agents = agents;
        self
    }

    pub fn with_price_rule(mut self, price_rule: PriceRule) -> Self {
        self.price_rule = price_rule;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn price_rule(&self) -> &PriceRule {
        &self.price_rule
    }

    pub fn set_price_rule(&mut self, price_rule: PriceRule) {
        self.price_rule = price_rule;
    }

    pub fn add_agent(&mut self, agent: Agent) -> usize {
        self.agents.push(agent);
        self.agents.len() - 1
    }

    /// Removes the agent at `index`; later agents shift down by one.
    pub fn remove_agent(&mut self, index: usize) -> Option<Agent> {
        (index < self.agents.len()).then(|| self.agents.remove(index))
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn agent_mut(&mut self, index: usize) -> Option<&mut Agent> {
        self.agents.get_mut(index)
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn add_instrument(&mut self, instrument: Instrument) -> Option<Instrument> {
        self.catalog.add(instrument)
    }

    pub fn remove_instrument(&mut self, symbol: &str) -> Option<Instrument> {
        self.catalog.remove(symbol)
    }

    pub fn update_price(&mut self, symbol: &str, price: f64) -> bool {
        self.catalog.update_price(symbol, price)
    }

    pub fn instrument(&self, symbol: &str) -> Option<&Instrument> {
        self.catalog.get(symbol)
    }

    /// Runs one tick. If a strategy fails, agents before it have already
    /// traded but the clock and prices are left untouched.
    pub fn step(&mut self) -> Result<Vec<RuntimeEvent>, SimError> {
        let tick = self.time + 1;
        let mut events = Vec::with_capacity(self.agents.len() + 3);
        events.push(RuntimeEvent::new(tick, RuntimeStage::TickStarted));

        for (index, agent) in self.agents.iter_mut().enumerate() {
            let fills = agent
                .execute_strategy(&self.catalog, &mut self.rng)
                .map_err(|source| SimError::Strategy {
                    agent: index,
                    tick,
                    source,
                })?;
            debug!(tick, agent = index, fills = fills.len(), "agent acted");
            events.push(RuntimeEvent::new(
                tick,
                RuntimeStage::AgentActed {
                    agent: index,
                    fills: fills.len(),
                },
            ));
        }

        self.time = tick;
        events.push(RuntimeEvent::new(tick, RuntimeStage::ClockAdvanced));

        self.price_rule
            .apply(self.time, &mut self.catalog, &mut self.rng);
        events.push(RuntimeEvent::new(tick, RuntimeStage::PricesUpdated));

        Ok(events)
    }

    pub fn run(&mut self, steps: u64) -> Result<(), SimError> {
        info!(
            steps,
            agents = self.agents.len(),
            instruments = self.catalog.len(),
            price_rule = self.price_rule.name(),
            "simulation run started"
        );
        for _ in 0..steps {
            self.step()?;
        }
        info!(time = self.time, "simulation run finished");
        Ok(())
    }

    /// Like [`Simulation::run`], forwarding every tick event to `writer`.
    pub fn run_logged(
        &mut self,
        steps: u64,
        writer: &mut dyn RunLogWriter,
    ) -> Result<(), SimError> {
        for _ in 0..steps {
            for event in self.step()? {
                writer.write(event);
            }
        }
        Ok(())
    }

    pub fn portfolio_values(&self) -> Result<Vec<f64>, SimError> {
        self.agents
            .iter()
            .enumerate()
            .map(|(index, agent)| {
                agent
                    .portfolio_value(&self.catalog)
                    .map_err(|source| SimError::Valuation {
                        agent: index,
                        source,
                    })
            })
            .collect()
    }

    pub fn snapshot(&self) -> Result<SimulationSnapshot, SimError> {
        let values = self.portfolio_values()?;
        let agents = self
            .agents
            .iter()
            .zip(values)
            .map(|(agent, portfolio_value)| AgentSnapshot {
                strategy: agent.strategy().name().to_owned(),
                cash: agent.cash(),
                holdings: agent.ledger().holdings().clone(),
                portfolio_value,
            })
            .collect();

        Ok(SimulationSnapshot {
            time: self.time,
            price_rule: self.price_rule.name().to_owned(),
            instruments: self.catalog.iter().cloned().collect(),
            agents,
        })
    }
}

impl PartialEq for Simulation {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
            && self.catalog == other.catalog
            && self.agents == other.agents
            && self.price_rule == other.price_rule
    }
}
