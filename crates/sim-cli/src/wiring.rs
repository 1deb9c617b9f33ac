use core_sim::Catalog;
use runtime::Simulation;
use strategy::Agent;

use crate::config::Config;

pub fn build_simulation(config: &Config) -> Simulation {
    let catalog: Catalog = config.instruments.iter().cloned().collect();
    let agents = (0..config.agents)
        .map(|_| Agent::with_cash(config.sim.initial_cash, config.strategy.clone()))
        .collect();

    Simulation::new(&config.sim)
        .with_catalog(catalog)
        .with_agents(agents)
        .with_price_rule(config.price_rule.clone())
}
