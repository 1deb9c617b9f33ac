use tracing::{debug, info};

use crate::events::{RuntimeEvent, RuntimeStage};

pub trait RunLogWriter {
    fn write(&mut self, event: RuntimeEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryRunLogWriter {
    events: Vec<RuntimeEvent>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RuntimeEvent] {
        &self.events
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RuntimeEvent) {
        self.events.push(event);
    }
}

/// Forwards run events to the active `tracing` subscriber. Agent actions go
/// out at debug, tick boundaries at info.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRunLogWriter;

impl TracingRunLogWriter {
    pub fn new() -> Self {
        Self
    }
}

impl RunLogWriter for TracingRunLogWriter {
    fn write(&mut self, event: RuntimeEvent) {
        match event.stage {
            RuntimeStage::TickStarted => debug!(tick = event.tick, "tick started"),
            RuntimeStage::AgentActed { agent, fills } => {
                debug!(tick = event.tick, agent, fills, "agent acted")
            }
            RuntimeStage::ClockAdvanced => debug!(tick = event.tick, "clock advanced"),
            RuntimeStage::PricesUpdated => info!(tick = event.tick, "prices updated"),
        }
    }
}
