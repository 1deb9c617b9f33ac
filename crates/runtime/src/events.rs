/// One stage of a simulation tick, in the order the driver emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeStage {
    TickStarted,
    /// Agent at `agent` ran its strategy and executed `fills` trades.
    AgentActed { agent: usize, fills: usize },
    ClockAdvanced,
    PricesUpdated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEvent {
    pub tick: u64,
    pub stage: RuntimeStage,
}

impl RuntimeEvent {
    pub fn new(tick: u64, stage: RuntimeStage) -> Self {
        Self { tick, stage }
    }
}
