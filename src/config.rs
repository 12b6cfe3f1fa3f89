use crate::scheduler::Tick;

/// Timing knobs of the dashboard, expressed in ticks (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Length of the idle countdown started on login and on every transfer or loan attempt.
    pub idle_timeout_secs: u32,
    /// Delay between accepting a transfer or loan and recording its movements.
    pub settlement_delay_secs: Tick,
}

impl EngineConfig {
    pub const DEFAULT_IDLE_TIMEOUT_SECS: u32 = 300;
    pub const DEFAULT_SETTLEMENT_DELAY_SECS: Tick = 2;
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: Self::DEFAULT_IDLE_TIMEOUT_SECS,
            settlement_delay_secs: Self::DEFAULT_SETTLEMENT_DELAY_SECS,
        }
    }
}
