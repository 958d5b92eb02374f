use tracing::{debug, trace};

use crate::arbiter::TransmitState;
use crate::config::TxConfig;
use crate::error::Result;
use crate::io::{TxInputs, TxOutputs};

/// Owns the transmit registers and clocks them once per [`tick`](Self::tick).
#[derive(Debug, Clone)]
pub struct Transmitter {
    config: TxConfig,
    state: TransmitState,
    cycle: u64,
}

impl Transmitter {
    /// Create a transmitter in the reset state.
    pub fn new(config: TxConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: TransmitState::default(),
            cycle: 0,
        })
    }

    /// Advance one clock cycle.
    pub fn tick(&mut self, inputs: &TxInputs) -> TxOutputs {
        let (next, outputs) = self.state.transition(&self.config, inputs);

        if next.phase() != self.state.phase() {
            debug!(
                cycle = self.cycle,
                from = %self.state.phase(),
                to = %next.phase(),
                "link phase changed"
            );
        }
        if outputs.status.frame_error {
            debug!(cycle = self.cycle, "frame sent with error flag");
        }
        trace!(
            cycle = self.cycle,
            kind = %outputs.kind,
            seq = outputs.symbol.sequence,
            payload = format_args!("{:#018x}", outputs.symbol.payload),
            ready = outputs.payload_ready,
            "symbol"
        );

        self.state = next;
        self.cycle += 1;
        outputs
    }

    /// Force the reset state, as if reset were asserted for one cycle.
    pub fn reset(&mut self) {
        debug!(cycle = self.cycle, "transmitter reset");
        self.state = TransmitState::default();
    }

    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    pub fn state(&self) -> &TransmitState {
        &self.state
    }

    /// Cycles clocked since construction.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }
}
