use linkmux_symbol::MAX_VIRTUAL_CHANNELS;

use crate::error::{Result, TxError};

/// Per-instance transmitter parameters. Fixed for the lifetime of a
/// [`Transmitter`](crate::Transmitter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TxConfig {
    /// Number of virtual channels in use (1–16).
    pub virtual_channels: u8,
    /// Cycles of maintenance-only traffic after the physical layer comes up.
    pub startup_hold_cycles: u32,
    /// One SKP is sent every this many cycles.
    pub skip_interval_cycles: u32,
    /// Ignore local/remote link readiness when gating data and opcodes.
    pub flow_control_disable: bool,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            virtual_channels: 4,
            startup_hold_cycles: 1000,
            skip_interval_cycles: 5000,
            flow_control_disable: false,
        }
    }
}

impl TxConfig {
    pub fn with_virtual_channels(mut self, count: u8) -> Self {
        self.virtual_channels = count;
        self
    }

    pub fn with_startup_hold(mut self, cycles: u32) -> Self {
        self.startup_hold_cycles = cycles;
        self
    }

    pub fn with_skip_interval(mut self, cycles: u32) -> Self {
        self.skip_interval_cycles = cycles;
        self
    }

    pub fn with_flow_control_disabled(mut self, disabled: bool) -> Self {
        self.flow_control_disable = disabled;
        self
    }

    /// Check the parameters against their hardware limits.
    pub fn validate(&self) -> Result<()> {
        if self.virtual_channels == 0 || usize::from(self.virtual_channels) > MAX_VIRTUAL_CHANNELS
        {
            return Err(TxError::ChannelCount(self.virtual_channels));
        }
        if self.skip_interval_cycles == 0 {
            return Err(TxError::ZeroSkipInterval);
        }
        Ok(())
    }

    pub(crate) fn channel_count(&self) -> usize {
        usize::from(self.virtual_channels)
    }
}
