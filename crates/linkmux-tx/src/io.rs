//! Per-cycle inputs and outputs of the transmitter.

use linkmux_symbol::{
    ChannelStatus, ChannelStatusArray, OpCodeRequest, PayloadChunk, Symbol, SymbolKind,
    MAX_VIRTUAL_CHANNELS,
};

use crate::error::Result;
use crate::lifecycle::LinkPhase;

/// Handshake state of the physical transmit layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PhyStatus {
    /// Lanes are trained and the link is up.
    pub active: bool,
    /// The physical layer takes a symbol this cycle.
    pub ready: bool,
}

impl PhyStatus {
    pub const DOWN: Self = Self {
        active: false,
        ready: false,
    };

    pub const UP: Self = Self {
        active: true,
        ready: true,
    };

    /// Active, but not taking a symbol this cycle.
    pub const STALLED: Self = Self {
        active: true,
        ready: false,
    };
}

/// Everything the transmitter samples on one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxInputs {
    /// Synchronous reset.
    pub reset: bool,
    pub phy: PhyStatus,
    /// Chunk offered by the payload source; `None` when its valid is low.
    pub payload: Option<PayloadChunk>,
    /// Local receive status per virtual channel.
    pub channels: ChannelStatusArray,
    /// Local receiver is linked.
    pub local_link_ready: bool,
    /// Remote receiver is linked (carried back in its link-info field).
    pub remote_link_ready: bool,
    /// Opcode to send this cycle; lost if not sent.
    pub opcode: Option<OpCodeRequest>,
    /// Blank the output and restart the startup hold.
    pub disable: bool,
}

impl TxInputs {
    /// Physical layer up and both receivers linked; nothing offered.
    pub fn linked() -> Self {
        Self {
            phy: PhyStatus::UP,
            local_link_ready: true,
            remote_link_ready: true,
            ..Self::default()
        }
    }

    pub fn with_phy(mut self, phy: PhyStatus) -> Self {
        self.phy = phy;
        self
    }

    pub fn with_payload(mut self, chunk: PayloadChunk) -> Self {
        self.payload = Some(chunk);
        self
    }

    /// Request opcode `code` (0–15) carrying `data`.
    pub fn with_opcode(mut self, code: u8, data: u64) -> Result<Self> {
        self.opcode = Some(OpCodeRequest::new(code, data)?);
        Ok(self)
    }

    pub fn with_channel(mut self, index: usize, status: ChannelStatus) -> Self {
        if index < MAX_VIRTUAL_CHANNELS {
            self.channels[index] = status;
        }
        self
    }

    pub fn with_disable(mut self, disable: bool) -> Self {
        self.disable = disable;
        self
    }

    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }
}

/// Status signals reported alongside every symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TxStatus {
    /// Phase in effect for this cycle's arbitration.
    pub phase: LinkPhase,
    /// Link-ready flag in effect for this cycle's arbitration.
    pub link_ready: bool,
    /// A frame ended this cycle.
    pub frame_complete: bool,
    /// The frame that ended this cycle was flagged as errored.
    pub frame_error: bool,
    /// The requested opcode went out this cycle.
    pub opcode_sent: bool,
    /// Local channel status, idle beyond the configured channel count.
    pub channels: ChannelStatusArray,
}

/// Everything the transmitter drives on one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxOutputs {
    /// Symbol offered to the physical layer.
    pub symbol: Symbol,
    /// Category of `symbol`.
    pub kind: SymbolKind,
    /// The offered payload chunk was consumed.
    pub payload_ready: bool,
    pub status: TxStatus,
}

impl TxOutputs {
    /// No symbol, nothing consumed.
    pub(crate) fn quiet(channels: ChannelStatusArray) -> Self {
        Self {
            status: TxStatus {
                channels,
                ..TxStatus::default()
            },
            ..Self::default()
        }
    }
}
