//! Link-info aggregation.
//!
//! The link-info field is a 40-bit snapshot of the local receiver's state that
//! rides in the low bits of IDLE and start-of-frame symbols so the remote end
//! can throttle its own transmitter.
//!
//! ```text
//!  39        33   32    31            16 15             0
//! ┌────────────┬──────┬────────────────┬────────────────┐
//! │ reserved   │ link │ overflow[15:0] │ pause[15:0]    │
//! │ (zero)     │ ready│                │                │
//! └────────────┴──────┴────────────────┴────────────────┘
//! ```

/// Upper bound on the number of virtual channels.
pub const MAX_VIRTUAL_CHANNELS: usize = 16;

/// Width of the link-info field in bits.
pub const LINK_INFO_WIDTH: u32 = 40;

/// Mask selecting the link-info field within a payload.
pub const LINK_INFO_MASK: u64 = (1 << LINK_INFO_WIDTH) - 1;

const OVERFLOW_SHIFT: u32 = 16;
const LINK_READY_BIT: u32 = 32;

/// Receive-side backpressure status of one virtual channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ChannelStatus {
    /// Receive buffer is above its pause threshold.
    pub pause: bool,
    /// Receive buffer overflowed.
    pub overflow: bool,
}

impl ChannelStatus {
    pub const IDLE: Self = Self {
        pause: false,
        overflow: false,
    };
}

/// Per-channel status, always sized for the maximum channel count.
pub type ChannelStatusArray = [ChannelStatus; MAX_VIRTUAL_CHANNELS];

/// Returns `statuses` with every entry at or above `channel_count` forced idle.
pub fn mask_channels(statuses: &ChannelStatusArray, channel_count: usize) -> ChannelStatusArray {
    let mut masked = [ChannelStatus::IDLE; MAX_VIRTUAL_CHANNELS];
    let count = channel_count.min(MAX_VIRTUAL_CHANNELS);
    masked[..count].copy_from_slice(&statuses[..count]);
    masked
}

/// Decoded link-info field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LinkInfo {
    pub channels: ChannelStatusArray,
    pub link_ready: bool,
}

impl LinkInfo {
    /// Aggregate the configured channels and the local link-ready flag.
    pub fn new(statuses: &ChannelStatusArray, channel_count: usize, link_ready: bool) -> Self {
        Self {
            channels: mask_channels(statuses, channel_count),
            link_ready,
        }
    }

    /// Pack into the 40-bit wire field.
    pub fn to_bits(&self) -> u64 {
        let mut bits = 0u64;
        for (i, status) in self.channels.iter().enumerate() {
            bits |= u64::from(status.pause) << i;
            bits |= u64::from(status.overflow) << (OVERFLOW_SHIFT + i as u32);
        }
        bits | (u64::from(self.link_ready) << LINK_READY_BIT)
    }

    /// Unpack from a payload. Bits outside the field are ignored.
    pub fn from_bits(payload: u64) -> Self {
        let mut channels = [ChannelStatus::IDLE; MAX_VIRTUAL_CHANNELS];
        for (i, status) in channels.iter_mut().enumerate() {
            status.pause = (payload >> i) & 1 == 1;
            status.overflow = (payload >> (OVERFLOW_SHIFT + i as u32)) & 1 == 1;
        }
        Self {
            channels,
            link_ready: (payload >> LINK_READY_BIT) & 1 == 1,
        }
    }
}
