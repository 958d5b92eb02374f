//! Persistent counters owned by the transmit state.

use linkmux_symbol::SEQUENCE_MASK;

/// Cycles elapsed since the last SKP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SkipCounter(u32);

impl SkipCounter {
    pub const CLEARED: Self = Self(0);

    pub fn value(self) -> u32 {
        self.0
    }

    /// True when advancing this cycle reaches `interval`, i.e. a SKP is due.
    pub fn is_due(self, interval: u32) -> bool {
        self.0.saturating_add(1) >= interval
    }

    pub fn advanced(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Cycles spent in start-up since the physical layer came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StartupCounter(u32);

impl StartupCounter {
    pub const CLEARED: Self = Self(0);

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_elapsed(self, hold: u32) -> bool {
        self.0 >= hold
    }

    pub fn advanced(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// 6-bit rolling symbol sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SequenceNumber(u8);

impl SequenceNumber {
    pub const ZERO: Self = Self(0);

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1) & SEQUENCE_MASK)
    }
}
