//! Cycle-accurate model of a virtual-channel multiplexed serial link
//! transmitter.
//!
//! linkmux turns packetized payload chunks into a 64-bit symbol stream with
//! idle padding, clock-compensation skips, out-of-band opcodes and a startup
//! hold, one symbol per clock.
//!
//! # Crate Structure
//!
//! - [`symbol`]: symbol encodings, link-info, opcodes, ingress metadata and
//!   the capture file codec
//! - [`tx`]: configuration, per-cycle arbitration and the [`tx::Transmitter`]
//!   driver

/// Re-export symbol types.
pub mod symbol {
    pub use linkmux_symbol::*;
}

/// Re-export transmitter types.
pub mod tx {
    pub use linkmux_tx::*;
}
