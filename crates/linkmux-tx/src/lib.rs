//! Cycle-accurate transmit arbitration and framing for a virtual-channel
//! multiplexed serial link.
//!
//! The transmitter turns a stream of packetized payload chunks into one
//! symbol per clock, interleaving idle padding, periodic clock-compensation
//! skips and out-of-band opcodes, and holding data back until the link has
//! been stable for the configured startup hold.
//!
//! Drive it by calling [`Transmitter::tick`] once per cycle with that cycle's
//! [`TxInputs`], or call [`TransmitState::transition`] directly for a pure
//! `(state, inputs) -> (state, outputs)` step.

pub mod arbiter;
pub mod config;
pub mod counter;
pub mod error;
mod framer;
pub mod io;
pub mod lifecycle;
pub mod transmitter;

pub use arbiter::TransmitState;
pub use config::TxConfig;
pub use error::{Result, TxError};
pub use io::{PhyStatus, TxInputs, TxOutputs, TxStatus};
pub use lifecycle::LinkPhase;
pub use transmitter::Transmitter;
