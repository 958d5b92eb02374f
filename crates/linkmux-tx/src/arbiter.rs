//! Per-cycle symbol arbitration.
//!
//! [`TransmitState::transition`] is the whole transmitter: a pure function
//! from the current registers and this cycle's inputs to the next registers
//! and this cycle's outputs. Categories are decided in override order:
//!
//! 1. IDLE with the current link-info field
//! 2. a payload chunk (SOF/SOC, data, EOF/EOC) when the link is up and the
//!    flow-control gate is open
//! 3. SKP when the skip interval elapses; the chunk is left unconsumed
//! 4. USER when an opcode is requested under the same conditions as data; the
//!    chunk is left unconsumed and a SKP due this cycle moves to the next one
//! 5. a blank symbol when disabled, which also restarts the startup hold
//!
//! A stalled physical layer freezes everything and re-offers the last symbol.

use linkmux_symbol::{mask_channels, LinkInfo, Symbol, SymbolKind};

use crate::config::TxConfig;
use crate::counter::{SequenceNumber, SkipCounter, StartupCounter};
use crate::framer;
use crate::io::{TxInputs, TxOutputs, TxStatus};
use crate::lifecycle::LinkPhase;

/// Transmitter registers. The initial value is the reset value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransmitState {
    phase: LinkPhase,
    /// The first cycle after (re)entering start-up has been sent.
    started: bool,
    skip_counter: SkipCounter,
    startup_counter: StartupCounter,
    link_ready: bool,
    sequence: SequenceNumber,
    frame_complete: bool,
    frame_error: bool,
    symbol: Symbol,
    kind: SymbolKind,
}

/// Combinational outputs that are not registered.
#[derive(Debug, Clone, Copy, Default)]
struct Decision {
    phase: LinkPhase,
    link_ready: bool,
    payload_ready: bool,
    opcode_sent: bool,
}

impl TransmitState {
    pub fn phase(&self) -> LinkPhase {
        self.phase
    }

    pub fn skip_counter(&self) -> u32 {
        self.skip_counter.value()
    }

    pub fn startup_counter(&self) -> u32 {
        self.startup_counter.value()
    }

    pub fn link_ready(&self) -> bool {
        self.link_ready
    }

    pub fn sequence(&self) -> u8 {
        self.sequence.value()
    }

    pub fn frame_complete(&self) -> bool {
        self.frame_complete
    }

    pub fn frame_error(&self) -> bool {
        self.frame_error
    }

    /// Symbol currently registered on the output.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Compute the next registers and this cycle's outputs.
    pub fn transition(&self, config: &TxConfig, inputs: &TxInputs) -> (TransmitState, TxOutputs) {
        let channels = mask_channels(&inputs.channels, config.channel_count());

        let (mut next, mut decision) = if !inputs.phy.active {
            (TransmitState::default(), Decision::default())
        } else if !inputs.phy.ready {
            self.hold()
        } else {
            self.arbitrate(config, inputs)
        };

        if inputs.disable && inputs.phy.active {
            next.restart();
            decision = Decision {
                phase: LinkPhase::StartingUp,
                ..Decision::default()
            };
        }

        if inputs.reset {
            return (TransmitState::default(), TxOutputs::quiet(channels));
        }

        let outputs = TxOutputs {
            symbol: next.symbol,
            kind: next.kind,
            payload_ready: decision.payload_ready,
            status: TxStatus {
                phase: decision.phase,
                link_ready: decision.link_ready,
                frame_complete: next.frame_complete,
                frame_error: next.frame_error,
                opcode_sent: decision.opcode_sent,
                channels,
            },
        };
        (next, outputs)
    }

    fn hold(&self) -> (TransmitState, Decision) {
        let next = TransmitState {
            frame_complete: false,
            frame_error: false,
            ..*self
        };
        let decision = Decision {
            phase: self.phase,
            link_ready: self.link_ready,
            ..Decision::default()
        };
        (next, decision)
    }

    fn arbitrate(&self, config: &TxConfig, inputs: &TxInputs) -> (TransmitState, Decision) {
        let entering = !self.started;
        let phase = LinkPhase::active(self.link_ready);
        let sequence = if entering {
            SequenceNumber::ZERO
        } else {
            self.sequence.next()
        };

        let mut next = TransmitState {
            phase,
            started: true,
            skip_counter: self.skip_counter.advanced(),
            startup_counter: self.startup_counter,
            link_ready: self.link_ready,
            sequence,
            frame_complete: false,
            frame_error: false,
            symbol: Symbol::blank(),
            kind: SymbolKind::Blank,
        };

        if !self.link_ready {
            if self.startup_counter.is_elapsed(config.startup_hold_cycles) {
                next.link_ready = true;
            } else {
                next.startup_counter = self.startup_counter.advanced();
            }
        }
        next.phase = LinkPhase::active(next.link_ready);

        let link_info = LinkInfo::new(
            &inputs.channels,
            config.channel_count(),
            inputs.local_link_ready,
        );
        let gate_open =
            config.flow_control_disable || (inputs.local_link_ready && inputs.remote_link_ready);
        let eligible = phase.allows_traffic() && gate_open;

        let mut symbol = framer::idle(&link_info);
        let mut kind = SymbolKind::Idle;
        let mut payload_ready = false;

        if let (true, Some(chunk)) = (eligible, inputs.payload.as_ref()) {
            let framed = framer::frame_chunk(chunk, &link_info);
            symbol = framed.symbol;
            kind = framed.kind;
            payload_ready = true;
            next.frame_complete = framed.frame_complete;
            next.frame_error = framed.frame_error;
        }

        let skip_due = self.skip_counter.is_due(config.skip_interval_cycles);
        if skip_due {
            symbol = framer::skip();
            kind = SymbolKind::Skip;
            payload_ready = false;
            next.frame_complete = false;
            next.frame_error = false;
            next.skip_counter = SkipCounter::CLEARED;
        }

        let mut opcode_sent = false;
        if let (true, Some(request)) = (eligible, inputs.opcode.as_ref()) {
            symbol = framer::user(request);
            kind = SymbolKind::User {
                code: request.code(),
            };
            payload_ready = false;
            opcode_sent = true;
            next.frame_complete = false;
            next.frame_error = false;
            if skip_due {
                tracing::debug!(
                    code = request.code(),
                    "opcode collided with skip, deferring skip"
                );
                next.skip_counter = self.skip_counter;
            }
        }

        next.symbol = symbol.with_sequence(sequence.value(), entering);
        next.kind = kind;

        let decision = Decision {
            phase,
            link_ready: self.link_ready,
            payload_ready,
            opcode_sent,
        };
        (next, decision)
    }

    /// Disable: blank the output and go back to the start of the startup hold.
    /// Skip pacing is left alone.
    fn restart(&mut self) {
        self.phase = LinkPhase::StartingUp;
        self.started = false;
        self.startup_counter = StartupCounter::CLEARED;
        self.link_ready = false;
        self.frame_complete = false;
        self.frame_error = false;
        self.symbol = Symbol::blank();
        self.kind = SymbolKind::Blank;
    }
}
