//! Property tests of the transmitter's per-cycle guarantees.

use std::collections::VecDeque;

use linkmux_symbol::{
    ChannelStatus, ChannelStatusArray, FrameHeader, FrameTail, PayloadChunk, Symbol, SymbolKind,
    FRAME_SEQUENCE_MASK, OPCODE_DATA_MASK, SEQUENCE_MASK,
};
use linkmux_tx::{LinkPhase, PhyStatus, TransmitState, Transmitter, TxConfig, TxInputs};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// One cycle of upstream stimulus. The offered chunk is filled in from the
/// payload source when the cycle runs.
#[derive(Debug, Clone, Copy)]
struct Cycle {
    inputs: TxInputs,
    offer: bool,
}

impl Cycle {
    fn with_source(self, source: &VecDeque<PayloadChunk>) -> TxInputs {
        let mut inputs = self.inputs;
        if self.offer {
            inputs.payload = source.front().copied();
        }
        inputs
    }
}

/// Header, 0–3 body words and a tail.
fn arb_frame() -> impl Strategy<Value = Vec<PayloadChunk>> {
    (
        0u8..16,
        0..=FRAME_SEQUENCE_MASK,
        prop::bool::weighted(0.2),
        prop::collection::vec(any::<u64>(), 0..4),
        any::<u32>(),
        1u8..=8,
        0u8..4,
    )
        .prop_map(|(vc, seq, continued, words, crc, last_bytes, ending)| {
            let header = FrameHeader::new(vc, seq).unwrap();
            let header = if continued {
                header.continuation()
            } else {
                header
            };
            let tail = FrameTail::new(crc, last_bytes);
            let tail = match ending {
                0 => tail.errored(),
                1 => tail.continuation(),
                _ => tail,
            };

            let mut chunks = vec![PayloadChunk::header(header)];
            chunks.extend(words.into_iter().map(PayloadChunk::body));
            chunks.push(PayloadChunk::tail(tail));
            chunks
        })
}

fn arb_source(frames: std::ops::Range<usize>) -> impl Strategy<Value = VecDeque<PayloadChunk>> {
    prop::collection::vec(arb_frame(), frames)
        .prop_map(|frames| frames.into_iter().flatten().collect())
}

fn arb_phy() -> impl Strategy<Value = PhyStatus> {
    prop_oneof![
        17 => Just(PhyStatus::UP),
        1 => Just(PhyStatus::DOWN),
        2 => Just(PhyStatus::STALLED),
    ]
}

fn arb_channels() -> impl Strategy<Value = ChannelStatusArray> {
    prop::array::uniform16(
        (prop::bool::weighted(0.1), prop::bool::weighted(0.05))
            .prop_map(|(pause, overflow)| ChannelStatus { pause, overflow }),
    )
}

fn arb_cycle() -> impl Strategy<Value = Cycle> {
    (
        arb_phy(),
        prop::bool::weighted(0.85),
        prop::bool::weighted(0.95),
        prop::bool::weighted(0.95),
        prop::bool::weighted(0.02),
        prop::bool::weighted(0.01),
        prop::option::weighted(0.05, (0u8..16, 0..=OPCODE_DATA_MASK)),
        arb_channels(),
    )
        .prop_map(
            |(phy, offer, local, remote, disable, reset, opcode, channels)| {
                let mut inputs = TxInputs::linked()
                    .with_phy(phy)
                    .with_disable(disable)
                    .with_reset(reset);
                inputs.local_link_ready = local;
                inputs.remote_link_ready = remote;
                inputs.channels = channels;
                if let Some((code, data)) = opcode {
                    inputs = inputs.with_opcode(code, data).unwrap();
                }
                Cycle { inputs, offer }
            },
        )
}

fn arb_cycles(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Cycle>> {
    prop::collection::vec(arb_cycle(), len)
}

fn config() -> TxConfig {
    TxConfig::default()
        .with_virtual_channels(6)
        .with_startup_hold(3)
        .with_skip_interval(7)
}

fn is_committed(inputs: &TxInputs) -> bool {
    inputs.phy == PhyStatus::UP && !inputs.disable && !inputs.reset
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_symbol_classifies_as_its_reported_kind(
        mut source in arb_source(1..40),
        cycles in arb_cycles(200..800),
    ) {
        let mut tx = Transmitter::new(config()).unwrap();

        for (n, cycle) in cycles.into_iter().enumerate() {
            let out = tx.tick(&cycle.with_source(&source));
            if out.payload_ready {
                source.pop_front();
            }
            let classified = SymbolKind::classify(&out.symbol).ok();
            prop_assert_eq!(classified, Some(out.kind), "cycle {}", n);
            prop_assert_eq!(out.symbol.valid, out.kind != SymbolKind::Blank, "cycle {}", n);
        }
    }

    #[test]
    fn data_only_moves_when_linked_and_gate_open(
        mut source in arb_source(1..40),
        cycles in arb_cycles(200..800),
    ) {
        let mut tx = Transmitter::new(config()).unwrap();

        for (n, cycle) in cycles.into_iter().enumerate() {
            let inputs = cycle.with_source(&source);
            let out = tx.tick(&inputs);
            if !out.payload_ready {
                prop_assert!(!out.status.frame_complete, "cycle {}", n);
                continue;
            }
            let chunk = source.pop_front();
            prop_assert!(chunk.is_some(), "cycle {}: accepted with nothing offered", n);
            let chunk = chunk.unwrap();

            prop_assert_eq!(inputs.payload, Some(chunk), "cycle {}", n);
            prop_assert!(is_committed(&inputs), "cycle {}", n);
            prop_assert!(inputs.local_link_ready && inputs.remote_link_ready, "cycle {}", n);
            prop_assert!(inputs.opcode.is_none(), "cycle {}", n);
            prop_assert_eq!(out.status.phase, LinkPhase::LinkUp, "cycle {}", n);
            prop_assert!(out.status.link_ready, "cycle {}", n);
            prop_assert!(out.kind.carries_payload(), "cycle {}: {}", n, out.kind);
            if !chunk.first && !chunk.last {
                let expected = Symbol::data(chunk.data).with_sequence(out.symbol.sequence, false);
                prop_assert_eq!(out.symbol, expected, "cycle {}", n);
            }
            if out.status.frame_complete {
                prop_assert_eq!(out.kind, SymbolKind::EndOfFrame, "cycle {}", n);
            }
        }
    }

    #[test]
    fn sequence_counts_committed_symbols_modulo_64(
        mut source in arb_source(1..40),
        cycles in arb_cycles(200..800),
    ) {
        let mut tx = Transmitter::new(config()).unwrap();
        let mut previous: Option<u8> = None;

        for (n, cycle) in cycles.into_iter().enumerate() {
            let inputs = cycle.with_source(&source);
            let out = tx.tick(&inputs);
            if out.payload_ready {
                source.pop_front();
            }
            if !is_committed(&inputs) {
                continue;
            }

            if out.symbol.start {
                prop_assert_eq!(out.symbol.sequence, 0, "cycle {}", n);
            } else {
                prop_assert!(previous.is_some(), "cycle {}: no start marker", n);
                let expected = previous.unwrap_or_default().wrapping_add(1) & SEQUENCE_MASK;
                prop_assert_eq!(out.symbol.sequence, expected, "cycle {}", n);
            }
            previous = Some(out.symbol.sequence);
        }
    }

    #[test]
    fn skips_are_evenly_spaced_without_opcodes(
        mut source in arb_source(1..40),
        cycles in prop::collection::vec(
            (prop::bool::weighted(0.1), prop::bool::weighted(0.9)),
            100..600,
        ),
    ) {
        let mut tx = Transmitter::new(config()).unwrap();
        let mut committed = 0u64;
        let mut last_skip: Option<u64> = None;

        for (stalled, offer) in cycles {
            let mut inputs = TxInputs::linked();
            if stalled {
                inputs.phy = PhyStatus::STALLED;
            }
            if offer {
                inputs.payload = source.front().copied();
            }
            let out = tx.tick(&inputs);
            if out.payload_ready {
                source.pop_front();
            }
            if stalled {
                continue;
            }
            if out.kind == SymbolKind::Skip {
                match last_skip {
                    Some(last) => prop_assert_eq!(committed - last, 7),
                    None => prop_assert_eq!(committed, 6),
                }
                last_skip = Some(committed);
            }
            committed += 1;
        }
        if committed >= 7 {
            prop_assert!(last_skip.is_some());
        }
    }

    #[test]
    fn every_chunk_is_delivered_in_order(
        source in arb_source(1..60),
        cycles in arb_cycles(200..800),
    ) {
        let expected: Vec<PayloadChunk> = source.iter().copied().collect();
        let mut source = source;
        let mut tx = Transmitter::new(config()).unwrap();
        let mut delivered = Vec::new();

        for cycle in cycles {
            if tx.tick(&cycle.with_source(&source)).payload_ready {
                delivered.extend(source.pop_front());
            }
        }
        for _ in 0..5000 {
            let Some(&chunk) = source.front() else {
                break;
            };
            if tx.tick(&TxInputs::linked().with_payload(chunk)).payload_ready {
                delivered.extend(source.pop_front());
            }
        }

        prop_assert!(source.is_empty(), "{} chunks never accepted", source.len());
        prop_assert_eq!(delivered, expected);
    }

    #[test]
    fn reset_from_any_reachable_state_is_idempotent(
        mut source in arb_source(1..20),
        steps in prop::collection::vec((arb_cycle(), arb_cycle()), 50..300),
    ) {
        let config = config();
        let mut state = TransmitState::default();

        for (cycle, reset_cycle) in steps {
            let (next, out) = state.transition(&config, &cycle.with_source(&source));
            if out.payload_ready {
                source.pop_front();
            }

            let reset = reset_cycle.with_source(&source).with_reset(true);
            let (once, out_once) = next.transition(&config, &reset);
            let (twice, out_twice) = once.transition(&config, &reset);
            prop_assert_eq!(once, TransmitState::default());
            prop_assert_eq!(twice, once);
            prop_assert_eq!(out_once, out_twice);
            prop_assert!(!out_once.payload_ready && !out_once.symbol.valid);

            state = next;
        }
    }
}

#[test]
fn sequence_wraps_after_63() {
    let mut tx = Transmitter::new(config()).unwrap();
    let sequences: Vec<u8> = (0..130)
        .map(|_| tx.tick(&TxInputs::linked()).symbol.sequence)
        .collect();
    assert_eq!(sequences[63], 63);
    assert_eq!(sequences[64], 0);
    assert_eq!(sequences[129], 1);
}

#[test]
fn opcode_missed_while_gate_closed_is_not_replayed() {
    let mut tx = Transmitter::new(config().with_skip_interval(1000)).unwrap();
    for _ in 0..5 {
        tx.tick(&TxInputs::linked());
    }

    let mut closed = TxInputs::linked().with_opcode(9, 0xABCD).unwrap();
    closed.remote_link_ready = false;
    let out = tx.tick(&closed);
    assert_eq!(out.kind, SymbolKind::Idle);
    assert!(!out.status.opcode_sent);

    for _ in 0..10 {
        let out = tx.tick(&TxInputs::linked());
        assert!(!matches!(out.kind, SymbolKind::User { .. }));
    }
}
