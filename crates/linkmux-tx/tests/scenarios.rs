use std::collections::VecDeque;

use linkmux_symbol::{FrameHeader, FrameTail, PayloadChunk, SymbolKind};
use linkmux_tx::{LinkPhase, Transmitter, TxConfig, TxInputs, TxOutputs};

fn transmitter(startup_hold: u32, skip_interval: u32) -> Transmitter {
    Transmitter::new(
        TxConfig::default()
            .with_startup_hold(startup_hold)
            .with_skip_interval(skip_interval),
    )
    .expect("config should be valid")
}

/// Offers queued chunks and pops them when the transmitter accepts one.
fn run_with_source(
    tx: &mut Transmitter,
    source: &mut VecDeque<PayloadChunk>,
    cycles: usize,
) -> Vec<TxOutputs> {
    (0..cycles)
        .map(|_| {
            let mut inputs = TxInputs::linked();
            inputs.payload = source.front().copied();
            let out = tx.tick(&inputs);
            if out.payload_ready {
                source.pop_front();
            }
            out
        })
        .collect()
}

#[test]
fn startup_hold_keeps_data_back_for_four_cycles() {
    let mut tx = transmitter(4, 1000);
    let offered = TxInputs::linked().with_payload(PayloadChunk::body(0x55));

    let first = tx.tick(&offered);
    assert!(first.symbol.start);
    assert_eq!(first.symbol.sequence, 0);
    assert!(!first.payload_ready);

    for cycle in 1..=4 {
        let out = tx.tick(&offered);
        assert!(
            matches!(out.kind, SymbolKind::Idle | SymbolKind::Skip),
            "cycle {cycle} emitted {}",
            out.kind
        );
        assert!(!out.payload_ready, "cycle {cycle} accepted data");
        assert!(!out.status.link_ready);
        assert_eq!(out.status.phase, LinkPhase::StartingUp);
        assert!(!out.symbol.start);
    }

    let out = tx.tick(&offered);
    assert!(out.status.link_ready);
    assert_eq!(out.status.phase, LinkPhase::LinkUp);
    assert!(out.payload_ready);
    assert_eq!(out.kind, SymbolKind::Data);
    assert_eq!(out.symbol.sequence, 5);
}

#[test]
fn fifth_active_cycle_emits_skip_and_clears_counter() {
    let mut tx = transmitter(0, 5);
    let kinds: Vec<SymbolKind> = (0..15)
        .map(|_| {
            let out = tx.tick(&TxInputs::linked());
            if out.kind == SymbolKind::Skip {
                assert_eq!(tx.state().skip_counter(), 0);
            }
            out.kind
        })
        .collect();

    let skips: Vec<usize> = kinds
        .iter()
        .enumerate()
        .filter(|(_, kind)| **kind == SymbolKind::Skip)
        .map(|(cycle, _)| cycle)
        .collect();
    assert_eq!(skips, vec![4, 9, 14]);
    assert_eq!(kinds[5], SymbolKind::Idle);
}

#[test]
fn skip_leaves_offered_chunk_for_next_cycle() {
    let mut tx = transmitter(0, 5);
    let mut source: VecDeque<PayloadChunk> = (0..10).map(PayloadChunk::body).collect();
    let outputs = run_with_source(&mut tx, &mut source, 12);

    assert_eq!(outputs[4].kind, SymbolKind::Skip);
    assert!(!outputs[4].payload_ready);
    assert_eq!(outputs[3].symbol.payload, 2);
    assert_eq!(outputs[5].symbol.payload, 3);

    let delivered: Vec<u64> = outputs
        .iter()
        .filter(|out| out.payload_ready)
        .map(|out| out.symbol.payload)
        .collect();
    assert_eq!(delivered, (0..delivered.len() as u64).collect::<Vec<_>>());
}

#[test]
fn errored_three_chunk_frame() {
    let mut tx = transmitter(0, 1000);
    tx.tick(&TxInputs::linked());

    let header = FrameHeader::new(2, 0x0F0).unwrap();
    let mut source = VecDeque::from(vec![
        PayloadChunk::header(header),
        PayloadChunk::body(0x0123_4567_89AB_CDEF),
        PayloadChunk::tail(FrameTail::new(0xDEAD_BEEF, 8).errored()),
    ]);
    let outputs = run_with_source(&mut tx, &mut source, 3);

    let kinds: Vec<SymbolKind> = outputs.iter().map(|out| out.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SymbolKind::StartOfFrame,
            SymbolKind::Data,
            SymbolKind::EndOfFrame
        ]
    );
    assert!(outputs.iter().all(|out| out.payload_ready));
    assert!(source.is_empty());

    assert_eq!(outputs[1].symbol.payload, 0x0123_4567_89AB_CDEF);
    assert_eq!((outputs[0].symbol.payload >> 40) & 0xF, 2);
    assert_eq!((outputs[0].symbol.payload >> 44) & 0xFFF, 0x0F0);

    for out in &outputs[..2] {
        assert!(!out.status.frame_complete && !out.status.frame_error);
    }
    assert!(outputs[2].status.frame_complete);
    assert!(outputs[2].status.frame_error);

    let after = tx.tick(&TxInputs::linked());
    assert!(!after.status.frame_complete && !after.status.frame_error);
}

#[test]
fn clean_frame_raises_only_complete_pulse() {
    let mut tx = transmitter(0, 1000);
    tx.tick(&TxInputs::linked());

    let mut source = VecDeque::from(vec![
        PayloadChunk::header(FrameHeader::new(0, 1).unwrap()),
        PayloadChunk::tail(FrameTail::new(0, 4)),
    ]);
    let outputs = run_with_source(&mut tx, &mut source, 2);
    assert!(outputs[1].status.frame_complete);
    assert!(!outputs[1].status.frame_error);
}

#[test]
fn opcode_on_skip_cycle_defers_skip_by_one() {
    let mut tx = transmitter(0, 5);
    for _ in 0..4 {
        assert_ne!(tx.tick(&TxInputs::linked()).kind, SymbolKind::Skip);
    }

    let with_opcode = TxInputs::linked().with_opcode(3, 0x1234).unwrap();
    let out = tx.tick(&with_opcode);
    assert_eq!(out.kind, SymbolKind::User { code: 3 });
    assert!(out.status.opcode_sent);

    let out = tx.tick(&TxInputs::linked());
    assert_eq!(out.kind, SymbolKind::Skip);

    let kinds: Vec<SymbolKind> = (0..5).map(|_| tx.tick(&TxInputs::linked()).kind).collect();
    assert_eq!(kinds[4], SymbolKind::Skip);
    assert!(kinds[..4].iter().all(|kind| *kind == SymbolKind::Idle));
}

#[test]
fn opcode_one_cycle_before_skip_does_not_move_it() {
    let mut tx = transmitter(0, 5);
    for _ in 0..3 {
        tx.tick(&TxInputs::linked());
    }
    let out = tx.tick(&TxInputs::linked().with_opcode(1, 0).unwrap());
    assert_eq!(out.kind, SymbolKind::User { code: 1 });
    assert_eq!(tx.tick(&TxInputs::linked()).kind, SymbolKind::Skip);
}

#[test]
fn opcode_takes_priority_over_data_without_consuming_it() {
    let mut tx = transmitter(0, 1000);
    tx.tick(&TxInputs::linked());

    let inputs = TxInputs::linked()
        .with_payload(PayloadChunk::body(7))
        .with_opcode(15, 0xFFFF_FFFF_FFFF)
        .unwrap();
    let out = tx.tick(&inputs);
    assert_eq!(out.kind, SymbolKind::User { code: 15 });
    assert!(!out.payload_ready);
}

#[test]
fn opcode_during_startup_is_dropped() {
    let mut tx = transmitter(10, 1000);
    let out = tx.tick(&TxInputs::linked().with_opcode(2, 0).unwrap());
    assert_eq!(out.kind, SymbolKind::Idle);
    assert!(!out.status.opcode_sent);

    let out = tx.tick(&TxInputs::linked());
    assert_eq!(out.kind, SymbolKind::Idle);
}

#[test]
fn disable_on_deferred_skip_cycle_wins() {
    let mut tx = transmitter(0, 5);
    for _ in 0..4 {
        tx.tick(&TxInputs::linked());
    }
    tx.tick(&TxInputs::linked().with_opcode(3, 0).unwrap());

    let out = tx.tick(&TxInputs::linked().with_disable(true));
    assert_eq!(out.kind, SymbolKind::Blank);
    assert!(!out.symbol.valid);
    assert_eq!(tx.state().skip_counter(), 0);
    assert_eq!(tx.state().phase(), LinkPhase::StartingUp);

    let out = tx.tick(&TxInputs::linked());
    assert!(out.symbol.start);
    assert_eq!(out.symbol.sequence, 0);
    assert_eq!(out.kind, SymbolKind::Idle);
}

#[test]
fn disable_restarts_startup_hold() {
    let mut tx = transmitter(2, 1000);
    for _ in 0..4 {
        tx.tick(&TxInputs::linked());
    }
    assert!(tx.state().link_ready());

    tx.tick(&TxInputs::linked().with_disable(true));
    assert!(!tx.state().link_ready());
    assert_eq!(tx.state().startup_counter(), 0);

    let offered = TxInputs::linked().with_payload(PayloadChunk::body(1));
    let ready: Vec<bool> = (0..4).map(|_| tx.tick(&offered).payload_ready).collect();
    assert_eq!(ready, vec![false, false, false, true]);
}

#[test]
fn losing_the_phy_returns_to_reset() {
    let mut tx = transmitter(0, 1000);
    for _ in 0..3 {
        tx.tick(&TxInputs::linked());
    }
    let out = tx.tick(&TxInputs::default());
    assert!(!out.symbol.valid);
    assert_eq!(out.status.phase, LinkPhase::Reset);
    assert_eq!(tx.state().phase(), LinkPhase::Reset);

    let out = tx.tick(&TxInputs::linked());
    assert!(out.symbol.start);
    assert_eq!(out.symbol.sequence, 0);
}

#[test]
fn unconfigured_channels_are_idle_in_echo_and_link_info() {
    let mut tx = Transmitter::new(
        TxConfig::default()
            .with_virtual_channels(2)
            .with_startup_hold(0)
            .with_skip_interval(1000),
    )
    .unwrap();

    let mut inputs = TxInputs::linked();
    for status in inputs.channels.iter_mut() {
        status.pause = true;
        status.overflow = true;
    }
    let out = tx.tick(&inputs);

    assert!(out.status.channels[..2].iter().all(|s| s.pause && s.overflow));
    assert!(out.status.channels[2..].iter().all(|s| !s.pause && !s.overflow));

    let info = linkmux_symbol::LinkInfo::from_bits(out.symbol.payload);
    assert_eq!(info.channels, out.status.channels);
    assert!(info.link_ready);
}
