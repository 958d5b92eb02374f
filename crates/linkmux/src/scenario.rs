//! JSON scenarios for driving the transmitter from the command line.
//!
//! A scenario describes the transmitter configuration, how many cycles to run,
//! the frames the packetizer offers (in order) and the cycles on which the
//! environment does something unusual: disable, a stalled or inactive physical
//! layer, reset, or an opcode request.
//!
//! ```json
//! {
//!   "config": { "startup_hold_cycles": 4, "skip_interval_cycles": 16 },
//!   "cycles": 40,
//!   "frames": [{ "vc": 1, "seq": 7, "words": [1, 2, 3], "crc": 3735928559 }],
//!   "opcodes": [{ "cycle": 12, "code": 3, "data": 4660 }],
//!   "stalled": [20, 21]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use linkmux::symbol::{
    ChannelStatus, FrameHeader, FrameTail, OpCodeRequest, PayloadChunk, SymbolKind,
    MAX_VIRTUAL_CHANNELS,
};
use linkmux::tx::{PhyStatus, Result, Transmitter, TxConfig, TxInputs, TxOutputs};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

fn linked() -> bool {
    true
}

fn full_word() -> u8 {
    8
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub config: TxConfig,
    /// Cycles to simulate.
    pub cycles: u64,
    #[serde(default)]
    pub frames: Vec<FrameSpec>,
    #[serde(default)]
    pub opcodes: Vec<OpCodeSpec>,
    /// Cycles with disable asserted.
    #[serde(default)]
    pub disable: Vec<u64>,
    /// Cycles where the physical layer is active but not taking symbols.
    #[serde(default)]
    pub stalled: Vec<u64>,
    /// Cycles where the physical layer is down.
    #[serde(default)]
    pub inactive: Vec<u64>,
    /// Cycles with reset asserted.
    #[serde(default)]
    pub reset: Vec<u64>,
    /// Cycles where the payload source withholds its chunk.
    #[serde(default)]
    pub gaps: Vec<u64>,
    #[serde(default = "linked")]
    pub local_link_ready: bool,
    #[serde(default = "linked")]
    pub remote_link_ready: bool,
    /// Local receive status per virtual channel, held for the whole run.
    #[serde(default)]
    pub channels: Vec<ChannelStatus>,
}

/// One frame offered by the packetizer.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameSpec {
    #[serde(default)]
    pub vc: u8,
    #[serde(default)]
    pub seq: u16,
    /// Data words between the header and tail chunks.
    #[serde(default)]
    pub words: Vec<u64>,
    #[serde(default)]
    pub crc: u32,
    #[serde(default = "full_word")]
    pub last_bytes: u8,
    /// Flag the frame as errored in its tail.
    #[serde(default)]
    pub error: bool,
    /// Send as a continuation segment (SOC/EOC).
    #[serde(default)]
    pub continuation: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpCodeSpec {
    pub cycle: u64,
    pub code: u8,
    #[serde(default)]
    pub data: u64,
}

impl FrameSpec {
    /// Header, data and tail chunks in transmit order.
    pub fn chunks(&self) -> Result<Vec<PayloadChunk>> {
        let mut header = FrameHeader::new(self.vc, self.seq)?;
        let mut tail = FrameTail::new(self.crc, self.last_bytes);
        if self.continuation {
            header = header.continuation();
            tail = tail.continuation();
        }
        if self.error {
            tail = tail.errored();
        }

        let mut chunks = Vec::with_capacity(self.words.len() + 2);
        chunks.push(PayloadChunk::header(header));
        chunks.extend(self.words.iter().copied().map(PayloadChunk::body));
        chunks.push(PayloadChunk::tail(tail));
        Ok(chunks)
    }
}

/// Per-cycle events, indexed by cycle.
#[derive(Debug, Default)]
struct Schedule {
    disable: BTreeSet<u64>,
    stalled: BTreeSet<u64>,
    inactive: BTreeSet<u64>,
    reset: BTreeSet<u64>,
    gaps: BTreeSet<u64>,
    opcodes: BTreeMap<u64, OpCodeRequest>,
}

impl Schedule {
    fn new(scenario: &Scenario) -> Result<Self> {
        let mut opcodes = BTreeMap::new();
        for spec in &scenario.opcodes {
            let request = OpCodeRequest::new(spec.code, spec.data)?;
            if opcodes.insert(spec.cycle, request).is_some() {
                warn!(cycle = spec.cycle, "duplicate opcode request, keeping the last");
            }
        }
        Ok(Self {
            disable: scenario.disable.iter().copied().collect(),
            stalled: scenario.stalled.iter().copied().collect(),
            inactive: scenario.inactive.iter().copied().collect(),
            reset: scenario.reset.iter().copied().collect(),
            gaps: scenario.gaps.iter().copied().collect(),
            opcodes,
        })
    }

    fn phy(&self, cycle: u64) -> PhyStatus {
        if self.inactive.contains(&cycle) {
            PhyStatus::DOWN
        } else if self.stalled.contains(&cycle) {
            PhyStatus::STALLED
        } else {
            PhyStatus::UP
        }
    }
}

/// Totals over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub cycles: u64,
    pub chunks_sent: u64,
    pub chunks_pending: usize,
    pub frames_completed: u64,
    pub frame_errors: u64,
    pub skips: u64,
    pub opcodes_sent: u64,
    pub opcodes_dropped: u64,
}

#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub outputs: Vec<TxOutputs>,
    pub summary: Summary,
}

/// Run `scenario` to completion.
pub fn simulate(scenario: &Scenario) -> Result<SimulationRun> {
    let mut transmitter = Transmitter::new(scenario.config)?;
    let schedule = Schedule::new(scenario)?;

    let mut source = VecDeque::new();
    for frame in &scenario.frames {
        source.extend(frame.chunks()?);
    }
    if scenario.channels.len() > MAX_VIRTUAL_CHANNELS {
        warn!(
            given = scenario.channels.len(),
            max = MAX_VIRTUAL_CHANNELS,
            "extra channel entries ignored"
        );
    }

    info!(
        cycles = scenario.cycles,
        frames = scenario.frames.len(),
        chunks = source.len(),
        "simulation started"
    );

    let mut base = TxInputs {
        local_link_ready: scenario.local_link_ready,
        remote_link_ready: scenario.remote_link_ready,
        ..TxInputs::default()
    };
    for (index, status) in scenario.channels.iter().enumerate() {
        base = base.with_channel(index, *status);
    }

    let mut summary = Summary {
        cycles: scenario.cycles,
        ..Summary::default()
    };
    let mut outputs = Vec::new();

    for cycle in 0..scenario.cycles {
        let mut inputs = base
            .with_phy(schedule.phy(cycle))
            .with_disable(schedule.disable.contains(&cycle))
            .with_reset(schedule.reset.contains(&cycle));
        if !schedule.gaps.contains(&cycle) {
            inputs.payload = source.front().copied();
        }
        inputs.opcode = schedule.opcodes.get(&cycle).copied();

        let out = transmitter.tick(&inputs);

        if out.payload_ready {
            source.pop_front();
            summary.chunks_sent += 1;
        }
        if let Some(request) = inputs.opcode {
            if out.status.opcode_sent {
                summary.opcodes_sent += 1;
            } else {
                debug!(cycle, code = request.code(), "opcode request dropped");
                summary.opcodes_dropped += 1;
            }
        }
        // A stalled cycle re-offers the previous symbol.
        if out.kind == SymbolKind::Skip && inputs.phy == PhyStatus::UP {
            summary.skips += 1;
        }
        summary.frames_completed += u64::from(out.status.frame_complete);
        summary.frame_errors += u64::from(out.status.frame_error);
        outputs.push(out);
    }

    summary.chunks_pending = source.len();
    info!(
        chunks_sent = summary.chunks_sent,
        chunks_pending = summary.chunks_pending,
        frames = summary.frames_completed,
        errors = summary.frame_errors,
        "simulation finished"
    );

    Ok(SimulationRun { outputs, summary })
}
