use std::collections::BTreeMap;
use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use linkmux::symbol::{
    DecodedOpCode, FrameHeader, FrameTail, HeaderTag, LinkInfo, Symbol, SymbolKind,
};
use linkmux::tx::{LinkPhase, TxOutputs};
use serde::Serialize;

use crate::scenario::Summary;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    /// Binary capture records (simulate) or one payload per line (decode).
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SymbolRow {
    /// Category without the USER code.
    #[serde(skip)]
    pub category: &'static str,
    pub kind: String,
    pub valid: bool,
    pub start: bool,
    pub sequence: u8,
    pub header: &'static str,
    pub payload: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
}

impl SymbolRow {
    pub fn new(symbol: &Symbol, kind: SymbolKind) -> Self {
        Self {
            category: kind.name(),
            kind: kind.to_string(),
            valid: symbol.valid,
            start: symbol.start,
            sequence: symbol.sequence,
            header: header_name(symbol.header),
            payload: format!("{:#018x}", symbol.payload),
            detail: describe(symbol, kind),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CycleRow {
    pub cycle: u64,
    #[serde(flatten)]
    pub symbol: SymbolRow,
    pub payload_ready: bool,
    pub phase: LinkPhase,
    pub link_ready: bool,
    pub frame_complete: bool,
    pub frame_error: bool,
    pub opcode_sent: bool,
}

impl CycleRow {
    pub fn new(cycle: u64, out: &TxOutputs) -> Self {
        Self {
            cycle,
            symbol: SymbolRow::new(&out.symbol, out.kind),
            payload_ready: out.payload_ready,
            phase: out.status.phase,
            link_ready: out.status.link_ready,
            frame_complete: out.status.frame_complete,
            frame_error: out.status.frame_error,
            opcode_sent: out.status.opcode_sent,
        }
    }

    fn flags(&self) -> String {
        let mut flags = Vec::new();
        if self.frame_complete {
            flags.push("complete");
        }
        if self.frame_error {
            flags.push("error");
        }
        if self.opcode_sent {
            flags.push("opcode");
        }
        flags.join(",")
    }
}

#[derive(Debug, Serialize)]
pub struct RecordRow {
    pub index: u64,
    #[serde(flatten)]
    pub symbol: SymbolRow,
}

#[derive(Serialize)]
struct SimulationOutput<'a> {
    schema_id: &'static str,
    cycles: &'a [CycleRow],
    summary: &'a Summary,
}

#[derive(Serialize)]
struct CaptureOutput<'a> {
    schema_id: &'static str,
    records: &'a [RecordRow],
    counts: BTreeMap<&'static str, u64>,
}

pub fn print_simulation(rows: &[CycleRow], summary: &Summary, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SimulationOutput {
                schema_id: "https://schemas.3leaps.dev/linkmux/cli/v1/simulation.schema.json",
                cycles: rows,
                summary,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec![
                    "CYCLE", "KIND", "SEQ", "PAYLOAD", "READY", "PHASE", "FLAGS", "DETAIL",
                ]);
            for row in rows {
                table.add_row(vec![
                    row.cycle.to_string(),
                    start_marked(&row.symbol),
                    row.symbol.sequence.to_string(),
                    row.symbol.payload.clone(),
                    row.payload_ready.to_string(),
                    row.phase.to_string(),
                    row.flags(),
                    row.symbol.detail.clone(),
                ]);
            }
            println!("{table}");
            print_summary(summary);
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "cycle={} kind={} seq={} payload={} ready={} phase={} {}",
                    row.cycle,
                    start_marked(&row.symbol),
                    row.symbol.sequence,
                    row.symbol.payload,
                    row.payload_ready,
                    row.phase,
                    row.symbol.detail
                );
            }
            print_summary(summary);
        }
        OutputFormat::Raw => {}
    }
}

pub fn print_capture(rows: &[RecordRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let mut counts = BTreeMap::new();
            for row in rows {
                *counts.entry(row.symbol.category).or_insert(0) += 1;
            }
            let out = CaptureOutput {
                schema_id: "https://schemas.3leaps.dev/linkmux/cli/v1/capture.schema.json",
                records: rows,
                counts,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "KIND", "SEQ", "HEADER", "PAYLOAD", "DETAIL"]);
            for row in rows {
                table.add_row(vec![
                    row.index.to_string(),
                    start_marked(&row.symbol),
                    row.symbol.sequence.to_string(),
                    row.symbol.header.to_string(),
                    row.symbol.payload.clone(),
                    row.symbol.detail.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "#{} kind={} seq={} payload={} {}",
                    row.index,
                    start_marked(&row.symbol),
                    row.symbol.sequence,
                    row.symbol.payload,
                    row.symbol.detail
                );
            }
        }
        OutputFormat::Raw => {
            for row in rows {
                println!("{}", row.symbol.payload);
            }
        }
    }
}

fn print_summary(summary: &Summary) {
    println!(
        "cycles={} chunks_sent={} chunks_pending={} frames={} errors={} skips={} opcodes_sent={} opcodes_dropped={}",
        summary.cycles,
        summary.chunks_sent,
        summary.chunks_pending,
        summary.frames_completed,
        summary.frame_errors,
        summary.skips,
        summary.opcodes_sent,
        summary.opcodes_dropped
    );
}

/// Kind name with a `*` when the start marker is set.
fn start_marked(row: &SymbolRow) -> String {
    if row.start {
        format!("{}*", row.kind)
    } else {
        row.kind.clone()
    }
}

pub fn header_name(tag: HeaderTag) -> &'static str {
    match tag {
        HeaderTag::Blank => "blank",
        HeaderTag::Data => "data",
        HeaderTag::Control => "control",
    }
}

/// Human-readable fields of a control symbol.
pub fn describe(symbol: &Symbol, kind: SymbolKind) -> String {
    match kind {
        SymbolKind::Idle => link_info_detail(symbol.payload),
        SymbolKind::StartOfFrame | SymbolKind::StartOfContinuation => {
            let header = FrameHeader::decode(symbol.payload);
            format!(
                "vc={} seq={:#05x} {}",
                header.virtual_channel,
                header.sequence,
                link_info_detail(symbol.payload)
            )
        }
        SymbolKind::EndOfFrame | SymbolKind::EndOfContinuation => {
            let tail = FrameTail::decode(symbol.payload);
            let mut detail = format!("crc={:#010x} bytes={}", tail.crc, tail.last_bytes);
            if tail.is_errored() {
                detail.push_str(" error");
            }
            detail
        }
        SymbolKind::User { .. } => match DecodedOpCode::from_payload(symbol.payload) {
            Some(op) => format!(
                "data={:#014x} checksum={}",
                op.data,
                if op.checksum_ok() { "ok" } else { "bad" }
            ),
            None => String::new(),
        },
        SymbolKind::Blank | SymbolKind::Skip | SymbolKind::Data => String::new(),
    }
}

fn link_info_detail(payload: u64) -> String {
    let info = LinkInfo::from_bits(payload);
    let mut pause = 0u16;
    let mut overflow = 0u16;
    for (i, status) in info.channels.iter().enumerate() {
        pause |= u16::from(status.pause) << i;
        overflow |= u16::from(status.overflow) << i;
    }
    format!(
        "link_ready={} pause={pause:#06x} overflow={overflow:#06x}",
        info.link_ready
    )
}
