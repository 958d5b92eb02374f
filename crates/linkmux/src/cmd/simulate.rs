use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use linkmux::symbol::CaptureWriter;
use linkmux::tx::TxOutputs;
use tracing::{info, warn};

use crate::cmd::SimulateArgs;
use crate::exit::{io_error, json_error, symbol_error, tx_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_simulation, CycleRow, OutputFormat};
use crate::scenario::{simulate, Scenario};

pub fn run(args: SimulateArgs, format: OutputFormat) -> CliResult<i32> {
    let mut scenario = load(&args.scenario)?;
    if let Some(cycles) = args.cycles {
        scenario.cycles = cycles;
    }

    let run = simulate(&scenario).map_err(|err| tx_error("simulate", err))?;

    if let Some(path) = &args.capture {
        let file = File::create(path)
            .map_err(|err| io_error(&format!("create {}", path.display()), err))?;
        let written = write_capture(BufWriter::new(file), &run.outputs)?;
        info!(path = %path.display(), records = written, "capture written");
    }

    if let OutputFormat::Raw = format {
        write_capture(std::io::stdout().lock(), &run.outputs)?;
    } else {
        let rows: Vec<CycleRow> = run
            .outputs
            .iter()
            .enumerate()
            .map(|(cycle, out)| CycleRow::new(cycle as u64, out))
            .collect();
        print_simulation(&rows, &run.summary, format);
    }

    if run.summary.chunks_pending > 0 {
        warn!(pending = run.summary.chunks_pending, "payload chunks left unsent");
        if args.require_drained {
            return Ok(FAILURE);
        }
    }
    Ok(SUCCESS)
}

fn load(path: &Path) -> CliResult<Scenario> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| io_error(&format!("read {}", path.display()), err))?;
    serde_json::from_str(&text).map_err(|err| json_error("parse scenario", err))
}

fn write_capture<W: Write>(inner: W, outputs: &[TxOutputs]) -> CliResult<u64> {
    let mut writer = CaptureWriter::new(inner);
    for out in outputs {
        writer
            .write_symbol(&out.symbol)
            .map_err(|err| symbol_error("write capture", err))?;
    }
    writer
        .flush()
        .map_err(|err| symbol_error("flush capture", err))?;
    Ok(writer.records_written())
}
