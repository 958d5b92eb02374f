use std::fs::File;
use std::io::BufReader;

use linkmux::symbol::{CaptureReader, DecodedOpCode, SymbolKind};
use tracing::{debug, warn};

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, symbol_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_capture, OutputFormat, RecordRow, SymbolRow};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.capture)
        .map_err(|err| io_error(&format!("open {}", args.capture.display()), err))?;
    let reader = CaptureReader::new(BufReader::new(file));

    let mut rows = Vec::new();
    for (index, item) in reader.enumerate() {
        let context = format!("record {index}");
        let symbol = item.map_err(|err| symbol_error(&context, err))?;
        let kind = SymbolKind::classify(&symbol).map_err(|err| symbol_error(&context, err))?;

        if let SymbolKind::User { code } = kind {
            let checksum_ok =
                DecodedOpCode::from_payload(symbol.payload).is_some_and(|op| op.checksum_ok());
            if !checksum_ok {
                if args.strict {
                    return Err(CliError::new(
                        DATA_INVALID,
                        format!("{context}: USER({code}) checksum mismatch"),
                    ));
                }
                warn!(record = index, code, "opcode checksum mismatch");
            }
        }

        rows.push(RecordRow {
            index: index as u64,
            symbol: SymbolRow::new(&symbol, kind),
        });
    }

    debug!(records = rows.len(), "capture decoded");
    print_capture(&rows, format);
    Ok(SUCCESS)
}
