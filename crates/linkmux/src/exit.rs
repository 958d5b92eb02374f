use std::fmt;
use std::io;

use linkmux::symbol::SymbolError;
use linkmux::tx::TxError;

// Exit codes follow sysexits-style semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const NOT_FOUND: i32 = 2;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound => NOT_FOUND,
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn symbol_error(context: &str, err: SymbolError) -> CliError {
    match err {
        SymbolError::Io(source) => io_error(context, source),
        SymbolError::OpCodeOutOfRange(_)
        | SymbolError::OpCodeDataTooWide(_)
        | SymbolError::ChannelOutOfRange(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn tx_error(context: &str, err: TxError) -> CliError {
    match err {
        TxError::Symbol(err) => symbol_error(context, err),
        other => CliError::new(USAGE, format!("{context}: {other}")),
    }
}

pub fn json_error(context: &str, err: serde_json::Error) -> CliError {
    if err.is_io() {
        return CliError::new(INTERNAL, format!("{context}: {err}"));
    }
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}
