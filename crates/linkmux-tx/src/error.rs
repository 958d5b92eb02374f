use linkmux_symbol::MAX_VIRTUAL_CHANNELS;

/// Errors raised while building a transmitter or its inputs.
///
/// The per-cycle transition itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum TxError {
    /// The configured channel count is zero or above the maximum.
    #[error("virtual channel count {0} out of range (1-{max})", max = MAX_VIRTUAL_CHANNELS)]
    ChannelCount(u8),

    /// A zero skip interval would leave no room for any other symbol.
    #[error("skip interval must be at least one cycle")]
    ZeroSkipInterval,

    /// Symbol-level validation error.
    #[error("symbol error: {0}")]
    Symbol(#[from] linkmux_symbol::SymbolError),
}

pub type Result<T> = std::result::Result<T, TxError>;
