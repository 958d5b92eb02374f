/// Errors that can occur while encoding, decoding or classifying symbols.
#[derive(Debug, thiserror::Error)]
pub enum SymbolError {
    /// The 2-bit header tag is not one the transmitter produces.
    #[error("invalid header tag 0b{0:02b}")]
    InvalidHeader(u8),

    /// A control symbol carries a block-type field with no defined meaning.
    #[error("unknown block type 0x{0:02X}")]
    UnknownBlockType(u8),

    /// A blank header was paired with a non-zero payload or a valid flag.
    #[error("malformed blank symbol")]
    MalformedBlank,

    /// The opcode selector does not fit in 4 bits.
    #[error("opcode {0} out of range (max 15)")]
    OpCodeOutOfRange(u8),

    /// The opcode data does not fit in the 48 bits a USER symbol carries.
    #[error("opcode data 0x{0:X} wider than 48 bits")]
    OpCodeDataTooWide(u64),

    /// The virtual channel index does not fit in 4 bits.
    #[error("virtual channel {0} out of range (max 15)")]
    ChannelOutOfRange(u8),

    /// The sequence number does not fit in 6 bits.
    #[error("sequence number {0} out of range (max 63)")]
    SequenceOutOfRange(u8),

    /// An I/O error occurred while reading or writing a capture stream.
    #[error("capture I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The capture stream ended inside a record.
    #[error("capture truncated ({0} trailing bytes)")]
    Truncated(usize),
}

pub type Result<T> = std::result::Result<T, SymbolError>;
