use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Result, SymbolError};
use crate::symbol::{HeaderTag, Symbol, SEQUENCE_MASK};

/// Capture record: flags (1) + sequence (1) + payload (8) = 10 bytes.
pub const RECORD_SIZE: usize = 10;

const HEADER_MASK: u8 = 0b0011;
const START_FLAG: u8 = 0b0100;
const VALID_FLAG: u8 = 0b1000;

/// Append one symbol to a capture buffer.
///
/// Record format:
/// ```text
/// ┌──────────────────────────┬──────────┬─────────────────┐
/// │ Flags (1B)               │ Sequence │ Payload          │
/// │ bit 3 valid, bit 2 start │ (1B)     │ (8B LE)          │
/// │ bits 1:0 header tag      │          │                  │
/// └──────────────────────────┴──────────┴─────────────────┘
/// ```
pub fn encode_symbol(symbol: &Symbol, dst: &mut BytesMut) {
    let mut flags = symbol.header.bits() & HEADER_MASK;
    if symbol.start {
        flags |= START_FLAG;
    }
    if symbol.valid {
        flags |= VALID_FLAG;
    }
    dst.reserve(RECORD_SIZE);
    dst.put_u8(flags);
    dst.put_u8(symbol.sequence & SEQUENCE_MASK);
    dst.put_u64_le(symbol.payload);
}

/// Decode one symbol from a capture buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete record yet.
/// On success, consumes the record bytes from the buffer.
pub fn decode_symbol(src: &mut BytesMut) -> Result<Option<Symbol>> {
    if src.len() < RECORD_SIZE {
        return Ok(None);
    }

    let flags = src[0];
    if flags & !(HEADER_MASK | START_FLAG | VALID_FLAG) != 0 {
        return Err(SymbolError::InvalidHeader(flags));
    }
    let header = HeaderTag::from_bits(flags & HEADER_MASK)?;
    let sequence = src[1];
    if sequence > SEQUENCE_MASK {
        return Err(SymbolError::SequenceOutOfRange(sequence));
    }

    src.advance(2);
    let payload = src.get_u64_le();

    Ok(Some(Symbol {
        valid: flags & VALID_FLAG != 0,
        start: flags & START_FLAG != 0,
        sequence,
        header,
        payload,
    }))
}
