//! Operational-code (USER) symbol encoding.
//!
//! ```text
//!  63      56 55      48 47                                   0
//! ┌──────────┬──────────┬──────────────────────────────────────┐
//! │ USER BTF │ checksum │ opcode data (48 bits)                │
//! │ 0x80 + n │ XOR of   │                                      │
//! │          │ 6 bytes  │                                      │
//! └──────────┴──────────┴──────────────────────────────────────┘
//! ```
//!
//! Requests with data above bit 47 are rejected at construction.

use crate::btf;
use crate::error::{Result, SymbolError};

/// Number of opcode data bits carried by a USER symbol.
pub const OPCODE_DATA_WIDTH: u32 = 48;

/// Mask selecting the opcode data bits.
pub const OPCODE_DATA_MASK: u64 = (1 << OPCODE_DATA_WIDTH) - 1;

const CHECKSUM_SHIFT: u32 = 48;

/// A request to send an out-of-band operational code this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OpCodeRequest {
    code: u8,
    data: u64,
}

impl OpCodeRequest {
    /// Create a request for `code` (0–15) carrying 48 bits of `data`.
    pub fn new(code: u8, data: u64) -> Result<Self> {
        if code > 15 {
            return Err(SymbolError::OpCodeOutOfRange(code));
        }
        if data & !OPCODE_DATA_MASK != 0 {
            return Err(SymbolError::OpCodeDataTooWide(data));
        }
        Ok(Self { code, data })
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn data(&self) -> u64 {
        self.data
    }

    /// Encode into a USER symbol payload.
    pub fn encode(&self) -> u64 {
        btf::place(btf::USER_BASE + self.code)
            | (u64::from(checksum(self.data)) << CHECKSUM_SHIFT)
            | self.data
    }
}

/// Byte parity over the 48 transmitted data bits.
pub fn checksum(data: u64) -> u8 {
    (data & OPCODE_DATA_MASK)
        .to_le_bytes()
        .iter()
        .take((OPCODE_DATA_WIDTH / 8) as usize)
        .fold(0, |acc, byte| acc ^ byte)
}

/// A USER symbol payload split back into its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedOpCode {
    pub code: u8,
    pub data: u64,
    pub checksum: u8,
}

impl DecodedOpCode {
    /// Split a USER payload. Returns `None` if the BTF is outside the user range.
    pub fn from_payload(payload: u64) -> Option<Self> {
        let btf = btf::of(payload);
        if !(btf::USER_BASE..=btf::USER_LAST).contains(&btf) {
            return None;
        }
        Some(Self {
            code: btf - btf::USER_BASE,
            data: payload & OPCODE_DATA_MASK,
            checksum: (payload >> CHECKSUM_SHIFT) as u8,
        })
    }

    /// True if the carried checksum matches the carried data.
    pub fn checksum_ok(&self) -> bool {
        checksum(self.data) == self.checksum
    }
}
