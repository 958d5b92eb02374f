//! Block-type field (BTF) codes.
//!
//! Every control symbol carries one of these codes in bits `[63:56]` of its
//! payload. Data symbols carry no BTF; their header tag alone identifies them.

/// Bit offset of the block-type field within the 64-bit payload.
pub const BTF_SHIFT: u32 = 56;

/// Link maintenance padding.
pub const IDLE: u8 = 0x99;

/// Start of a new frame.
pub const SOF: u8 = 0xAA;

/// Start of a continuation segment of a frame.
pub const SOC: u8 = 0xB4;

/// End of a frame.
pub const EOF: u8 = 0x55;

/// End of a continuation segment.
pub const EOC: u8 = 0x4B;

/// Clock compensation skip.
pub const SKP: u8 = 0x66;

/// BTF of user opcode 0. Opcode `n` uses `USER_BASE + n`.
pub const USER_BASE: u8 = 0x80;

/// Last BTF in the user opcode range.
pub const USER_LAST: u8 = USER_BASE + 15;

/// Extracts the BTF from a symbol payload.
pub fn of(payload: u64) -> u8 {
    (payload >> BTF_SHIFT) as u8
}

/// Places `btf` into bits `[63:56]` of an otherwise zero payload.
pub fn place(btf: u8) -> u64 {
    u64::from(btf) << BTF_SHIFT
}
