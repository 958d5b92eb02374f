use crate::error::{Result, SymbolError};

/// Mask for the 6-bit rolling sequence number.
pub const SEQUENCE_MASK: u8 = 0x3F;

/// 2-bit header tag carried alongside every symbol payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HeaderTag {
    /// Only produced while the link is disabled.
    #[default]
    Blank,
    /// Raw payload passthrough.
    Data,
    /// Payload starts with a block-type field.
    Control,
}

impl HeaderTag {
    /// Wire encoding of the tag.
    pub const fn bits(self) -> u8 {
        match self {
            HeaderTag::Blank => 0b00,
            HeaderTag::Data => 0b01,
            HeaderTag::Control => 0b10,
        }
    }

    /// Decode a wire tag. `0b11` is never produced.
    pub fn from_bits(bits: u8) -> Result<Self> {
        match bits {
            0b00 => Ok(HeaderTag::Blank),
            0b01 => Ok(HeaderTag::Data),
            0b10 => Ok(HeaderTag::Control),
            other => Err(SymbolError::InvalidHeader(other)),
        }
    }
}

/// One transmitted unit: what the physical layer receives on a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    /// Physical layer should take this symbol.
    pub valid: bool,
    /// Marks the first symbol after the link (re)entered start-up.
    pub start: bool,
    /// Rolling 6-bit sequence number.
    pub sequence: u8,
    /// Control or data tag.
    pub header: HeaderTag,
    /// 64-bit payload.
    pub payload: u64,
}

impl Symbol {
    /// A control symbol with the given payload.
    pub const fn control(payload: u64) -> Self {
        Self {
            valid: true,
            start: false,
            sequence: 0,
            header: HeaderTag::Control,
            payload,
        }
    }

    /// A data symbol carrying `payload` unchanged.
    pub const fn data(payload: u64) -> Self {
        Self {
            valid: true,
            start: false,
            sequence: 0,
            header: HeaderTag::Data,
            payload,
        }
    }

    /// The all-zero symbol driven while disabled or inactive.
    pub const fn blank() -> Self {
        Self {
            valid: false,
            start: false,
            sequence: 0,
            header: HeaderTag::Blank,
            payload: 0,
        }
    }

    /// Stamp sequencing fields onto an encoded symbol.
    pub fn with_sequence(mut self, sequence: u8, start: bool) -> Self {
        self.sequence = sequence & SEQUENCE_MASK;
        self.start = start;
        self
    }
}
