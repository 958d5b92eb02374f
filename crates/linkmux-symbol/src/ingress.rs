//! Payload chunks and the packetizer metadata carried inside them.
//!
//! The packetizer marks the first chunk of every frame (or continuation
//! segment) with a side-band `first` flag and the last with `last`. Those two
//! chunks carry only metadata; every chunk in between is opaque payload.
//!
//! Header chunk (`first`):
//! ```text
//!  63     56 55          44 43   40 39                 1   0
//! ┌─────────┬──────────────┬───────┬────────────────────┬─────┐
//! │ ignored │ frame seq    │ VC    │ ignored            │ SOF │
//! └─────────┴──────────────┴───────┴────────────────────┴─────┘
//! ```
//!
//! Tail chunk (`last`):
//! ```text
//!  63     56 55                 24 23   20 19   16 15   9  8   7      0
//! ┌─────────┬─────────────────────┬───────┬───────┬──────┬─────┬────────┐
//! │ ignored │ CRC-32              │ ign.  │ bytes │ ign. │ EOF │ tuser  │
//! └─────────┴─────────────────────┴───────┴───────┴──────┴─────┴────────┘
//! ```
//! Bit 0 of `tuser` flags the frame as errored.

use crate::error::{Result, SymbolError};

/// Maximum frame sequence number (12 bits).
pub const FRAME_SEQUENCE_MASK: u16 = 0x0FFF;

/// Bit of the end-user flags that marks an errored frame.
pub const TUSER_ERROR: u8 = 0x01;

pub const SEQ_SHIFT: u32 = 44;
pub const VC_SHIFT: u32 = 40;
pub const CRC_SHIFT: u32 = 24;
pub const BYTES_SHIFT: u32 = 16;
const SOF_BIT: u32 = 0;
const EOF_BIT: u32 = 8;

/// One 64-bit chunk presented by the payload source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PayloadChunk {
    pub data: u64,
    /// First chunk of a frame or continuation segment.
    pub first: bool,
    /// Last chunk of a frame or continuation segment.
    pub last: bool,
}

impl PayloadChunk {
    /// An interior chunk.
    pub fn body(data: u64) -> Self {
        Self {
            data,
            first: false,
            last: false,
        }
    }

    /// The header chunk for `header`.
    pub fn header(header: FrameHeader) -> Self {
        Self {
            data: header.encode(),
            first: true,
            last: false,
        }
    }

    /// The tail chunk for `tail`.
    pub fn tail(tail: FrameTail) -> Self {
        Self {
            data: tail.encode(),
            first: false,
            last: true,
        }
    }
}

/// Metadata of a header chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    /// Start of a new frame (`true`) or of a continuation segment.
    pub start_of_frame: bool,
    pub virtual_channel: u8,
    pub sequence: u16,
}

impl FrameHeader {
    /// Header for a new frame on `virtual_channel`.
    pub fn new(virtual_channel: u8, sequence: u16) -> Result<Self> {
        if virtual_channel > 15 {
            return Err(SymbolError::ChannelOutOfRange(virtual_channel));
        }
        Ok(Self {
            start_of_frame: true,
            virtual_channel,
            sequence: sequence & FRAME_SEQUENCE_MASK,
        })
    }

    /// Same header, marked as a continuation segment.
    pub fn continuation(mut self) -> Self {
        self.start_of_frame = false;
        self
    }

    pub fn encode(&self) -> u64 {
        (u64::from(self.sequence & FRAME_SEQUENCE_MASK) << SEQ_SHIFT)
            | (u64::from(self.virtual_channel & 0xF) << VC_SHIFT)
            | (u64::from(self.start_of_frame) << SOF_BIT)
    }

    pub fn decode(data: u64) -> Self {
        Self {
            start_of_frame: (data >> SOF_BIT) & 1 == 1,
            virtual_channel: ((data >> VC_SHIFT) & 0xF) as u8,
            sequence: ((data >> SEQ_SHIFT) as u16) & FRAME_SEQUENCE_MASK,
        }
    }
}

/// Metadata of a tail chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTail {
    /// End of the frame (`true`) or only of a continuation segment.
    pub end_of_frame: bool,
    pub tuser: u8,
    /// Valid bytes in the last data chunk (1–8).
    pub last_bytes: u8,
    pub crc: u32,
}

impl FrameTail {
    /// Tail closing a frame.
    pub fn new(crc: u32, last_bytes: u8) -> Self {
        Self {
            end_of_frame: true,
            tuser: 0,
            last_bytes: last_bytes & 0xF,
            crc,
        }
    }

    /// Mark the frame as errored.
    pub fn errored(mut self) -> Self {
        self.tuser |= TUSER_ERROR;
        self
    }

    /// Same tail, closing only a continuation segment.
    pub fn continuation(mut self) -> Self {
        self.end_of_frame = false;
        self
    }

    pub fn is_errored(&self) -> bool {
        self.tuser & TUSER_ERROR != 0
    }

    pub fn encode(&self) -> u64 {
        (u64::from(self.crc) << CRC_SHIFT)
            | (u64::from(self.last_bytes & 0xF) << BYTES_SHIFT)
            | (u64::from(self.end_of_frame) << EOF_BIT)
            | u64::from(self.tuser)
    }

    pub fn decode(data: u64) -> Self {
        Self {
            end_of_frame: (data >> EOF_BIT) & 1 == 1,
            tuser: data as u8,
            last_bytes: ((data >> BYTES_SHIFT) & 0xF) as u8,
            crc: (data >> CRC_SHIFT) as u32,
        }
    }
}
