//! Bit-exact symbol encodings for a virtual-channel multiplexed serial link.
//!
//! Every cycle the transmitter hands the physical layer one [`Symbol`]: a
//! 64-bit payload, a 2-bit header tag, a start marker and a 6-bit sequence
//! number. Control symbols identify themselves with a block-type field in the
//! top byte of the payload:
//! - IDLE and SOF/SOC carry the aggregated [`LinkInfo`] in their low 40 bits
//! - EOF/EOC carry the CRC, byte count and end-user flags of the frame
//! - USER carries a 4-bit opcode, a checksum and 48 bits of opcode data
//! - SKP carries nothing but its block type
//!
//! The crate also defines the packetizer metadata layout ([`FrameHeader`],
//! [`FrameTail`]) and a fixed-size capture record for recording symbol streams.

pub mod btf;
pub mod codec;
pub mod error;
pub mod ingress;
pub mod kind;
pub mod link_info;
pub mod opcode;
pub mod reader;
pub mod symbol;
pub mod writer;

pub use codec::{decode_symbol, encode_symbol, RECORD_SIZE};
pub use error::{Result, SymbolError};
pub use ingress::{FrameHeader, FrameTail, PayloadChunk, FRAME_SEQUENCE_MASK, TUSER_ERROR};
pub use kind::SymbolKind;
pub use link_info::{
    mask_channels, ChannelStatus, ChannelStatusArray, LinkInfo, LINK_INFO_MASK,
    MAX_VIRTUAL_CHANNELS,
};
pub use opcode::{DecodedOpCode, OpCodeRequest, OPCODE_DATA_MASK};
pub use reader::CaptureReader;
pub use symbol::{HeaderTag, Symbol, SEQUENCE_MASK};
pub use writer::CaptureWriter;
