//! Encoders for each symbol category.

use linkmux_symbol::btf;
use linkmux_symbol::ingress::{BYTES_SHIFT, CRC_SHIFT, SEQ_SHIFT, VC_SHIFT};
use linkmux_symbol::{
    FrameHeader, FrameTail, LinkInfo, OpCodeRequest, PayloadChunk, Symbol, SymbolKind,
    FRAME_SEQUENCE_MASK,
};

/// A payload chunk turned into a symbol, plus the frame pulses it raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Framed {
    pub(crate) symbol: Symbol,
    pub(crate) kind: SymbolKind,
    pub(crate) frame_complete: bool,
    pub(crate) frame_error: bool,
}

pub(crate) fn idle(link_info: &LinkInfo) -> Symbol {
    Symbol::control(btf::place(btf::IDLE) | link_info.to_bits())
}

pub(crate) fn skip() -> Symbol {
    Symbol::control(btf::place(btf::SKP))
}

pub(crate) fn user(request: &OpCodeRequest) -> Symbol {
    Symbol::control(request.encode())
}

pub(crate) fn start_of(header: &FrameHeader, link_info: &LinkInfo) -> Symbol {
    let code = if header.start_of_frame {
        btf::SOF
    } else {
        btf::SOC
    };
    Symbol::control(
        btf::place(code)
            | (u64::from(header.sequence & FRAME_SEQUENCE_MASK) << SEQ_SHIFT)
            | (u64::from(header.virtual_channel & 0xF) << VC_SHIFT)
            | link_info.to_bits(),
    )
}

pub(crate) fn end_of(tail: &FrameTail) -> Symbol {
    let code = if tail.end_of_frame {
        btf::EOF
    } else {
        btf::EOC
    };
    Symbol::control(
        btf::place(code)
            | (u64::from(tail.crc) << CRC_SHIFT)
            | (u64::from(tail.last_bytes & 0xF) << BYTES_SHIFT)
            | u64::from(tail.tuser),
    )
}

/// Classify a chunk by its side-band flags and encode it.
///
/// A chunk flagged both first and last is framed as a header.
pub(crate) fn frame_chunk(chunk: &PayloadChunk, link_info: &LinkInfo) -> Framed {
    if chunk.first {
        let header = FrameHeader::decode(chunk.data);
        let kind = if header.start_of_frame {
            SymbolKind::StartOfFrame
        } else {
            SymbolKind::StartOfContinuation
        };
        return Framed {
            symbol: start_of(&header, link_info),
            kind,
            frame_complete: false,
            frame_error: false,
        };
    }

    if chunk.last {
        let tail = FrameTail::decode(chunk.data);
        let kind = if tail.end_of_frame {
            SymbolKind::EndOfFrame
        } else {
            SymbolKind::EndOfContinuation
        };
        return Framed {
            symbol: end_of(&tail),
            kind,
            frame_complete: tail.end_of_frame,
            frame_error: tail.end_of_frame && tail.is_errored(),
        };
    }

    Framed {
        symbol: Symbol::data(chunk.data),
        kind: SymbolKind::Data,
        frame_complete: false,
        frame_error: false,
    }
}
