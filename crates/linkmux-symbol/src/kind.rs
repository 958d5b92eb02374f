use std::fmt;

use crate::btf;
use crate::error::{Result, SymbolError};
use crate::symbol::{HeaderTag, Symbol};

/// The category of a transmitted symbol. Exactly one applies to every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case", tag = "kind"))]
pub enum SymbolKind {
    /// Output driven while disabled or before the link is active.
    #[default]
    Blank,
    Idle,
    Skip,
    User { code: u8 },
    StartOfFrame,
    StartOfContinuation,
    Data,
    EndOfFrame,
    EndOfContinuation,
}

impl SymbolKind {
    /// Recover the category of an encoded symbol.
    pub fn classify(symbol: &Symbol) -> Result<Self> {
        match symbol.header {
            HeaderTag::Blank => {
                if symbol.payload != 0 || symbol.valid {
                    return Err(SymbolError::MalformedBlank);
                }
                Ok(SymbolKind::Blank)
            }
            HeaderTag::Data => Ok(SymbolKind::Data),
            HeaderTag::Control => match btf::of(symbol.payload) {
                btf::IDLE => Ok(SymbolKind::Idle),
                btf::SKP => Ok(SymbolKind::Skip),
                btf::SOF => Ok(SymbolKind::StartOfFrame),
                btf::SOC => Ok(SymbolKind::StartOfContinuation),
                btf::EOF => Ok(SymbolKind::EndOfFrame),
                btf::EOC => Ok(SymbolKind::EndOfContinuation),
                code @ btf::USER_BASE..=btf::USER_LAST => Ok(SymbolKind::User {
                    code: code - btf::USER_BASE,
                }),
                other => Err(SymbolError::UnknownBlockType(other)),
            },
        }
    }

    /// Short display name, matching the BTF names.
    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Blank => "BLANK",
            SymbolKind::Idle => "IDLE",
            SymbolKind::Skip => "SKP",
            SymbolKind::User { .. } => "USER",
            SymbolKind::StartOfFrame => "SOF",
            SymbolKind::StartOfContinuation => "SOC",
            SymbolKind::Data => "DATA",
            SymbolKind::EndOfFrame => "EOF",
            SymbolKind::EndOfContinuation => "EOC",
        }
    }

    /// True for symbols that consume a payload chunk.
    pub fn carries_payload(&self) -> bool {
        matches!(
            self,
            SymbolKind::StartOfFrame
                | SymbolKind::StartOfContinuation
                | SymbolKind::Data
                | SymbolKind::EndOfFrame
                | SymbolKind::EndOfContinuation
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::User { code } => write!(f, "USER({code})"),
            other => f.write_str(other.name()),
        }
    }
}
