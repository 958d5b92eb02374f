use std::fmt;

/// Link lifecycle as seen by the transmitter.
///
/// `Reset` until the physical layer is active, `StartingUp` while the startup
/// hold runs (maintenance symbols only), `LinkUp` once data and opcodes may
/// flow. A disable command drops back to `StartingUp`; losing the physical
/// layer or an external reset drops back to `Reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LinkPhase {
    #[default]
    Reset,
    StartingUp,
    LinkUp,
}

impl LinkPhase {
    /// Phase implied by the link-ready flag once the physical layer is active.
    pub fn active(link_ready: bool) -> Self {
        if link_ready {
            LinkPhase::LinkUp
        } else {
            LinkPhase::StartingUp
        }
    }

    /// Data and USER symbols are only eligible in `LinkUp`.
    pub fn allows_traffic(self) -> bool {
        self == LinkPhase::LinkUp
    }

    pub fn name(self) -> &'static str {
        match self {
            LinkPhase::Reset => "reset",
            LinkPhase::StartingUp => "starting_up",
            LinkPhase::LinkUp => "link_up",
        }
    }
}

impl fmt::Display for LinkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
