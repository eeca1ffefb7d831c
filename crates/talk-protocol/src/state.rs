//! Speech link session states

/// Protocol state of the speech link session
///
/// The link's session layer tracks this; the loop keeps a mirror of it for
/// gating the loopback path and for logging state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkState {
    /// No audio path is active
    #[default]
    Idle,
    /// Downlink decoding is active, uplink is not
    DownlinkOnly,
    /// Both downlink and uplink are active
    FullDuplex,
}

impl LinkState {
    /// Returns a human-readable name for the state
    pub fn name(&self) -> &'static str {
        match self {
            LinkState::Idle => "idle",
            LinkState::DownlinkOnly => "downlink-only",
            LinkState::FullDuplex => "full-duplex",
        }
    }

    /// Whether both audio paths are active
    pub fn is_full_duplex(&self) -> bool {
        matches!(self, LinkState::FullDuplex)
    }

    /// Whether the downlink path is active
    pub fn downlink_active(&self) -> bool {
        matches!(self, LinkState::DownlinkOnly | LinkState::FullDuplex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        assert_eq!(LinkState::default(), LinkState::Idle);
    }

    #[test]
    fn duplex_predicates() {
        assert!(LinkState::FullDuplex.is_full_duplex());
        assert!(!LinkState::DownlinkOnly.is_full_duplex());
        assert!(LinkState::DownlinkOnly.downlink_active());
        assert!(!LinkState::Idle.downlink_active());
    }
}
