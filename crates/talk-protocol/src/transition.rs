//! Semantic transitions and their reactions
//!
//! The link's session layer classifies every control event into one of a
//! fixed set of transition codes. The reaction table below maps each code to
//! its handling in the loop: whether it warrants a warning, and how the
//! mirrored link state moves. The table is total, so consumers never rely on
//! fallthrough between transition groups.

use crate::state::LinkState;

/// Semantic transition produced by classifying one control event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    /// The event could not be classified
    Invalid,
    /// Session with the modem established
    Connected,
    /// Session with the modem torn down
    Disconnected,
    /// Downlink path starting
    DlStart,
    /// Both audio paths stopping
    DlulStop,
    /// Speech parameter refresh, no path change
    ParamUpdate,
    /// Uplink timing update from the modem
    TimingUpdate,
    /// Uplink timing renegotiation request from the modem
    TimingRenegotiate,
    /// Modem reset
    Reset,
    /// Uplink path stopping
    UlStop,
    /// Uplink path starting
    UlStart,
}

/// How the mirrored link state moves in response to a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEffect {
    /// Leave the mirror untouched
    Keep,
    /// Reset the mirror to idle
    Idle,
    /// The downlink path opened
    DownlinkOnly,
    /// Re-read the link's own bookkeeping
    Resync,
}

/// Handling for one transition code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    /// Whether the transition is logged as a warning
    pub warns: bool,
    /// How the mirrored link state moves
    pub effect: StateEffect,
}

impl Transition {
    /// Look up the reaction for this transition
    ///
    /// Timing messages only warn: uplink timing renegotiation is not
    /// supported, which is also why 2G operation is excluded outright.
    /// Administrative transitions resync the mirror from the link's own
    /// bookkeeping instead of guessing the resulting sub-state.
    pub fn reaction(self) -> Reaction {
        let (warns, effect) = match self {
            Transition::Invalid => (false, StateEffect::Keep),
            Transition::Connected => (false, StateEffect::Keep),
            Transition::Disconnected => (false, StateEffect::Idle),
            Transition::DlStart => (false, StateEffect::DownlinkOnly),
            Transition::DlulStop => (false, StateEffect::Resync),
            Transition::ParamUpdate => (false, StateEffect::Keep),
            Transition::TimingUpdate => (true, StateEffect::Keep),
            Transition::TimingRenegotiate => (true, StateEffect::Keep),
            Transition::Reset => (false, StateEffect::Resync),
            Transition::UlStop => (false, StateEffect::Resync),
            Transition::UlStart => (false, StateEffect::Resync),
        };
        Reaction { warns, effect }
    }

    /// Whether this is the unclassifiable marker
    pub fn is_invalid(self) -> bool {
        matches!(self, Transition::Invalid)
    }
}

impl StateEffect {
    /// Apply this effect to a mirrored state
    ///
    /// `authoritative` is the link's own current state, consulted only by
    /// [`StateEffect::Resync`].
    pub fn apply(self, mirror: LinkState, authoritative: LinkState) -> LinkState {
        match self {
            StateEffect::Keep => mirror,
            StateEffect::Idle => LinkState::Idle,
            StateEffect::DownlinkOnly => LinkState::DownlinkOnly,
            StateEffect::Resync => authoritative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Transition; 11] = [
        Transition::Invalid,
        Transition::Connected,
        Transition::Disconnected,
        Transition::DlStart,
        Transition::DlulStop,
        Transition::ParamUpdate,
        Transition::TimingUpdate,
        Transition::TimingRenegotiate,
        Transition::Reset,
        Transition::UlStop,
        Transition::UlStart,
    ];

    #[test]
    fn table_is_total_and_defined() {
        for tr in ALL {
            let reaction = tr.reaction();
            // every effect resolves to a defined state from any mirror
            for mirror in [LinkState::Idle, LinkState::DownlinkOnly, LinkState::FullDuplex] {
                let next = reaction.effect.apply(mirror, LinkState::Idle);
                assert!(matches!(
                    next,
                    LinkState::Idle | LinkState::DownlinkOnly | LinkState::FullDuplex
                ));
            }
        }
    }

    #[test]
    fn only_timing_transitions_warn() {
        for tr in ALL {
            let warns = tr.reaction().warns;
            let timing = matches!(tr, Transition::TimingUpdate | Transition::TimingRenegotiate);
            assert_eq!(warns, timing, "{tr:?}");
        }
    }

    #[test]
    fn invalid_keeps_state() {
        let reaction = Transition::Invalid.reaction();
        assert_eq!(reaction.effect, StateEffect::Keep);
        let next = reaction
            .effect
            .apply(LinkState::FullDuplex, LinkState::Idle);
        assert_eq!(next, LinkState::FullDuplex);
    }

    #[test]
    fn resync_follows_authoritative_state() {
        let next = StateEffect::Resync.apply(LinkState::FullDuplex, LinkState::DownlinkOnly);
        assert_eq!(next, LinkState::DownlinkOnly);
    }
}
