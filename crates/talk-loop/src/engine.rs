//! Loopback dispatch engine
//!
//! The synchronous dispatch logic driven by the async runner: classifies
//! control events, gates the loopback path, and routes bus traffic into the
//! call status tracker. Kept free of waiting so tests can drive dispatches
//! directly.

use tracing::{debug, error, info, warn};

use crate::bus::{
    BusMessage, BusValue, SignalBus, WatchUpdate, ACTIVE_PROPERTY, CALL_AUDIO_INTERFACE,
    PROPERTY_CHANGED_MEMBER, TELEPHONY_NAMESPACE,
};
use crate::call_status::CallStatusTracker;
use crate::loopback;
use crate::session::SessionContext;
use crate::transport::SpeechLink;

/// Loop activity counters, observability only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Downlink frames copied to the uplink
    pub frames_looped: u64,
    /// Total payload bytes copied
    pub bytes_looped: u64,
    /// Control events that could not be classified
    pub invalid_transitions: u64,
    /// Malformed or unsupported bus payloads
    pub bus_parse_errors: u64,
    /// Signals outside the telephony namespace
    pub ignored_signals: u64,
}

/// The loopback engine
///
/// Owns the session context and the call status tracker for the process
/// lifetime; the link and bus collaborators are borrowed per dispatch.
#[derive(Debug, Default)]
pub struct LoopbackEngine {
    session: SessionContext,
    call_status: CallStatusTracker,
    stats: LoopStats,
}

impl LoopbackEngine {
    /// Create an engine with a fresh session context
    pub fn new() -> Self {
        Self::default()
    }

    /// The session context
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Last known call-server state
    pub fn call_active(&self) -> bool {
        self.call_status.is_active()
    }

    /// Activity counters
    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Whether the loopback gate is open right now
    ///
    /// Open only while the link is in full duplex and the call server has
    /// reported the call active.
    pub fn gate_open(&self) -> bool {
        self.session.link_state().is_full_duplex() && self.call_status.is_active()
    }

    /// Service pending link work: audio data first, then one control event
    pub fn service_link<L: SpeechLink>(&mut self, link: &mut L) {
        let pending = match link.check_pending() {
            Ok(pending) => pending,
            Err(e) => {
                warn!("link pending check failed: {e}");
                return;
            }
        };
        if !pending.is_actionable() {
            return;
        }

        if pending.data_ready {
            self.handle_data_ready(link);
        }
        if pending.control_ready {
            self.handle_control_ready(link);
        }
    }

    /// Loop one downlink frame to the uplink if the gate is open
    pub fn handle_data_ready<L: SpeechLink>(&mut self, link: &mut L) -> usize {
        let copied = loopback::forward_downlink(link, self.gate_open());
        if copied > 0 {
            self.stats.frames_looped += 1;
            self.stats.bytes_looped += copied as u64;
        }
        copied
    }

    /// Read, classify and react to one control event
    pub fn handle_control_ready<L: SpeechLink>(&mut self, link: &mut L) {
        let event = match link.read_event() {
            Ok(event) => event,
            Err(e) => {
                warn!("control event read failed: {e}");
                return;
            }
        };
        debug!(?event, "read link control event");

        let transition = link.classify(&event);
        if transition.is_invalid() {
            error!("invalid state transition");
            self.stats.invalid_transitions += 1;
            return;
        }

        let reaction = transition.reaction();
        if reaction.warns {
            warn!("modem uplink timing update ignored");
        }

        let prev = self.session.link_state();
        let next = reaction.effect.apply(prev, link.link_state());
        if next != prev {
            info!("link state {} -> {} ({transition:?})", prev.name(), next.name());
            self.session.set_link_state(next);
        }
    }

    /// Apply a watch lifecycle update to the session context
    pub fn apply_watch_update(&mut self, update: WatchUpdate) {
        match update {
            WatchUpdate::Added(id) => self.session.watch_added(id),
            WatchUpdate::Removed(id) => self.session.watch_removed(id),
            WatchUpdate::Toggled(id, enabled) => self.session.watch_toggled(id, enabled),
        }
    }

    /// Drain and route every queued bus message
    pub fn drain_bus<L: SpeechLink, B: SignalBus>(&mut self, link: &mut L, bus: &mut B) {
        while let Some(msg) = bus.pop_message() {
            self.handle_bus_message(link, &msg);
        }
    }

    /// Route one bus message
    pub fn handle_bus_message<L: SpeechLink>(&mut self, link: &mut L, msg: &BusMessage) {
        debug!("bus message for {}::{}", msg.interface, msg.member);

        if msg.interface.starts_with(TELEPHONY_NAMESPACE) {
            self.handle_call_audio(link, msg);
        } else {
            info!("unknown signal ignored: {}::{}", msg.interface, msg.member);
            self.stats.ignored_signals += 1;
        }
    }

    fn handle_call_audio<L: SpeechLink>(&mut self, link: &mut L, msg: &BusMessage) {
        if msg.interface != CALL_AUDIO_INTERFACE || msg.member != PROPERTY_CHANGED_MEMBER {
            debug!("unhandled telephony signal: {}::{}", msg.interface, msg.member);
            return;
        }

        let Some((property, value)) = msg.property_change() else {
            error!("malformed property change on {}", msg.interface);
            self.stats.bus_parse_errors += 1;
            return;
        };

        if property != ACTIVE_PROPERTY {
            error!("unsupported {} property '{property}'", msg.interface);
            self.stats.bus_parse_errors += 1;
            return;
        }

        match value {
            BusValue::Bool(active) => {
                if let Err(e) = self.call_status.on_notification(link, *active) {
                    warn!("call status forward failed: {e}");
                }
            }
            _ => {
                error!("error parsing {} property '{property}'", msg.interface);
                self.stats.bus_parse_errors += 1;
            }
        }
    }
}
