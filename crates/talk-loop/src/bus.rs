//! Signal bus collaborator trait and message vocabulary
//!
//! The telephony bus is consumed, not reimplemented: a connection delivers
//! queued signal messages and watch lifecycle updates, and the loop decides
//! what (little) it acts on. The only payload with an effect is the boolean
//! `Active` property of the call-audio interface.

use crate::transport::EventSource;

/// Namespace prefix for the telephony signals routed to the call handler
pub const TELEPHONY_NAMESPACE: &str = "org.telephony.";

/// Interface carrying call-audio property changes
pub const CALL_AUDIO_INTERFACE: &str = "org.telephony.CallAudio";

/// Member name of the property-change signal
pub const PROPERTY_CHANGED_MEMBER: &str = "PropertyChanged";

/// The one property acted upon
pub const ACTIVE_PROPERTY: &str = "Active";

/// Identifier for a bus connection watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u32);

/// Watch lifecycle notification from the bus connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchUpdate {
    /// The connection wants this watch polled for readiness
    Added(WatchId),
    /// The connection dropped the watch
    Removed(WatchId),
    /// The connection enabled or disabled polling for the watch
    Toggled(WatchId, bool),
}

/// A typed bus argument value
#[derive(Debug, Clone, PartialEq)]
pub enum BusValue {
    /// Boolean
    Bool(bool),
    /// Unsigned 32-bit integer
    U32(u32),
    /// String
    Str(String),
    /// A variant-wrapped value
    Variant(Box<BusValue>),
}

/// One signal message popped from the bus connection
#[derive(Debug, Clone, PartialEq)]
pub struct BusMessage {
    /// Interface the signal belongs to
    pub interface: String,
    /// Signal member name
    pub member: String,
    /// Message body
    pub args: Vec<BusValue>,
}

impl BusMessage {
    /// Create a signal message
    pub fn new(
        interface: impl Into<String>,
        member: impl Into<String>,
        args: Vec<BusValue>,
    ) -> Self {
        Self {
            interface: interface.into(),
            member: member.into(),
            args,
        }
    }

    /// Interpret the body as a property-change pair
    ///
    /// Expects a property name followed by a variant-wrapped value; anything
    /// else is malformed.
    pub fn property_change(&self) -> Option<(&str, &BusValue)> {
        let name = match self.args.first()? {
            BusValue::Str(name) => name.as_str(),
            _ => return None,
        };
        let value = match self.args.get(1)? {
            BusValue::Variant(value) => value.as_ref(),
            _ => return None,
        };
        Some((name, value))
    }
}

/// The signal bus session
///
/// Readiness covers queued messages; watch updates are drained
/// unconditionally at the top of every loop iteration, since they decide
/// whether the bus is in the wait set at all.
pub trait SignalBus: EventSource {
    /// Take the next queued watch lifecycle update
    fn poll_watch_update(&mut self) -> Option<WatchUpdate>;

    /// Pop the next queued message
    fn pop_message(&mut self) -> Option<BusMessage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_change_parses_variant_pair() {
        let msg = BusMessage::new(
            CALL_AUDIO_INTERFACE,
            PROPERTY_CHANGED_MEMBER,
            vec![
                BusValue::Str("Active".into()),
                BusValue::Variant(Box::new(BusValue::Bool(true))),
            ],
        );
        let (name, value) = msg.property_change().unwrap();
        assert_eq!(name, "Active");
        assert_eq!(value, &BusValue::Bool(true));
    }

    #[test]
    fn property_change_rejects_bare_value() {
        // value not wrapped in a variant
        let msg = BusMessage::new(
            CALL_AUDIO_INTERFACE,
            PROPERTY_CHANGED_MEMBER,
            vec![BusValue::Str("Active".into()), BusValue::Bool(true)],
        );
        assert!(msg.property_change().is_none());
    }

    #[test]
    fn property_change_rejects_missing_args() {
        let msg = BusMessage::new(CALL_AUDIO_INTERFACE, PROPERTY_CHANGED_MEMBER, vec![]);
        assert!(msg.property_change().is_none());
    }
}
