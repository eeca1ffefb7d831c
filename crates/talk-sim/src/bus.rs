//! Simulated telephony bus
//!
//! A scriptable bus connection: queued signal messages become readiness, and
//! watch lifecycle updates are queued the way a connection announces its
//! watches during setup and teardown.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use talk_loop::{
    BusMessage, BusValue, EventSource, LoopError, SignalBus, WatchId, WatchUpdate, ACTIVE_PROPERTY,
    CALL_AUDIO_INTERFACE, PROPERTY_CHANGED_MEMBER,
};
use tokio::sync::Notify;
use tracing::debug;

/// Configuration for a simulated bus connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimBusConfig {
    /// Match rule registered on connect
    pub match_rule: String,
    /// Whether the connection announces a watch at open time
    pub register_watch: bool,
}

impl Default for SimBusConfig {
    fn default() -> Self {
        Self {
            match_rule: format!("type='signal',interface='{CALL_AUDIO_INTERFACE}'"),
            register_watch: true,
        }
    }
}

#[derive(Debug, Default)]
struct BusInner {
    messages: VecDeque<BusMessage>,
    watch_updates: VecDeque<WatchUpdate>,
    next_watch_id: u32,
}

#[derive(Debug)]
struct BusShared {
    inner: Mutex<BusInner>,
    notify: Notify,
}

impl BusShared {
    fn lock(&self) -> MutexGuard<'_, BusInner> {
        self.inner.lock().expect("sim bus state poisoned")
    }
}

/// Simulated bus connection, handed to the loop
#[derive(Debug)]
pub struct SimBus {
    shared: Arc<BusShared>,
}

/// Scripting handle for a [`SimBus`]
#[derive(Debug, Clone)]
pub struct SimBusHandle {
    shared: Arc<BusShared>,
}

impl SimBus {
    /// Open a simulated connection, returning it with its scripting handle
    ///
    /// Registers the configured match rule and, unless disabled, announces
    /// the connection's watch so the loop starts polling it.
    pub fn open(config: SimBusConfig) -> Result<(SimBus, SimBusHandle), LoopError> {
        if config.match_rule.is_empty() {
            return Err(LoopError::BusSetup("empty match rule".into()));
        }
        debug!("bus match rule registered: {}", config.match_rule);

        let shared = Arc::new(BusShared {
            inner: Mutex::new(BusInner {
                next_watch_id: 1,
                ..BusInner::default()
            }),
            notify: Notify::new(),
        });
        let handle = SimBusHandle {
            shared: Arc::clone(&shared),
        };
        if config.register_watch {
            handle.add_watch();
        }
        Ok((SimBus { shared }, handle))
    }
}

impl SimBusHandle {
    /// Announce a new watch and return its id
    pub fn add_watch(&self) -> WatchId {
        let mut inner = self.shared.lock();
        let id = WatchId(inner.next_watch_id);
        inner.next_watch_id += 1;
        inner.watch_updates.push_back(WatchUpdate::Added(id));
        id
    }

    /// Announce removal of a watch
    ///
    /// Watch updates do not wake the loop by themselves; they take effect on
    /// the next iteration.
    pub fn remove_watch(&self, id: WatchId) {
        self.shared
            .lock()
            .watch_updates
            .push_back(WatchUpdate::Removed(id));
    }

    /// Announce a watch enable/disable toggle
    pub fn toggle_watch(&self, id: WatchId, enabled: bool) {
        self.shared
            .lock()
            .watch_updates
            .push_back(WatchUpdate::Toggled(id, enabled));
    }

    /// Queue a signal message
    pub fn push_message(&self, msg: BusMessage) {
        debug!("queueing bus signal {}::{}", msg.interface, msg.member);
        self.shared.lock().messages.push_back(msg);
        self.shared.notify.notify_one();
    }

    /// Queue the call-audio `Active` property change
    pub fn push_call_active(&self, active: bool) {
        self.push_message(call_active_signal(active));
    }

    /// Number of messages still queued
    pub fn queued_messages(&self) -> usize {
        self.shared.lock().messages.len()
    }
}

#[async_trait]
impl EventSource for SimBus {
    async fn readable(&mut self) -> std::io::Result<()> {
        loop {
            if !self.shared.lock().messages.is_empty() {
                return Ok(());
            }
            self.shared.notify.notified().await;
        }
    }
}

impl SignalBus for SimBus {
    fn poll_watch_update(&mut self) -> Option<WatchUpdate> {
        self.shared.lock().watch_updates.pop_front()
    }

    fn pop_message(&mut self) -> Option<BusMessage> {
        self.shared.lock().messages.pop_front()
    }
}

/// The call-audio `Active` property change signal
pub fn call_active_signal(active: bool) -> BusMessage {
    BusMessage::new(
        CALL_AUDIO_INTERFACE,
        PROPERTY_CHANGED_MEMBER,
        vec![
            BusValue::Str(ACTIVE_PROPERTY.into()),
            BusValue::Variant(Box::new(BusValue::Bool(active))),
        ],
    )
}

/// An `Active` property change whose variant is not a boolean
pub fn malformed_active_signal() -> BusMessage {
    BusMessage::new(
        CALL_AUDIO_INTERFACE,
        PROPERTY_CHANGED_MEMBER,
        vec![
            BusValue::Str(ACTIVE_PROPERTY.into()),
            BusValue::Variant(Box::new(BusValue::Str("yes".into()))),
        ],
    )
}

/// A signal from an interface outside the telephony namespace
pub fn unrelated_signal() -> BusMessage {
    BusMessage::new(
        "org.powerd.Battery",
        PROPERTY_CHANGED_MEMBER,
        vec![
            BusValue::Str("Level".into()),
            BusValue::Variant(Box::new(BusValue::U32(87))),
        ],
    )
}
