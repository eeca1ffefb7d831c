//! Session context and the bus watch slot

use talk_protocol::LinkState;
use tracing::debug;

use crate::bus::WatchId;

/// The bus connection watch currently registered for readiness polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusWatch {
    /// Identifier handed out by the bus connection
    pub id: WatchId,
    /// Whether the bus wants the watch polled right now
    pub enabled: bool,
}

/// Mutable per-process session state owned by the engine
///
/// The watch slot holds at most one watch; `None` means the bus is not
/// pollable, so a stale identifier can never linger in the slot.
#[derive(Debug, Default)]
pub struct SessionContext {
    link_state: LinkState,
    watch: Option<BusWatch>,
}

impl SessionContext {
    /// Create a fresh context: idle link, no watch
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirrored link protocol state
    pub fn link_state(&self) -> LinkState {
        self.link_state
    }

    /// Update the mirrored link state
    pub fn set_link_state(&mut self, state: LinkState) {
        self.link_state = state;
    }

    /// The registered watch, if any
    pub fn watch(&self) -> Option<BusWatch> {
        self.watch
    }

    /// Whether the bus belongs in the wait set
    pub fn bus_pollable(&self) -> bool {
        self.watch.is_some_and(|watch| watch.enabled)
    }

    /// Install a watch, replacing any previous one
    pub fn watch_added(&mut self, id: WatchId) {
        debug!("bus watch {} added", id.0);
        self.watch = Some(BusWatch { id, enabled: true });
    }

    /// Clear the watch slot if `id` matches the tracked watch
    pub fn watch_removed(&mut self, id: WatchId) {
        debug!("bus watch {} removed", id.0);
        if self.watch.map(|watch| watch.id) == Some(id) {
            self.watch = None;
        }
    }

    /// Enable or disable polling for the tracked watch
    pub fn watch_toggled(&mut self, id: WatchId, enabled: bool) {
        debug!("bus watch {} toggled, enabled={enabled}", id.0);
        if let Some(watch) = &mut self.watch {
            if watch.id == id {
                watch.enabled = enabled;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_is_not_pollable() {
        let ctx = SessionContext::new();
        assert!(ctx.watch().is_none());
        assert!(!ctx.bus_pollable());
        assert_eq!(ctx.link_state(), LinkState::Idle);
    }

    #[test]
    fn watch_lifecycle() {
        let mut ctx = SessionContext::new();
        ctx.watch_added(WatchId(7));
        assert!(ctx.bus_pollable());

        ctx.watch_toggled(WatchId(7), false);
        assert!(!ctx.bus_pollable());
        assert!(ctx.watch().is_some());

        ctx.watch_toggled(WatchId(7), true);
        assert!(ctx.bus_pollable());

        ctx.watch_removed(WatchId(7));
        assert!(ctx.watch().is_none());
        assert!(!ctx.bus_pollable());
    }

    #[test]
    fn mismatched_watch_ids_are_ignored() {
        let mut ctx = SessionContext::new();
        ctx.watch_added(WatchId(1));

        ctx.watch_removed(WatchId(2));
        assert!(ctx.bus_pollable());

        ctx.watch_toggled(WatchId(2), false);
        assert!(ctx.bus_pollable());
    }
}
