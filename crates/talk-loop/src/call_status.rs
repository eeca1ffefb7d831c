//! Call server status tracking

use tracing::{debug, info};

use crate::error::LinkError;
use crate::transport::SpeechLink;

/// Last known call-server state, forwarded into the link on change
///
/// Repeated notifications of the same state are a no-op, so the link's
/// session layer sees exactly one status call per genuine transition.
#[derive(Debug, Default)]
pub struct CallStatusTracker {
    active: bool,
}

impl CallStatusTracker {
    /// Create a tracker; the call starts out inactive
    pub fn new() -> Self {
        Self::default()
    }

    /// Last state reported by the call server
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Handle a call-state notification from the bus
    ///
    /// Forwards into the link once per genuine change, then caches the new
    /// state. On a forward failure the cache is left untouched so the next
    /// notification retries. Returns whether a forward happened.
    pub fn on_notification<L: SpeechLink>(
        &mut self,
        link: &mut L,
        active: bool,
    ) -> Result<bool, LinkError> {
        if active == self.active {
            debug!("call status unchanged ({active})");
            return Ok(false);
        }

        link.notify_call_status(active)?;
        self.active = active;
        info!("call server status changed to {active}");
        Ok(true)
    }
}

// Tests for `CallStatusTracker` live in `tests/call_status_tests.rs`. They
// drive the tracker against `talk_sim::SimLink`, and because `talk-sim`
// depends on `talk-loop`, running them as in-crate unit tests would compile
// `talk-loop` twice (so `SimLink: SpeechLink` would not unify). As an
// integration test both crates share one `talk-loop` build.
