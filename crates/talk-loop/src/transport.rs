//! Speech link collaborator traits
//!
//! The modem-side speech transport is consumed through these traits, never
//! reimplemented here. A link hands out bounded frame buffers, reports
//! pending work as level-triggered readiness flags, and owns the
//! authoritative protocol state machine.

use async_trait::async_trait;
use talk_protocol::{ControlEvent, FrameBuffer, LinkState, Transition};

use crate::error::LinkError;

/// Pending work reported by the link
///
/// A zero count means nothing actionable, regardless of the flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pending {
    /// Number of queued items (events plus frames)
    pub count: usize,
    /// A downlink frame is ready
    pub data_ready: bool,
    /// A control event is ready
    pub control_ready: bool,
}

impl Pending {
    /// Whether this report carries anything to act on
    pub fn is_actionable(&self) -> bool {
        self.count > 0 && (self.data_ready || self.control_ready)
    }
}

/// A readiness source the multiplexer can wait on
///
/// Level-triggered: implementations return immediately while work is
/// pending, and an unrecoverable wait failure is fatal to the loop.
#[async_trait]
pub trait EventSource {
    /// Wait until the source is readable
    async fn readable(&mut self) -> std::io::Result<()>;
}

/// The speech transport session
///
/// All methods are synchronous and non-blocking relative to the loop;
/// readiness comes from the [`EventSource`] implementation.
pub trait SpeechLink: EventSource {
    /// Report pending work without consuming it
    fn check_pending(&mut self) -> Result<Pending, LinkError>;

    /// Read one queued control event
    fn read_event(&mut self) -> Result<ControlEvent, LinkError>;

    /// Classify a control event into a semantic transition
    ///
    /// Classification drives the link's own state bookkeeping as a side
    /// effect, the same way the session layer consumes the event.
    fn classify(&mut self, event: &ControlEvent) -> Transition;

    /// The link's own current protocol state
    fn link_state(&self) -> LinkState;

    /// Acquire the next received downlink frame
    fn acquire_downlink(&mut self) -> Result<FrameBuffer, LinkError>;

    /// Release a downlink frame back to the link
    fn release_downlink(&mut self, frame: FrameBuffer);

    /// Acquire an empty uplink frame
    fn acquire_uplink(&mut self) -> Result<FrameBuffer, LinkError>;

    /// Release an uplink frame back to the link, submitting its payload
    fn release_uplink(&mut self, frame: FrameBuffer);

    /// Forward a call-server status change into the link's session layer
    fn notify_call_status(&mut self, active: bool) -> Result<(), LinkError>;
}
