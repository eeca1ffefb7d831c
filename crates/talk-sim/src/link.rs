//! Simulated speech link
//!
//! A scriptable link that plays the modem side: queued control events and
//! downlink frames become readiness, classification drives the same state
//! bookkeeping a real session layer keeps, and released uplink frames are
//! captured for inspection.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use talk_loop::{EventSource, LinkError, LoopError, Pending, SpeechLink};
use talk_protocol::{ControlEvent, FrameBuffer, LinkState, MessageKind, Transition};
use tokio::sync::Notify;
use tracing::debug;

/// Configuration for a simulated speech link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimLinkConfig {
    /// Downlink frame payload capacity in bytes
    pub downlink_capacity: usize,
    /// Uplink frame payload capacity in bytes
    pub uplink_capacity: usize,
}

impl Default for SimLinkConfig {
    fn default() -> Self {
        // one 20 ms narrowband frame per direction
        Self {
            downlink_capacity: 160,
            uplink_capacity: 160,
        }
    }
}

/// Acquire/release counters per frame direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounters {
    /// Downlink frames acquired
    pub dl_acquired: u64,
    /// Downlink frames released
    pub dl_released: u64,
    /// Uplink frames acquired
    pub ul_acquired: u64,
    /// Uplink frames released
    pub ul_released: u64,
}

#[derive(Debug, Default)]
struct LinkInner {
    state: LinkState,
    events: VecDeque<ControlEvent>,
    frames: VecDeque<Vec<u8>>,
    uplink_sent: Vec<Vec<u8>>,
    call_notifications: Vec<bool>,
    counters: FrameCounters,
    fail_dl_acquire: bool,
    fail_ul_acquire: bool,
    fail_call_notify: bool,
}

#[derive(Debug)]
struct LinkShared {
    inner: Mutex<LinkInner>,
    notify: Notify,
}

impl LinkShared {
    fn lock(&self) -> MutexGuard<'_, LinkInner> {
        self.inner.lock().expect("sim link state poisoned")
    }
}

/// Classification with the link-side state bookkeeping a session layer keeps
fn classify_inner(inner: &mut LinkInner, event: &ControlEvent) -> Transition {
    match event.kind {
        MessageKind::StatusInd => {
            if event.detail == 0 {
                inner.state = LinkState::Idle;
                Transition::Disconnected
            } else {
                Transition::Connected
            }
        }
        MessageKind::SpeechConfig => {
            let dl = event.detail & ControlEvent::PATH_DL != 0;
            let ul = event.detail & ControlEvent::PATH_UL != 0;
            match (dl, ul) {
                (true, true) => {
                    if inner.state == LinkState::FullDuplex {
                        Transition::ParamUpdate
                    } else {
                        inner.state = LinkState::FullDuplex;
                        Transition::UlStart
                    }
                }
                (true, false) => match inner.state {
                    LinkState::FullDuplex => {
                        inner.state = LinkState::DownlinkOnly;
                        Transition::UlStop
                    }
                    LinkState::DownlinkOnly => Transition::ParamUpdate,
                    LinkState::Idle => {
                        inner.state = LinkState::DownlinkOnly;
                        Transition::DlStart
                    }
                },
                (false, false) => {
                    inner.state = LinkState::Idle;
                    Transition::DlulStop
                }
                // uplink without downlink is not a mode the link supports
                (false, true) => Transition::Invalid,
            }
        }
        MessageKind::TimingConfig => {
            if event.detail == 0 {
                Transition::TimingUpdate
            } else {
                Transition::TimingRenegotiate
            }
        }
        MessageKind::Reset => {
            inner.state = LinkState::Idle;
            Transition::Reset
        }
        MessageKind::Unknown => Transition::Invalid,
    }
}

/// The control event that classifies to `transition` from the current state
fn event_for(state: LinkState, transition: Transition) -> ControlEvent {
    match transition {
        Transition::Connected => ControlEvent::new(MessageKind::StatusInd, 1),
        Transition::Disconnected => ControlEvent::new(MessageKind::StatusInd, 0),
        Transition::DlStart => ControlEvent::new(MessageKind::SpeechConfig, ControlEvent::PATH_DL),
        Transition::UlStart => ControlEvent::new(
            MessageKind::SpeechConfig,
            ControlEvent::PATH_DL | ControlEvent::PATH_UL,
        ),
        // re-requesting the downlink-only path tears the uplink down
        Transition::UlStop => ControlEvent::new(MessageKind::SpeechConfig, ControlEvent::PATH_DL),
        Transition::DlulStop => ControlEvent::new(MessageKind::SpeechConfig, 0),
        Transition::ParamUpdate => {
            let detail = match state {
                LinkState::FullDuplex => ControlEvent::PATH_DL | ControlEvent::PATH_UL,
                _ => ControlEvent::PATH_DL,
            };
            ControlEvent::new(MessageKind::SpeechConfig, detail)
        }
        Transition::TimingUpdate => ControlEvent::new(MessageKind::TimingConfig, 0),
        Transition::TimingRenegotiate => ControlEvent::new(MessageKind::TimingConfig, 1),
        Transition::Reset => ControlEvent::new(MessageKind::Reset, 0),
        Transition::Invalid => ControlEvent::new(MessageKind::Unknown, 0),
    }
}

/// Simulated speech link, handed to the loop
#[derive(Debug)]
pub struct SimLink {
    shared: Arc<LinkShared>,
    config: SimLinkConfig,
}

/// Scripting handle for a [`SimLink`]
#[derive(Debug, Clone)]
pub struct SimLinkHandle {
    shared: Arc<LinkShared>,
}

impl SimLink {
    /// Open a simulated link, returning it with its scripting handle
    pub fn open(config: SimLinkConfig) -> Result<(SimLink, SimLinkHandle), LoopError> {
        if config.downlink_capacity == 0 || config.uplink_capacity == 0 {
            return Err(LoopError::LinkSetup(
                "frame capacity must be non-zero".into(),
            ));
        }

        let shared = Arc::new(LinkShared {
            inner: Mutex::new(LinkInner::default()),
            notify: Notify::new(),
        });
        let handle = SimLinkHandle {
            shared: Arc::clone(&shared),
        };
        Ok((SimLink { shared, config }, handle))
    }
}

impl SimLinkHandle {
    /// Queue a raw control event
    pub fn push_event(&self, event: ControlEvent) {
        self.shared.lock().events.push_back(event);
        self.shared.notify.notify_one();
    }

    /// Queue the control event that classifies to `transition`
    ///
    /// Scripting follows the link's current bookkeeping: a `ParamUpdate` or
    /// `UlStop` only classifies as such from a state where it makes sense.
    pub fn push_transition(&self, transition: Transition) {
        let state = self.shared.lock().state;
        self.push_event(event_for(state, transition));
    }

    /// Queue a received downlink frame
    pub fn push_downlink(&self, payload: &[u8]) {
        debug!("queueing downlink frame ({} bytes)", payload.len());
        self.shared.lock().frames.push_back(payload.to_vec());
        self.shared.notify.notify_one();
    }

    /// The link's own protocol state
    pub fn link_state(&self) -> LinkState {
        self.shared.lock().state
    }

    /// Payloads submitted to the uplink so far
    pub fn uplink_frames(&self) -> Vec<Vec<u8>> {
        self.shared.lock().uplink_sent.clone()
    }

    /// Call status values forwarded into the link so far
    pub fn call_notifications(&self) -> Vec<bool> {
        self.shared.lock().call_notifications.clone()
    }

    /// Acquire/release counters
    pub fn frame_counters(&self) -> FrameCounters {
        self.shared.lock().counters
    }

    /// Whether any event or frame is still queued
    pub fn idle(&self) -> bool {
        let inner = self.shared.lock();
        inner.events.is_empty() && inner.frames.is_empty()
    }

    /// Fail the next downlink acquisition
    pub fn fail_next_dl_acquire(&self) {
        self.shared.lock().fail_dl_acquire = true;
    }

    /// Fail the next uplink acquisition
    pub fn fail_next_ul_acquire(&self) {
        self.shared.lock().fail_ul_acquire = true;
    }

    /// Fail the next call status forward
    pub fn fail_next_call_notify(&self) {
        self.shared.lock().fail_call_notify = true;
    }
}

#[async_trait]
impl EventSource for SimLink {
    async fn readable(&mut self) -> std::io::Result<()> {
        loop {
            {
                let inner = self.shared.lock();
                if !inner.events.is_empty() || !inner.frames.is_empty() {
                    return Ok(());
                }
            }
            self.shared.notify.notified().await;
        }
    }
}

impl SpeechLink for SimLink {
    fn check_pending(&mut self) -> Result<Pending, LinkError> {
        let inner = self.shared.lock();
        Ok(Pending {
            count: inner.events.len() + inner.frames.len(),
            data_ready: !inner.frames.is_empty(),
            control_ready: !inner.events.is_empty(),
        })
    }

    fn read_event(&mut self) -> Result<ControlEvent, LinkError> {
        self.shared
            .lock()
            .events
            .pop_front()
            .ok_or(LinkError::NoEvent)
    }

    fn classify(&mut self, event: &ControlEvent) -> Transition {
        classify_inner(&mut self.shared.lock(), event)
    }

    fn link_state(&self) -> LinkState {
        self.shared.lock().state
    }

    fn acquire_downlink(&mut self) -> Result<FrameBuffer, LinkError> {
        let mut inner = self.shared.lock();
        if inner.fail_dl_acquire {
            inner.fail_dl_acquire = false;
            return Err(LinkError::NoDownlinkFrame);
        }
        let payload = inner.frames.pop_front().ok_or(LinkError::NoDownlinkFrame)?;
        inner.counters.dl_acquired += 1;
        Ok(FrameBuffer::from_payload(
            self.config.downlink_capacity,
            &payload,
        ))
    }

    fn release_downlink(&mut self, frame: FrameBuffer) {
        let mut inner = self.shared.lock();
        inner.counters.dl_released += 1;
        drop(frame);
    }

    fn acquire_uplink(&mut self) -> Result<FrameBuffer, LinkError> {
        let mut inner = self.shared.lock();
        if inner.fail_ul_acquire {
            inner.fail_ul_acquire = false;
            return Err(LinkError::NoUplinkFrame);
        }
        inner.counters.ul_acquired += 1;
        Ok(FrameBuffer::with_capacity(self.config.uplink_capacity))
    }

    fn release_uplink(&mut self, frame: FrameBuffer) {
        let mut inner = self.shared.lock();
        inner.counters.ul_released += 1;
        inner.uplink_sent.push(frame.payload().to_vec());
    }

    fn notify_call_status(&mut self, active: bool) -> Result<(), LinkError> {
        let mut inner = self.shared.lock();
        if inner.fail_call_notify {
            inner.fail_call_notify = false;
            return Err(LinkError::Backend("injected call status failure".into()));
        }
        inner.call_notifications.push(active);
        Ok(())
    }
}
