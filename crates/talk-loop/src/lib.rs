//! Voice Call Loopback Engine
//!
//! This crate drives a downlink-to-uplink audio loopback over a modem speech
//! link, gated by call state learned from a telephony signal bus.
//!
//! # Architecture
//!
//! Two asynchronous event sources feed a single-threaded loop:
//!
//! - The **speech link** reports control events (protocol lifecycle changes)
//!   and received downlink audio frames.
//! - The **signal bus** delivers call-server property changes; only the
//!   boolean `Active` property of the call-audio interface is acted upon.
//!
//! The [`EventMultiplexer`] blocks until either source is readable, the
//! [`LoopbackEngine`] dispatches synchronously (link before bus on every
//! wake), and [`run_loopback`] ties both to a cancellation token.
//!
//! Audio frames are copied byte-exactly, bounded by the uplink frame's
//! capacity, and only while the link is in full duplex during an active
//! call. Everything recoverable is logged and survived; only a failed wait
//! on the event sources ends the loop.
//!
//! # Example
//!
//! ```rust,no_run
//! use talk_loop::run_loopback;
//! use talk_sim::{SimBus, SimBusConfig, SimLink, SimLinkConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), talk_loop::LoopError> {
//! let (link, _link_ctl) = SimLink::open(SimLinkConfig::default())?;
//! let (bus, _bus_ctl) = SimBus::open(SimBusConfig::default())?;
//! let shutdown = CancellationToken::new();
//!
//! let stats = run_loopback(link, bus, shutdown).await?;
//! println!("looped {} frames", stats.frames_looped);
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod call_status;
pub mod engine;
pub mod error;
pub mod loopback;
pub mod mux;
pub mod runner;
pub mod session;
pub mod transport;

// Re-export bus vocabulary
pub use bus::{
    BusMessage, BusValue, SignalBus, WatchId, WatchUpdate, ACTIVE_PROPERTY, CALL_AUDIO_INTERFACE,
    PROPERTY_CHANGED_MEMBER, TELEPHONY_NAMESPACE,
};

// Re-export engine types
pub use call_status::CallStatusTracker;
pub use engine::{LoopStats, LoopbackEngine};
pub use error::{LinkError, LoopError};
pub use loopback::forward_downlink;
pub use mux::{EventMultiplexer, Wake};
pub use runner::run_loopback;
pub use session::{BusWatch, SessionContext};
pub use transport::{EventSource, Pending, SpeechLink};
