//! Loopback Simulation Library
//!
//! This crate provides simulated collaborators for exercising the loopback
//! engine without modem hardware or a running bus daemon:
//!
//! - **SimLink**: a scriptable speech link that queues control events and
//!   downlink frames, captures uplink frames, and keeps the link-side state
//!   bookkeeping a real session layer would
//! - **SimBus**: a scriptable signal bus that queues messages and watch
//!   lifecycle updates
//!
//! Each simulator comes as a pair: the half implementing the collaborator
//! traits (handed to the loop) and a cloneable handle for scripting it from
//! a test or scenario task.
//!
//! # Example
//!
//! ```rust
//! use talk_protocol::Transition;
//! use talk_sim::{SimLink, SimLinkConfig};
//!
//! let (_link, ctl) = SimLink::open(SimLinkConfig::default()).unwrap();
//!
//! // Script a call setup and a downlink frame
//! ctl.push_transition(Transition::Connected);
//! ctl.push_transition(Transition::DlStart);
//! ctl.push_downlink(&[0u8; 160]);
//! ```

pub mod bus;
pub mod link;

pub use bus::{
    call_active_signal, malformed_active_signal, unrelated_signal, SimBus, SimBusConfig,
    SimBusHandle,
};
pub use link::{FrameCounters, SimLink, SimLinkConfig, SimLinkHandle};
