//! Speech Link Protocol Library
//!
//! This crate provides the protocol vocabulary shared by the loopback engine
//! and the speech link implementations:
//!
//! - **Link states**: the session lifecycle of the audio link (idle,
//!   downlink-only, full duplex)
//! - **Control events**: out-of-band messages read from the link's control
//!   path
//! - **Transitions**: the semantic classification of a control event, and the
//!   reaction table mapping every transition to its handling
//! - **Frame buffers**: bounded audio payload buffers with a capacity-bounded
//!   copy primitive
//!
//! # Architecture
//!
//! The link's own session layer owns the authoritative state machine; this
//! crate only names its states and the transitions between them. The reaction
//! table is total: every transition code maps to a defined handling, so a
//! consumer never has to fall through a partial `match`.
//!
//! # Example
//!
//! ```rust
//! use talk_protocol::{StateEffect, Transition};
//!
//! // A modem disconnect always drops the mirrored state back to idle
//! let reaction = Transition::Disconnected.reaction();
//! assert!(!reaction.warns);
//! assert_eq!(reaction.effect, StateEffect::Idle);
//! ```

pub mod event;
pub mod frame;
pub mod state;
pub mod transition;

pub use event::{ControlEvent, MessageKind};
pub use frame::FrameBuffer;
pub use state::LinkState;
pub use transition::{Reaction, StateEffect, Transition};
