//! Error types for the loopback engine

use thiserror::Error;

/// Fatal and setup errors for the loop itself
///
/// Everything else (unclassifiable events, malformed bus payloads, frame
/// acquisition failures) is recoverable: logged where it is detected, never
/// propagated past that dispatch.
#[derive(Debug, Error)]
pub enum LoopError {
    /// Waiting on the event sources failed; the loop terminates
    #[error("event wait failed: {0}")]
    Poll(#[from] std::io::Error),

    /// The speech link session could not be opened
    #[error("speech link setup failed: {0}")]
    LinkSetup(String),

    /// The signal bus connection or match filter could not be established
    #[error("signal bus setup failed: {0}")]
    BusSetup(String),
}

/// Errors reported by a speech link implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// No downlink frame was available to acquire
    #[error("no downlink frame available")]
    NoDownlinkFrame,

    /// No uplink frame was available to acquire
    #[error("no uplink frame available")]
    NoUplinkFrame,

    /// No control event was queued
    #[error("no control event pending")]
    NoEvent,

    /// The link backend failed
    #[error("link backend error: {0}")]
    Backend(String),
}
