//! Control events read from the speech link
//!
//! A control event is an out-of-band message describing a protocol lifecycle
//! change, distinct from audio payload data. It is read once when the link
//! reports control readiness, classified once, and discarded.

/// Message kind of a control event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Modem session status indication (connect/disconnect)
    StatusInd,
    /// Speech path configuration request
    SpeechConfig,
    /// Uplink timing configuration message
    TimingConfig,
    /// Modem reset indication
    Reset,
    /// A message the link could not decode
    Unknown,
}

/// One control event: message kind plus the raw lifecycle detail byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEvent {
    /// Message kind
    pub kind: MessageKind,
    /// Raw lifecycle detail from the wire
    pub detail: u8,
}

impl ControlEvent {
    /// Detail bit: downlink path requested
    pub const PATH_DL: u8 = 0x01;
    /// Detail bit: uplink path requested
    pub const PATH_UL: u8 = 0x02;

    /// Create a control event
    pub fn new(kind: MessageKind, detail: u8) -> Self {
        Self { kind, detail }
    }
}
