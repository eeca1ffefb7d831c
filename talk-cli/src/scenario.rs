//! Scripted call scenario
//!
//! Plays the modem and the call server: brings the link up, reports the
//! call active, streams downlink frames, then tears the call down again.
//! Cancels the loop once every scripted call has finished.

use std::time::Duration;

use talk_protocol::Transition;
use talk_sim::{SimBusHandle, SimLinkHandle};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Shape of the scripted traffic
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    /// Number of calls to script
    pub calls: u32,
    /// Downlink frames per call
    pub frames_per_call: u32,
    /// Payload bytes per downlink frame
    pub frame_bytes: usize,
}

/// Pacing between scripted steps, generous enough for the loop to drain
const STEP: Duration = Duration::from_millis(20);

/// Run the scripted calls, then request shutdown
pub async fn drive(
    script: Scenario,
    link: SimLinkHandle,
    bus: SimBusHandle,
    shutdown: CancellationToken,
) {
    for call in 1..=script.calls {
        if shutdown.is_cancelled() {
            return;
        }
        info!("scripting call {call}/{}", script.calls);

        link.push_transition(Transition::Connected);
        tokio::time::sleep(STEP).await;
        bus.push_call_active(true);
        link.push_transition(Transition::DlStart);
        link.push_transition(Transition::UlStart);
        tokio::time::sleep(STEP).await;

        for n in 0..script.frames_per_call {
            let frame = vec![(call + n) as u8; script.frame_bytes];
            link.push_downlink(&frame);
            tokio::time::sleep(STEP).await;
        }

        bus.push_call_active(false);
        link.push_transition(Transition::DlulStop);
        link.push_transition(Transition::Disconnected);
        tokio::time::sleep(STEP).await;

        info!(
            "call {call} torn down, {} frames looped so far",
            link.uplink_frames().len()
        );
    }

    shutdown.cancel();
}
