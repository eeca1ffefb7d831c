//! Async loop runner
//!
//! Wires the engine to its two event sources. One iteration: honor pending
//! watch updates, wait until the link or the registered bus watch is
//! readable, then service the link before draining the bus. The fixed order
//! keeps audio-path handling ahead of bus traffic on every wake.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::bus::SignalBus;
use crate::engine::{LoopStats, LoopbackEngine};
use crate::error::LoopError;
use crate::mux::EventMultiplexer;
use crate::transport::SpeechLink;

/// Run the loopback engine until cancelled
///
/// Returns the accumulated counters on a clean shutdown request, or a fatal
/// [`LoopError`] if waiting on the event sources fails.
pub async fn run_loopback<L, B>(
    mut link: L,
    mut bus: B,
    shutdown: CancellationToken,
) -> Result<LoopStats, LoopError>
where
    L: SpeechLink,
    B: SignalBus,
{
    let mut engine = LoopbackEngine::new();
    let mut mux = EventMultiplexer::new();

    info!("setup successful, entering mainloop");

    while !shutdown.is_cancelled() {
        // watch registration arrives asynchronously; honor it before the
        // wait set is computed
        while let Some(update) = bus.poll_watch_update() {
            engine.apply_watch_update(update);
        }

        let poll_bus = engine.session().bus_pollable();
        let wake = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            wake = mux.wait(&mut link, poll_bus.then_some(&mut bus)) => wake?,
        };
        debug!(?wake, wait_set = mux.last_wait_set(), "event sources woke");

        engine.service_link(&mut link);

        if engine.session().bus_pollable() {
            engine.drain_bus(&mut link, &mut bus);
        }
    }

    info!("mainloop completed");
    Ok(engine.stats())
}
