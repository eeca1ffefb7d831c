//! Dual-source readiness multiplexer
//!
//! Blocks the loop until the speech link, or the signal bus while its watch
//! is registered, reports readiness. Both sources are level-triggered, so
//! work left pending after one dispatch simply reports ready again on the
//! next wait.

use crate::error::LoopError;
use crate::transport::EventSource;

/// Which source a wait returned on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The speech link is readable
    Link,
    /// The bus watch is readable
    Bus,
}

/// Waits on up to two readiness sources
///
/// The link is always in the wait set; the bus joins only while a watch is
/// registered and enabled. Polling is biased toward the link so audio-path
/// work is never starved behind bus traffic.
#[derive(Debug, Default)]
pub struct EventMultiplexer {
    last_wait_set: usize,
}

impl EventMultiplexer {
    /// Create a multiplexer
    pub fn new() -> Self {
        Self::default()
    }

    /// Size of the wait set used by the most recent [`wait`](Self::wait)
    pub fn last_wait_set(&self) -> usize {
        self.last_wait_set
    }

    /// Block until at least one registered source is readable
    ///
    /// A wait failure is fatal to the loop.
    pub async fn wait<L, B>(
        &mut self,
        link: &mut L,
        bus: Option<&mut B>,
    ) -> Result<Wake, LoopError>
    where
        L: EventSource,
        B: EventSource,
    {
        match bus {
            Some(bus) => {
                self.last_wait_set = 2;
                tokio::select! {
                    biased;
                    res = link.readable() => {
                        res?;
                        Ok(Wake::Link)
                    }
                    res = bus.readable() => {
                        res?;
                        Ok(Wake::Bus)
                    }
                }
            }
            None => {
                self.last_wait_set = 1;
                link.readable().await?;
                Ok(Wake::Link)
            }
        }
    }
}
