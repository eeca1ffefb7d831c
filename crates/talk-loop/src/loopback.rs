//! Downlink to uplink loopback
//!
//! Frame buffers are borrowed from the link for exactly one dispatch:
//! acquire, optionally copy, release. The downlink frame is released on
//! every path, last, and the copy is bounded by the uplink frame's capacity.

use tracing::debug;

use crate::transport::SpeechLink;

/// Copy one pending downlink frame to the uplink
///
/// Acquires the downlink frame unconditionally; the uplink frame only while
/// `duplex_open`. An acquisition failure on either side skips the copy for
/// this dispatch and is not an error. Returns the number of payload bytes
/// handed to the uplink.
pub fn forward_downlink<L: SpeechLink>(link: &mut L, duplex_open: bool) -> usize {
    let dl = match link.acquire_downlink() {
        Ok(frame) => frame,
        Err(e) => {
            debug!("downlink frame not acquired: {e}");
            return 0;
        }
    };
    debug!("received a downlink frame ({} bytes)", dl.valid_len());

    let mut copied = 0;
    if duplex_open {
        match link.acquire_uplink() {
            Ok(mut ul) => {
                copied = ul.fill_from(dl.payload());
                debug!("looping downlink frame to uplink ({copied} payload bytes)");
                link.release_uplink(ul);
            }
            Err(e) => debug!("uplink frame not acquired: {e}"),
        }
    }

    link.release_downlink(dl);
    copied
}
