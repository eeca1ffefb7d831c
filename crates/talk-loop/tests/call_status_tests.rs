//! Call status tracker tests
//!
//! These live as integration tests rather than in-crate unit tests because
//! they exercise `CallStatusTracker` against `talk_sim::SimLink`. `talk-sim`
//! depends on `talk-loop`, so building `talk-loop`'s own unit-test harness
//! would compile `talk-loop` twice and `SimLink: SpeechLink` would not unify.
//! As an integration test, both crates resolve to the same `talk-loop` build.

use talk_loop::CallStatusTracker;
use talk_sim::{SimLink, SimLinkConfig};

#[test]
fn forwards_once_per_transition() {
    let (mut link, handle) = SimLink::open(SimLinkConfig::default()).unwrap();
    let mut tracker = CallStatusTracker::new();

    assert!(tracker.on_notification(&mut link, true).unwrap());
    assert!(!tracker.on_notification(&mut link, true).unwrap());
    assert!(tracker.is_active());
    assert_eq!(handle.call_notifications(), vec![true]);
}

#[test]
fn no_forward_for_initial_inactive_state() {
    let (mut link, handle) = SimLink::open(SimLinkConfig::default()).unwrap();
    let mut tracker = CallStatusTracker::new();

    assert!(!tracker.on_notification(&mut link, false).unwrap());
    assert!(handle.call_notifications().is_empty());
}

#[test]
fn failed_forward_leaves_cache_untouched() {
    let (mut link, handle) = SimLink::open(SimLinkConfig::default()).unwrap();
    handle.fail_next_call_notify();
    let mut tracker = CallStatusTracker::new();

    assert!(tracker.on_notification(&mut link, true).is_err());
    assert!(!tracker.is_active());

    // the next genuine notification retries the forward
    assert!(tracker.on_notification(&mut link, true).unwrap());
    assert!(tracker.is_active());
    assert_eq!(handle.call_notifications(), vec![true]);
}
