//! Tests for the event system.

use super::*;
use smaa_core::{Alternative, Criterion};

fn empty_results() -> SimulationResults {
    SimulationResults::new(vec![Alternative::new("a")], vec![Criterion::scale("c")])
}

#[test]
fn test_event_support_new() {
    let support = SimulationEventSupport::new();
    assert_eq!(support.listener_count(), 0);
    assert!(!support.has_listeners());
}

#[test]
fn test_event_support_fire_events() {
    let mut support = SimulationEventSupport::new();
    let listener = Arc::new(CountingListener::new());
    support.add_listener(listener.clone());

    let results = empty_results();
    support.fire_simulation_started(1, 1, 10);
    support.fire_chunk_completed(5, &results);
    support.fire_chunk_completed(10, &results);
    support.fire_simulation_ended(&results, false);

    assert_eq!(listener.started_count(), 1);
    assert_eq!(listener.chunk_count(), 2);
    assert_eq!(listener.ended_count(), 1);
    assert_eq!(listener.cancelled_count(), 0);
}

#[test]
fn test_cancelled_end_counted() {
    let mut support = SimulationEventSupport::new();
    let listener = Arc::new(CountingListener::new());
    support.add_listener(listener.clone());
    support.fire_simulation_ended(&empty_results(), true);
    assert_eq!(listener.cancelled_count(), 1);

    listener.reset();
    assert_eq!(listener.ended_count(), 0);
}

#[test]
fn test_clear_listeners() {
    let mut support = SimulationEventSupport::new();
    let listener = Arc::new(CountingListener::new());
    support.add_listener(listener.clone());
    support.add_listener(Arc::new(LoggingListener::with_prefix("[test] ")));
    assert_eq!(support.listener_count(), 2);

    support.clear_listeners();
    support.fire_simulation_started(1, 1, 1);
    assert_eq!(listener.started_count(), 0);
}
