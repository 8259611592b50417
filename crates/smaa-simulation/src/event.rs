//! Event system for simulation monitoring.
//!
//! Listeners registered on a [`Simulator`](crate::Simulator) are notified
//! synchronously, in registration order, when a run starts, after every
//! chunk and when the run ends.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use smaa_simulation::event::{SimulationEventSupport, SimulationListener};
//! use smaa_simulation::SimulationResults;
//!
//! #[derive(Debug)]
//! struct Progress;
//! impl SimulationListener for Progress {
//!     fn on_chunk_completed(&self, completed: u64, _results: &SimulationResults) {
//!         println!("{completed} iterations done");
//!     }
//! }
//!
//! let mut support = SimulationEventSupport::new();
//! support.add_listener(Arc::new(Progress));
//! assert!(support.has_listeners());
//! ```

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::results::SimulationResults;

/// Listener for simulation lifecycle events.
pub trait SimulationListener: Send + Sync + Debug {
    /// Called before the first chunk.
    fn on_simulation_started(&self, _alternatives: usize, _criteria: usize, _iterations: u64) {}

    /// Called after every chunk with the merged partial results.
    fn on_chunk_completed(&self, _completed: u64, _results: &SimulationResults) {}

    /// Called once with the final results.
    fn on_simulation_ended(&self, _results: &SimulationResults, _cancelled: bool) {}
}

/// Broadcasts simulation events to registered listeners.
#[derive(Default, Clone)]
pub struct SimulationEventSupport {
    listeners: Vec<Arc<dyn SimulationListener>>,
}

impl SimulationEventSupport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn SimulationListener>) {
        self.listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn fire_simulation_started(&self, alternatives: usize, criteria: usize, iterations: u64) {
        for listener in &self.listeners {
            listener.on_simulation_started(alternatives, criteria, iterations);
        }
    }

    pub fn fire_chunk_completed(&self, completed: u64, results: &SimulationResults) {
        for listener in &self.listeners {
            listener.on_chunk_completed(completed, results);
        }
    }

    pub fn fire_simulation_ended(&self, results: &SimulationResults, cancelled: bool) {
        for listener in &self.listeners {
            listener.on_simulation_ended(results, cancelled);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }
}

impl Debug for SimulationEventSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// A logging listener that prints events to stdout.
#[derive(Debug, Clone, Default)]
pub struct LoggingListener {
    prefix: String,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl SimulationListener for LoggingListener {
    fn on_simulation_started(&self, alternatives: usize, criteria: usize, iterations: u64) {
        println!(
            "{}[Event] Simulation started: {} alternatives, {} criteria, {} iterations",
            self.prefix, alternatives, criteria, iterations
        );
    }

    fn on_chunk_completed(&self, completed: u64, _results: &SimulationResults) {
        println!("{}[Event] {} iterations completed", self.prefix, completed);
    }

    fn on_simulation_ended(&self, results: &SimulationResults, cancelled: bool) {
        if cancelled {
            println!(
                "{}[Event] Simulation cancelled after {} iterations",
                self.prefix,
                results.iteration_count()
            );
        } else {
            println!(
                "{}[Event] Simulation ended after {} iterations",
                self.prefix,
                results.iteration_count()
            );
        }
    }
}

/// A counting listener that tracks event occurrences.
///
/// Useful for testing.
#[derive(Debug, Default)]
pub struct CountingListener {
    started: AtomicUsize,
    chunks: AtomicUsize,
    ended: AtomicUsize,
    cancelled: AtomicUsize,
}

impl CountingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.load(Ordering::SeqCst)
    }

    pub fn ended_count(&self) -> usize {
        self.ended.load(Ordering::SeqCst)
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.started.store(0, Ordering::SeqCst);
        self.chunks.store(0, Ordering::SeqCst);
        self.ended.store(0, Ordering::SeqCst);
        self.cancelled.store(0, Ordering::SeqCst);
    }
}

impl SimulationListener for CountingListener {
    fn on_simulation_started(&self, _alternatives: usize, _criteria: usize, _iterations: u64) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_chunk_completed(&self, _completed: u64, _results: &SimulationResults) {
        self.chunks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_simulation_ended(&self, _results: &SimulationResults, cancelled: bool) {
        self.ended.fetch_add(1, Ordering::SeqCst);
        if cancelled {
            self.cancelled.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
