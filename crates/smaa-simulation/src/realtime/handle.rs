//! Handle for a simulation running on its own thread.

use std::fmt::Debug;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::cancel::CancelFlag;
use crate::results::SimulationResults;
use crate::simulator::Simulator;

/// Message streamed from a background run.
#[derive(Debug, Clone)]
pub enum SimulationUpdate {
    /// Partial results after a chunk.
    Progress {
        completed: u64,
        results: SimulationResults,
    },
    /// Final results; always the last message.
    Finished(SimulationResults),
}

/// Handle for interacting with a background simulation.
///
/// # Example
///
/// ```
/// use smaa_simulation::realtime::{SimulationHandle, SimulationUpdate};
/// use smaa_simulation::{Simulator, WeightPolicy};
/// use smaa_test::two_alternatives_three_criteria;
///
/// let matrix = two_alternatives_three_criteria();
/// let simulator = Simulator::new(&matrix, WeightPolicy::Uniform)
///     .unwrap()
///     .with_iterations(1_000)
///     .with_chunk_size(250)
///     .with_seed(1);
///
/// let handle = SimulationHandle::spawn(simulator);
/// let results = handle.join();
/// assert_eq!(results.iteration_count(), 1_000);
/// ```
pub struct SimulationHandle {
    updates: UnboundedReceiver<SimulationUpdate>,
    running: Arc<AtomicBool>,
    cancel: CancelFlag,
    thread: JoinHandle<SimulationResults>,
}

impl SimulationHandle {
    /// Starts `simulator` on a new thread.
    pub fn spawn(simulator: Simulator) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let running = Arc::new(AtomicBool::new(true));
        let cancel = simulator.cancel_flag();

        let worker_running = Arc::clone(&running);
        let thread = thread::spawn(move || {
            let results = simulator.run_with_progress(|completed, partial| {
                // a dropped receiver only means nobody is watching
                let _ = tx.send(SimulationUpdate::Progress {
                    completed,
                    results: partial.clone(),
                });
                ControlFlow::Continue(())
            });
            let _ = tx.send(SimulationUpdate::Finished(results.clone()));
            worker_running.store(false, Ordering::SeqCst);
            results
        });

        Self {
            updates: rx,
            running,
            cancel,
            thread,
        }
    }

    /// Requests cancellation; the run stops at the next chunk boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns true until the run has produced its final results.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns the next pending update without blocking.
    pub fn try_recv(&mut self) -> Option<SimulationUpdate> {
        self.updates.try_recv().ok()
    }

    /// Waits for the next update. Returns `None` once the run has finished
    /// and every update was received.
    pub async fn recv(&mut self) -> Option<SimulationUpdate> {
        self.updates.recv().await
    }

    /// Blocks until the next update; must not be called from async code.
    pub fn blocking_recv(&mut self) -> Option<SimulationUpdate> {
        self.updates.blocking_recv()
    }

    /// Waits for the run to finish and returns its results.
    ///
    /// A panic on the simulation thread is resumed on the caller.
    pub fn join(self) -> SimulationResults {
        match self.thread.join() {
            Ok(results) => results,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

impl Debug for SimulationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationHandle")
            .field("running", &self.is_running())
            .field("cancelled", &self.cancel.is_cancelled())
            .field("finished", &self.thread.is_finished())
            .finish()
    }
}
