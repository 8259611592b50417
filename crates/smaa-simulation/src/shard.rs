//! Chunked execution of independent trials across shards.
//!
//! Each shard owns its random stream and its partial aggregate. A chunk is
//! split as evenly as possible across shards, run in parallel, and the
//! caller merges shard aggregates in shard order after every chunk.

use std::ops::ControlFlow;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::cancel::CancelFlag;
use crate::results::SimulationStatus;

/// A unit of work that runs trials on its own state.
pub(crate) trait ShardTask: Send {
    fn run_trials(&mut self, count: u64);
}

/// Random stream of shard `index` for a run seeded with `seed`.
pub(crate) fn shard_rng(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

/// Trials shard `index` of `shards` runs for a chunk of `chunk` trials.
fn quota(chunk: u64, shards: u64, index: usize) -> u64 {
    chunk / shards + u64::from((index as u64) < chunk % shards)
}

/// Runs `iterations` trials in chunks of `chunk_size`.
///
/// `cancel` is checked before every chunk and `after_chunk` is called after
/// every chunk with the number of completed trials; returning
/// `ControlFlow::Break` stops the run.
pub(crate) fn run_chunks<T, F>(
    workers: &mut [T],
    iterations: u64,
    chunk_size: u64,
    cancel: &CancelFlag,
    mut after_chunk: F,
) -> SimulationStatus
where
    T: ShardTask,
    F: FnMut(u64, &[T]) -> ControlFlow<()>,
{
    let shards = workers.len().max(1) as u64;
    let mut completed = 0;
    while completed < iterations {
        if cancel.is_cancelled() {
            return SimulationStatus::Cancelled;
        }
        let chunk = chunk_size.max(1).min(iterations - completed);
        if workers.len() == 1 {
            workers[0].run_trials(chunk);
        } else {
            workers
                .par_iter_mut()
                .enumerate()
                .for_each(|(index, worker)| worker.run_trials(quota(chunk, shards, index)));
        }
        completed += chunk;
        if after_chunk(completed, workers).is_break() && completed < iterations {
            return SimulationStatus::Cancelled;
        }
    }
    SimulationStatus::Completed
}
