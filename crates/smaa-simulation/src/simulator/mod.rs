//! SMAA-2 simulation driver.
//!
//! A [`Simulator`] snapshots an impact matrix, validates a weight policy
//! and runs Monte Carlo trials: sample every measurement, draw a weight
//! vector, rank alternatives by weighted normalized value and fold the
//! ranks into [`SimulationResults`].
//!
//! Logging levels:
//! - **INFO**: Simulation start/end with problem size and throughput
//! - **DEBUG**: Chunk boundaries
//! - **WARN**: Weight sampling fallbacks

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use smaa_config::{ConfidenceMode, SimulationConfig};
use smaa_core::{ImpactMatrix, Result, SmaaError};
use tracing::{debug, info, warn};

use crate::cancel::CancelFlag;
use crate::event::{SimulationEventSupport, SimulationListener};
use crate::model::SimulationModel;
use crate::results::{SimulationResults, SimulationStatus};
use crate::scoring::rank_by_utility;
use crate::shard::{run_chunks, shard_rng, ShardTask};
use crate::weights::{WeightDraw, WeightPolicy, WeightSampler};

/// Runs SMAA-2 simulations over a matrix snapshot.
///
/// The matrix is copied at construction, so the caller may keep editing it
/// while runs are in flight. Runs are chunked: cancellation and progress
/// reporting happen between chunks, and a cancelled run returns the
/// statistics of every completed chunk.
///
/// # Example
///
/// ```
/// use smaa_simulation::{Simulator, WeightPolicy};
/// use smaa_test::two_alternatives_three_criteria;
///
/// let matrix = two_alternatives_three_criteria();
/// let results = Simulator::new(&matrix, WeightPolicy::Uniform)
///     .unwrap()
///     .with_iterations(2_000)
///     .with_seed(42)
///     .with_shards(2)
///     .run();
///
/// let a2 = matrix.alternatives()[1].id();
/// assert_eq!(results.iteration_count(), 2_000);
/// assert!(results.rank_acceptability(a2, 0).unwrap() > 0.7);
/// ```
#[derive(Debug)]
pub struct Simulator {
    model: SimulationModel,
    weights: WeightSampler,
    iterations: u64,
    chunk_size: u64,
    seed: Option<u64>,
    shards: usize,
    confidence: ConfidenceMode,
    cancel: CancelFlag,
    events: SimulationEventSupport,
}

impl Simulator {
    /// Creates a simulator with the default configuration.
    pub fn new(matrix: &ImpactMatrix, policy: WeightPolicy) -> Result<Self> {
        Self::from_config(matrix, policy, &SimulationConfig::default())
    }

    /// Creates a simulator from a loaded configuration.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the configuration or the weight policy is
    /// invalid; `UnknownCriterion` if the policy names a criterion the
    /// matrix does not contain.
    pub fn from_config(
        matrix: &ImpactMatrix,
        policy: WeightPolicy,
        config: &SimulationConfig,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SmaaError::InvalidParameter(e.to_string()))?;
        let model = SimulationModel::from_matrix(matrix)?;
        let weights = policy.sampler(model.criteria())?;
        Ok(Self {
            model,
            weights,
            iterations: config.iterations,
            chunk_size: config.chunk_size,
            seed: config.random_seed,
            shards: config.thread_count.resolve(),
            confidence: config.confidence,
            cancel: CancelFlag::new(),
            events: SimulationEventSupport::new(),
        })
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the number of trials between progress reports (at least 1).
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of independent shards (at least 1). Seeded runs are
    /// reproducible for a fixed shard count.
    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards.max(1);
        self
    }

    pub fn with_confidence(mut self, confidence: ConfidenceMode) -> Self {
        self.confidence = confidence;
        self
    }

    /// Shares an externally owned cancellation flag.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn SimulationListener>) -> Self {
        self.events.add_listener(listener);
        self
    }

    pub fn add_listener(&mut self, listener: Arc<dyn SimulationListener>) {
        self.events.add_listener(listener);
    }

    /// Returns a handle to this simulator's cancellation flag.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn model(&self) -> &SimulationModel {
        &self.model
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Runs all iterations.
    pub fn run(&self) -> SimulationResults {
        self.run_with_progress(|_, _| ControlFlow::Continue(()))
    }

    /// Runs all iterations, calling `progress` after every chunk with the
    /// number of completed trials and the partial results. Returning
    /// `ControlFlow::Break` cancels the run.
    pub fn run_with_progress<F>(&self, mut progress: F) -> SimulationResults
    where
        F: FnMut(u64, &SimulationResults) -> ControlFlow<()>,
    {
        let start = Instant::now();
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        let shards = self.shards.max(1);

        info!(
            event = "simulation_start",
            method = "smaa-2",
            alternatives = self.model.alternative_count(),
            criteria = self.model.criterion_count(),
            iterations = self.iterations,
            shards,
            seed,
        );
        self.events.fire_simulation_started(
            self.model.alternative_count(),
            self.model.criterion_count(),
            self.iterations,
        );

        let mut workers: Vec<RankShard<'_>> = (0..shards)
            .map(|index| RankShard {
                model: &self.model,
                sampler: &self.weights,
                rng: shard_rng(seed, index),
                trial: Trial::new(&self.model),
                results: self.empty_results(),
            })
            .collect();

        let mut results = self.empty_results();
        let status = run_chunks(
            &mut workers,
            self.iterations,
            self.chunk_size,
            &self.cancel,
            |completed, workers| {
                results = self.merge_shards(workers.iter().map(|w| &w.results));
                debug!(event = "chunk_end", completed, total = self.iterations);
                self.events.fire_chunk_completed(completed, &results);
                progress(completed, &results)
            },
        );

        let status = self.compute_confidence(&mut results, status, seed, shards);

        let elapsed = start.elapsed();
        results.finish(status, elapsed, seed);
        if results.weight_fallbacks() > 0 {
            warn!(
                event = "weight_fallback",
                trials = results.weight_fallbacks(),
                "weight bounds too tight for rejection sampling, fixed feasible weights used"
            );
        }
        info!(
            event = "simulation_end",
            method = "smaa-2",
            completed = results.iteration_count(),
            cancelled = results.is_cancelled(),
            duration_ms = elapsed.as_millis() as u64,
            iterations_per_sec = results.iterations_per_second() as u64,
        );
        self.events
            .fire_simulation_ended(&results, results.is_cancelled());
        results
    }

    /// Fills in confidence factors and returns the final run status.
    fn compute_confidence(
        &self,
        results: &mut SimulationResults,
        status: SimulationStatus,
        seed: u64,
        shards: usize,
    ) -> SimulationStatus {
        let candidates: Vec<Option<Vec<f64>>> = (0..self.model.alternative_count())
            .map(|a| results.central_weights_at(a).map(<[f64]>::to_vec))
            .collect();
        if candidates.iter().all(Option::is_none) {
            return status;
        }

        match self.confidence {
            ConfidenceMode::ExpectedValues => {
                let mut trial = Trial::new(&self.model);
                trial.values = self.model.expected_values();
                let hits: Vec<bool> = candidates
                    .iter()
                    .enumerate()
                    .map(|(a, weights)| match weights {
                        Some(w) => {
                            trial.rank(&self.model, w);
                            trial.ranks[a] == 0
                        }
                        None => false,
                    })
                    .collect();
                results.record_confidence(hits);
                status
            }
            ConfidenceMode::Sampled => {
                if status == SimulationStatus::Cancelled {
                    return status;
                }
                let mut workers: Vec<ConfidenceShard<'_>> = (0..shards)
                    .map(|index| ConfidenceShard {
                        model: &self.model,
                        candidates: &candidates,
                        rng: shard_rng(seed, shards + index),
                        trial: Trial::new(&self.model),
                        hits: Vec::with_capacity(candidates.len()),
                        results: self.empty_results(),
                    })
                    .collect();
                let status = run_chunks(
                    &mut workers,
                    self.iterations,
                    self.chunk_size,
                    &self.cancel,
                    |_, _| ControlFlow::Continue(()),
                );
                if status == SimulationStatus::Completed {
                    for worker in &workers {
                        results.merge(&worker.results);
                    }
                }
                status
            }
        }
    }

    fn empty_results(&self) -> SimulationResults {
        SimulationResults::new(
            self.model.alternatives().to_vec(),
            self.model.criteria().to_vec(),
        )
    }

    fn merge_shards<'r>(
        &self,
        parts: impl Iterator<Item = &'r SimulationResults>,
    ) -> SimulationResults {
        let mut merged = self.empty_results();
        for part in parts {
            merged.merge(part);
        }
        merged
    }
}

/// Scratch buffers for one trial.
#[derive(Debug)]
struct Trial {
    values: Vec<f64>,
    weights: Vec<f64>,
    utilities: Vec<f64>,
    order: Vec<usize>,
    ranks: Vec<usize>,
}

impl Trial {
    fn new(model: &SimulationModel) -> Self {
        let n = model.alternative_count();
        Self {
            values: vec![0.0; model.cell_count()],
            weights: vec![0.0; model.criterion_count()],
            utilities: vec![0.0; n],
            order: Vec::with_capacity(n),
            ranks: vec![0; n],
        }
    }

    /// Ranks the current values under the current weights.
    fn rank_own(&mut self, model: &SimulationModel) {
        model.utilities(&self.values, &self.weights, &mut self.utilities);
        rank_by_utility(&self.utilities, &mut self.order, &mut self.ranks);
    }

    /// Ranks the current values under `weights`.
    fn rank(&mut self, model: &SimulationModel, weights: &[f64]) {
        model.utilities(&self.values, weights, &mut self.utilities);
        rank_by_utility(&self.utilities, &mut self.order, &mut self.ranks);
    }
}

struct RankShard<'a> {
    model: &'a SimulationModel,
    sampler: &'a WeightSampler,
    rng: ChaCha8Rng,
    trial: Trial,
    results: SimulationResults,
}

impl ShardTask for RankShard<'_> {
    fn run_trials(&mut self, count: u64) {
        for _ in 0..count {
            self.model.sample_into(&mut self.rng, &mut self.trial.values);
            if self.sampler.sample(&mut self.rng, &mut self.trial.weights) == WeightDraw::Fallback {
                self.results.weight_fallbacks += 1;
            }
            self.trial.rank_own(self.model);
            self.results.update(&self.trial.ranks, &self.trial.weights);
        }
    }
}

/// Re-runs sampled trials scoring each alternative with its own central
/// weights.
struct ConfidenceShard<'a> {
    model: &'a SimulationModel,
    candidates: &'a [Option<Vec<f64>>],
    rng: ChaCha8Rng,
    trial: Trial,
    hits: Vec<bool>,
    results: SimulationResults,
}

impl ShardTask for ConfidenceShard<'_> {
    fn run_trials(&mut self, count: u64) {
        for _ in 0..count {
            self.model.sample_into(&mut self.rng, &mut self.trial.values);
            self.hits.clear();
            for (a, weights) in self.candidates.iter().enumerate() {
                let hit = match weights {
                    Some(w) => {
                        self.trial.rank(self.model, w);
                        self.trial.ranks[a] == 0
                    }
                    None => false,
                };
                self.hits.push(hit);
            }
            self.results.record_confidence(self.hits.iter().copied());
        }
    }
}

#[cfg(test)]
mod tests;
