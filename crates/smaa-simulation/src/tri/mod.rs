//! Stochastic ELECTRE TRI (SMAA-TRI).
//!
//! Repeats the ELECTRE TRI assignment over sampled measurements, sampled
//! weights and a cutting level drawn uniformly from an interval, and counts
//! how often every alternative lands in every category.

mod results;

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::time::Instant;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use smaa_config::{ElectreConfig, SimulationConfig};
use smaa_core::{Alternative, AlternativeId, ImpactMatrix, Interval, Result, SmaaError};
use smaa_electre::{AssignmentRule, ElectreTri, Performance};
use tracing::{debug, info, warn};

use crate::cancel::CancelFlag;
use crate::model::SimulationModel;
use crate::shard::{run_chunks, shard_rng, ShardTask};
use crate::weights::{WeightDraw, WeightPolicy, WeightSampler};

pub use results::CategoryResults;

/// Monte Carlo sorting of a matrix's alternatives into ordered categories.
///
/// Categories are given worst first; every category but the last needs an
/// upper boundary profile over all criteria of the matrix, and every
/// criterion needs outranking thresholds.
///
/// # Example
///
/// ```
/// use smaa_core::Interval;
/// use smaa_simulation::{SmaaTriSimulation, WeightPolicy};
/// use smaa_test::outranking_fixture;
///
/// let fixture = outranking_fixture();
/// let results = SmaaTriSimulation::new(
///     &fixture.matrix(),
///     &fixture.categories,
///     &fixture.boundaries,
///     WeightPolicy::Uniform,
///     Interval::new(0.65, 0.85).unwrap(),
/// )
/// .unwrap()
/// .with_iterations(1_000)
/// .with_seed(3)
/// .run();
///
/// let weak = fixture.alternative("weak").id();
/// let poor = fixture.category("poor").id();
/// assert_eq!(results.category_acceptability(weak, poor).unwrap(), 1.0);
/// ```
#[derive(Debug)]
pub struct SmaaTriSimulation {
    model: SimulationModel,
    sorter: ElectreTri,
    categories: Vec<Alternative>,
    weights: WeightSampler,
    lambda: Interval,
    iterations: u64,
    chunk_size: u64,
    seed: Option<u64>,
    shards: usize,
    cancel: CancelFlag,
}

impl SmaaTriSimulation {
    /// Creates a simulation with the default run configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` when `lambda` leaves `[0, 1]`, the weight policy
    ///   is invalid, or a criterion has no outranking thresholds
    /// - `MalformedCategoryProfile` for missing categories or profiles
    pub fn new(
        matrix: &ImpactMatrix,
        categories: &[Alternative],
        boundaries: &HashMap<AlternativeId, Performance>,
        policy: WeightPolicy,
        lambda: Interval,
    ) -> Result<Self> {
        Self::build(
            matrix,
            categories,
            boundaries,
            policy,
            lambda,
            &SimulationConfig::default(),
        )
    }

    /// Creates a simulation from a loaded configuration; its `electre`
    /// section supplies the lambda range, rule and veto setting.
    pub fn from_config(
        matrix: &ImpactMatrix,
        categories: &[Alternative],
        boundaries: &HashMap<AlternativeId, Performance>,
        policy: WeightPolicy,
        config: &SimulationConfig,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SmaaError::InvalidParameter(e.to_string()))?;
        let electre = config.electre.clone().unwrap_or_default();
        let lambda = electre
            .lambda_interval()
            .map_err(|e| SmaaError::InvalidParameter(e.to_string()))?;
        Ok(
            Self::build(matrix, categories, boundaries, policy, lambda, config)?
                .with_electre(&electre),
        )
    }

    fn build(
        matrix: &ImpactMatrix,
        categories: &[Alternative],
        boundaries: &HashMap<AlternativeId, Performance>,
        policy: WeightPolicy,
        lambda: Interval,
        config: &SimulationConfig,
    ) -> Result<Self> {
        if lambda.lo() < 0.0 || lambda.hi() > 1.0 {
            return Err(SmaaError::InvalidParameter(format!(
                "lambda range {lambda} must lie within [0, 1]"
            )));
        }
        let model = SimulationModel::from_matrix(matrix)?;
        let weights = policy.sampler(model.criteria())?;
        let n = model.criterion_count();
        let even = vec![1.0 / n.max(1) as f64; n];
        let sorter = ElectreTri::new(model.criteria(), categories, boundaries, &even, lambda.lo())?;
        Ok(Self {
            model,
            sorter,
            categories: categories.to_vec(),
            weights,
            lambda,
            iterations: config.iterations,
            chunk_size: config.chunk_size,
            seed: config.random_seed,
            shards: config.thread_count.resolve(),
            cancel: CancelFlag::new(),
        })
    }

    fn with_electre(self, electre: &ElectreConfig) -> Self {
        self.with_rule(electre.rule.into()).with_veto(electre.veto)
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards.max(1);
        self
    }

    pub fn with_rule(mut self, rule: AssignmentRule) -> Self {
        self.sorter.set_rule(rule);
        self
    }

    pub fn with_veto(mut self, veto: bool) -> Self {
        self.sorter = self.sorter.with_veto(veto);
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn rule(&self) -> AssignmentRule {
        self.sorter.rule()
    }

    pub fn lambda(&self) -> Interval {
        self.lambda
    }

    pub fn shard_count(&self) -> usize {
        self.shards
    }

    pub fn run(&self) -> CategoryResults {
        self.run_with_progress(|_, _| ControlFlow::Continue(()))
    }

    /// Runs all iterations, calling `progress` after every chunk. Returning
    /// `ControlFlow::Break` cancels the run.
    pub fn run_with_progress<F>(&self, mut progress: F) -> CategoryResults
    where
        F: FnMut(u64, &CategoryResults) -> ControlFlow<()>,
    {
        let start = Instant::now();
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        let shards = self.shards.max(1);

        info!(
            event = "simulation_start",
            method = "smaa-tri",
            alternatives = self.model.alternative_count(),
            criteria = self.model.criterion_count(),
            iterations = self.iterations,
            shards,
            seed,
        );

        let mut workers: Vec<SortingShard<'_>> = (0..shards)
            .map(|index| SortingShard::new(self, shard_rng(seed, index)))
            .collect();

        let mut results = self.empty_results();
        let status = run_chunks(
            &mut workers,
            self.iterations,
            self.chunk_size,
            &self.cancel,
            |completed, workers| {
                results = self.empty_results();
                for worker in workers {
                    results.merge(&worker.results);
                }
                debug!(event = "chunk_end", completed, total = self.iterations);
                progress(completed, &results)
            },
        );

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
            method = "smaa-tri",
            completed = results.iteration_count(),
            cancelled = results.is_cancelled(),
            duration_ms = elapsed.as_millis() as u64,
            iterations_per_sec = results.iterations_per_second() as u64,
        );
        results
    }

    fn empty_results(&self) -> CategoryResults {
        CategoryResults::new(self.model.alternatives().to_vec(), self.categories.clone())
    }
}

struct SortingShard<'a> {
    model: &'a SimulationModel,
    sorter: &'a ElectreTri,
    sampler: &'a WeightSampler,
    lambda: Interval,
    rng: ChaCha8Rng,
    values: Vec<f64>,
    weights: Vec<f64>,
    row: Vec<f64>,
    assignments: Vec<usize>,
    results: CategoryResults,
}

impl<'a> SortingShard<'a> {
    fn new(simulation: &'a SmaaTriSimulation, rng: ChaCha8Rng) -> Self {
        let model = &simulation.model;
        Self {
            model,
            sorter: &simulation.sorter,
            sampler: &simulation.weights,
            lambda: simulation.lambda,
            rng,
            values: vec![0.0; model.cell_count()],
            weights: vec![0.0; model.criterion_count()],
            row: vec![0.0; model.criterion_count()],
            assignments: vec![0; model.alternative_count()],
            results: simulation.empty_results(),
        }
    }
}

impl ShardTask for SortingShard<'_> {
    fn run_trials(&mut self, count: u64) {
        for _ in 0..count {
            self.model.sample_into(&mut self.rng, &mut self.values);
            if self.sampler.sample(&mut self.rng, &mut self.weights) == WeightDraw::Fallback {
                self.results.weight_fallbacks += 1;
            }
            let lambda = self.lambda.lo() + self.lambda.width() * self.rng.random::<f64>();
            for (a, slot) in self.assignments.iter_mut().enumerate() {
                self.model.row_into(&self.values, a, &mut self.row);
                *slot = self
                    .sorter
                    .assign_with(&self.row, &self.weights, lambda)
                    .expect("trial buffers are sized from the sorter's criteria");
            }
            self.results.update(&self.assignments);
        }
    }
}
