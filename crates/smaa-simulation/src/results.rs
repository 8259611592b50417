//! SMAA-2 result aggregate.

use std::time::Duration;

use smaa_core::{Alternative, AlternativeId, Criterion, CriterionId, Result, SmaaError};

/// How a run ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimulationStatus {
    /// Still accumulating (partial results handed to progress callbacks).
    #[default]
    Running,
    Completed,
    /// Stopped between chunks; statistics cover the iterations run so far.
    Cancelled,
}

/// Rank acceptabilities, central weights and confidence factors.
///
/// Ranks are 0-based: rank 0 is first place. Counts are exact; frequencies
/// are counts divided by [`iteration_count`](Self::iteration_count).
///
/// # Example
///
/// ```
/// use smaa_core::{Alternative, Criterion};
/// use smaa_simulation::SimulationResults;
///
/// let a1 = Alternative::new("a1");
/// let a2 = Alternative::new("a2");
/// let crits: Vec<_> = (1..=3).map(|i| Criterion::scale(format!("c{i}"))).collect();
/// let mut results = SimulationResults::new(vec![a1.clone(), a2.clone()], crits.clone());
///
/// // a1 second, a2 first
/// results.update(&[1, 0], &[0.5, 0.5, 0.0]);
///
/// assert_eq!(results.rank_hits(a1.id(), 1).unwrap(), 1);
/// assert_eq!(results.rank_hits(a2.id(), 0).unwrap(), 1);
/// assert_eq!(results.central_weights(a2.id()).unwrap(), Some(&[0.5, 0.5, 0.0][..]));
/// assert_eq!(results.central_weights(a1.id()).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResults {
    alternatives: Vec<Alternative>,
    criteria: Vec<Criterion>,
    iterations: u64,
    /// `[alternative][rank]`
    rank_hits: Vec<Vec<u64>>,
    /// `[alternative][criterion]`, meaningful once the alternative ranked first.
    central_weights: Vec<Vec<f64>>,
    confidence_hits: Vec<u64>,
    confidence_trials: u64,
    pub(crate) weight_fallbacks: u64,
    status: SimulationStatus,
    elapsed: Duration,
    seed: Option<u64>,
}

impl SimulationResults {
    /// Creates an empty aggregate.
    pub fn new(alternatives: Vec<Alternative>, criteria: Vec<Criterion>) -> Self {
        let n = alternatives.len();
        let m = criteria.len();
        Self {
            alternatives,
            criteria,
            iterations: 0,
            rank_hits: vec![vec![0; n]; n],
            central_weights: vec![vec![0.0; m]; n],
            confidence_hits: vec![0; n],
            confidence_trials: 0,
            weight_fallbacks: 0,
            status: SimulationStatus::Running,
            elapsed: Duration::ZERO,
            seed: None,
        }
    }

    // === Accumulation ===

    /// Folds one trial into the aggregate.
    ///
    /// `ranks[i]` is the 0-based rank of alternative `i`; `weights` is the
    /// trial's weight vector in criterion order.
    pub fn update(&mut self, ranks: &[usize], weights: &[f64]) {
        debug_assert_eq!(ranks.len(), self.alternatives.len());
        debug_assert_eq!(weights.len(), self.criteria.len());
        self.iterations += 1;
        for (alternative, &rank) in ranks.iter().enumerate() {
            self.rank_hits[alternative][rank] += 1;
            if rank == 0 {
                let n = self.rank_hits[alternative][0] as f64;
                for (mean, &w) in self.central_weights[alternative].iter_mut().zip(weights) {
                    *mean += (w - *mean) / n;
                }
            }
        }
    }

    /// Adds the statistics of `other`, which must cover the same alternatives
    /// and criteria.
    ///
    /// Counts are summed and central weight means combined weighted by the
    /// first-rank counts, so merging shard aggregates gives the aggregate of
    /// all their trials.
    pub fn merge(&mut self, other: &SimulationResults) {
        debug_assert_eq!(self.alternatives, other.alternatives);
        for alternative in 0..self.alternatives.len() {
            let n1 = self.rank_hits[alternative][0];
            let n2 = other.rank_hits[alternative][0];
            if n2 > 0 {
                let share = n2 as f64 / (n1 + n2) as f64;
                let means = self.central_weights[alternative]
                    .iter_mut()
                    .zip(&other.central_weights[alternative]);
                for (m1, &m2) in means {
                    *m1 += (m2 - *m1) * share;
                }
            }
            for (a, b) in self.rank_hits[alternative]
                .iter_mut()
                .zip(&other.rank_hits[alternative])
            {
                *a += b;
            }
            self.confidence_hits[alternative] += other.confidence_hits[alternative];
        }
        self.iterations += other.iterations;
        self.confidence_trials += other.confidence_trials;
        self.weight_fallbacks += other.weight_fallbacks;
    }

    /// Records one confidence trial; `hits[i]` is whether alternative `i`
    /// ranked first under its own central weights.
    pub(crate) fn record_confidence(&mut self, hits: impl IntoIterator<Item = bool>) {
        self.confidence_trials += 1;
        for (count, hit) in self.confidence_hits.iter_mut().zip(hits) {
            *count += u64::from(hit);
        }
    }

    pub(crate) fn finish(&mut self, status: SimulationStatus, elapsed: Duration, seed: u64) {
        self.status = status;
        self.elapsed = elapsed;
        self.seed = Some(seed);
    }

    // === Read Access ===

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Number of trials folded in.
    pub fn iteration_count(&self) -> u64 {
        self.iterations
    }

    /// Number of trials in which `alternative` attained `rank`.
    pub fn rank_hits(&self, alternative: AlternativeId, rank: usize) -> Result<u64> {
        let row = &self.rank_hits[self.alternative_index(alternative)?];
        row.get(rank).copied().ok_or_else(|| {
            SmaaError::InvalidParameter(format!("rank {rank} out of range 0..{}", row.len()))
        })
    }

    /// Rank acceptability index: share of trials in which `alternative`
    /// attained `rank`. Zero before any trial.
    pub fn rank_acceptability(&self, alternative: AlternativeId, rank: usize) -> Result<f64> {
        let hits = self.rank_hits(alternative, rank)?;
        Ok(self.frequency(hits))
    }

    /// All rank acceptabilities of `alternative`, best rank first.
    pub fn rank_acceptabilities(&self, alternative: AlternativeId) -> Result<Vec<f64>> {
        let row = &self.rank_hits[self.alternative_index(alternative)?];
        Ok(row.iter().map(|&hits| self.frequency(hits)).collect())
    }

    /// Central weight of `alternative` on `criterion`, `None` if the
    /// alternative never ranked first.
    pub fn central_weight(
        &self,
        alternative: AlternativeId,
        criterion: CriterionId,
    ) -> Result<Option<f64>> {
        let c = self.criterion_index(criterion)?;
        Ok(self.central_weights(alternative)?.map(|w| w[c]))
    }

    /// Central weight vector of `alternative` in criterion order, `None` if
    /// the alternative never ranked first.
    pub fn central_weights(&self, alternative: AlternativeId) -> Result<Option<&[f64]>> {
        let a = self.alternative_index(alternative)?;
        Ok(self.central_weights_at(a))
    }

    /// Confidence factor of `alternative`: share of confidence trials in
    /// which its central weights rank it first. `None` if it never ranked
    /// first or confidence factors were not computed.
    pub fn confidence_factor(&self, alternative: AlternativeId) -> Result<Option<f64>> {
        let a = self.alternative_index(alternative)?;
        if self.rank_hits[a][0] == 0 || self.confidence_trials == 0 {
            return Ok(None);
        }
        Ok(Some(
            self.confidence_hits[a] as f64 / self.confidence_trials as f64,
        ))
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == SimulationStatus::Cancelled
    }

    /// Wall-clock duration of the run.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Seed the run was started with; replaying it with the same shard
    /// count reproduces the statistics.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Trials whose weights came from the interval-constraint fallback.
    pub fn weight_fallbacks(&self) -> u64 {
        self.weight_fallbacks
    }

    pub fn iterations_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.iterations as f64 / secs
        } else {
            0.0
        }
    }

    // === Index Helpers ===

    pub(crate) fn central_weights_at(&self, alternative: usize) -> Option<&[f64]> {
        (self.rank_hits[alternative][0] > 0).then(|| self.central_weights[alternative].as_slice())
    }

    fn alternative_index(&self, id: AlternativeId) -> Result<usize> {
        self.alternatives
            .iter()
            .position(|a| a.id() == id)
            .ok_or(SmaaError::UnknownAlternative(id))
    }

    fn criterion_index(&self, id: CriterionId) -> Result<usize> {
        self.criteria
            .iter()
            .position(|c| c.id() == id)
            .ok_or(SmaaError::UnknownCriterion(id))
    }

    fn frequency(&self, hits: u64) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            hits as f64 / self.iterations as f64
        }
    }
}

/// Statistics only: elapsed time is not compared.
impl PartialEq for SimulationResults {
    fn eq(&self, other: &Self) -> bool {
        self.alternatives == other.alternatives
            && self.criteria == other.criteria
            && self.iterations == other.iterations
            && self.rank_hits == other.rank_hits
            && self.central_weights == other.central_weights
            && self.confidence_hits == other.confidence_hits
            && self.confidence_trials == other.confidence_trials
            && self.weight_fallbacks == other.weight_fallbacks
            && self.status == other.status
            && self.seed == other.seed
    }
}
