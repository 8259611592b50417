//! Category acceptability aggregate for stochastic sorting.

use std::time::Duration;

use smaa_core::{Alternative, AlternativeId, Result, SmaaError};

use crate::results::SimulationStatus;

/// Counts of category assignments over the trials of a SMAA-TRI run.
///
/// `hits[a][k]` is the number of trials that sorted alternative `a` into
/// category `k`, categories ordered from worst to best.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryResults {
    alternatives: Vec<Alternative>,
    categories: Vec<Alternative>,
    iterations: u64,
    hits: Vec<Vec<u64>>,
    pub(crate) weight_fallbacks: u64,
    status: SimulationStatus,
    elapsed: Duration,
    seed: Option<u64>,
}

impl CategoryResults {
    pub fn new(alternatives: Vec<Alternative>, categories: Vec<Alternative>) -> Self {
        let hits = vec![vec![0; categories.len()]; alternatives.len()];
        Self {
            alternatives,
            categories,
            iterations: 0,
            hits,
            weight_fallbacks: 0,
            status: SimulationStatus::Running,
            elapsed: Duration::ZERO,
            seed: None,
        }
    }

    /// Records one trial; `assignments[a]` is the category index of alternative `a`.
    pub fn update(&mut self, assignments: &[usize]) {
        debug_assert_eq!(assignments.len(), self.alternatives.len());
        for (row, &category) in self.hits.iter_mut().zip(assignments) {
            row[category] += 1;
        }
        self.iterations += 1;
    }

    /// Adds the counts of another aggregate over the same alternatives and categories.
    pub fn merge(&mut self, other: &CategoryResults) {
        debug_assert_eq!(self.hits.len(), other.hits.len());
        for (mine, theirs) in self.hits.iter_mut().zip(&other.hits) {
            for (m, t) in mine.iter_mut().zip(theirs) {
                *m += t;
            }
        }
        self.iterations += other.iterations;
        self.weight_fallbacks += other.weight_fallbacks;
    }

    pub(crate) fn finish(&mut self, status: SimulationStatus, elapsed: Duration, seed: u64) {
        self.status = status;
        self.elapsed = elapsed;
        self.seed = Some(seed);
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Category descriptors, worst first.
    pub fn categories(&self) -> &[Alternative] {
        &self.categories
    }

    pub fn iteration_count(&self) -> u64 {
        self.iterations
    }

    /// Number of trials that sorted `alternative` into `category`.
    pub fn category_hits(&self, alternative: AlternativeId, category: AlternativeId) -> Result<u64> {
        let a = self.alternative_index(alternative)?;
        let k = self.category_index(category)?;
        Ok(self.hits[a][k])
    }

    /// Share of trials that sorted `alternative` into `category`; 0 before
    /// any trial completed.
    pub fn category_acceptability(
        &self,
        alternative: AlternativeId,
        category: AlternativeId,
    ) -> Result<f64> {
        Ok(self.frequency(self.category_hits(alternative, category)?))
    }

    /// Acceptabilities of every category for `alternative`, worst first.
    pub fn category_acceptabilities(&self, alternative: AlternativeId) -> Result<Vec<f64>> {
        let a = self.alternative_index(alternative)?;
        Ok(self.hits[a].iter().map(|&h| self.frequency(h)).collect())
    }

    /// Category `alternative` was most often sorted into. Ties go to the
    /// worse category; `None` before any trial completed.
    pub fn most_acceptable_category(&self, alternative: AlternativeId) -> Result<Option<AlternativeId>> {
        let a = self.alternative_index(alternative)?;
        if self.iterations == 0 {
            return Ok(None);
        }
        let best = self.hits[a]
            .iter()
            .enumerate()
            .fold(None::<(usize, u64)>, |best, (k, &h)| match best {
                Some((_, top)) if top >= h => best,
                _ => Some((k, h)),
            });
        Ok(best.map(|(k, _)| self.categories[k].id()))
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == SimulationStatus::Cancelled
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Seed the run used; `None` until the run finished.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Trials whose weights came from the interval-sampling fallback.
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

    fn alternative_index(&self, id: AlternativeId) -> Result<usize> {
        self.alternatives
            .iter()
            .position(|a| a.id() == id)
            .ok_or(SmaaError::UnknownAlternative(id))
    }

    fn category_index(&self, id: AlternativeId) -> Result<usize> {
        self.categories
            .iter()
            .position(|c| c.id() == id)
            .ok_or(SmaaError::UnknownAlternative(id))
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
impl PartialEq for CategoryResults {
    fn eq(&self, other: &Self) -> bool {
        self.alternatives == other.alternatives
            && self.categories == other.categories
            && self.iterations == other.iterations
            && self.hits == other.hits
            && self.weight_fallbacks == other.weight_fallbacks
            && self.status == other.status
            && self.seed == other.seed
    }
}
