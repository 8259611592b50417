//! ELECTRE TRI sorting.

use std::collections::{HashMap, HashSet};

use smaa_config::AssignmentRuleConfig;
use smaa_core::{
    Alternative, AlternativeId, Criterion, CriterionId, Direction, ImpactMatrix,
    OutrankingThresholds, Result, SmaaError,
};
use tracing::debug;

use crate::concordance::{concordance, vetoes};

/// Criterion values of one alternative or profile, keyed by criterion.
pub type Performance = HashMap<CriterionId, f64>;

/// Direction in which boundary profiles are scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AssignmentRule {
    /// Lowest category whose upper profile the alternative fails to outrank.
    #[default]
    Pessimistic,
    /// Category above the highest profile not preferred to the alternative.
    Optimistic,
}

impl From<AssignmentRuleConfig> for AssignmentRule {
    fn from(config: AssignmentRuleConfig) -> Self {
        match config {
            AssignmentRuleConfig::Pessimistic => AssignmentRule::Pessimistic,
            AssignmentRuleConfig::Optimistic => AssignmentRule::Optimistic,
        }
    }
}

#[derive(Debug, Clone)]
struct OutrankingColumn {
    id: CriterionId,
    direction: Direction,
    thresholds: OutrankingThresholds,
}

/// A validated ELECTRE TRI sorter.
///
/// Categories are ordered worst first. Category `i < n - 1` is bounded
/// above by its boundary profile; the top category has no upper bound.
/// Construction checks every input, so assignment itself cannot fail.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use smaa_core::{Alternative, Criterion, Direction, OutrankingThresholds};
/// use smaa_electre::{AssignmentRule, ElectreTri};
///
/// let t = OutrankingThresholds::new(0.0, 1.0, 5.0).unwrap();
/// let c = Criterion::outranking("quality", Direction::Ascending, t);
/// let bad = Alternative::new("bad");
/// let good = Alternative::new("good");
/// let boundaries = HashMap::from([(bad.id(), HashMap::from([(c.id(), 5.0)]))]);
///
/// let sorter = ElectreTri::new(&[c], &[bad.clone(), good.clone()], &boundaries, &[1.0], 0.5)
///     .unwrap()
///     .with_rule(AssignmentRule::Pessimistic);
/// assert_eq!(sorter.assign(&[7.0]).unwrap(), 1);
/// assert_eq!(sorter.assign(&[2.0]).unwrap(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ElectreTri {
    criteria: Vec<OutrankingColumn>,
    categories: Vec<AlternativeId>,
    profiles: Vec<Vec<f64>>,
    weights: Vec<f64>,
    lambda: f64,
    rule: AssignmentRule,
    veto: bool,
}

impl ElectreTri {
    /// Creates a sorter.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` for a criterion without outranking thresholds,
    ///   a weight count that differs from the criterion count, a negative
    ///   weight, or `lambda` outside `[0, 1]`
    /// - `MalformedCategoryProfile` when there are no categories, a category
    ///   repeats, or a non-top category lacks a complete boundary profile
    pub fn new(
        criteria: &[Criterion],
        categories: &[Alternative],
        boundaries: &HashMap<AlternativeId, Performance>,
        weights: &[f64],
        lambda: f64,
    ) -> Result<Self> {
        let columns = criteria
            .iter()
            .map(|c| -> Result<OutrankingColumn> {
                let thresholds = c.thresholds().copied().ok_or_else(|| {
                    SmaaError::InvalidParameter(format!(
                        "criterion {} has no outranking thresholds",
                        c.name()
                    ))
                })?;
                Ok(OutrankingColumn {
                    id: c.id(),
                    direction: c.direction(),
                    thresholds,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if categories.is_empty() {
            return Err(SmaaError::MalformedCategoryProfile(
                "at least one category is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = categories.iter().find(|c| !seen.insert(c.id())) {
            return Err(SmaaError::MalformedCategoryProfile(format!(
                "category {} appears more than once",
                dup.name()
            )));
        }

        let mut profiles = Vec::with_capacity(categories.len() - 1);
        for category in &categories[..categories.len() - 1] {
            let profile = boundaries.get(&category.id()).ok_or_else(|| {
                SmaaError::MalformedCategoryProfile(format!(
                    "category {} has no upper boundary profile",
                    category.name()
                ))
            })?;
            let row = columns
                .iter()
                .map(|col| {
                    profile.get(&col.id).copied().ok_or_else(|| {
                        SmaaError::MalformedCategoryProfile(format!(
                            "boundary profile of category {} lacks criterion {}",
                            category.name(),
                            col.id
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            profiles.push(row);
        }

        let mut sorter = Self {
            criteria: columns,
            categories: categories.iter().map(Alternative::id).collect(),
            profiles,
            weights: Vec::new(),
            lambda: 0.0,
            rule: AssignmentRule::default(),
            veto: false,
        };
        sorter.set_weights(weights)?;
        sorter.set_lambda(lambda)?;
        Ok(sorter)
    }

    pub fn with_rule(mut self, rule: AssignmentRule) -> Self {
        self.rule = rule;
        self
    }

    /// Enables veto thresholds: `a` cannot outrank `b` when `b` beats it on
    /// some criterion by at least that criterion's veto threshold.
    pub fn with_veto(mut self, veto: bool) -> Self {
        self.veto = veto;
        self
    }

    pub fn set_rule(&mut self, rule: AssignmentRule) {
        self.rule = rule;
    }

    /// Replaces the criterion weights. They need not sum to 1: `lambda` is
    /// compared against the raw weighted concordance.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<()> {
        if weights.len() != self.criteria.len() {
            return Err(SmaaError::InvalidParameter(format!(
                "expected {} weights, got {}",
                self.criteria.len(),
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !(**w >= 0.0 && w.is_finite())) {
            return Err(SmaaError::InvalidParameter(format!(
                "weights must be finite and non-negative, got {w}"
            )));
        }
        self.weights = weights.to_vec();
        Ok(())
    }

    pub fn set_lambda(&mut self, lambda: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&lambda) {
            return Err(SmaaError::InvalidParameter(format!(
                "cutting level must lie within [0, 1], got {lambda}"
            )));
        }
        self.lambda = lambda;
        Ok(())
    }

    pub fn rule(&self) -> AssignmentRule {
        self.rule
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn categories(&self) -> &[AlternativeId] {
        &self.categories
    }

    pub fn criteria(&self) -> impl Iterator<Item = CriterionId> + '_ {
        self.criteria.iter().map(|c| c.id)
    }

    pub fn criterion_count(&self) -> usize {
        self.criteria.len()
    }

    /// Whether `a` outranks `b` under the configured weights and lambda.
    /// Both rows are in criterion order.
    pub fn outranks(&self, a: &[f64], b: &[f64]) -> bool {
        self.outranks_with(a, b, &self.weights, self.lambda)
    }

    /// Whether `a` outranks `b` and `b` does not outrank `a`.
    pub fn preferred(&self, a: &[f64], b: &[f64]) -> bool {
        self.preferred_with(a, b, &self.weights, self.lambda)
    }

    /// Assigns one performance row (criterion order) to a category index,
    /// 0 being the worst category.
    pub fn assign(&self, performance: &[f64]) -> Result<usize> {
        self.assign_with(performance, &self.weights, self.lambda)
    }

    /// Assignment with per-call weights and cutting level.
    ///
    /// Used by stochastic sorting, which redraws both on every trial. Rows
    /// and weights are in criterion order.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when `performance` or `weights` does not have one
    /// entry per criterion.
    pub fn assign_with(&self, performance: &[f64], weights: &[f64], lambda: f64) -> Result<usize> {
        let expected = self.criteria.len();
        if performance.len() != expected {
            return Err(SmaaError::InvalidParameter(format!(
                "expected {expected} criterion values, got {}",
                performance.len()
            )));
        }
        if weights.len() != expected {
            return Err(SmaaError::InvalidParameter(format!(
                "expected {expected} criterion weights, got {}",
                weights.len()
            )));
        }
        Ok(self.assign_unchecked(performance, weights, lambda))
    }

    fn assign_unchecked(&self, performance: &[f64], weights: &[f64], lambda: f64) -> usize {
        let top = self.categories.len() - 1;
        match self.rule {
            AssignmentRule::Pessimistic => self
                .profiles
                .iter()
                .position(|profile| !self.outranks_with(performance, profile, weights, lambda))
                .unwrap_or(top),
            AssignmentRule::Optimistic => self
                .profiles
                .iter()
                .enumerate()
                .rev()
                .find(|(_, profile)| !self.preferred_with(profile, performance, weights, lambda))
                .map(|(i, _)| i + 1)
                .unwrap_or(0),
        }
    }

    /// Assigns every alternative to a category.
    ///
    /// # Errors
    ///
    /// `NullMeasurement` when an alternative lacks a value for some criterion.
    pub fn classify(
        &self,
        alternatives: &[Alternative],
        measurements: &HashMap<AlternativeId, Performance>,
    ) -> Result<HashMap<AlternativeId, AlternativeId>> {
        let mut assignments = HashMap::with_capacity(alternatives.len());
        let mut row = vec![0.0; self.criteria.len()];
        for alternative in alternatives {
            let values = measurements.get(&alternative.id());
            for (slot, col) in row.iter_mut().zip(&self.criteria) {
                *slot = values.and_then(|v| v.get(&col.id)).copied().ok_or(
                    SmaaError::NullMeasurement {
                        criterion: col.id,
                        alternative: alternative.id(),
                    },
                )?;
            }
            let category = self.categories[self.assign_unchecked(&row, &self.weights, self.lambda)];
            assignments.insert(alternative.id(), category);
        }
        debug!(
            event = "electre_tri_classified",
            alternatives = alternatives.len(),
            categories = self.categories.len(),
            rule = ?self.rule,
        );
        Ok(assignments)
    }

    /// Classifies the matrix's alternatives using expected measurement values.
    pub fn classify_matrix(
        &self,
        matrix: &ImpactMatrix,
    ) -> Result<HashMap<AlternativeId, AlternativeId>> {
        let mut measurements = HashMap::with_capacity(matrix.alternatives().len());
        for alternative in matrix.alternatives() {
            let mut values = Performance::with_capacity(self.criteria.len());
            for col in &self.criteria {
                let m = matrix.measurement(col.id, alternative.id())?;
                values.insert(col.id, m.expected_value());
            }
            measurements.insert(alternative.id(), values);
        }
        self.classify(matrix.alternatives(), &measurements)
    }

    fn outranks_with(&self, a: &[f64], b: &[f64], weights: &[f64], lambda: f64) -> bool {
        let mut credibility = 0.0;
        for (((col, &x), &y), &w) in self.criteria.iter().zip(a).zip(b).zip(weights) {
            if self.veto && vetoes(col.direction, &col.thresholds, x, y) {
                return false;
            }
            credibility += w * concordance(col.direction, &col.thresholds, x, y);
        }
        credibility >= lambda
    }

    fn preferred_with(&self, a: &[f64], b: &[f64], weights: &[f64], lambda: f64) -> bool {
        self.outranks_with(a, b, weights, lambda) && !self.outranks_with(b, a, weights, lambda)
    }
}

/// One-shot ELECTRE TRI classification.
///
/// Validates the inputs, then maps every alternative to the id of its
/// category descriptor.
#[allow(clippy::too_many_arguments)]
pub fn classify(
    alternatives: &[Alternative],
    criteria: &[Criterion],
    categories: &[Alternative],
    measurements: &HashMap<AlternativeId, Performance>,
    boundaries: &HashMap<AlternativeId, Performance>,
    weights: &[f64],
    lambda: f64,
    optimistic: bool,
) -> Result<HashMap<AlternativeId, AlternativeId>> {
    let rule = if optimistic {
        AssignmentRule::Optimistic
    } else {
        AssignmentRule::Pessimistic
    };
    ElectreTri::new(criteria, categories, boundaries, weights, lambda)?
        .with_rule(rule)
        .classify(alternatives, measurements)
}
