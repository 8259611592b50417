//! Criteria: the columns of the decision matrix.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, SmaaError};
use crate::model::Interval;

static NEXT_CRITERION_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identifier of a [`Criterion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriterionId(u64);

impl CriterionId {
    fn next() -> Self {
        Self(NEXT_CRITERION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crit#{}", self.0)
    }
}

/// Preference direction of a criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// More is better.
    #[default]
    Ascending,
    /// Less is better.
    Descending,
}

impl Direction {
    pub fn is_ascending(self) -> bool {
        matches!(self, Direction::Ascending)
    }
}

/// Indifference, preference and veto thresholds of an outranking criterion.
///
/// Always satisfies `0 <= q <= p <= v`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutrankingThresholds {
    indifference: f64,
    preference: f64,
    veto: f64,
}

impl OutrankingThresholds {
    /// Creates thresholds, validating `0 <= q <= p <= v`.
    ///
    /// # Example
    ///
    /// ```
    /// use smaa_core::OutrankingThresholds;
    ///
    /// assert!(OutrankingThresholds::new(1.0, 2.0, 5.0).is_ok());
    /// assert!(OutrankingThresholds::new(2.0, 1.0, 5.0).is_err());
    /// ```
    pub fn new(indifference: f64, preference: f64, veto: f64) -> Result<Self> {
        if !(indifference >= 0.0 && indifference <= preference && preference <= veto) {
            return Err(SmaaError::invalid(format!(
                "outranking thresholds must satisfy 0 <= q <= p <= v, got q={indifference} p={preference} v={veto}"
            )));
        }
        Ok(Self {
            indifference,
            preference,
            veto,
        })
    }

    /// Indifference threshold `q`.
    pub fn indifference(&self) -> f64 {
        self.indifference
    }

    /// Preference threshold `p`.
    pub fn preference(&self) -> f64 {
        self.preference
    }

    /// Veto threshold `v`.
    pub fn veto(&self) -> f64 {
        self.veto
    }
}

/// The kind-specific part of a criterion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CriterionKind {
    /// Cardinal scale criterion, scored by linear partial value functions.
    Scale,
    /// Cardinal criterion carrying thresholds for outranking procedures.
    Outranking(OutrankingThresholds),
}

/// A criterion of the decision problem.
///
/// All criteria are cardinal: the matrix keeps one measurement per
/// alternative for each of them and maintains their `scale`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Criterion {
    id: CriterionId,
    name: String,
    direction: Direction,
    kind: CriterionKind,
    scale: Interval,
}

impl Criterion {
    /// Creates an ascending scale criterion.
    pub fn scale(name: impl Into<String>) -> Self {
        Self::with_kind(name, Direction::Ascending, CriterionKind::Scale)
    }

    /// Creates an outranking criterion with the given thresholds.
    pub fn outranking(
        name: impl Into<String>,
        direction: Direction,
        thresholds: OutrankingThresholds,
    ) -> Self {
        Self::with_kind(name, direction, CriterionKind::Outranking(thresholds))
    }

    pub fn with_kind(name: impl Into<String>, direction: Direction, kind: CriterionKind) -> Self {
        Self {
            id: CriterionId::next(),
            name: name.into(),
            direction,
            kind,
            scale: Interval::ZERO,
        }
    }

    /// Builder-style direction override.
    pub fn descending(mut self) -> Self {
        self.direction = Direction::Descending;
        self
    }

    pub fn id(&self) -> CriterionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn kind(&self) -> &CriterionKind {
        &self.kind
    }

    /// Returns the outranking thresholds, if this is an outranking criterion.
    pub fn thresholds(&self) -> Option<&OutrankingThresholds> {
        match &self.kind {
            CriterionKind::Outranking(t) => Some(t),
            CriterionKind::Scale => None,
        }
    }

    /// The enclosing interval of all current measurement ranges.
    ///
    /// Maintained by the owning impact matrix; `[0, 0]` when detached or empty.
    pub fn scale_interval(&self) -> Interval {
        self.scale
    }

    pub(crate) fn set_scale(&mut self, scale: Interval) {
        self.scale = scale;
    }
}

impl PartialEq for Criterion {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Criterion {}

impl std::hash::Hash for Criterion {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
