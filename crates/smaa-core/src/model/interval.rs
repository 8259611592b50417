//! Closed real intervals.

use std::fmt;

use crate::error::{Result, SmaaError};

/// A closed interval `[lo, hi]` with `lo <= hi`.
///
/// # Example
///
/// ```
/// use smaa_core::Interval;
///
/// let a = Interval::new(0.0, 2.0).unwrap();
/// let b = Interval::new(-1.0, 1.0).unwrap();
/// let scale = Interval::enclosing([a, b]).unwrap();
/// assert_eq!(scale, Interval::new(-1.0, 2.0).unwrap());
/// assert!(Interval::new(3.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    /// The degenerate interval `[0, 0]`.
    pub const ZERO: Interval = Interval { lo: 0.0, hi: 0.0 };

    /// Creates an interval, failing when `lo > hi` or either bound is not finite.
    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(SmaaError::invalid(format!(
                "interval bounds must be finite, got [{lo}, {hi}]"
            )));
        }
        if lo > hi {
            return Err(SmaaError::invalid(format!(
                "interval lower bound {lo} exceeds upper bound {hi}"
            )));
        }
        Ok(Self { lo, hi })
    }

    // Bounds already validated by the caller.
    pub(crate) fn ordered(lo: f64, hi: f64) -> Self {
        debug_assert!(lo <= hi);
        Self { lo, hi }
    }

    /// Creates the degenerate interval `[value, value]`.
    pub fn point(value: f64) -> Self {
        Self {
            lo: value,
            hi: value,
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn midpoint(&self) -> f64 {
        self.lo + self.width() / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }

    /// Returns the smallest interval enclosing all given intervals,
    /// or `None` for an empty input.
    pub fn enclosing<I>(intervals: I) -> Option<Interval>
    where
        I: IntoIterator<Item = Interval>,
    {
        intervals.into_iter().reduce(|acc, i| Interval {
            lo: acc.lo.min(i.lo),
            hi: acc.hi.max(i.hi),
        })
    }
}

impl Default for Interval {
    /// The unit interval `[0, 1]`, used for freshly introduced matrix cells.
    fn default() -> Self {
        Self { lo: 0.0, hi: 1.0 }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}
