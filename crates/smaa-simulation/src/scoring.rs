//! Normalization and ranking.

use std::cmp::Ordering;

use smaa_core::{Direction, Interval};

/// Normalized value substituted on criteria whose scale has zero or
/// unrepresentable width.
pub const DEGENERATE_VALUE: f64 = 0.5;

/// Maps `value` onto `[0, 1]` against `scale`, 1 being best.
///
/// Values outside the scale are not clamped.
///
/// # Example
///
/// ```
/// use smaa_core::{Direction, Interval};
/// use smaa_simulation::scoring::normalize;
///
/// let scale = Interval::new(10.0, 20.0).unwrap();
/// assert_eq!(normalize(12.5, scale, Direction::Ascending), 0.25);
/// assert_eq!(normalize(12.5, scale, Direction::Descending), 0.75);
/// assert_eq!(normalize(3.0, Interval::point(3.0), Direction::Ascending), 0.5);
/// ```
pub fn normalize(value: f64, scale: Interval, direction: Direction) -> f64 {
    let width = scale.width();
    if !width.is_finite() || width <= 0.0 {
        return DEGENERATE_VALUE;
    }
    match direction {
        Direction::Ascending => (value - scale.lo()) / width,
        Direction::Descending => (scale.hi() - value) / width,
    }
}

/// Ranks alternatives by descending utility.
///
/// Writes the 0-based rank of alternative `i` to `ranks[i]` and leaves the
/// alternatives in rank order in `order`. Equal utilities keep insertion
/// order, so tied alternatives take consecutive ranks with the earlier
/// alternative ranked higher.
///
/// # Example
///
/// ```
/// use smaa_simulation::scoring::rank_by_utility;
///
/// let mut order = Vec::new();
/// let mut ranks = [0; 3];
/// rank_by_utility(&[0.2, 0.7, 0.2], &mut order, &mut ranks);
/// assert_eq!(ranks, [1, 0, 2]);
/// assert_eq!(order, [1, 0, 2]);
/// ```
pub fn rank_by_utility(utilities: &[f64], order: &mut Vec<usize>, ranks: &mut [usize]) {
    debug_assert!(
        utilities.iter().all(|u| u.is_finite()),
        "utilities must be finite: {utilities:?}"
    );
    order.clear();
    order.extend(0..utilities.len());
    order.sort_by(|&a, &b| {
        utilities[b]
            .partial_cmp(&utilities[a])
            .unwrap_or(Ordering::Equal)
    });
    for (rank, &alternative) in order.iter().enumerate() {
        ranks[alternative] = rank;
    }
}
