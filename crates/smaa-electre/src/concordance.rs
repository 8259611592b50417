//! Per-criterion outranking functions.

use smaa_core::{Direction, OutrankingThresholds};

/// Advantage of `b` over `a` on a criterion, in the criterion's preference
/// direction. Positive when `b` is better.
fn advantage(direction: Direction, a: f64, b: f64) -> f64 {
    match direction {
        Direction::Ascending => b - a,
        Direction::Descending => a - b,
    }
}

/// Degree to which `a` is at least as good as `b` on one criterion.
///
/// 1 while `b`'s advantage stays within the indifference threshold `q`,
/// 0 once it reaches the preference threshold `p`, linear in between.
///
/// # Example
///
/// ```
/// use smaa_core::{Direction, OutrankingThresholds};
/// use smaa_electre::concordance;
///
/// let t = OutrankingThresholds::new(1.0, 3.0, 6.0).unwrap();
/// assert_eq!(concordance(Direction::Ascending, &t, 10.0, 10.5), 1.0);
/// assert_eq!(concordance(Direction::Ascending, &t, 10.0, 12.0), 0.5);
/// assert_eq!(concordance(Direction::Ascending, &t, 10.0, 14.0), 0.0);
/// ```
pub fn concordance(direction: Direction, thresholds: &OutrankingThresholds, a: f64, b: f64) -> f64 {
    let diff = advantage(direction, a, b);
    let q = thresholds.indifference();
    let p = thresholds.preference();
    if diff <= q {
        1.0
    } else if diff >= p {
        0.0
    } else {
        (p - diff) / (p - q)
    }
}

/// Whether `b`'s advantage over `a` reaches the veto threshold.
///
/// Equal values never veto, even with a zero threshold.
pub fn vetoes(direction: Direction, thresholds: &OutrankingThresholds, a: f64, b: f64) -> bool {
    let diff = advantage(direction, a, b);
    diff > 0.0 && diff >= thresholds.veto()
}
