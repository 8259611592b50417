//! Weight generation policies.
//!
//! A [`WeightPolicy`] describes the decision maker's preference information;
//! [`WeightPolicy::sampler`] validates it against a criterion list and yields
//! a [`WeightSampler`] that draws weight vectors (non-negative, summing to 1)
//! in criterion order.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use smallvec::{smallvec, SmallVec};
use smaa_core::{Criterion, CriterionId, Interval, Result, SmaaError};

/// Rejected draws after which interval-constrained sampling gives up and
/// returns a fixed feasible vector.
pub const MAX_REJECTIONS: u32 = 100_000;

const SUM_TOLERANCE: f64 = 1e-9;

/// Preference information over criterion weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WeightPolicy {
    /// No information: uniform over the simplex.
    #[default]
    Uniform,

    /// A fixed weight vector in criterion order.
    Exact(Vec<f64>),

    /// Criteria from most to least important; every criterion listed once.
    Ordinal(Vec<CriterionId>),

    /// Per-criterion bounds within `[0, 1]`; unlisted criteria are unbounded.
    Intervals(HashMap<CriterionId, Interval>),
}

impl WeightPolicy {
    /// Validates the policy against `criteria` and builds a sampler.
    ///
    /// # Errors
    ///
    /// - `UnknownCriterion` for an id not in `criteria`
    /// - `InvalidParameter` for exact weights of the wrong length, negative
    ///   or not summing to 1, for an ordinal ranking that repeats or omits a
    ///   criterion, and for bounds outside `[0, 1]` or with no feasible
    ///   weight vector
    pub fn sampler(&self, criteria: &[Criterion]) -> Result<WeightSampler> {
        let len = criteria.len();
        let index_of = |id: CriterionId| {
            criteria
                .iter()
                .position(|c| c.id() == id)
                .ok_or(SmaaError::UnknownCriterion(id))
        };

        let kind = match self {
            WeightPolicy::Uniform => SamplerKind::Uniform,
            WeightPolicy::Exact(weights) => {
                if weights.len() != len {
                    return Err(SmaaError::InvalidParameter(format!(
                        "expected {len} weights, got {}",
                        weights.len()
                    )));
                }
                if weights.iter().any(|w| !(*w >= 0.0 && w.is_finite())) {
                    return Err(SmaaError::InvalidParameter(
                        "weights must be finite and non-negative".into(),
                    ));
                }
                let sum: f64 = weights.iter().sum();
                if len > 0 && (sum - 1.0).abs() > SUM_TOLERANCE {
                    return Err(SmaaError::InvalidParameter(format!(
                        "weights must sum to 1, got {sum}"
                    )));
                }
                SamplerKind::Exact(weights.clone())
            }
            WeightPolicy::Ordinal(order) => {
                let mut seen = HashSet::with_capacity(order.len());
                let mut indices = Vec::with_capacity(order.len());
                for id in order {
                    if !seen.insert(*id) {
                        return Err(SmaaError::InvalidParameter(format!(
                            "criterion {id} ranked twice"
                        )));
                    }
                    indices.push(index_of(*id)?);
                }
                if indices.len() != len {
                    return Err(SmaaError::InvalidParameter(format!(
                        "ordinal ranking covers {} of {len} criteria",
                        indices.len()
                    )));
                }
                SamplerKind::Ordinal(indices)
            }
            WeightPolicy::Intervals(bounds) => {
                let mut resolved = vec![Interval::default(); len];
                for (id, bound) in bounds {
                    if bound.lo() < 0.0 || bound.hi() > 1.0 {
                        return Err(SmaaError::InvalidParameter(format!(
                            "weight bound {bound} of criterion {id} leaves [0, 1]"
                        )));
                    }
                    resolved[index_of(*id)?] = *bound;
                }
                IntervalSampler::new(resolved).map(SamplerKind::Intervals)?
            }
        };
        Ok(WeightSampler { kind, len })
    }
}

/// How a weight vector was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightDraw {
    Sampled,
    /// Rejection sampling hit [`MAX_REJECTIONS`]; the fixed feasible vector
    /// was returned instead.
    Fallback,
}

/// Draws weight vectors for a validated policy.
#[derive(Debug, Clone)]
pub struct WeightSampler {
    kind: SamplerKind,
    len: usize,
}

#[derive(Debug, Clone)]
enum SamplerKind {
    Uniform,
    Exact(Vec<f64>),
    Ordinal(Vec<usize>),
    Intervals(IntervalSampler),
}

impl WeightSampler {
    pub fn criterion_count(&self) -> usize {
        self.len
    }

    /// Writes one weight vector to `out` (length = criterion count).
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) -> WeightDraw {
        debug_assert_eq!(out.len(), self.len);
        match &self.kind {
            SamplerKind::Uniform => {
                uniform_simplex(rng, out);
                WeightDraw::Sampled
            }
            SamplerKind::Exact(weights) => {
                out.copy_from_slice(weights);
                WeightDraw::Sampled
            }
            SamplerKind::Ordinal(order) => {
                let mut draw: SmallVec<[f64; 16]> = smallvec![0.0; order.len()];
                uniform_simplex(rng, &mut draw);
                draw.sort_by(|a, b| b.total_cmp(a));
                for (&criterion, &w) in order.iter().zip(&draw) {
                    out[criterion] = w;
                }
                WeightDraw::Sampled
            }
            SamplerKind::Intervals(sampler) => sampler.sample(rng, out),
        }
    }
}

#[derive(Debug, Clone)]
struct IntervalSampler {
    bounds: Vec<Interval>,
    free: Vec<usize>,
    free_mass: f64,
    fallback: Vec<f64>,
}

impl IntervalSampler {
    fn new(bounds: Vec<Interval>) -> Result<Self> {
        let lo_sum: f64 = bounds.iter().map(Interval::lo).sum();
        let hi_sum: f64 = bounds.iter().map(Interval::hi).sum();
        if !bounds.is_empty() && (lo_sum > 1.0 + SUM_TOLERANCE || hi_sum < 1.0 - SUM_TOLERANCE) {
            return Err(SmaaError::InvalidParameter(format!(
                "weight bounds are infeasible: lower bounds sum to {lo_sum}, upper bounds to {hi_sum}"
            )));
        }

        let spread = hi_sum - lo_sum;
        let t = if spread > 0.0 { (1.0 - lo_sum) / spread } else { 0.0 };
        let fallback = bounds.iter().map(|b| b.lo() + t * b.width()).collect();

        let free: Vec<usize> = (0..bounds.len()).filter(|&i| bounds[i].width() > 0.0).collect();
        let fixed_mass: f64 = bounds
            .iter()
            .filter(|b| b.width() <= 0.0)
            .map(Interval::lo)
            .sum();

        Ok(Self {
            bounds,
            free,
            free_mass: (1.0 - fixed_mass).max(0.0),
            fallback,
        })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) -> WeightDraw {
        for (slot, bound) in out.iter_mut().zip(&self.bounds) {
            *slot = bound.lo();
        }
        let mut draw: SmallVec<[f64; 16]> = smallvec![0.0; self.free.len()];
        for _ in 0..MAX_REJECTIONS {
            uniform_simplex(rng, &mut draw);
            let feasible = self
                .free
                .iter()
                .zip(&draw)
                .all(|(&i, &w)| self.bounds[i].contains(w * self.free_mass));
            if feasible {
                for (&i, &w) in self.free.iter().zip(&draw) {
                    out[i] = w * self.free_mass;
                }
                return WeightDraw::Sampled;
            }
        }
        out.copy_from_slice(&self.fallback);
        WeightDraw::Fallback
    }
}

/// Fills `out` with a point drawn uniformly from the probability simplex.
///
/// Sorts `len - 1` uniform draws and takes the gaps between consecutive
/// points of `0, u(1), ..., u(len-1), 1`.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use smaa_simulation::weights::uniform_simplex;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let mut w = [0.0; 4];
/// uniform_simplex(&mut rng, &mut w);
/// assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// assert!(w.iter().all(|x| *x >= 0.0));
/// ```
pub fn uniform_simplex<R: Rng + ?Sized>(rng: &mut R, out: &mut [f64]) {
    let Some((last, cuts)) = out.split_last_mut() else {
        return;
    };
    for cut in cuts.iter_mut() {
        *cut = rng.random::<f64>();
    }
    cuts.sort_by(f64::total_cmp);
    *last = 1.0;

    let mut previous = 0.0;
    for w in out.iter_mut() {
        let point = *w;
        *w = point - previous;
        previous = point;
    }
}
