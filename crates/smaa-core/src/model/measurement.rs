//! Possibly uncertain criterion values.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{Result, SmaaError};
use crate::model::Interval;

/// Quantile of the standard normal distribution used for the display range
/// of Gaussian and log-normal measurements (95% two-sided).
pub const CONFIDENCE_Z: f64 = 1.96;

/// One criterion value for one alternative.
///
/// Variants can only be built through the validating constructors, so every
/// instance holds in-domain parameters. Sampling and range computation are
/// pure functions of the parameters and the supplied random source.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use smaa_core::Measurement;
///
/// let m = Measurement::interval(2.0, 4.0).unwrap();
/// let mut rng = StdRng::seed_from_u64(7);
/// let x = m.sample(&mut rng);
/// assert!((2.0..=4.0).contains(&x));
/// assert_eq!(m.expected_value(), 3.0);
/// assert!(Measurement::gaussian(0.0, -1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Measurement {
    #[non_exhaustive]
    Exact { value: f64 },
    #[non_exhaustive]
    Interval { low: f64, high: f64 },
    #[non_exhaustive]
    Gaussian { mean: f64, stdev: f64 },
    #[non_exhaustive]
    LogNormal { mu: f64, sigma: f64 },
}

fn finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SmaaError::invalid(format!("{name} must be finite, got {value}")))
    }
}

// The derived range, its width and the expected value must stay finite.
fn representable(m: Measurement) -> Result<Measurement> {
    let range = m.range();
    if !range.lo().is_finite() || !range.hi().is_finite() || !range.width().is_finite() {
        return Err(SmaaError::invalid(format!(
            "{} range [{}, {}] is not representable",
            m.kind_name(),
            range.lo(),
            range.hi()
        )));
    }
    let expected = m.expected_value();
    if !expected.is_finite() {
        return Err(SmaaError::invalid(format!(
            "{} expected value {expected} is not representable",
            m.kind_name()
        )));
    }
    Ok(m)
}

impl Measurement {
    pub fn exact(value: f64) -> Result<Self> {
        Ok(Measurement::Exact {
            value: finite("exact value", value)?,
        })
    }

    pub fn interval(low: f64, high: f64) -> Result<Self> {
        let ival = Interval::new(low, high)?;
        representable(Measurement::Interval {
            low: ival.lo(),
            high: ival.hi(),
        })
    }

    pub fn gaussian(mean: f64, stdev: f64) -> Result<Self> {
        let mean = finite("gaussian mean", mean)?;
        let stdev = finite("gaussian stdev", stdev)?;
        if stdev < 0.0 {
            return Err(SmaaError::invalid(format!(
                "gaussian stdev must be non-negative, got {stdev}"
            )));
        }
        representable(Measurement::Gaussian { mean, stdev })
    }

    pub fn log_normal(mu: f64, sigma: f64) -> Result<Self> {
        let mu = finite("log-normal mu", mu)?;
        let sigma = finite("log-normal sigma", sigma)?;
        if sigma < 0.0 {
            return Err(SmaaError::invalid(format!(
                "log-normal sigma must be non-negative, got {sigma}"
            )));
        }
        representable(Measurement::LogNormal { mu, sigma })
    }

    /// Draws one realization of the value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Measurement::Exact { value } => value,
            Measurement::Interval { low, high } => {
                if low == high {
                    low
                } else {
                    let u = rng.random::<f64>();
                    (low * (1.0 - u) + high * u).clamp(low, high)
                }
            }
            Measurement::Gaussian { mean, stdev } => {
                let z: f64 = StandardNormal.sample(rng);
                mean + stdev * z
            }
            Measurement::LogNormal { mu, sigma } => {
                let z: f64 = StandardNormal.sample(rng);
                (mu + sigma * z).exp()
            }
        }
    }

    /// Deterministic enclosing range, used for criterion scales only.
    ///
    /// Gaussian and log-normal ranges are 95% envelopes; samples may fall
    /// outside them.
    pub fn range(&self) -> Interval {
        match *self {
            Measurement::Exact { value } => Interval::point(value),
            Measurement::Interval { low, high } => Interval::ordered(low, high),
            Measurement::Gaussian { mean, stdev } => {
                let half = CONFIDENCE_Z * stdev;
                Interval::ordered(mean - half, mean + half)
            }
            Measurement::LogNormal { mu, sigma } => {
                let half = CONFIDENCE_Z * sigma;
                Interval::ordered((mu - half).exp(), (mu + half).exp())
            }
        }
    }

    /// Mean of the value's distribution.
    pub fn expected_value(&self) -> f64 {
        match *self {
            Measurement::Exact { value } => value,
            Measurement::Interval { low, high } => low + (high - low) / 2.0,
            Measurement::Gaussian { mean, .. } => mean,
            Measurement::LogNormal { mu, sigma } => (mu + sigma * sigma / 2.0).exp(),
        }
    }

    /// Short name of the variant, for logging and display.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Measurement::Exact { .. } => "exact",
            Measurement::Interval { .. } => "interval",
            Measurement::Gaussian { .. } => "gaussian",
            Measurement::LogNormal { .. } => "log-normal",
        }
    }
}

impl Default for Measurement {
    /// `Interval(0, 1)`, the value given to newly introduced matrix cells.
    fn default() -> Self {
        Measurement::Interval {
            low: 0.0,
            high: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_exact_sample_and_range() {
        let m = Measurement::exact(3.5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(m.sample(&mut rng), 3.5);
        assert_eq!(m.range(), Interval::point(3.5));
    }

    #[test]
    fn test_interval_samples_stay_in_bounds() {
        let m = Measurement::interval(-1.0, 2.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..1000 {
            let x = m.sample(&mut rng);
            assert!((-1.0..=2.0).contains(&x));
        }
        assert_eq!(m.range(), Interval::new(-1.0, 2.0).unwrap());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(matches!(
            Measurement::interval(2.0, 1.0),
            Err(SmaaError::InvalidParameter(_))
        ));
        assert!(Measurement::gaussian(0.0, -0.1).is_err());
        assert!(Measurement::log_normal(0.0, -0.1).is_err());
        assert!(Measurement::exact(f64::NAN).is_err());
    }

    #[test]
    fn test_unrepresentable_ranges_rejected() {
        assert!(matches!(
            Measurement::interval(-1e308, 1e308),
            Err(SmaaError::InvalidParameter(_))
        ));
        assert!(matches!(
            Measurement::log_normal(710.0, 0.0),
            Err(SmaaError::InvalidParameter(_))
        ));
        assert!(Measurement::log_normal(700.0, 10.0).is_err());
        assert!(Measurement::gaussian(1e308, 1e308).is_err());
        assert!(Measurement::gaussian(f64::MAX, 0.0).is_ok());
        assert!(Measurement::log_normal(700.0, 0.0).is_ok());
    }

    #[test]
    fn test_wide_interval_samples_stay_finite() {
        let m = Measurement::interval(-1e308, 7e307).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..1000 {
            let x = m.sample(&mut rng);
            assert!(x.is_finite());
            assert!((-1e308..=7e307).contains(&x));
        }
    }

    #[test]
    fn test_gaussian_range_is_symmetric_envelope() {
        let m = Measurement::gaussian(10.0, 2.0).unwrap();
        let r = m.range();
        assert!((r.lo() - (10.0 - 3.92)).abs() < 1e-12);
        assert!((r.hi() - (10.0 + 3.92)).abs() < 1e-12);
    }

    #[test]
    fn test_log_normal_is_positive() {
        let m = Measurement::log_normal(0.0, 1.0).unwrap();
        assert!(m.range().lo() > 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(m.sample(&mut rng) > 0.0);
        }
    }

    #[test]
    fn test_sampling_is_pure_given_rng_state() {
        let m = Measurement::gaussian(0.0, 1.0).unwrap();
        let mut a = ChaCha8Rng::seed_from_u64(9);
        let mut b = ChaCha8Rng::seed_from_u64(9);
        let xs: Vec<f64> = (0..10).map(|_| m.sample(&mut a)).collect();
        let ys: Vec<f64> = (0..10).map(|_| m.sample(&mut b)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_gaussian_sample_mean() {
        let m = Measurement::gaussian(5.0, 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let n = 20_000;
        let mean = (0..n).map(|_| m.sample(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 5.0).abs() < 0.05);
    }

    #[test]
    fn test_expected_values() {
        assert_eq!(Measurement::gaussian(4.0, 1.0).unwrap().expected_value(), 4.0);
        let ln = Measurement::log_normal(0.0, 1.0).unwrap();
        assert!((ln.expected_value() - 0.5f64.exp()).abs() < 1e-12);
        assert_eq!(Measurement::default().expected_value(), 0.5);
    }
}
