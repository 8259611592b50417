//! Decision model types.
//!
//! - [`Alternative`] / [`Criterion`]: matrix rows and columns with stable ids
//! - [`Measurement`]: exact, interval, Gaussian or log-normal criterion values
//! - [`Interval`]: closed ranges used for measurement ranges and criterion scales
//! - [`MatrixListener`]: change notification for the impact matrix

mod alternative;
mod criterion;
mod interval;
mod listener;
mod measurement;

pub use alternative::{Alternative, AlternativeId};
pub use criterion::{Criterion, CriterionId, CriterionKind, Direction, OutrankingThresholds};
pub use interval::Interval;
pub use listener::{MatrixEvent, MatrixListener};
pub use measurement::{Measurement, CONFIDENCE_Z};
