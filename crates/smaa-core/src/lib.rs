//! SMAA Core - Decision model types for stochastic multicriteria analysis
//!
//! This crate provides the fundamental abstractions shared by the engine:
//! - Alternatives and criteria with stable ids
//! - Uncertain measurements (exact, interval, Gaussian, log-normal)
//! - The impact matrix with scale tracking and change notification
//! - The error taxonomy for local validation failures

pub mod error;
pub mod matrix;
pub mod model;

pub use error::{Result, SmaaError};
pub use matrix::ImpactMatrix;
pub use model::{
    Alternative, AlternativeId, Criterion, CriterionId, CriterionKind, Direction, Interval,
    MatrixEvent, MatrixListener, Measurement, OutrankingThresholds,
};
