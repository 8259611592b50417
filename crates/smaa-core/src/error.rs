//! Error types for the SMAA engine

use thiserror::Error;

use crate::model::{AlternativeId, CriterionId};

/// Main error type for SMAA model and sorting operations.
///
/// Every variant is a local validation failure raised synchronously by the
/// call that violates its contract. Simulation loops never produce these
/// once their inputs have been validated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmaaError {
    /// A value was constructed with out-of-domain parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The criterion is not a member of the matrix or model
    #[error("Unknown criterion: {0}")]
    UnknownCriterion(CriterionId),

    /// The alternative is not a member of the matrix or model
    #[error("Unknown alternative: {0}")]
    UnknownAlternative(AlternativeId),

    /// A required measurement is missing
    #[error("Missing measurement for alternative {alternative} on criterion {criterion}")]
    NullMeasurement {
        criterion: CriterionId,
        alternative: AlternativeId,
    },

    /// Category descriptors and boundary profiles do not line up
    #[error("Malformed category profile: {0}")]
    MalformedCategoryProfile(String),
}

impl SmaaError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SmaaError::InvalidParameter(msg.into())
    }
}

/// Result type alias for SMAA operations
pub type Result<T> = std::result::Result<T, SmaaError>;
