//! Change notification for impact matrices.
//!
//! Listeners are invoked synchronously, in registration order, after a
//! mutation has completed and all scales have been recomputed. Each mutating
//! call emits at most one notification, however many cells it touched.

use std::fmt::Debug;

/// Kind of change reported to a [`MatrixListener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixEvent {
    /// Alternatives or criteria were added, removed or reordered.
    StructureChanged,
    /// Measurement values or entity names changed.
    ValueChanged,
}

/// Receives impact-matrix change notifications.
///
/// Both methods default to no-ops so implementors only override what they
/// consume.
pub trait MatrixListener: Send + Sync + Debug {
    /// Called after alternatives or criteria were added, removed or reordered.
    fn on_structure_changed(&self) {}

    /// Called after one or more measurements (or names) changed.
    fn on_value_changed(&self) {}
}
