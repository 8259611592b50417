//! Background simulation runs.
//!
//! A [`SimulationHandle`] moves a [`Simulator`](crate::Simulator) onto a
//! dedicated thread and streams partial results back over a channel, so an
//! interactive caller can show progress and cancel without blocking.

mod handle;

pub use handle::{SimulationHandle, SimulationUpdate};
