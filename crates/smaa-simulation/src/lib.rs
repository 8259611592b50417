//! SMAA Simulation Engine
//!
//! This crate provides the Monte Carlo side of the engine:
//! - Weight policies (uniform, exact, ordinal, interval-constrained)
//! - Scoring and ranking of sampled measurements
//! - The SMAA-2 `Simulator` with chunked, sharded, cancellable runs
//! - Results aggregates with rank acceptability, central weights and
//!   confidence factors
//! - Event listeners for monitoring
//! - Background runs streaming partial results (realtime module)
//! - Stochastic ELECTRE TRI sorting (tri module)

pub mod basic;
pub mod cancel;
pub mod event;
pub mod model;
pub mod realtime;
pub mod results;
pub mod scoring;
mod shard;
pub mod simulator;
pub mod tri;
pub mod weights;

pub use basic::{run_simulation, run_simulation_with_config};
pub use cancel::CancelFlag;
pub use event::{CountingListener, LoggingListener, SimulationEventSupport, SimulationListener};
pub use model::SimulationModel;
pub use realtime::{SimulationHandle, SimulationUpdate};
pub use results::{SimulationResults, SimulationStatus};
pub use simulator::Simulator;
pub use smaa_config::ConfidenceMode;
pub use tri::{CategoryResults, SmaaTriSimulation};
pub use weights::{WeightDraw, WeightPolicy, WeightSampler, MAX_REJECTIONS};
