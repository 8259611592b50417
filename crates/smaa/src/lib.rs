//! SMAA - Stochastic Multicriteria Acceptability Analysis in Rust
//!
//! Build an impact matrix of uncertain measurements, pick a weight policy
//! and call [`analyze`].
//!
//! # Example
//!
//! ```rust
//! use smaa::prelude::*;
//!
//! let cheap = Alternative::new("cheap");
//! let fast = Alternative::new("fast");
//! let price = Criterion::scale("price").descending();
//! let speed = Criterion::scale("speed");
//! let (a, b, p, s) = (cheap.id(), fast.id(), price.id(), speed.id());
//!
//! let mut matrix = ImpactMatrix::with_entities(vec![cheap, fast], vec![price, speed])?;
//! matrix.set_measurement(p, a, Measurement::exact(10.0)?)?;
//! matrix.set_measurement(p, b, Measurement::interval(18.0, 22.0)?)?;
//! matrix.set_measurement(s, a, Measurement::gaussian(100.0, 5.0)?)?;
//! matrix.set_measurement(s, b, Measurement::gaussian(160.0, 10.0)?)?;
//!
//! let config = SimulationConfig::new().with_iterations(2_000).with_random_seed(1);
//! let results = analyze_with_config(&matrix, WeightPolicy::Uniform, &config)?;
//! assert_eq!(results.iteration_count(), 2_000);
//! # Ok::<(), SmaaError>(())
//! ```

// Decision model
pub use smaa_core::{
    Alternative, AlternativeId, Criterion, CriterionId, CriterionKind, Direction, ImpactMatrix,
    Interval, MatrixEvent, MatrixListener, Measurement, OutrankingThresholds, Result, SmaaError,
};

// Configuration
pub use smaa_config::{
    AssignmentRuleConfig, ConfidenceMode, ConfigError, ElectreConfig, SimulationConfig,
    ThreadCount,
};

// Sorting
pub use smaa_electre::{classify, AssignmentRule, ElectreTri, Performance};

// Simulation
pub use smaa_simulation::{
    run_simulation, run_simulation_with_config, CancelFlag, CategoryResults, CountingListener,
    LoggingListener, SimulationHandle, SimulationListener, SimulationResults, SimulationStatus,
    SimulationUpdate, Simulator, SmaaTriSimulation, WeightPolicy,
};

pub use smaa_simulation::{event, realtime, scoring, tri, weights};

#[cfg(feature = "console")]
pub use smaa_console as console;

mod analyze;
pub use analyze::{analyze, analyze_with_config, CONFIG_FILE};

pub mod prelude {
    pub use super::{analyze, analyze_with_config};
    pub use super::{
        Alternative, Criterion, Direction, ImpactMatrix, Interval, Measurement,
        OutrankingThresholds, SmaaError,
    };
    pub use super::{AssignmentRule, ElectreTri};
    pub use super::{
        CancelFlag, SimulationConfig, SimulationResults, Simulator, SmaaTriSimulation,
        WeightPolicy,
    };
}
