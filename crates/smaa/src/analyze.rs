//! Analysis entry point that hides the simulator wiring.

use std::ops::ControlFlow;

use smaa_config::SimulationConfig;
use smaa_core::{ImpactMatrix, Result};
use smaa_simulation::{run_simulation_with_config, SimulationResults, WeightPolicy};
use tracing::debug;

/// Configuration file picked up by [`analyze`] from the working directory.
pub const CONFIG_FILE: &str = "smaa.toml";

/// Runs a SMAA-2 analysis configured from [`CONFIG_FILE`], falling back to
/// defaults when the file is missing or invalid.
pub fn analyze(matrix: &ImpactMatrix, policy: WeightPolicy) -> Result<SimulationResults> {
    let config = match SimulationConfig::load(CONFIG_FILE) {
        Ok(config) => config,
        Err(error) => {
            debug!(file = CONFIG_FILE, %error, "using default simulation config");
            SimulationConfig::default()
        }
    };
    analyze_with_config(matrix, policy, &config)
}

/// Runs a SMAA-2 analysis with an explicit configuration.
pub fn analyze_with_config(
    matrix: &ImpactMatrix,
    policy: WeightPolicy,
    config: &SimulationConfig,
) -> Result<SimulationResults> {
    #[cfg(feature = "console")]
    smaa_console::init();

    run_simulation_with_config(matrix, policy, config, |_, _| ControlFlow::Continue(()))
}
