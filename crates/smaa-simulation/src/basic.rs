//! One-call SMAA-2 analysis.
//!
//! This module provides `run_simulation` for callers that only need results:
//! it validates the inputs, snapshots the matrix and runs every iteration on
//! the default shard count, reporting progress between chunks.
//!
//! Logging levels:
//! - **INFO**: Simulation start/end, problem scale
//! - **DEBUG**: Chunk boundaries

use std::ops::ControlFlow;

use smaa_config::SimulationConfig;
use smaa_core::{ImpactMatrix, Result};

use crate::results::SimulationResults;
use crate::simulator::Simulator;
use crate::weights::WeightPolicy;

/// Runs `iterations` SMAA-2 trials over `matrix`.
///
/// `progress` receives the number of completed trials and the partial
/// results after every chunk; returning `ControlFlow::Break` cancels the
/// run, which then yields the statistics gathered so far.
///
/// # Errors
///
/// Fails before any trial runs when the weight policy is invalid or names
/// an unknown criterion, or when `iterations` is zero.
///
/// # Example
///
/// ```
/// use std::ops::ControlFlow;
///
/// use smaa_simulation::{run_simulation, WeightPolicy};
/// use smaa_test::car_selection_matrix;
///
/// let matrix = car_selection_matrix();
/// let mut reports = 0;
/// let results = run_simulation(&matrix, 5_000, WeightPolicy::Uniform, |_, _| {
///     reports += 1;
///     ControlFlow::Continue(())
/// })
/// .unwrap();
///
/// assert_eq!(results.iteration_count(), 5_000);
/// assert_eq!(reports, 5);
/// ```
pub fn run_simulation<F>(
    matrix: &ImpactMatrix,
    iterations: u64,
    policy: WeightPolicy,
    progress: F,
) -> Result<SimulationResults>
where
    F: FnMut(u64, &SimulationResults) -> ControlFlow<()>,
{
    let config = SimulationConfig::default().with_iterations(iterations);
    run_simulation_with_config(matrix, policy, &config, progress)
}

/// Like [`run_simulation`], with every run parameter taken from `config`.
pub fn run_simulation_with_config<F>(
    matrix: &ImpactMatrix,
    policy: WeightPolicy,
    config: &SimulationConfig,
    progress: F,
) -> Result<SimulationResults>
where
    F: FnMut(u64, &SimulationResults) -> ControlFlow<()>,
{
    let simulator = Simulator::from_config(matrix, policy, config)?;
    Ok(simulator.run_with_progress(progress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smaa_core::SmaaError;
    use smaa_test::two_alternatives_three_criteria;

    #[test]
    fn test_zero_iterations_rejected() {
        let matrix = two_alternatives_three_criteria();
        let result = run_simulation(&matrix, 0, WeightPolicy::Uniform, |_, _| {
            ControlFlow::Continue(())
        });
        assert!(matches!(result, Err(SmaaError::InvalidParameter(_))));
    }

    #[test]
    fn test_break_cancels() {
        let matrix = two_alternatives_three_criteria();
        let config = SimulationConfig::new()
            .with_iterations(3_000)
            .with_chunk_size(1_000)
            .with_random_seed(9);
        let results = run_simulation_with_config(&matrix, WeightPolicy::Uniform, &config, |_, _| {
            ControlFlow::Break(())
        })
        .unwrap();
        assert!(results.is_cancelled());
        assert_eq!(results.iteration_count(), 1_000);
    }
}
