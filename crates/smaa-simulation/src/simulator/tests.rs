//! Tests for the SMAA-2 simulator.

use std::sync::Arc;

use smaa_config::ThreadCount;
use smaa_core::Measurement;
use smaa_test::{car_selection_matrix, exact_matrix, two_alternatives_three_criteria};

use super::*;
use crate::event::CountingListener;

fn assert_rank_sums(results: &SimulationResults) {
    let n = results.alternatives().len();
    let iterations = results.iteration_count();
    for alt in results.alternatives() {
        let row: u64 = (0..n).map(|r| results.rank_hits(alt.id(), r).unwrap()).sum();
        assert_eq!(row, iterations, "row of {} does not sum to the iteration count", alt.name());
    }
    for rank in 0..n {
        let column: u64 = results
            .alternatives()
            .iter()
            .map(|a| results.rank_hits(a.id(), rank).unwrap())
            .sum();
        assert_eq!(column, iterations, "rank {rank} not filled once per iteration");
    }
}

#[test]
fn test_exact_weights_reproduce_single_trial_example() {
    let matrix = two_alternatives_three_criteria();
    let (a1, a2) = (matrix.alternatives()[0].id(), matrix.alternatives()[1].id());
    let results = Simulator::new(&matrix, WeightPolicy::Exact(vec![0.5, 0.5, 0.0]))
        .unwrap()
        .with_iterations(500)
        .with_chunk_size(64)
        .with_shards(3)
        .with_seed(1)
        .run();

    assert_eq!(results.status(), SimulationStatus::Completed);
    assert_eq!(results.rank_hits(a1, 1).unwrap(), 500);
    assert_eq!(results.rank_hits(a2, 0).unwrap(), 500);
    assert_eq!(results.central_weights(a2).unwrap(), Some(&[0.5, 0.5, 0.0][..]));
    assert_eq!(results.central_weights(a1).unwrap(), None);
    assert_eq!(results.confidence_factor(a2).unwrap(), Some(1.0));
    assert_eq!(results.confidence_factor(a1).unwrap(), None);
}

#[test]
fn test_rank_acceptability_rows_and_columns_sum() {
    let matrix = car_selection_matrix();
    let results = Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(2_000)
        .with_chunk_size(300)
        .with_shards(3)
        .with_seed(7)
        .run();

    assert_eq!(results.iteration_count(), 2_000);
    assert_rank_sums(&results);
}

#[test]
fn test_central_weights_are_probability_vectors() {
    let matrix = car_selection_matrix();
    let results = Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(3_000)
        .with_shards(4)
        .with_seed(99)
        .run();

    for alt in matrix.alternatives() {
        if let Some(weights) = results.central_weights(alt.id()).unwrap() {
            assert!(weights.iter().all(|w| *w >= 0.0));
            assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        } else {
            assert_eq!(results.rank_hits(alt.id(), 0).unwrap(), 0);
        }
    }
}

#[test]
fn test_seeded_runs_are_identical() {
    let matrix = car_selection_matrix();
    let simulator = Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(1_500)
        .with_chunk_size(100)
        .with_shards(4)
        .with_seed(2024)
        .with_confidence(ConfidenceMode::Sampled);

    let first = simulator.run();
    let second = simulator.run();
    assert_eq!(first, second);
    assert_eq!(first.seed(), Some(2024));
}

#[test]
fn test_unseeded_run_records_its_seed() {
    let matrix = car_selection_matrix();
    let simulator = Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(200)
        .with_shards(2);
    let results = simulator.run();
    let seed = results.seed().unwrap();

    let replay = simulator.with_seed(seed).run();
    assert_eq!(results, replay);
}

#[test]
fn test_progress_break_yields_valid_partial_results() {
    let matrix = car_selection_matrix();
    let mut reports = Vec::new();
    let results = Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(10_000)
        .with_chunk_size(250)
        .with_shards(2)
        .with_seed(3)
        .run_with_progress(|completed, partial| {
            assert_eq!(partial.iteration_count(), completed);
            assert_eq!(partial.status(), SimulationStatus::Running);
            reports.push(completed);
            if completed >= 500 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

    assert_eq!(reports, vec![250, 500]);
    assert!(results.is_cancelled());
    assert_eq!(results.iteration_count(), 500);
    assert_rank_sums(&results);
    // expected-value confidence is still available on a partial run
    let leader = matrix
        .alternatives()
        .iter()
        .find(|a| results.rank_hits(a.id(), 0).unwrap() > 0)
        .unwrap();
    assert!(results.confidence_factor(leader.id()).unwrap().is_some());
}

#[test]
fn test_sampled_confidence_skipped_on_cancelled_run() {
    let matrix = car_selection_matrix();
    let results = Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(10_000)
        .with_chunk_size(250)
        .with_shards(2)
        .with_seed(3)
        .with_confidence(ConfidenceMode::Sampled)
        .run_with_progress(|completed, _| {
            if completed >= 500 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

    assert!(results.is_cancelled());
    assert_eq!(results.iteration_count(), 500);
    let mut leaders = 0;
    for alt in matrix.alternatives() {
        if results.rank_hits(alt.id(), 0).unwrap() > 0 {
            leaders += 1;
            assert!(results.central_weights(alt.id()).unwrap().is_some());
        }
        assert_eq!(results.confidence_factor(alt.id()).unwrap(), None);
    }
    assert!(leaders > 0);
}

#[test]
fn test_cancel_flag_before_run() {
    let matrix = car_selection_matrix();
    let listener = Arc::new(CountingListener::new());
    let simulator = Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(1_000)
        .with_listener(listener.clone());
    simulator.cancel_flag().cancel();

    let results = simulator.run();
    assert!(results.is_cancelled());
    assert_eq!(results.iteration_count(), 0);
    let first = matrix.alternatives()[0].id();
    assert_eq!(results.rank_acceptability(first, 0).unwrap(), 0.0);
    assert_eq!(results.confidence_factor(first).unwrap(), None);
    assert_eq!(listener.cancelled_count(), 1);
    assert_eq!(listener.chunk_count(), 0);
}

#[test]
fn test_listener_sees_every_chunk() {
    let matrix = two_alternatives_three_criteria();
    let listener = Arc::new(CountingListener::new());
    Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(1_050)
        .with_chunk_size(100)
        .with_shards(1)
        .with_listener(listener.clone())
        .run();

    assert_eq!(listener.started_count(), 1);
    assert_eq!(listener.chunk_count(), 11);
    assert_eq!(listener.ended_count(), 1);
    assert_eq!(listener.cancelled_count(), 0);
}

#[test]
fn test_degenerate_scales_tie_in_insertion_order() {
    let matrix = exact_matrix(&["x", "y", "z"], &[&[2.0, 5.0], &[2.0, 5.0], &[2.0, 5.0]]);
    let results = Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(300)
        .with_shards(2)
        .with_seed(5)
        .run();

    for (rank, alt) in matrix.alternatives().iter().enumerate() {
        assert_eq!(results.rank_hits(alt.id(), rank).unwrap(), 300);
    }
}

#[test]
fn test_overflowing_scale_width_is_degenerate() {
    let matrix = exact_matrix(&["x", "y"], &[&[-1e308, 0.0], &[1e308, 1.0]]);
    let (x, y) = (matrix.alternatives()[0].id(), matrix.alternatives()[1].id());
    let results = Simulator::new(&matrix, WeightPolicy::Exact(vec![0.5, 0.5]))
        .unwrap()
        .with_iterations(100)
        .with_shards(2)
        .with_seed(11)
        .run();

    assert_eq!(results.rank_hits(y, 0).unwrap(), 100);
    assert_eq!(results.rank_hits(x, 1).unwrap(), 100);
    assert_eq!(results.confidence_factor(y).unwrap(), Some(1.0));
}

#[test]
fn test_dominated_alternative_never_first() {
    let matrix = exact_matrix(&["worse", "better"], &[&[0.0, 0.0], &[1.0, 1.0]]);
    let worse = matrix.alternatives()[0].id();
    let better = matrix.alternatives()[1].id();
    for mode in [ConfidenceMode::ExpectedValues, ConfidenceMode::Sampled] {
        let results = Simulator::new(&matrix, WeightPolicy::Uniform)
            .unwrap()
            .with_iterations(400)
            .with_shards(2)
            .with_seed(8)
            .with_confidence(mode)
            .run();

        assert_eq!(results.rank_acceptability(better, 0).unwrap(), 1.0);
        assert_eq!(results.central_weights(worse).unwrap(), None);
        assert_eq!(results.confidence_factor(worse).unwrap(), None);
        assert_eq!(results.confidence_factor(better).unwrap(), Some(1.0));
    }
}

#[test]
fn test_sampled_confidence_below_one_under_noise() {
    let mut matrix = exact_matrix(&["steady", "risky"], &[&[0.5, 0.5], &[0.5, 0.5]]);
    let (c1, c2) = (matrix.criteria()[0].id(), matrix.criteria()[1].id());
    let (steady, risky) = (matrix.alternatives()[0].id(), matrix.alternatives()[1].id());
    matrix
        .set_measurement(c1, risky, Measurement::interval(0.0, 1.0).unwrap())
        .unwrap();
    matrix
        .set_measurement(c2, risky, Measurement::interval(0.0, 1.0).unwrap())
        .unwrap();

    let results = Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(4_000)
        .with_shards(2)
        .with_seed(17)
        .with_confidence(ConfidenceMode::Sampled)
        .run();

    for alt in [steady, risky] {
        let cf = results.confidence_factor(alt).unwrap().unwrap();
        assert!(cf > 0.0 && cf < 1.0, "confidence factor {cf} should reflect noise");
    }
}

#[test]
fn test_interval_fallback_is_counted() {
    let matrix = two_alternatives_three_criteria();
    let third = smaa_core::Interval::new(0.333_333, 0.333_334).unwrap();
    let bounds = matrix.criteria().iter().map(|c| (c.id(), third)).collect();
    let results = Simulator::new(&matrix, WeightPolicy::Intervals(bounds))
        .unwrap()
        .with_iterations(2)
        .with_shards(1)
        .with_seed(1)
        .run();
    assert_eq!(results.weight_fallbacks(), 2);
}

#[test]
fn test_invalid_policy_rejected() {
    let matrix = two_alternatives_three_criteria();
    assert!(matches!(
        Simulator::new(&matrix, WeightPolicy::Exact(vec![1.0])),
        Err(SmaaError::InvalidParameter(_))
    ));
}

#[test]
fn test_from_config() {
    let matrix = two_alternatives_three_criteria();
    let config = SimulationConfig::new()
        .with_iterations(321)
        .with_chunk_size(50)
        .with_random_seed(11)
        .with_thread_count(ThreadCount::Count(3));
    let simulator = Simulator::from_config(&matrix, WeightPolicy::Uniform, &config).unwrap();
    assert_eq!(simulator.shard_count(), 3);
    assert_eq!(simulator.chunk_size(), 50);

    let results = simulator.run();
    assert_eq!(results.iteration_count(), 321);
    assert_eq!(results.seed(), Some(11));

    let bad = SimulationConfig::new().with_iterations(0);
    assert!(Simulator::from_config(&matrix, WeightPolicy::Uniform, &bad).is_err());
}

#[test]
fn test_matrix_edits_do_not_affect_simulator() {
    let mut matrix = two_alternatives_three_criteria();
    let simulator = Simulator::new(&matrix, WeightPolicy::Uniform)
        .unwrap()
        .with_iterations(100)
        .with_seed(4)
        .with_shards(1);
    let before = simulator.run();

    let a1 = matrix.alternatives()[0].id();
    matrix.delete_alternative(a1);
    let after = simulator.run();
    assert_eq!(before, after);
    assert_eq!(after.alternatives().len(), 2);
}
