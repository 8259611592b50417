//! Tests for ELECTRE TRI sorting.

use std::collections::HashMap;

use smaa_core::{
    Alternative, Criterion, Direction, OutrankingThresholds, SmaaError,
};
use smaa_test::{outranking_fixture, OutrankingFixture};

use super::*;

fn sorter(fixture: &OutrankingFixture, lambda: f64, rule: AssignmentRule) -> ElectreTri {
    ElectreTri::new(
        &fixture.criteria,
        &fixture.categories,
        &fixture.boundaries,
        &fixture.weights,
        lambda,
    )
    .unwrap()
    .with_rule(rule)
}

#[test]
fn test_concordance_at_lambda_outranks_inclusively() {
    let t = OutrankingThresholds::new(0.0, 2.0, 10.0).unwrap();
    let criterion = Criterion::outranking("score", Direction::Ascending, t);
    let low = Alternative::new("low");
    let high = Alternative::new("high");
    let boundaries = HashMap::from([(low.id(), HashMap::from([(criterion.id(), 4.0)]))]);

    let sorter = ElectreTri::new(&[criterion], &[low, high.clone()], &boundaries, &[1.0], 0.5)
        .unwrap();

    // boundary leads by 1 of p = 2: concordance is exactly one half
    assert!(sorter.outranks(&[3.0], &[4.0]));
    assert_eq!(sorter.assign(&[3.0]).unwrap(), 1);
    assert_eq!(sorter.categories()[1], high.id());
}

#[test]
fn test_pessimistic_assignment() {
    let fixture = outranking_fixture();
    let sorter = sorter(&fixture, 0.75, AssignmentRule::Pessimistic);

    assert_eq!(sorter.assign(&fixture.row("strong")).unwrap(), 2);
    assert_eq!(sorter.assign(&fixture.row("middling")).unwrap(), 1);
    assert_eq!(sorter.assign(&fixture.row("weak")).unwrap(), 0);
    assert_eq!(sorter.assign(&fixture.row("uneven")).unwrap(), 0);
}

#[test]
fn test_optimistic_assignment() {
    let fixture = outranking_fixture();
    let sorter = sorter(&fixture, 0.75, AssignmentRule::Optimistic);

    assert_eq!(sorter.assign(&fixture.row("strong")).unwrap(), 2);
    assert_eq!(sorter.assign(&fixture.row("middling")).unwrap(), 1);
    assert_eq!(sorter.assign(&fixture.row("weak")).unwrap(), 0);
    // incomparable with both profiles
    assert_eq!(sorter.assign(&fixture.row("uneven")).unwrap(), 2);
}

#[test]
fn test_top_category_reached_when_all_profiles_outranked() {
    let fixture = outranking_fixture();
    let sorter = sorter(&fixture, 1.0, AssignmentRule::Pessimistic);
    assert_eq!(sorter.assign(&[100.0, -100.0]).unwrap(), 2);
}

#[test]
fn test_single_category_takes_everything() {
    let fixture = outranking_fixture();
    let only = Alternative::new("only");
    let sorter = ElectreTri::new(
        &fixture.criteria,
        &[only.clone()],
        &HashMap::new(),
        &fixture.weights,
        0.75,
    )
    .unwrap();

    let assignments = sorter
        .classify(&fixture.alternatives, &fixture.measurements)
        .unwrap();
    assert!(assignments.values().all(|c| *c == only.id()));
}

#[test]
fn test_monotonic_in_each_criterion() {
    let fixture = outranking_fixture();
    for rule in [AssignmentRule::Pessimistic, AssignmentRule::Optimistic] {
        let sorter = sorter(&fixture, 0.75, rule);
        let mut previous = 0;
        for step in 0..=40 {
            let quality = step as f64 * 0.25;
            let category = sorter.assign(&[quality, 4.0]).unwrap();
            assert!(category >= previous, "{rule:?} dropped at quality {quality}");
            previous = category;
        }

        // cost is descending: lowering it is an improvement
        let mut previous = 0;
        for step in 0..=40 {
            let cost = 10.0 - step as f64 * 0.25;
            let category = sorter.assign(&[6.0, cost]).unwrap();
            assert!(category >= previous, "{rule:?} dropped at cost {cost}");
            previous = category;
        }
    }
}

#[test]
fn test_pessimistic_never_above_optimistic() {
    let fixture = outranking_fixture();
    let pessimistic = sorter(&fixture, 0.75, AssignmentRule::Pessimistic);
    let optimistic = sorter(&fixture, 0.75, AssignmentRule::Optimistic);
    for q in 0..=10 {
        for c in 0..=10 {
            let row = [q as f64, c as f64];
            assert!(pessimistic.assign(&row).unwrap() <= optimistic.assign(&row).unwrap());
        }
    }
}

#[test]
fn test_veto_blocks_outranking() {
    let fixture = outranking_fixture();
    let row = [10.0, 13.0];

    let lenient = sorter(&fixture, 0.5, AssignmentRule::Pessimistic);
    assert_eq!(lenient.assign(&row).unwrap(), 2);

    let strict = lenient.clone().with_veto(true);
    assert_eq!(strict.assign(&row).unwrap(), 0);
}

#[test]
fn test_classify_maps_to_category_ids() {
    let fixture = outranking_fixture();
    let assignments = classify(
        &fixture.alternatives,
        &fixture.criteria,
        &fixture.categories,
        &fixture.measurements,
        &fixture.boundaries,
        &fixture.weights,
        0.75,
        false,
    )
    .unwrap();

    assert_eq!(assignments.len(), 4);
    let category_of = |name: &str| assignments[&fixture.alternative(name).id()];
    assert_eq!(category_of("strong"), fixture.category("good").id());
    assert_eq!(category_of("middling"), fixture.category("fair").id());
    assert_eq!(category_of("weak"), fixture.category("poor").id());
    assert_eq!(category_of("uneven"), fixture.category("poor").id());
}

#[test]
fn test_classify_matrix_matches_classify() {
    let fixture = outranking_fixture();
    let sorter = sorter(&fixture, 0.75, AssignmentRule::Optimistic);
    let direct = sorter
        .classify(&fixture.alternatives, &fixture.measurements)
        .unwrap();
    let via_matrix = sorter.classify_matrix(&fixture.matrix()).unwrap();
    assert_eq!(direct, via_matrix);
}

#[test]
fn test_missing_alternative_value_is_null_measurement() {
    let fixture = outranking_fixture();
    let sorter = sorter(&fixture, 0.75, AssignmentRule::Pessimistic);
    let mut measurements = fixture.measurements.clone();
    let weak = fixture.alternative("weak").id();
    measurements
        .get_mut(&weak)
        .unwrap()
        .remove(&fixture.criteria[1].id());

    let err = sorter
        .classify(&fixture.alternatives, &measurements)
        .unwrap_err();
    assert!(matches!(err, SmaaError::NullMeasurement { alternative, .. } if alternative == weak));
}

#[test]
fn test_malformed_profiles_rejected() {
    let fixture = outranking_fixture();
    let build = |categories: &[Alternative], boundaries| {
        ElectreTri::new(&fixture.criteria, categories, boundaries, &fixture.weights, 0.75)
    };

    let err = build(&[], &fixture.boundaries).unwrap_err();
    assert!(matches!(err, SmaaError::MalformedCategoryProfile(_)));

    let mut missing_profile = fixture.boundaries.clone();
    missing_profile.remove(&fixture.category("fair").id());
    let err = build(&fixture.categories, &missing_profile).unwrap_err();
    assert!(matches!(err, SmaaError::MalformedCategoryProfile(_)));

    let mut missing_cell = fixture.boundaries.clone();
    missing_cell
        .get_mut(&fixture.category("poor").id())
        .unwrap()
        .remove(&fixture.criteria[0].id());
    let err = build(&fixture.categories, &missing_cell).unwrap_err();
    assert!(matches!(err, SmaaError::MalformedCategoryProfile(_)));

    let poor = fixture.category("poor").clone();
    let err = build(&[poor.clone(), poor], &fixture.boundaries).unwrap_err();
    assert!(matches!(err, SmaaError::MalformedCategoryProfile(_)));
}

#[test]
fn test_invalid_parameters_rejected() {
    let fixture = outranking_fixture();
    let new = |criteria: &[Criterion], weights: &[f64], lambda| {
        ElectreTri::new(criteria, &fixture.categories, &fixture.boundaries, weights, lambda)
    };

    assert!(matches!(
        new(&fixture.criteria, &fixture.weights, 1.2),
        Err(SmaaError::InvalidParameter(_))
    ));
    assert!(matches!(
        new(&fixture.criteria, &[1.0], 0.75),
        Err(SmaaError::InvalidParameter(_))
    ));
    assert!(matches!(
        new(&fixture.criteria, &[1.5, -0.5], 0.75),
        Err(SmaaError::InvalidParameter(_))
    ));
    let scale_only = vec![Criterion::scale("plain"), fixture.criteria[1].clone()];
    assert!(matches!(
        new(&scale_only, &fixture.weights, 0.75),
        Err(SmaaError::InvalidParameter(_))
    ));
}

#[test]
fn test_assign_with_overrides_weights_and_lambda() {
    let fixture = outranking_fixture();
    let sorter = sorter(&fixture, 0.75, AssignmentRule::Pessimistic);
    let row = fixture.row("uneven");
    assert_eq!(sorter.assign(&row).unwrap(), 0);
    // all weight on quality: uneven now clears both profiles
    assert_eq!(sorter.assign_with(&row, &[1.0, 0.0], 0.75).unwrap(), 2);
}

#[test]
fn test_assign_with_checks_lengths() {
    let fixture = outranking_fixture();
    let sorter = sorter(&fixture, 0.75, AssignmentRule::Pessimistic);
    let row = fixture.row("strong");
    assert!(matches!(
        sorter.assign_with(&row, &[1.0], 0.75),
        Err(SmaaError::InvalidParameter(_))
    ));
    assert!(matches!(
        sorter.assign_with(&row[..1], &[0.5, 0.5], 0.75),
        Err(SmaaError::InvalidParameter(_))
    ));
    assert!(matches!(
        sorter.assign_with(&[9.0, 2.0, 0.0], &[0.5, 0.5], 0.75),
        Err(SmaaError::InvalidParameter(_))
    ));
}

#[test]
fn test_top_category_profile_is_ignored() {
    let fixture = outranking_fixture();
    let quality = fixture.criteria[0].id();
    let good = fixture.category("good").id();

    let mut with_top = fixture.boundaries.clone();
    with_top.insert(good, HashMap::from([(quality, 100.0)]));

    for rule in [AssignmentRule::Pessimistic, AssignmentRule::Optimistic] {
        let plain = sorter(&fixture, 0.75, rule);
        let extended = ElectreTri::new(
            &fixture.criteria,
            &fixture.categories,
            &with_top,
            &fixture.weights,
            0.75,
        )
        .unwrap()
        .with_rule(rule);

        assert_eq!(
            plain.classify(&fixture.alternatives, &fixture.measurements).unwrap(),
            extended.classify(&fixture.alternatives, &fixture.measurements).unwrap()
        );
        assert_eq!(extended.assign(&fixture.row("strong")).unwrap(), 2);
    }
}
