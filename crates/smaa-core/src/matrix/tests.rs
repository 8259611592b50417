//! Tests for the impact matrix.

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct CountingListener {
    structure: AtomicUsize,
    value: AtomicUsize,
}

impl MatrixListener for CountingListener {
    fn on_structure_changed(&self) {
        self.structure.fetch_add(1, Ordering::SeqCst);
    }

    fn on_value_changed(&self) {
        self.value.fetch_add(1, Ordering::SeqCst);
    }
}

impl CountingListener {
    fn counts(&self) -> (usize, usize) {
        (
            self.structure.load(Ordering::SeqCst),
            self.value.load(Ordering::SeqCst),
        )
    }
}

fn matrix_with_listener() -> (ImpactMatrix, Arc<CountingListener>) {
    let mut matrix = ImpactMatrix::new();
    let listener = Arc::new(CountingListener::default());
    matrix.add_listener(listener.clone());
    (matrix, listener)
}

#[test]
fn test_empty_matrix_criterion_scale_is_zero() {
    let mut matrix = ImpactMatrix::new();
    let c = Criterion::scale("c1");
    let id = c.id();
    matrix.add_criterion(c);
    assert_eq!(matrix.scale(id).unwrap(), Interval::ZERO);
}

#[test]
fn test_new_cells_default_to_unit_interval() {
    let mut matrix = ImpactMatrix::new();
    let c = Criterion::scale("c1");
    let c_id = c.id();
    matrix.add_criterion(c);
    let a = Alternative::new("a1");
    let a_id = a.id();
    matrix.add_alternative(a);

    assert_eq!(
        *matrix.measurement(c_id, a_id).unwrap(),
        Measurement::interval(0.0, 1.0).unwrap()
    );
    assert_eq!(matrix.scale(c_id).unwrap(), Interval::new(0.0, 1.0).unwrap());
}

#[test]
fn test_add_criterion_fills_existing_alternatives() {
    let a1 = Alternative::new("a1");
    let a2 = Alternative::new("a2");
    let ids = [a1.id(), a2.id()];
    let mut matrix = ImpactMatrix::with_entities(vec![a1, a2], vec![]).unwrap();

    let c = Criterion::scale("c");
    let c_id = c.id();
    matrix.add_criterion(c);
    for id in ids {
        assert!(matrix.measurement(c_id, id).is_ok());
    }
}

#[test]
fn test_scale_tracks_measurements() {
    let c = Criterion::scale("c");
    let c_id = c.id();
    let a1 = Alternative::new("a1");
    let a2 = Alternative::new("a2");
    let (a1_id, a2_id) = (a1.id(), a2.id());
    let mut matrix = ImpactMatrix::with_entities(vec![a1, a2], vec![c]).unwrap();

    matrix
        .set_measurement(c_id, a1_id, Measurement::exact(5.0).unwrap())
        .unwrap();
    matrix
        .set_measurement(c_id, a2_id, Measurement::interval(-2.0, 3.0).unwrap())
        .unwrap();
    assert_eq!(matrix.scale(c_id).unwrap(), Interval::new(-2.0, 5.0).unwrap());

    matrix.delete_alternative(a1_id);
    assert_eq!(matrix.scale(c_id).unwrap(), Interval::new(-2.0, 3.0).unwrap());

    matrix.delete_alternative(a2_id);
    assert_eq!(matrix.scale(c_id).unwrap(), Interval::ZERO);
}

#[test]
fn test_set_measurement_unknown_members() {
    let c = Criterion::scale("c");
    let c_id = c.id();
    let a = Alternative::new("a");
    let a_id = a.id();
    let mut matrix = ImpactMatrix::with_entities(vec![a], vec![c]).unwrap();

    let stranger = Alternative::new("stranger");
    let err = matrix
        .set_measurement(c_id, stranger.id(), Measurement::exact(1.0).unwrap())
        .unwrap_err();
    assert_eq!(err, SmaaError::UnknownAlternative(stranger.id()));

    let other = Criterion::scale("other");
    let err = matrix
        .set_measurement(other.id(), a_id, Measurement::exact(1.0).unwrap())
        .unwrap_err();
    assert_eq!(err, SmaaError::UnknownCriterion(other.id()));
}

#[test]
fn test_set_measurements_rejects_null_without_mutation() {
    let c = Criterion::scale("c");
    let c_id = c.id();
    let a1 = Alternative::new("a1");
    let a2 = Alternative::new("a2");
    let (a1_id, a2_id) = (a1.id(), a2.id());
    let mut matrix = ImpactMatrix::with_entities(vec![a1, a2], vec![c]).unwrap();

    let err = matrix
        .set_measurements(
            c_id,
            vec![
                (a1_id, Some(Measurement::exact(9.0).unwrap())),
                (a2_id, None),
            ],
        )
        .unwrap_err();
    assert_eq!(
        err,
        SmaaError::NullMeasurement {
            criterion: c_id,
            alternative: a2_id
        }
    );
    assert_eq!(*matrix.measurement(c_id, a1_id).unwrap(), Measurement::default());
}

#[test]
fn test_one_event_per_call() {
    let (mut matrix, listener) = matrix_with_listener();
    let c = Criterion::scale("c");
    let c_id = c.id();
    matrix.add_criterion(c);
    let a1 = Alternative::new("a1");
    let a2 = Alternative::new("a2");
    let (a1_id, a2_id) = (a1.id(), a2.id());
    matrix.add_alternative(a1);
    matrix.add_alternative(a2);
    assert_eq!(listener.counts(), (3, 0));

    matrix
        .set_measurements(
            c_id,
            vec![
                (a1_id, Some(Measurement::exact(1.0).unwrap())),
                (a2_id, Some(Measurement::exact(2.0).unwrap())),
            ],
        )
        .unwrap();
    assert_eq!(listener.counts(), (3, 1));

    // duplicates are silent no-ops
    let dup = matrix.alternative(a1_id).cloned().unwrap();
    assert!(!matrix.add_alternative(dup));
    assert_eq!(listener.counts(), (3, 1));
}

#[test]
fn test_listener_registered_once_and_removable() {
    let mut matrix = ImpactMatrix::new();
    let listener: Arc<dyn MatrixListener> = Arc::new(CountingListener::default());
    matrix.add_listener(listener.clone());
    matrix.add_listener(listener.clone());
    assert_eq!(matrix.listener_count(), 1);
    matrix.remove_listener(&listener);
    assert_eq!(matrix.listener_count(), 0);
}

#[test]
fn test_rename_preserves_measurements() {
    let c = Criterion::scale("c");
    let c_id = c.id();
    let a = Alternative::new("a");
    let a_id = a.id();
    let mut matrix = ImpactMatrix::with_entities(vec![a], vec![c]).unwrap();
    matrix
        .set_measurement(c_id, a_id, Measurement::exact(7.0).unwrap())
        .unwrap();

    matrix.rename_alternative(a_id, "renamed").unwrap();
    matrix.rename_criterion(c_id, "speed").unwrap();

    assert_eq!(matrix.alternative(a_id).unwrap().name(), "renamed");
    assert_eq!(matrix.criterion(c_id).unwrap().name(), "speed");
    assert_eq!(
        *matrix.measurement(c_id, a_id).unwrap(),
        Measurement::exact(7.0).unwrap()
    );
}

#[test]
fn test_set_alternatives_reorders_and_keeps_cells() {
    let c = Criterion::scale("c");
    let c_id = c.id();
    let a1 = Alternative::new("a1");
    let a2 = Alternative::new("a2");
    let a1_id = a1.id();
    let mut matrix =
        ImpactMatrix::with_entities(vec![a1.clone(), a2.clone()], vec![c]).unwrap();
    matrix
        .set_measurement(c_id, a1_id, Measurement::exact(3.0).unwrap())
        .unwrap();

    matrix.set_alternatives(vec![a2.clone(), a1.clone()]).unwrap();
    assert_eq!(matrix.alternatives()[0], a2);
    assert_eq!(
        *matrix.measurement(c_id, a1_id).unwrap(),
        Measurement::exact(3.0).unwrap()
    );

    let err = matrix.set_alternatives(vec![a1.clone(), a1]).unwrap_err();
    assert!(matches!(err, SmaaError::InvalidParameter(_)));
}

#[test]
fn test_delete_criterion_removes_column() {
    let c1 = Criterion::scale("c1");
    let c2 = Criterion::scale("c2");
    let c1_id = c1.id();
    let a = Alternative::new("a");
    let a_id = a.id();
    let mut matrix = ImpactMatrix::with_entities(vec![a], vec![c1, c2]).unwrap();

    assert!(matrix.delete_criterion(c1_id).is_some());
    assert!(matrix.delete_criterion(c1_id).is_none());
    assert_eq!(matrix.criteria().len(), 1);
    assert_eq!(
        matrix.measurement(c1_id, a_id).unwrap_err(),
        SmaaError::UnknownCriterion(c1_id)
    );
}

#[test]
fn test_snapshot_drops_listeners() {
    let (mut matrix, listener) = matrix_with_listener();
    matrix.add_criterion(Criterion::scale("c"));
    let mut copy = matrix.snapshot();
    assert_eq!(copy.listener_count(), 0);
    copy.add_alternative(Alternative::new("only in copy"));
    assert_eq!(listener.counts(), (1, 0));
    assert!(matrix.alternatives().is_empty());
}
