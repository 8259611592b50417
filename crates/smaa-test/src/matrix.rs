//! Impact matrix fixtures.
//!
//! # Example
//!
//! ```
//! use smaa_test::matrix::exact_matrix;
//!
//! let matrix = exact_matrix(&["x", "y"], &[&[1.0, 2.0], &[3.0, 4.0]]);
//! let c = matrix.criteria()[1].id();
//! assert_eq!(matrix.scale(c).unwrap().hi(), 4.0);
//! ```

use smaa_core::{Alternative, Criterion, ImpactMatrix, Measurement};

/// Builds a matrix of exact values over ascending scale criteria.
///
/// `rows[i][j]` is the value of alternative `i` on criterion `j`; criteria
/// are named `c1`, `c2`, ...
///
/// # Panics
///
/// Panics if the rows have differing lengths or contain non-finite values.
pub fn exact_matrix(names: &[&str], rows: &[&[f64]]) -> ImpactMatrix {
    assert_eq!(names.len(), rows.len(), "one row per alternative");
    let width = rows.first().map_or(0, |r| r.len());
    let alternatives: Vec<_> = names.iter().map(|n| Alternative::new(*n)).collect();
    let criteria: Vec<_> = (1..=width)
        .map(|i| Criterion::scale(format!("c{i}")))
        .collect();

    let mut matrix = ImpactMatrix::with_entities(alternatives, criteria).unwrap();
    let criterion_ids: Vec<_> = matrix.criteria().iter().map(|c| c.id()).collect();
    let alternative_ids: Vec<_> = matrix.alternatives().iter().map(|a| a.id()).collect();
    for (alt, row) in alternative_ids.iter().zip(rows) {
        assert_eq!(row.len(), width, "rows must have equal length");
        for (crit, value) in criterion_ids.iter().zip(row.iter()) {
            matrix
                .set_measurement(*crit, *alt, Measurement::exact(*value).unwrap())
                .unwrap();
        }
    }
    matrix
}

/// Alternatives `a1`, `a2` on three ascending criteria.
///
/// `a1 = (0, 0, 1)` and `a2 = (1, 1, 0)`, so `a2` ranks first whenever the
/// third criterion carries less than half of the weight.
pub fn two_alternatives_three_criteria() -> ImpactMatrix {
    exact_matrix(&["a1", "a2"], &[&[0.0, 0.0, 1.0], &[1.0, 1.0, 0.0]])
}

/// Three cars rated on price (lower is better), power and fuel use (lower
/// is better), mixing every measurement kind.
pub fn car_selection_matrix() -> ImpactMatrix {
    let civic = Alternative::new("Civic");
    let golf = Alternative::new("Golf");
    let model3 = Alternative::new("Model 3");
    let price = Criterion::scale("price").descending();
    let power = Criterion::scale("power");
    let fuel = Criterion::scale("fuel").descending();

    let cells = [
        (&price, &civic, Measurement::interval(24_000.0, 26_000.0)),
        (&price, &golf, Measurement::gaussian(27_000.0, 800.0)),
        (&price, &model3, Measurement::exact(41_000.0)),
        (&power, &civic, Measurement::exact(158.0)),
        (&power, &golf, Measurement::interval(148.0, 160.0)),
        (&power, &model3, Measurement::gaussian(283.0, 10.0)),
        (&fuel, &civic, Measurement::log_normal(1.9, 0.1)),
        (&fuel, &golf, Measurement::gaussian(6.1, 0.4)),
        (&fuel, &model3, Measurement::exact(2.0)),
    ];

    let mut matrix = ImpactMatrix::with_entities(
        vec![civic.clone(), golf.clone(), model3.clone()],
        vec![price.clone(), power.clone(), fuel.clone()],
    )
    .unwrap();
    for (criterion, alternative, measurement) in cells {
        matrix
            .set_measurement(criterion.id(), alternative.id(), measurement.unwrap())
            .unwrap();
    }
    matrix
}
