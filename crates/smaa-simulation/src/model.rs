//! Dense, read-only view of an impact matrix for the trial loop.

use rand::Rng;
use smaa_core::{Alternative, Criterion, ImpactMatrix, Interval, Measurement, Result};

use crate::scoring::normalize;

/// A snapshot of the matrix laid out criterion-major.
///
/// Value buffers handed to [`sample_into`](Self::sample_into) and
/// [`utilities`](Self::utilities) hold the value of alternative `a` on
/// criterion `c` at `c * alternative_count + a`.
#[derive(Debug, Clone)]
pub struct SimulationModel {
    alternatives: Vec<Alternative>,
    criteria: Vec<Criterion>,
    scales: Vec<Interval>,
    cells: Vec<Measurement>,
}

impl SimulationModel {
    /// Copies alternatives, criteria, scales and measurements out of `matrix`.
    pub fn from_matrix(matrix: &ImpactMatrix) -> Result<Self> {
        let alternatives = matrix.alternatives().to_vec();
        let criteria = matrix.criteria().to_vec();
        let mut cells = Vec::with_capacity(alternatives.len() * criteria.len());
        let mut scales = Vec::with_capacity(criteria.len());
        for criterion in &criteria {
            scales.push(matrix.scale(criterion.id())?);
            for alternative in &alternatives {
                cells.push(*matrix.measurement(criterion.id(), alternative.id())?);
            }
        }
        Ok(Self {
            alternatives,
            criteria,
            scales,
            cells,
        })
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    pub fn criterion_count(&self) -> usize {
        self.criteria.len()
    }

    /// Scale of the criterion at `index`, as it was when the snapshot was taken.
    pub fn scale(&self, index: usize) -> Interval {
        self.scales[index]
    }

    /// Length of a value buffer.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Draws one value per cell.
    pub fn sample_into<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) {
        debug_assert_eq!(out.len(), self.cells.len());
        for (slot, cell) in out.iter_mut().zip(&self.cells) {
            *slot = cell.sample(rng);
        }
    }

    /// Expected value of every cell.
    pub fn expected_values(&self) -> Vec<f64> {
        self.cells.iter().map(Measurement::expected_value).collect()
    }

    /// Copies the values of one alternative, in criterion order.
    pub fn row_into(&self, values: &[f64], alternative: usize, out: &mut [f64]) {
        let n = self.alternatives.len();
        for (c, slot) in out.iter_mut().enumerate() {
            *slot = values[c * n + alternative];
        }
    }

    /// Weighted sum of normalized values for every alternative.
    pub fn utilities(&self, values: &[f64], weights: &[f64], out: &mut [f64]) {
        let n = self.alternatives.len();
        out.fill(0.0);
        let columns = self.criteria.iter().zip(&self.scales).zip(weights);
        for (((criterion, &scale), &w), chunk) in columns.zip(values.chunks_exact(n.max(1))) {
            let direction = criterion.direction();
            for (u, &x) in out.iter_mut().zip(chunk) {
                *u += w * normalize(x, scale, direction);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smaa_core::Direction;
    use smaa_test::exact_matrix;

    #[test]
    fn test_layout_is_criterion_major() {
        let matrix = exact_matrix(&["x", "y"], &[&[1.0, 10.0], &[2.0, 20.0]]);
        let model = SimulationModel::from_matrix(&matrix).unwrap();
        assert_eq!(model.expected_values(), vec![1.0, 2.0, 10.0, 20.0]);

        let mut row = [0.0; 2];
        model.row_into(&model.expected_values(), 1, &mut row);
        assert_eq!(row, [2.0, 20.0]);
    }

    #[test]
    fn test_utilities_normalize_against_scale() {
        let mut matrix = exact_matrix(&["x", "y"], &[&[0.0, 5.0], &[10.0, 5.0]]);
        let mut criteria = matrix.criteria().to_vec();
        criteria[0].set_direction(Direction::Descending);
        matrix.set_criteria(criteria).unwrap();

        let model = SimulationModel::from_matrix(&matrix).unwrap();
        let mut utilities = [0.0; 2];
        model.utilities(&model.expected_values(), &[0.5, 0.5], &mut utilities);

        // descending: x at the low end scores 1; degenerate second column gives 0.5
        assert!((utilities[0] - (0.5 * 1.0 + 0.5 * 0.5)).abs() < 1e-12);
        assert!((utilities[1] - (0.5 * 0.0 + 0.5 * 0.5)).abs() < 1e-12);
    }
}
