//! A three-category sorting problem.
//!
//! Two outranking criteria, `quality` (higher is better) and `cost` (lower
//! is better), each with `q = 0`, `p = 2`, `v = 6`, weighted equally.
//!
//! | category | upper profile (quality, cost) |
//! |----------|-------------------------------|
//! | poor     | (4, 6)                        |
//! | fair     | (7, 3)                        |
//! | good     | none                          |
//!
//! | alternative | quality | cost | pessimistic, lambda 0.75 |
//! |-------------|---------|------|--------------------------|
//! | strong      | 9       | 2    | good                     |
//! | middling    | 5       | 5    | fair                     |
//! | weak        | 1       | 9    | poor                     |
//! | uneven      | 9       | 9    | poor (optimistic: good)  |

use std::collections::HashMap;

use smaa_core::{
    Alternative, AlternativeId, Criterion, CriterionId, Direction, ImpactMatrix, Measurement,
    OutrankingThresholds,
};

/// Inputs for ELECTRE TRI tests.
#[derive(Debug, Clone)]
pub struct OutrankingFixture {
    pub criteria: Vec<Criterion>,
    pub weights: Vec<f64>,
    pub categories: Vec<Alternative>,
    pub boundaries: HashMap<AlternativeId, HashMap<CriterionId, f64>>,
    pub alternatives: Vec<Alternative>,
    pub measurements: HashMap<AlternativeId, HashMap<CriterionId, f64>>,
}

impl OutrankingFixture {
    /// Looks up an alternative by name.
    ///
    /// # Panics
    ///
    /// Panics if no alternative has that name.
    pub fn alternative(&self, name: &str) -> &Alternative {
        self.alternatives
            .iter()
            .find(|a| a.name() == name)
            .unwrap_or_else(|| panic!("no alternative named {name}"))
    }

    /// Looks up a category by name.
    ///
    /// # Panics
    ///
    /// Panics if no category has that name.
    pub fn category(&self, name: &str) -> &Alternative {
        self.categories
            .iter()
            .find(|c| c.name() == name)
            .unwrap_or_else(|| panic!("no category named {name}"))
    }

    /// Performance row of the named alternative, in criterion order.
    pub fn row(&self, name: &str) -> Vec<f64> {
        let values = &self.measurements[&self.alternative(name).id()];
        self.criteria.iter().map(|c| values[&c.id()]).collect()
    }

    /// The alternatives as an impact matrix of exact measurements.
    pub fn matrix(&self) -> ImpactMatrix {
        let mut matrix =
            ImpactMatrix::with_entities(self.alternatives.clone(), self.criteria.clone()).unwrap();
        for (alt, values) in &self.measurements {
            for (crit, value) in values {
                matrix
                    .set_measurement(*crit, *alt, Measurement::exact(*value).unwrap())
                    .unwrap();
            }
        }
        matrix
    }
}

pub fn outranking_fixture() -> OutrankingFixture {
    let thresholds = OutrankingThresholds::new(0.0, 2.0, 6.0).unwrap();
    let quality = Criterion::outranking("quality", Direction::Ascending, thresholds);
    let cost = Criterion::outranking("cost", Direction::Descending, thresholds);

    let poor = Alternative::new("poor");
    let fair = Alternative::new("fair");
    let good = Alternative::new("good");

    let profile = |q: f64, c: f64| HashMap::from([(quality.id(), q), (cost.id(), c)]);
    let boundaries = HashMap::from([(poor.id(), profile(4.0, 6.0)), (fair.id(), profile(7.0, 3.0))]);

    let rows = [
        ("strong", 9.0, 2.0),
        ("middling", 5.0, 5.0),
        ("weak", 1.0, 9.0),
        ("uneven", 9.0, 9.0),
    ];
    let mut alternatives = Vec::with_capacity(rows.len());
    let mut measurements = HashMap::with_capacity(rows.len());
    for (name, q, c) in rows {
        let alternative = Alternative::new(name);
        measurements.insert(alternative.id(), profile(q, c));
        alternatives.push(alternative);
    }

    OutrankingFixture {
        criteria: vec![quality, cost],
        weights: vec![0.5, 0.5],
        categories: vec![poor, fair, good],
        boundaries,
        alternatives,
        measurements,
    }
}
