//! The impact matrix: alternatives × criteria grid of measurements.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SmaaError};
use crate::model::{
    Alternative, AlternativeId, Criterion, CriterionId, Interval, MatrixEvent, MatrixListener,
    Measurement,
};

/// Alternatives × criteria grid of [`Measurement`]s.
///
/// Keeps three invariants after every mutation:
/// - every criterion has exactly one measurement per current alternative,
///   newly introduced cells defaulting to `Interval(0, 1)`;
/// - every criterion's scale is the enclosing interval of its measurement
///   ranges, or `[0, 0]` when there are none;
/// - registered listeners received exactly one notification for the call.
///
/// Cells are keyed by [`CriterionId`] and [`AlternativeId`], so renaming an
/// entity never disturbs its measurements.
///
/// # Example
///
/// ```
/// use smaa_core::{Alternative, Criterion, ImpactMatrix, Measurement};
///
/// let mut matrix = ImpactMatrix::new();
/// let price = Criterion::scale("price").descending();
/// let price_id = price.id();
/// matrix.add_criterion(price);
///
/// let car = Alternative::new("car");
/// let car_id = car.id();
/// matrix.add_alternative(car);
///
/// matrix
///     .set_measurement(price_id, car_id, Measurement::interval(10.0, 12.0).unwrap())
///     .unwrap();
/// assert_eq!(matrix.scale(price_id).unwrap().hi(), 12.0);
/// ```
pub struct ImpactMatrix {
    alternatives: Vec<Alternative>,
    criteria: Vec<Criterion>,
    measurements: HashMap<CriterionId, HashMap<AlternativeId, Measurement>>,
    listeners: Vec<Arc<dyn MatrixListener>>,
}

impl ImpactMatrix {
    /// Creates a matrix without alternatives or criteria.
    pub fn new() -> Self {
        Self {
            alternatives: Vec::new(),
            criteria: Vec::new(),
            measurements: HashMap::new(),
            listeners: Vec::new(),
        }
    }

    /// Creates a matrix with the given alternatives and criteria, all cells
    /// set to the default measurement.
    pub fn with_entities(alternatives: Vec<Alternative>, criteria: Vec<Criterion>) -> Result<Self> {
        let mut matrix = Self::new();
        matrix.replace_criteria(criteria)?;
        matrix.replace_alternatives(alternatives)?;
        matrix.update_scales();
        Ok(matrix)
    }

    // === Listener Registration ===

    /// Registers a listener. Registering the same `Arc` twice has no effect.
    pub fn add_listener(&mut self, listener: Arc<dyn MatrixListener>) {
        if self.listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return;
        }
        self.listeners.push(listener);
    }

    pub fn remove_listener(&mut self, listener: &Arc<dyn MatrixListener>) {
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // === Accessors ===

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn alternative(&self, id: AlternativeId) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| a.id() == id)
    }

    pub fn criterion(&self, id: CriterionId) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id() == id)
    }

    pub fn contains_alternative(&self, id: AlternativeId) -> bool {
        self.alternative(id).is_some()
    }

    pub fn contains_criterion(&self, id: CriterionId) -> bool {
        self.criterion(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty() || self.criteria.is_empty()
    }

    /// Returns the measurement of `alternative` on `criterion`.
    pub fn measurement(
        &self,
        criterion: CriterionId,
        alternative: AlternativeId,
    ) -> Result<&Measurement> {
        self.check_members(criterion, alternative)?;
        self.measurements
            .get(&criterion)
            .and_then(|cells| cells.get(&alternative))
            .ok_or(SmaaError::NullMeasurement {
                criterion,
                alternative,
            })
    }

    /// Returns the current scale of a criterion.
    pub fn scale(&self, criterion: CriterionId) -> Result<Interval> {
        self.criterion(criterion)
            .map(Criterion::scale_interval)
            .ok_or(SmaaError::UnknownCriterion(criterion))
    }

    // === Structural Mutation ===

    /// Adds an alternative at the end. Returns `false` (and stays silent)
    /// if it is already a member.
    pub fn add_alternative(&mut self, alternative: Alternative) -> bool {
        if self.contains_alternative(alternative.id()) {
            return false;
        }
        let id = alternative.id();
        self.alternatives.push(alternative);
        for cells in self.measurements.values_mut() {
            cells.entry(id).or_default();
        }
        self.update_scales();
        self.fire(MatrixEvent::StructureChanged);
        true
    }

    /// Deletes an alternative and its measurements. Returns the removed
    /// alternative, or `None` (silently) if it was not a member.
    pub fn delete_alternative(&mut self, id: AlternativeId) -> Option<Alternative> {
        let index = self.alternatives.iter().position(|a| a.id() == id)?;
        let removed = self.alternatives.remove(index);
        for cells in self.measurements.values_mut() {
            cells.remove(&id);
        }
        self.update_scales();
        self.fire(MatrixEvent::StructureChanged);
        Some(removed)
    }

    /// Adds a criterion at the end with default measurements for every
    /// alternative. Returns `false` if it is already a member.
    pub fn add_criterion(&mut self, criterion: Criterion) -> bool {
        if self.contains_criterion(criterion.id()) {
            return false;
        }
        let cells = self
            .alternatives
            .iter()
            .map(|a| (a.id(), Measurement::default()))
            .collect();
        self.measurements.insert(criterion.id(), cells);
        self.criteria.push(criterion);
        self.update_scales();
        self.fire(MatrixEvent::StructureChanged);
        true
    }

    /// Deletes a criterion and its measurements.
    pub fn delete_criterion(&mut self, id: CriterionId) -> Option<Criterion> {
        let index = self.criteria.iter().position(|c| c.id() == id)?;
        let removed = self.criteria.remove(index);
        self.measurements.remove(&id);
        self.fire(MatrixEvent::StructureChanged);
        Some(removed)
    }

    /// Replaces the alternative list (e.g. to reorder it).
    ///
    /// Measurements of retained alternatives are kept, those of dropped
    /// alternatives discarded and new alternatives get default cells.
    pub fn set_alternatives(&mut self, alternatives: Vec<Alternative>) -> Result<()> {
        self.replace_alternatives(alternatives)?;
        self.update_scales();
        self.fire(MatrixEvent::StructureChanged);
        Ok(())
    }

    /// Replaces the criterion list, keeping measurements of retained criteria.
    pub fn set_criteria(&mut self, criteria: Vec<Criterion>) -> Result<()> {
        self.replace_criteria(criteria)?;
        self.update_scales();
        self.fire(MatrixEvent::StructureChanged);
        Ok(())
    }

    // === Value Mutation ===

    /// Sets one measurement and recomputes the criterion's scale.
    pub fn set_measurement(
        &mut self,
        criterion: CriterionId,
        alternative: AlternativeId,
        measurement: Measurement,
    ) -> Result<()> {
        self.check_members(criterion, alternative)?;
        self.measurements
            .entry(criterion)
            .or_default()
            .insert(alternative, measurement);
        self.update_scales();
        self.fire(MatrixEvent::ValueChanged);
        Ok(())
    }

    /// Sets several measurements of one criterion with a single notification.
    ///
    /// Every entry is validated before anything is written: an unknown
    /// alternative or an absent measurement leaves the matrix untouched.
    pub fn set_measurements<I>(&mut self, criterion: CriterionId, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = (AlternativeId, Option<Measurement>)>,
    {
        if !self.contains_criterion(criterion) {
            return Err(SmaaError::UnknownCriterion(criterion));
        }
        let mut validated = Vec::new();
        for (alternative, measurement) in cells {
            if !self.contains_alternative(alternative) {
                return Err(SmaaError::UnknownAlternative(alternative));
            }
            let measurement = measurement.ok_or(SmaaError::NullMeasurement {
                criterion,
                alternative,
            })?;
            validated.push((alternative, measurement));
        }
        let column = self.measurements.entry(criterion).or_default();
        column.extend(validated);
        self.update_scales();
        self.fire(MatrixEvent::ValueChanged);
        Ok(())
    }

    /// Renames an alternative; its measurements are untouched.
    pub fn rename_alternative(&mut self, id: AlternativeId, name: impl Into<String>) -> Result<()> {
        let alternative = self
            .alternatives
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or(SmaaError::UnknownAlternative(id))?;
        alternative.set_name(name);
        self.fire(MatrixEvent::ValueChanged);
        Ok(())
    }

    /// Renames a criterion; its measurements and scale are untouched.
    pub fn rename_criterion(&mut self, id: CriterionId, name: impl Into<String>) -> Result<()> {
        let criterion = self
            .criteria
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(SmaaError::UnknownCriterion(id))?;
        criterion.set_name(name);
        self.fire(MatrixEvent::ValueChanged);
        Ok(())
    }

    /// Copies the matrix without its listeners.
    ///
    /// Simulations run on snapshots so that the caller may keep editing the
    /// original while a run is in flight.
    pub fn snapshot(&self) -> ImpactMatrix {
        ImpactMatrix {
            alternatives: self.alternatives.clone(),
            criteria: self.criteria.clone(),
            measurements: self.measurements.clone(),
            listeners: Vec::new(),
        }
    }

    // === Internals ===

    fn check_members(&self, criterion: CriterionId, alternative: AlternativeId) -> Result<()> {
        if !self.contains_criterion(criterion) {
            return Err(SmaaError::UnknownCriterion(criterion));
        }
        if !self.contains_alternative(alternative) {
            return Err(SmaaError::UnknownAlternative(alternative));
        }
        Ok(())
    }

    fn replace_alternatives(&mut self, alternatives: Vec<Alternative>) -> Result<()> {
        let mut seen = HashSet::new();
        for a in &alternatives {
            if !seen.insert(a.id()) {
                return Err(SmaaError::InvalidParameter(format!(
                    "duplicate alternative {} ({})",
                    a.name(),
                    a.id()
                )));
            }
        }
        for cells in self.measurements.values_mut() {
            cells.retain(|id, _| seen.contains(id));
            for a in &alternatives {
                cells.entry(a.id()).or_default();
            }
        }
        self.alternatives = alternatives;
        Ok(())
    }

    fn replace_criteria(&mut self, criteria: Vec<Criterion>) -> Result<()> {
        let mut seen = HashSet::new();
        for c in &criteria {
            if !seen.insert(c.id()) {
                return Err(SmaaError::InvalidParameter(format!(
                    "duplicate criterion {} ({})",
                    c.name(),
                    c.id()
                )));
            }
        }
        self.measurements.retain(|id, _| seen.contains(id));
        for c in &criteria {
            let cells = self.measurements.entry(c.id()).or_default();
            for a in &self.alternatives {
                cells.entry(a.id()).or_default();
            }
        }
        self.criteria = criteria;
        Ok(())
    }

    fn update_scales(&mut self) {
        for criterion in &mut self.criteria {
            let scale = self
                .measurements
                .get(&criterion.id())
                .and_then(|cells| Interval::enclosing(cells.values().map(Measurement::range)))
                .unwrap_or(Interval::ZERO);
            criterion.set_scale(scale);
        }
    }

    fn fire(&self, event: MatrixEvent) {
        for listener in &self.listeners {
            match event {
                MatrixEvent::StructureChanged => listener.on_structure_changed(),
                MatrixEvent::ValueChanged => listener.on_value_changed(),
            }
        }
    }
}

impl Default for ImpactMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ImpactMatrix {
    /// Same as [`ImpactMatrix::snapshot`]: listeners are not carried over.
    fn clone(&self) -> Self {
        self.snapshot()
    }
}

impl fmt::Debug for ImpactMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImpactMatrix")
            .field("alternatives", &self.alternatives)
            .field("criteria", &self.criteria)
            .field("measurements", &self.measurements)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
