//! Full-snapshot and diff-snapshot export.
//!
//! Shapes follow the sparse parallel-array convention: every vector or
//! matrix is sorted ascending by id (then secondary id), zero entries are
//! omitted, and optional sub-structures are entirely absent rather than
//! present-but-empty, so "no update" is a single presence check.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use modelstore_types::{LinearConstraintId, QuadraticKey, VariableId};

use super::error::ModelStoreError;
use super::tracker::UpdateTrackerId;
use super::{ConstraintData, ModelStore, VariableData};

/// Sparse (ids, values) vector, sorted ascending by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SparseVector<T> {
    pub ids: Vec<u64>,
    pub values: Vec<T>,
}

impl<T> Default for SparseVector<T> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T> SparseVector<T> {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn push(&mut self, id: u64, value: T) {
        self.ids.push(id);
        self.values.push(value);
    }
}

/// Sparse (row, column, coefficient) matrix, sorted by (row, column).
/// Quadratic matrices keep row <= column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SparseMatrix {
    pub row_ids: Vec<u64>,
    pub column_ids: Vec<u64>,
    pub coefficients: Vec<f64>,
}

impl SparseMatrix {
    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    fn push(&mut self, row: u64, column: u64, coefficient: f64) {
        self.row_ids.push(row);
        self.column_ids.push(column);
        self.coefficients.push(coefficient);
    }
}

/// Parallel-array snapshot of a set of variables.
///
/// `names` is emitted only when at least one variable has a non-empty
/// name, never as a list of empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariableSnapshot {
    pub ids: Vec<u64>,
    pub lower_bounds: Vec<f64>,
    pub upper_bounds: Vec<f64>,
    pub integers: Vec<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
}

impl VariableSnapshot {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Parallel-array snapshot of a set of linear constraints; same `names`
/// omission rule as [`VariableSnapshot`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinearConstraintSnapshot {
    pub ids: Vec<u64>,
    pub lower_bounds: Vec<f64>,
    pub upper_bounds: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
}

impl LinearConstraintSnapshot {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Snapshot of the full objective.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectiveSnapshot {
    pub maximize: bool,
    pub offset: f64,
    pub linear_coefficients: SparseVector<f64>,
    pub quadratic_coefficients: SparseMatrix,
}

/// Deterministic full snapshot of a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSnapshot {
    pub name: String,
    pub variables: VariableSnapshot,
    pub linear_constraints: LinearConstraintSnapshot,
    pub objective: ObjectiveSnapshot,
    pub linear_constraint_matrix: SparseMatrix,
}

/// Sparse per-field updates for old variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariableUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bounds: Option<SparseVector<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bounds: Option<SparseVector<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integers: Option<SparseVector<bool>>,
}

impl VariableUpdates {
    pub fn is_empty(&self) -> bool {
        self.lower_bounds.is_none() && self.upper_bounds.is_none() && self.integers.is_none()
    }
}

/// Sparse per-field updates for old linear constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinearConstraintUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bounds: Option<SparseVector<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bounds: Option<SparseVector<f64>>,
}

impl LinearConstraintUpdates {
    pub fn is_empty(&self) -> bool {
        self.lower_bounds.is_none() && self.upper_bounds.is_none()
    }
}

/// Objective changes: direction/offset when touched, plus coefficient
/// deltas merging dirty old entries with every entry of a new variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectiveUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_update: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear_coefficients: Option<SparseVector<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadratic_coefficients: Option<SparseMatrix>,
}

impl ObjectiveUpdates {
    pub fn is_empty(&self) -> bool {
        self.direction_update.is_none()
            && self.offset_update.is_none()
            && self.linear_coefficients.is_none()
            && self.quadratic_coefficients.is_none()
    }
}

/// Minimal diff of everything that changed since a tracker's checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelUpdate {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted_variable_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub deleted_linear_constraint_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_variables: Option<VariableSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_linear_constraints: Option<LinearConstraintSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_updates: Option<VariableUpdates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear_constraint_updates: Option<LinearConstraintUpdates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_updates: Option<ObjectiveUpdates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linear_constraint_matrix_updates: Option<SparseMatrix>,
}

fn collect_variables<'a>(
    entries: impl Iterator<Item = (&'a VariableId, &'a VariableData)>,
) -> VariableSnapshot {
    let mut snapshot = VariableSnapshot::default();
    let mut names = Vec::new();
    let mut any_named = false;
    for (id, data) in entries {
        snapshot.ids.push(id.inner());
        snapshot.lower_bounds.push(data.lower_bound);
        snapshot.upper_bounds.push(data.upper_bound);
        snapshot.integers.push(data.is_integer);
        any_named |= !data.name.is_empty();
        names.push(data.name.clone());
    }
    snapshot.names = any_named.then_some(names);
    snapshot
}

fn collect_linear_constraints<'a>(
    entries: impl Iterator<Item = (&'a LinearConstraintId, &'a ConstraintData)>,
) -> LinearConstraintSnapshot {
    let mut snapshot = LinearConstraintSnapshot::default();
    let mut names = Vec::new();
    let mut any_named = false;
    for (id, data) in entries {
        snapshot.ids.push(id.inner());
        snapshot.lower_bounds.push(data.lower_bound);
        snapshot.upper_bounds.push(data.upper_bound);
        any_named |= !data.name.is_empty();
        names.push(data.name.clone());
    }
    snapshot.names = any_named.then_some(names);
    snapshot
}

// Per-field sparse vector from a dirty-id set; tombstoned ids are skipped
// (their deletion dominates any pending field dirt).
fn sparse_from_dirty<K, D, T>(
    dirty: &BTreeSet<K>,
    table: &BTreeMap<K, D>,
    id_of: impl Fn(K) -> u64,
    value_of: impl Fn(&D) -> T,
) -> Option<SparseVector<T>>
where
    K: Copy + Ord,
{
    let mut out = SparseVector::default();
    for &id in dirty {
        if let Some(data) = table.get(&id) {
            out.push(id_of(id), value_of(data));
        }
    }
    (!out.is_empty()).then_some(out)
}

impl ModelStore {
    /// Deterministic full snapshot, every collection sorted by id.
    pub fn export_model(&self) -> ModelSnapshot {
        let variables = collect_variables(self.variables.iter());
        let linear_constraints = collect_linear_constraints(self.linear_constraints.iter());

        let mut linear_coefficients = SparseVector::default();
        for (&id, &coefficient) in &self.objective.linear_terms {
            linear_coefficients.push(id.inner(), coefficient);
        }
        let mut quadratic_coefficients = SparseMatrix::default();
        for (key, coefficient) in self.objective.quadratic_terms.terms() {
            quadratic_coefficients.push(key.first().inner(), key.second().inner(), coefficient);
        }
        let mut linear_constraint_matrix = SparseMatrix::default();
        for (&(constraint, variable), &coefficient) in &self.matrix {
            linear_constraint_matrix.push(constraint.inner(), variable.inner(), coefficient);
        }

        tracing::debug!(
            component = "store",
            operation = "export_model",
            status = "success",
            variables = self.num_variables(),
            linear_constraints = self.num_linear_constraints(),
            matrix_entries = self.num_matrix_entries(),
            "Exported full model snapshot"
        );

        ModelSnapshot {
            name: self.name.clone(),
            variables,
            linear_constraints,
            objective: ObjectiveSnapshot {
                maximize: self.objective.maximize,
                offset: self.objective.offset,
                linear_coefficients,
                quadratic_coefficients,
            },
            linear_constraint_matrix,
        }
    }

    /// Export the minimal diff since `tracker`'s checkpoint.
    ///
    /// Returns `None` iff both checkpoints equal the store's next-id
    /// counters and every dirty set and flag is empty. Does not advance
    /// the checkpoint; repeated exports of an unchanged store are equal.
    pub fn export_update(
        &self,
        tracker: UpdateTrackerId,
    ) -> Result<Option<ModelUpdate>, ModelStoreError> {
        let state = self.tracker_state(tracker)?;
        if state.variables_checkpoint == self.next_variable_id
            && state.linear_constraints_checkpoint == self.next_linear_constraint_id
            && state.dirty.is_empty()
        {
            return Ok(None);
        }
        let dirty = &state.dirty;
        let variable_watermark = VariableId::new(state.variables_checkpoint);
        let constraint_watermark = LinearConstraintId::new(state.linear_constraints_checkpoint);

        // Only old entities ever enter the delete sets, so a new-then-
        // deleted id appears nowhere in the diff.
        let deleted_variable_ids: Vec<u64> =
            dirty.variable_deletes.iter().map(|id| id.inner()).collect();
        let deleted_linear_constraint_ids: Vec<u64> = dirty
            .linear_constraint_deletes
            .iter()
            .map(|id| id.inner())
            .collect();

        let variable_updates = VariableUpdates {
            lower_bounds: sparse_from_dirty(
                &dirty.variable_lower_bounds,
                &self.variables,
                |id| id.inner(),
                |data| data.lower_bound,
            ),
            upper_bounds: sparse_from_dirty(
                &dirty.variable_upper_bounds,
                &self.variables,
                |id| id.inner(),
                |data| data.upper_bound,
            ),
            integers: sparse_from_dirty(
                &dirty.variable_integers,
                &self.variables,
                |id| id.inner(),
                |data| data.is_integer,
            ),
        };
        let linear_constraint_updates = LinearConstraintUpdates {
            lower_bounds: sparse_from_dirty(
                &dirty.linear_constraint_lower_bounds,
                &self.linear_constraints,
                |id| id.inner(),
                |data| data.lower_bound,
            ),
            upper_bounds: sparse_from_dirty(
                &dirty.linear_constraint_upper_bounds,
                &self.linear_constraints,
                |id| id.inner(),
                |data| data.upper_bound,
            ),
        };

        // New entities are exported wholesale from the live tables; they
        // were never marked dirty field-by-field.
        let new_variables = {
            let snapshot = collect_variables(self.variables.range(variable_watermark..));
            (!snapshot.is_empty()).then_some(snapshot)
        };
        let new_linear_constraints = {
            let snapshot =
                collect_linear_constraints(self.linear_constraints.range(constraint_watermark..));
            (!snapshot.is_empty()).then_some(snapshot)
        };

        // Objective deltas: dirty old entries (current value, 0 when the
        // entry was removed) merged with every entry of a new variable.
        let mut linear_deltas: BTreeMap<VariableId, f64> = BTreeMap::new();
        for &id in &dirty.linear_objective_coefficients {
            if self.variables.contains_key(&id) {
                let value = self.objective.linear_terms.get(&id).copied().unwrap_or(0.0);
                linear_deltas.insert(id, value);
            }
        }
        for (&id, &coefficient) in self.objective.linear_terms.range(variable_watermark..) {
            linear_deltas.insert(id, coefficient);
        }
        let linear_coefficients = (!linear_deltas.is_empty()).then(|| {
            let mut out = SparseVector::default();
            for (id, value) in linear_deltas {
                out.push(id.inner(), value);
            }
            out
        });

        let mut quadratic_deltas: BTreeMap<QuadraticKey, f64> = BTreeMap::new();
        for &key in &dirty.quadratic_objective_coefficients {
            if self.variables.contains_key(&key.first())
                && self.variables.contains_key(&key.second())
            {
                let value = self
                    .objective
                    .quadratic_terms
                    .get_coefficient(key.first(), key.second());
                quadratic_deltas.insert(key, value);
            }
        }
        for (key, coefficient) in self.objective.quadratic_terms.terms() {
            // first <= second, so the pair involves a new variable iff
            // its larger id crossed the watermark.
            if key.second() >= variable_watermark {
                quadratic_deltas.insert(key, coefficient);
            }
        }
        let quadratic_coefficients = (!quadratic_deltas.is_empty()).then(|| {
            let mut out = SparseMatrix::default();
            for (key, value) in quadratic_deltas {
                out.push(key.first().inner(), key.second().inner(), value);
            }
            out
        });

        let objective_updates = ObjectiveUpdates {
            direction_update: dirty.objective_direction.then_some(self.objective.maximize),
            offset_update: dirty.objective_offset.then_some(self.objective.offset),
            linear_coefficients,
            quadratic_coefficients,
        };

        // Matrix deltas: dirty old-by-old keys with both endpoints still
        // live, plus every entry incident to a new constraint or a new
        // variable. The map dedupes new-by-new entries reached twice.
        let mut matrix_deltas: BTreeMap<(LinearConstraintId, VariableId), f64> = BTreeMap::new();
        for &(constraint, variable) in &dirty.linear_constraint_matrix {
            if self.linear_constraints.contains_key(&constraint)
                && self.variables.contains_key(&variable)
            {
                let value = self
                    .matrix
                    .get(&(constraint, variable))
                    .copied()
                    .unwrap_or(0.0);
                matrix_deltas.insert((constraint, variable), value);
            }
        }
        for (&constraint, row) in self.linear_constraints.range(constraint_watermark..) {
            for &variable in &row.variables {
                if let Some(&coefficient) = self.matrix.get(&(constraint, variable)) {
                    matrix_deltas.insert((constraint, variable), coefficient);
                }
            }
        }
        for (&variable, column) in self.variables.range(variable_watermark..) {
            for &constraint in &column.constraints {
                if let Some(&coefficient) = self.matrix.get(&(constraint, variable)) {
                    matrix_deltas.insert((constraint, variable), coefficient);
                }
            }
        }
        let linear_constraint_matrix_updates = (!matrix_deltas.is_empty()).then(|| {
            let mut out = SparseMatrix::default();
            for ((constraint, variable), value) in matrix_deltas {
                out.push(constraint.inner(), variable.inner(), value);
            }
            out
        });

        let update = ModelUpdate {
            deleted_variable_ids,
            deleted_linear_constraint_ids,
            new_variables,
            new_linear_constraints,
            variable_updates: (!variable_updates.is_empty()).then_some(variable_updates),
            linear_constraint_updates: (!linear_constraint_updates.is_empty())
                .then_some(linear_constraint_updates),
            objective_updates: (!objective_updates.is_empty()).then_some(objective_updates),
            linear_constraint_matrix_updates,
        };

        tracing::debug!(
            component = "store",
            operation = "export_update",
            status = "success",
            deleted_variables = update.deleted_variable_ids.len(),
            deleted_linear_constraints = update.deleted_linear_constraint_ids.len(),
            "Exported tracker update"
        );
        Ok(Some(update))
    }
}
