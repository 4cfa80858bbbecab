//! Mutating operations: add, set, delete, and objective editing.
//!
//! Every mutator validates ids first, skips all bookkeeping when the new
//! value equals the stored one (NaN-aware, see `NumericValue`), applies
//! the change, then fans a dirty bit out to every live tracker whose
//! checkpoint covers the affected id.

use std::collections::btree_map::Entry;
use std::collections::BTreeSet;

use modelstore_types::{LinearConstraintId, NumericValue, QuadraticKey, VariableId};

use super::error::ModelStoreError;
use super::{ConstraintData, ModelStore, VariableData};

impl ModelStore {
    /// Add a variable and return its id. Ids are sequential, never reused.
    ///
    /// Bounds are stored verbatim; NaN and infinities are valid values.
    pub fn add_variable(
        &mut self,
        lower_bound: f64,
        upper_bound: f64,
        is_integer: bool,
        name: impl Into<String>,
    ) -> VariableId {
        let id = VariableId::new(self.next_variable_id);
        self.next_variable_id += 1;
        self.variables.insert(
            id,
            VariableData {
                lower_bound,
                upper_bound,
                is_integer,
                name: name.into(),
                constraints: BTreeSet::new(),
            },
        );
        tracing::debug!(
            component = "store",
            operation = "add_variable",
            status = "success",
            id = id.inner(),
            "Added variable"
        );
        id
    }

    /// Delete a variable, purging its matrix column, adjacency
    /// memberships, and objective terms. The id is tombstoned forever.
    pub fn delete_variable(&mut self, id: VariableId) -> Result<(), ModelStoreError> {
        let data = self
            .variables
            .remove(&id)
            .ok_or(ModelStoreError::BadVariableId(id))?;
        for constraint in &data.constraints {
            self.matrix.remove(&(*constraint, id));
            if let Some(row) = self.linear_constraints.get_mut(constraint) {
                row.variables.remove(&id);
            }
        }
        self.objective.linear_terms.remove(&id);
        self.objective.quadratic_terms.delete_variable(id);
        self.for_each_live_tracker(|state| {
            if state.variable_is_old(id) {
                state.dirty.variable_deletes.insert(id);
            }
        });
        tracing::debug!(
            component = "store",
            operation = "delete_variable",
            status = "success",
            id = id.inner(),
            purged_matrix_entries = data.constraints.len(),
            "Deleted variable"
        );
        Ok(())
    }

    pub fn set_variable_lb(
        &mut self,
        id: VariableId,
        value: impl Into<NumericValue>,
    ) -> Result<(), ModelStoreError> {
        let value = value.into();
        let data = self
            .variables
            .get_mut(&id)
            .ok_or(ModelStoreError::BadVariableId(id))?;
        if NumericValue::Real(data.lower_bound) == value {
            return Ok(());
        }
        data.lower_bound = value.as_f64();
        self.for_each_live_tracker(|state| {
            if state.variable_is_old(id) {
                state.dirty.variable_lower_bounds.insert(id);
            }
        });
        Ok(())
    }

    pub fn set_variable_ub(
        &mut self,
        id: VariableId,
        value: impl Into<NumericValue>,
    ) -> Result<(), ModelStoreError> {
        let value = value.into();
        let data = self
            .variables
            .get_mut(&id)
            .ok_or(ModelStoreError::BadVariableId(id))?;
        if NumericValue::Real(data.upper_bound) == value {
            return Ok(());
        }
        data.upper_bound = value.as_f64();
        self.for_each_live_tracker(|state| {
            if state.variable_is_old(id) {
                state.dirty.variable_upper_bounds.insert(id);
            }
        });
        Ok(())
    }

    pub fn set_variable_is_integer(
        &mut self,
        id: VariableId,
        is_integer: bool,
    ) -> Result<(), ModelStoreError> {
        let data = self
            .variables
            .get_mut(&id)
            .ok_or(ModelStoreError::BadVariableId(id))?;
        if data.is_integer == is_integer {
            return Ok(());
        }
        data.is_integer = is_integer;
        self.for_each_live_tracker(|state| {
            if state.variable_is_old(id) {
                state.dirty.variable_integers.insert(id);
            }
        });
        Ok(())
    }

    /// Add a linear constraint and return its id.
    pub fn add_linear_constraint(
        &mut self,
        lower_bound: f64,
        upper_bound: f64,
        name: impl Into<String>,
    ) -> LinearConstraintId {
        let id = LinearConstraintId::new(self.next_linear_constraint_id);
        self.next_linear_constraint_id += 1;
        self.linear_constraints.insert(
            id,
            ConstraintData {
                lower_bound,
                upper_bound,
                name: name.into(),
                variables: BTreeSet::new(),
            },
        );
        tracing::debug!(
            component = "store",
            operation = "add_linear_constraint",
            status = "success",
            id = id.inner(),
            "Added linear constraint"
        );
        id
    }

    /// Delete a linear constraint, purging its matrix row and the
    /// adjacency membership of every variable it touched.
    pub fn delete_linear_constraint(
        &mut self,
        id: LinearConstraintId,
    ) -> Result<(), ModelStoreError> {
        let data = self
            .linear_constraints
            .remove(&id)
            .ok_or(ModelStoreError::BadLinearConstraintId(id))?;
        for variable in &data.variables {
            self.matrix.remove(&(id, *variable));
            if let Some(column) = self.variables.get_mut(variable) {
                column.constraints.remove(&id);
            }
        }
        self.for_each_live_tracker(|state| {
            if state.linear_constraint_is_old(id) {
                state.dirty.linear_constraint_deletes.insert(id);
            }
        });
        tracing::debug!(
            component = "store",
            operation = "delete_linear_constraint",
            status = "success",
            id = id.inner(),
            purged_matrix_entries = data.variables.len(),
            "Deleted linear constraint"
        );
        Ok(())
    }

    pub fn set_linear_constraint_lb(
        &mut self,
        id: LinearConstraintId,
        value: impl Into<NumericValue>,
    ) -> Result<(), ModelStoreError> {
        let value = value.into();
        let data = self
            .linear_constraints
            .get_mut(&id)
            .ok_or(ModelStoreError::BadLinearConstraintId(id))?;
        if NumericValue::Real(data.lower_bound) == value {
            return Ok(());
        }
        data.lower_bound = value.as_f64();
        self.for_each_live_tracker(|state| {
            if state.linear_constraint_is_old(id) {
                state.dirty.linear_constraint_lower_bounds.insert(id);
            }
        });
        Ok(())
    }

    pub fn set_linear_constraint_ub(
        &mut self,
        id: LinearConstraintId,
        value: impl Into<NumericValue>,
    ) -> Result<(), ModelStoreError> {
        let value = value.into();
        let data = self
            .linear_constraints
            .get_mut(&id)
            .ok_or(ModelStoreError::BadLinearConstraintId(id))?;
        if NumericValue::Real(data.upper_bound) == value {
            return Ok(());
        }
        data.upper_bound = value.as_f64();
        self.for_each_live_tracker(|state| {
            if state.linear_constraint_is_old(id) {
                state.dirty.linear_constraint_upper_bounds.insert(id);
            }
        });
        Ok(())
    }

    /// Set a constraint-matrix coefficient.
    ///
    /// A zero value removes the entry and both adjacency memberships;
    /// rewriting the stored value is a no-op either way.
    pub fn set_linear_constraint_coefficient(
        &mut self,
        constraint: LinearConstraintId,
        variable: VariableId,
        value: impl Into<NumericValue>,
    ) -> Result<(), ModelStoreError> {
        let value = value.into();
        self.ensure_linear_constraint_exists(constraint)?;
        self.ensure_variable_exists(variable)?;

        let key = (constraint, variable);
        let changed = if value.is_zero() {
            if self.matrix.remove(&key).is_none() {
                false
            } else {
                if let Some(row) = self.linear_constraints.get_mut(&constraint) {
                    row.variables.remove(&variable);
                }
                if let Some(column) = self.variables.get_mut(&variable) {
                    column.constraints.remove(&constraint);
                }
                true
            }
        } else {
            match self.matrix.entry(key) {
                Entry::Occupied(mut occupied) => {
                    if NumericValue::Real(*occupied.get()) == value {
                        false
                    } else {
                        occupied.insert(value.as_f64());
                        true
                    }
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(value.as_f64());
                    if let Some(row) = self.linear_constraints.get_mut(&constraint) {
                        row.variables.insert(variable);
                    }
                    if let Some(column) = self.variables.get_mut(&variable) {
                        column.constraints.insert(constraint);
                    }
                    true
                }
            }
        };
        if changed {
            self.for_each_live_tracker(|state| {
                if state.linear_constraint_is_old(constraint) && state.variable_is_old(variable) {
                    state.dirty.linear_constraint_matrix.insert(key);
                }
            });
        }
        Ok(())
    }

    pub fn set_linear_objective_coefficient(
        &mut self,
        variable: VariableId,
        value: impl Into<NumericValue>,
    ) -> Result<(), ModelStoreError> {
        self.ensure_variable_exists(variable)?;
        self.apply_linear_objective_coefficient(variable, value.into());
        Ok(())
    }

    /// Set a quadratic objective coefficient; the pair is unordered.
    pub fn set_quadratic_objective_coefficient(
        &mut self,
        a: VariableId,
        b: VariableId,
        value: impl Into<NumericValue>,
    ) -> Result<(), ModelStoreError> {
        self.ensure_variable_exists(a)?;
        self.ensure_variable_exists(b)?;
        self.apply_quadratic_objective_coefficient(QuadraticKey::new(a, b), value.into());
        Ok(())
    }

    /// Set the optimization direction. No dirt when unchanged.
    pub fn set_is_maximize(&mut self, maximize: bool) {
        if self.objective.maximize == maximize {
            return;
        }
        self.objective.maximize = maximize;
        self.for_each_live_tracker(|state| state.dirty.objective_direction = true);
    }

    pub fn set_objective_offset(&mut self, value: impl Into<NumericValue>) {
        let value = value.into();
        if NumericValue::Real(self.objective.offset) == value {
            return;
        }
        self.objective.offset = value.as_f64();
        self.for_each_live_tracker(|state| state.dirty.objective_offset = true);
    }

    /// Clear the objective: offset to 0 and every linear/quadratic term
    /// removed. The direction is untouched.
    ///
    /// Clearing is an explicit zero-broadcast: every term goes through the
    /// ordinary setter path with value 0, so trackers that predate a
    /// variable see a field-level zero for it rather than a silent
    /// disappearance.
    pub fn clear_objective(&mut self) {
        let linear: Vec<VariableId> = self.objective.linear_terms.keys().copied().collect();
        let quadratic: Vec<QuadraticKey> =
            self.objective.quadratic_terms.terms().map(|(key, _)| key).collect();

        self.set_objective_offset(0.0);
        for variable in &linear {
            self.apply_linear_objective_coefficient(*variable, NumericValue::Real(0.0));
        }
        for key in &quadratic {
            self.apply_quadratic_objective_coefficient(*key, NumericValue::Real(0.0));
        }
        tracing::debug!(
            component = "store",
            operation = "clear_objective",
            status = "success",
            linear_terms = linear.len(),
            quadratic_terms = quadratic.len(),
            "Cleared objective"
        );
    }

    // Shared by the public setter and clear_objective; ids already known
    // to be live.
    fn apply_linear_objective_coefficient(&mut self, variable: VariableId, value: NumericValue) {
        let changed = if value.is_zero() {
            self.objective.linear_terms.remove(&variable).is_some()
        } else {
            match self.objective.linear_terms.entry(variable) {
                Entry::Occupied(mut occupied) => {
                    if NumericValue::Real(*occupied.get()) == value {
                        false
                    } else {
                        occupied.insert(value.as_f64());
                        true
                    }
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(value.as_f64());
                    true
                }
            }
        };
        if changed {
            self.for_each_live_tracker(|state| {
                if state.variable_is_old(variable) {
                    state.dirty.linear_objective_coefficients.insert(variable);
                }
            });
        }
    }

    fn apply_quadratic_objective_coefficient(&mut self, key: QuadraticKey, value: NumericValue) {
        let changed = self
            .objective
            .quadratic_terms
            .set_coefficient(key.first(), key.second(), value);
        if changed {
            self.for_each_live_tracker(|state| {
                // first <= second, so the pair is old iff its larger id is.
                if state.variable_is_old(key.second()) {
                    state.dirty.quadratic_objective_coefficients.insert(key);
                }
            });
        }
    }
}
