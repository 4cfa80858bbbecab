//! Read accessors for the store.

use modelstore_types::{LinearConstraintId, VariableId};

use super::error::ModelStoreError;
use super::{ModelStore, QuadraticTermTable};

impl ModelStore {
    /// The store's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of live variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of live linear constraints.
    pub fn num_linear_constraints(&self) -> usize {
        self.linear_constraints.len()
    }

    /// Number of nonzero constraint-matrix entries.
    pub fn num_matrix_entries(&self) -> usize {
        self.matrix.len()
    }

    /// Live variable ids, ascending.
    pub fn variable_ids(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.variables.keys().copied()
    }

    /// Live linear constraint ids, ascending.
    pub fn linear_constraint_ids(&self) -> impl Iterator<Item = LinearConstraintId> + '_ {
        self.linear_constraints.keys().copied()
    }

    pub fn get_variable_lb(&self, id: VariableId) -> Result<f64, ModelStoreError> {
        self.variables
            .get(&id)
            .map(|data| data.lower_bound)
            .ok_or(ModelStoreError::BadVariableId(id))
    }

    pub fn get_variable_ub(&self, id: VariableId) -> Result<f64, ModelStoreError> {
        self.variables
            .get(&id)
            .map(|data| data.upper_bound)
            .ok_or(ModelStoreError::BadVariableId(id))
    }

    pub fn get_variable_is_integer(&self, id: VariableId) -> Result<bool, ModelStoreError> {
        self.variables
            .get(&id)
            .map(|data| data.is_integer)
            .ok_or(ModelStoreError::BadVariableId(id))
    }

    pub fn get_variable_name(&self, id: VariableId) -> Result<&str, ModelStoreError> {
        self.variables
            .get(&id)
            .map(|data| data.name.as_str())
            .ok_or(ModelStoreError::BadVariableId(id))
    }

    pub fn get_linear_constraint_lb(&self, id: LinearConstraintId) -> Result<f64, ModelStoreError> {
        self.linear_constraints
            .get(&id)
            .map(|data| data.lower_bound)
            .ok_or(ModelStoreError::BadLinearConstraintId(id))
    }

    pub fn get_linear_constraint_ub(&self, id: LinearConstraintId) -> Result<f64, ModelStoreError> {
        self.linear_constraints
            .get(&id)
            .map(|data| data.upper_bound)
            .ok_or(ModelStoreError::BadLinearConstraintId(id))
    }

    pub fn get_linear_constraint_name(
        &self,
        id: LinearConstraintId,
    ) -> Result<&str, ModelStoreError> {
        self.linear_constraints
            .get(&id)
            .map(|data| data.name.as_str())
            .ok_or(ModelStoreError::BadLinearConstraintId(id))
    }

    /// Constraint-matrix coefficient, 0 if the entry is absent.
    pub fn get_linear_constraint_coefficient(
        &self,
        constraint: LinearConstraintId,
        variable: VariableId,
    ) -> Result<f64, ModelStoreError> {
        self.ensure_linear_constraint_exists(constraint)?;
        self.ensure_variable_exists(variable)?;
        Ok(self
            .matrix
            .get(&(constraint, variable))
            .copied()
            .unwrap_or(0.0))
    }

    /// Variables with a nonzero coefficient in `constraint`, ascending.
    pub fn variables_in_linear_constraint(
        &self,
        constraint: LinearConstraintId,
    ) -> Result<impl Iterator<Item = VariableId> + '_, ModelStoreError> {
        self.linear_constraints
            .get(&constraint)
            .map(|data| data.variables.iter().copied())
            .ok_or(ModelStoreError::BadLinearConstraintId(constraint))
    }

    /// Constraints in which `variable` has a nonzero coefficient, ascending.
    pub fn linear_constraints_with_variable(
        &self,
        variable: VariableId,
    ) -> Result<impl Iterator<Item = LinearConstraintId> + '_, ModelStoreError> {
        self.variables
            .get(&variable)
            .map(|data| data.constraints.iter().copied())
            .ok_or(ModelStoreError::BadVariableId(variable))
    }

    /// Linear objective coefficient, 0 if the variable has no term.
    pub fn get_linear_objective_coefficient(
        &self,
        variable: VariableId,
    ) -> Result<f64, ModelStoreError> {
        self.ensure_variable_exists(variable)?;
        Ok(self
            .objective
            .linear_terms
            .get(&variable)
            .copied()
            .unwrap_or(0.0))
    }

    /// Quadratic objective coefficient for the unordered pair `(a, b)`.
    pub fn get_quadratic_objective_coefficient(
        &self,
        a: VariableId,
        b: VariableId,
    ) -> Result<f64, ModelStoreError> {
        self.ensure_variable_exists(a)?;
        self.ensure_variable_exists(b)?;
        Ok(self.objective.quadratic_terms.get_coefficient(a, b))
    }

    pub fn get_is_maximize(&self) -> bool {
        self.objective.maximize
    }

    pub fn get_objective_offset(&self) -> f64 {
        self.objective.offset
    }

    /// Read-only view of the quadratic objective terms and adjacency.
    pub fn quadratic_objective_terms(&self) -> &QuadraticTermTable {
        &self.objective.quadratic_terms
    }
}
