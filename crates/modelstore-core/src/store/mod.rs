//! The model store and its update trackers.
//!
//! # Module Organization
//!
//! - [`error`]: store error types
//! - [`builder`]: mutating operations (add, set, delete, objective editing)
//! - [`storage`]: read accessors
//! - [`quadratic`]: symmetric sparse quadratic term table
//! - [`tracker`]: per-observer checkpoints and dirty state
//! - [`export`]: full-snapshot and diff-snapshot export

mod builder;
mod error;
mod export;
mod quadratic;
mod storage;
mod tracker;

use std::collections::{BTreeMap, BTreeSet};

use modelstore_types::{LinearConstraintId, VariableId};

pub use error::ModelStoreError;
pub use export::{
    LinearConstraintSnapshot, LinearConstraintUpdates, ModelSnapshot, ModelUpdate,
    ObjectiveSnapshot, ObjectiveUpdates, SparseMatrix, SparseVector, VariableSnapshot,
    VariableUpdates,
};
pub use quadratic::QuadraticTermTable;
pub use tracker::UpdateTrackerId;

use tracker::TrackerSlot;

/// A decision variable and the constraints it has a nonzero coefficient in.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VariableData {
    pub(crate) lower_bound: f64,
    pub(crate) upper_bound: f64,
    pub(crate) is_integer: bool,
    pub(crate) name: String,
    pub(crate) constraints: BTreeSet<LinearConstraintId>,
}

/// A linear constraint and the variables it has a nonzero coefficient on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConstraintData {
    pub(crate) lower_bound: f64,
    pub(crate) upper_bound: f64,
    pub(crate) name: String,
    pub(crate) variables: BTreeSet<VariableId>,
}

/// The linear + quadratic objective. Zero coefficients are never stored.
#[derive(Debug, Clone, Default)]
pub(crate) struct Objective {
    pub(crate) maximize: bool,
    pub(crate) offset: f64,
    pub(crate) linear_terms: BTreeMap<VariableId, f64>,
    pub(crate) quadratic_terms: QuadraticTermTable,
}

/// In-memory store for a mixed-integer/quadratic optimization model.
///
/// Ids are assigned by strictly increasing per-kind counters and never
/// reused after deletion. Every mutation validates its ids, skips work
/// when the new value equals the stored one, and fans a dirty bit out to
/// every live update tracker whose checkpoint covers the affected id.
#[derive(Debug, Clone)]
pub struct ModelStore {
    pub(crate) name: String,
    pub(crate) variables: BTreeMap<VariableId, VariableData>,
    pub(crate) linear_constraints: BTreeMap<LinearConstraintId, ConstraintData>,
    // Row-first sparse storage: (constraint_id, variable_id) -> coefficient.
    pub(crate) matrix: BTreeMap<(LinearConstraintId, VariableId), f64>,
    pub(crate) objective: Objective,
    pub(crate) next_variable_id: u64,
    pub(crate) next_linear_constraint_id: u64,
    pub(crate) token: u64,
    pub(crate) trackers: Vec<TrackerSlot>,
}

impl ModelStore {
    /// Create a new empty store.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: BTreeMap::new(),
            linear_constraints: BTreeMap::new(),
            matrix: BTreeMap::new(),
            objective: Objective::default(),
            next_variable_id: 0,
            next_linear_constraint_id: 0,
            token: tracker::next_store_token(),
            trackers: Vec::new(),
        }
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelStoreError> {
        if self.variables.contains_key(&id) {
            Ok(())
        } else {
            Err(ModelStoreError::BadVariableId(id))
        }
    }

    pub(crate) fn ensure_linear_constraint_exists(
        &self,
        id: LinearConstraintId,
    ) -> Result<(), ModelStoreError> {
        if self.linear_constraints.contains_key(&id) {
            Ok(())
        } else {
            Err(ModelStoreError::BadLinearConstraintId(id))
        }
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new("")
    }
}
