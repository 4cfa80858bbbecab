//! Incremental optimization-model store.
//!
//! An in-memory mixed-integer/quadratic model (variables, linear
//! constraints, objective, constraint matrix) that any number of update
//! trackers can observe. Each tracker exports the minimal diff of
//! everything that changed since its last checkpoint, without pausing
//! mutation, with deleted entities tombstoned and their dependent state
//! purged everywhere.

pub mod store;

pub use store::{
    LinearConstraintSnapshot, LinearConstraintUpdates, ModelSnapshot, ModelStore, ModelStoreError,
    ModelUpdate, ObjectiveSnapshot, ObjectiveUpdates, QuadraticTermTable, SparseMatrix,
    SparseVector, UpdateTrackerId, VariableSnapshot, VariableUpdates,
};

pub use modelstore_types::{LinearConstraintId, NumericValue, QuadraticKey, VariableId};
