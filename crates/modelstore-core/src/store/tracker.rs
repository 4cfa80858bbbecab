//! Update tracker registry, checkpoints, and dirty state.
//!
//! Tracker state is owned by the store in an arena of slots with a
//! liveness flag; callers hold only a `Copy` handle. Dropping a handle
//! without removing the tracker leaves a live slot behind but never
//! breaks the store. Handles carry a per-store token so a handle from a
//! different store is rejected instead of addressing the wrong slot.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use modelstore_types::{LinearConstraintId, QuadraticKey, VariableId};

use super::error::ModelStoreError;
use super::ModelStore;

static NEXT_STORE_TOKEN: AtomicU64 = AtomicU64::new(0);

pub(crate) fn next_store_token() -> u64 {
    NEXT_STORE_TOKEN.fetch_add(1, Ordering::Relaxed)
}

/// Handle to an update tracker registered on a [`ModelStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpdateTrackerId {
    pub(crate) store_token: u64,
    pub(crate) slot: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct TrackerSlot {
    pub(crate) live: bool,
    pub(crate) state: TrackerState,
}

/// Checkpoints plus everything recorded as changed since them.
///
/// Trackers never cache values, only ids: current values are read live
/// from the store at export time. Dirt is recorded only for ids below
/// the relevant checkpoint; newer entities are exported wholesale.
#[derive(Debug, Clone, Default)]
pub(crate) struct TrackerState {
    pub(crate) variables_checkpoint: u64,
    pub(crate) linear_constraints_checkpoint: u64,
    pub(crate) dirty: DirtyState,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct DirtyState {
    pub(crate) variable_deletes: BTreeSet<VariableId>,
    pub(crate) variable_lower_bounds: BTreeSet<VariableId>,
    pub(crate) variable_upper_bounds: BTreeSet<VariableId>,
    pub(crate) variable_integers: BTreeSet<VariableId>,
    pub(crate) linear_objective_coefficients: BTreeSet<VariableId>,
    pub(crate) quadratic_objective_coefficients: BTreeSet<QuadraticKey>,
    pub(crate) linear_constraint_deletes: BTreeSet<LinearConstraintId>,
    pub(crate) linear_constraint_lower_bounds: BTreeSet<LinearConstraintId>,
    pub(crate) linear_constraint_upper_bounds: BTreeSet<LinearConstraintId>,
    pub(crate) linear_constraint_matrix: BTreeSet<(LinearConstraintId, VariableId)>,
    pub(crate) objective_direction: bool,
    pub(crate) objective_offset: bool,
}

impl DirtyState {
    pub(crate) fn is_empty(&self) -> bool {
        self.variable_deletes.is_empty()
            && self.variable_lower_bounds.is_empty()
            && self.variable_upper_bounds.is_empty()
            && self.variable_integers.is_empty()
            && self.linear_objective_coefficients.is_empty()
            && self.quadratic_objective_coefficients.is_empty()
            && self.linear_constraint_deletes.is_empty()
            && self.linear_constraint_lower_bounds.is_empty()
            && self.linear_constraint_upper_bounds.is_empty()
            && self.linear_constraint_matrix.is_empty()
            && !self.objective_direction
            && !self.objective_offset
    }
}

impl TrackerState {
    /// True when `id` predates the variable checkpoint (an "old" entity).
    pub(crate) fn variable_is_old(&self, id: VariableId) -> bool {
        id.inner() < self.variables_checkpoint
    }

    pub(crate) fn linear_constraint_is_old(&self, id: LinearConstraintId) -> bool {
        id.inner() < self.linear_constraints_checkpoint
    }
}

impl ModelStore {
    /// Register a new update tracker checkpointed at the current state.
    pub fn add_update_tracker(&mut self) -> UpdateTrackerId {
        let slot = self.trackers.len();
        self.trackers.push(TrackerSlot {
            live: true,
            state: TrackerState {
                variables_checkpoint: self.next_variable_id,
                linear_constraints_checkpoint: self.next_linear_constraint_id,
                dirty: DirtyState::default(),
            },
        });
        tracing::debug!(
            component = "store",
            operation = "add_update_tracker",
            status = "success",
            slot,
            "Registered update tracker"
        );
        UpdateTrackerId {
            store_token: self.token,
            slot,
        }
    }

    /// Retire a tracker. A second removal of the same handle is an error.
    pub fn remove_update_tracker(
        &mut self,
        tracker: UpdateTrackerId,
    ) -> Result<(), ModelStoreError> {
        if tracker.store_token != self.token {
            return Err(ModelStoreError::UnknownTracker);
        }
        match self.trackers.get_mut(tracker.slot) {
            Some(slot) if slot.live => {
                slot.live = false;
                slot.state = TrackerState::default();
                tracing::debug!(
                    component = "store",
                    operation = "remove_update_tracker",
                    status = "success",
                    slot = tracker.slot,
                    "Removed update tracker"
                );
                Ok(())
            }
            _ => Err(ModelStoreError::UnknownTracker),
        }
    }

    /// Discard all pending dirt and move both checkpoints to the present.
    pub fn advance_checkpoint(&mut self, tracker: UpdateTrackerId) -> Result<(), ModelStoreError> {
        let variables_checkpoint = self.next_variable_id;
        let linear_constraints_checkpoint = self.next_linear_constraint_id;
        let state = self.tracker_state_mut(tracker)?;
        state.dirty = DirtyState::default();
        state.variables_checkpoint = variables_checkpoint;
        state.linear_constraints_checkpoint = linear_constraints_checkpoint;
        Ok(())
    }

    pub(crate) fn tracker_state(
        &self,
        tracker: UpdateTrackerId,
    ) -> Result<&TrackerState, ModelStoreError> {
        if tracker.store_token != self.token {
            return Err(ModelStoreError::UnknownTracker);
        }
        match self.trackers.get(tracker.slot) {
            Some(slot) if slot.live => Ok(&slot.state),
            Some(_) => Err(ModelStoreError::UsedUpdateTrackerAfterRemoval),
            None => Err(ModelStoreError::UnknownTracker),
        }
    }

    pub(crate) fn tracker_state_mut(
        &mut self,
        tracker: UpdateTrackerId,
    ) -> Result<&mut TrackerState, ModelStoreError> {
        if tracker.store_token != self.token {
            return Err(ModelStoreError::UnknownTracker);
        }
        match self.trackers.get_mut(tracker.slot) {
            Some(slot) if slot.live => Ok(&mut slot.state),
            Some(_) => Err(ModelStoreError::UsedUpdateTrackerAfterRemoval),
            None => Err(ModelStoreError::UnknownTracker),
        }
    }

    /// Run `mark` against every live tracker's state. Mutation cost is
    /// O(#live trackers).
    pub(crate) fn for_each_live_tracker(&mut self, mut mark: impl FnMut(&mut TrackerState)) {
        for slot in self.trackers.iter_mut().filter(|slot| slot.live) {
            mark(&mut slot.state);
        }
    }
}
