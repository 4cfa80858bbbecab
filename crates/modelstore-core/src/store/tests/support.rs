use super::*;

pub(super) fn store_with_two_variables() -> (ModelStore, VariableId, VariableId) {
    let mut store = ModelStore::new("m");
    let x = store.add_variable(0.0, 10.0, false, "");
    let y = store.add_variable(0.0, 10.0, false, "");
    (store, x, y)
}

pub(super) fn store_with_constraint() -> ModelStore {
    let mut store = ModelStore::new("m");
    store.add_linear_constraint(0.0, 1.0, "");
    store
}
