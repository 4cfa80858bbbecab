use super::support::store_with_two_variables;
use super::*;

fn replay(snapshot: &ModelSnapshot) -> ModelStore {
    let mut store = ModelStore::new(snapshot.name.clone());
    let variables = &snapshot.variables;
    for i in 0..variables.ids.len() {
        let name = variables
            .names
            .as_ref()
            .map_or("", |names| names[i].as_str());
        store.add_variable(
            variables.lower_bounds[i],
            variables.upper_bounds[i],
            variables.integers[i],
            name,
        );
    }
    let constraints = &snapshot.linear_constraints;
    for i in 0..constraints.ids.len() {
        let name = constraints
            .names
            .as_ref()
            .map_or("", |names| names[i].as_str());
        store.add_linear_constraint(constraints.lower_bounds[i], constraints.upper_bounds[i], name);
    }
    store.set_is_maximize(snapshot.objective.maximize);
    store.set_objective_offset(snapshot.objective.offset);
    let linear = &snapshot.objective.linear_coefficients;
    for (i, &id) in linear.ids.iter().enumerate() {
        store
            .set_linear_objective_coefficient(VariableId::new(id), linear.values[i])
            .unwrap();
    }
    let quadratic = &snapshot.objective.quadratic_coefficients;
    for (i, &row) in quadratic.row_ids.iter().enumerate() {
        store
            .set_quadratic_objective_coefficient(
                VariableId::new(row),
                VariableId::new(quadratic.column_ids[i]),
                quadratic.coefficients[i],
            )
            .unwrap();
    }
    let matrix = &snapshot.linear_constraint_matrix;
    for (i, &row) in matrix.row_ids.iter().enumerate() {
        store
            .set_linear_constraint_coefficient(
                LinearConstraintId::new(row),
                VariableId::new(matrix.column_ids[i]),
                matrix.coefficients[i],
            )
            .unwrap();
    }
    store
}

#[test]
fn test_concrete_scenario_snapshot() {
    let mut store = ModelStore::new("m");
    let x = store.add_variable(-1.0, 2.5, true, "x");
    let y = store.add_variable(-1.0, 2.5, false, "");
    let c = store.add_linear_constraint(f64::NEG_INFINITY, 3.0, "");
    assert_eq!(x.inner(), 0);
    assert_eq!(y.inner(), 1);
    assert_eq!(c.inner(), 0);
    store.set_linear_constraint_coefficient(c, y, 1.0).unwrap();
    store.set_linear_objective_coefficient(x, 2.5).unwrap();
    store.set_is_maximize(true);
    store.set_objective_offset(7.0);

    let snapshot = store.export_model();
    assert_eq!(snapshot.name, "m");
    assert_eq!(snapshot.variables.ids, vec![0, 1]);
    assert_eq!(snapshot.variables.lower_bounds, vec![-1.0, -1.0]);
    assert_eq!(snapshot.variables.upper_bounds, vec![2.5, 2.5]);
    assert_eq!(snapshot.variables.integers, vec![true, false]);
    assert_eq!(
        snapshot.variables.names,
        Some(vec!["x".to_string(), String::new()])
    );

    assert_eq!(snapshot.linear_constraints.ids, vec![0]);
    assert_eq!(
        snapshot.linear_constraints.lower_bounds,
        vec![f64::NEG_INFINITY]
    );
    assert_eq!(snapshot.linear_constraints.upper_bounds, vec![3.0]);
    assert_eq!(snapshot.linear_constraints.names, None);

    assert!(snapshot.objective.maximize);
    assert_eq!(snapshot.objective.offset, 7.0);
    assert_eq!(snapshot.objective.linear_coefficients.ids, vec![0]);
    assert_eq!(snapshot.objective.linear_coefficients.values, vec![2.5]);
    assert!(snapshot.objective.quadratic_coefficients.is_empty());

    assert_eq!(snapshot.linear_constraint_matrix.row_ids, vec![0]);
    assert_eq!(snapshot.linear_constraint_matrix.column_ids, vec![1]);
    assert_eq!(snapshot.linear_constraint_matrix.coefficients, vec![1.0]);
}

#[test]
fn test_names_omitted_when_every_name_is_empty() {
    let (store, _x, _y) = store_with_two_variables();
    let snapshot = store.export_model();
    assert_eq!(snapshot.variables.names, None);
}

#[test]
fn test_names_emitted_in_full_when_any_nonempty() {
    let mut store = ModelStore::new("m");
    store.add_variable(0.0, 1.0, false, "");
    store.add_variable(0.0, 1.0, false, "named");
    let snapshot = store.export_model();
    assert_eq!(
        snapshot.variables.names,
        Some(vec![String::new(), "named".to_string()])
    );
}

#[test]
fn test_round_trip_replay_is_identical() {
    let mut store = ModelStore::new("trip");
    let x = store.add_variable(-1.0, 2.0, true, "x");
    let y = store.add_variable(0.0, f64::INFINITY, false, "");
    let c = store.add_linear_constraint(1.0, 4.0, "cap");
    let d = store.add_linear_constraint(f64::NEG_INFINITY, 0.0, "");
    store.set_linear_constraint_coefficient(c, x, 1.5).unwrap();
    store.set_linear_constraint_coefficient(d, x, -2.0).unwrap();
    store.set_linear_constraint_coefficient(d, y, 3.0).unwrap();
    store.set_linear_objective_coefficient(y, 0.5).unwrap();
    store.set_quadratic_objective_coefficient(x, y, 2.0).unwrap();
    store.set_quadratic_objective_coefficient(x, x, 1.0).unwrap();
    store.set_is_maximize(true);
    store.set_objective_offset(-4.5);

    let snapshot = store.export_model();
    let replayed = replay(&snapshot);
    assert_eq!(replayed.export_model(), snapshot);
}

#[test]
fn test_nan_and_infinity_survive_export() {
    let mut store = ModelStore::new("m");
    let x = store.add_variable(f64::NAN, f64::INFINITY, false, "");
    store.set_objective_offset(f64::NAN);
    store.set_linear_objective_coefficient(x, f64::NAN).unwrap();

    let snapshot = store.export_model();
    assert!(snapshot.variables.lower_bounds[0].is_nan());
    assert_eq!(snapshot.variables.upper_bounds[0], f64::INFINITY);
    assert!(snapshot.objective.offset.is_nan());
    assert!(snapshot.objective.linear_coefficients.values[0].is_nan());
}

#[test]
fn test_snapshot_json_omits_names_key() {
    let (store, _x, _y) = store_with_two_variables();
    let json = serde_json::to_value(store.export_model()).unwrap();
    assert!(json["variables"].get("names").is_none());
    assert!(json["linear_constraints"].get("names").is_none());
    assert_eq!(json["variables"]["ids"], serde_json::json!([0, 1]));
}

#[test]
fn test_snapshot_is_sorted_after_unordered_mutation() {
    let mut store = ModelStore::new("m");
    let x = store.add_variable(0.0, 1.0, false, "");
    let y = store.add_variable(0.0, 1.0, false, "");
    let z = store.add_variable(0.0, 1.0, false, "");
    let c = store.add_linear_constraint(0.0, 9.0, "");
    // Insert in descending id order; export must come back ascending.
    store.set_linear_constraint_coefficient(c, z, 3.0).unwrap();
    store.set_linear_constraint_coefficient(c, x, 1.0).unwrap();
    store.set_quadratic_objective_coefficient(z, y, 6.0).unwrap();
    store.set_quadratic_objective_coefficient(y, x, 4.0).unwrap();

    let snapshot = store.export_model();
    assert_eq!(snapshot.linear_constraint_matrix.column_ids, vec![0, 2]);
    assert_eq!(snapshot.objective.quadratic_coefficients.row_ids, vec![0, 1]);
    assert_eq!(
        snapshot.objective.quadratic_coefficients.column_ids,
        vec![1, 2]
    );
}
