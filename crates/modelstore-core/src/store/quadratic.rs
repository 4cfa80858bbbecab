//! Symmetric sparse storage for quadratic objective terms.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use modelstore_types::{NumericValue, QuadraticKey, VariableId};

/// Sparse map from unordered variable pairs to coefficients.
///
/// Keeps a per-variable adjacency set so that deleting a variable, or
/// enumerating its terms, is O(degree) instead of O(total terms). A
/// variable is adjacent to itself when it has a diagonal term.
#[derive(Debug, Clone, Default)]
pub struct QuadraticTermTable {
    coefficients: BTreeMap<QuadraticKey, f64>,
    adjacent: BTreeMap<VariableId, BTreeSet<VariableId>>,
}

impl QuadraticTermTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored terms.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Set the coefficient for the pair `(a, b)` (order irrelevant).
    ///
    /// A zero value removes the entry and its adjacency edges. Returns
    /// whether storage changed; rewriting the stored value (NaN included)
    /// is a no-op.
    pub fn set_coefficient(&mut self, a: VariableId, b: VariableId, value: NumericValue) -> bool {
        let key = QuadraticKey::new(a, b);
        if value.is_zero() {
            if self.coefficients.remove(&key).is_none() {
                return false;
            }
            self.remove_adjacency(key);
            return true;
        }
        match self.coefficients.entry(key) {
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
                self.adjacent.entry(key.first()).or_default().insert(key.second());
                if !key.is_diagonal() {
                    self.adjacent.entry(key.second()).or_default().insert(key.first());
                }
                true
            }
        }
    }

    /// Get the coefficient for the pair `(a, b)`, 0 if absent.
    pub fn get_coefficient(&self, a: VariableId, b: VariableId) -> f64 {
        self.coefficients
            .get(&QuadraticKey::new(a, b))
            .copied()
            .unwrap_or(0.0)
    }

    /// Variables sharing a nonzero term with `v`, ascending; empty if none.
    pub fn adjacent_variables(&self, v: VariableId) -> impl Iterator<Item = VariableId> + '_ {
        self.adjacent
            .get(&v)
            .into_iter()
            .flat_map(|partners| partners.iter().copied())
    }

    /// Remove every term involving `v` and all reverse-adjacency edges.
    pub fn delete_variable(&mut self, v: VariableId) {
        let Some(partners) = self.adjacent.remove(&v) else {
            return;
        };
        for w in partners {
            self.coefficients.remove(&QuadraticKey::new(v, w));
            if w != v {
                if let Some(back) = self.adjacent.get_mut(&w) {
                    back.remove(&v);
                    if back.is_empty() {
                        self.adjacent.remove(&w);
                    }
                }
            }
        }
    }

    /// Drop all terms and adjacency.
    pub fn clear(&mut self) {
        self.coefficients.clear();
        self.adjacent.clear();
    }

    /// All terms, ascending by `(first, second)` key.
    pub fn terms(&self) -> impl Iterator<Item = (QuadraticKey, f64)> + '_ {
        self.coefficients.iter().map(|(&key, &coeff)| (key, coeff))
    }

    fn remove_adjacency(&mut self, key: QuadraticKey) {
        if let Some(partners) = self.adjacent.get_mut(&key.first()) {
            partners.remove(&key.second());
            if partners.is_empty() {
                self.adjacent.remove(&key.first());
            }
        }
        if !key.is_diagonal() {
            if let Some(partners) = self.adjacent.get_mut(&key.second()) {
                partners.remove(&key.first());
                if partners.is_empty() {
                    self.adjacent.remove(&key.second());
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn v(id: u64) -> VariableId {
        VariableId::new(id)
    }

    #[test]
    fn test_set_and_get_are_symmetric() {
        let mut table = QuadraticTermTable::new();
        assert!(table.set_coefficient(v(1), v(0), 2.5.into()));
        assert_eq!(table.get_coefficient(v(0), v(1)), 2.5);
        assert_eq!(table.get_coefficient(v(1), v(0)), 2.5);
    }

    #[test]
    fn test_absent_pair_reads_zero() {
        let table = QuadraticTermTable::new();
        assert_eq!(table.get_coefficient(v(0), v(1)), 0.0);
    }

    #[test]
    fn test_zero_on_absent_pair_is_noop() {
        let mut table = QuadraticTermTable::new();
        assert!(!table.set_coefficient(v(0), v(1), 0.0.into()));
        assert!(table.is_empty());
    }

    #[test]
    fn test_zero_removes_entry_and_adjacency() {
        let mut table = QuadraticTermTable::new();
        table.set_coefficient(v(0), v(1), 3.0.into());
        assert!(table.set_coefficient(v(1), v(0), 0.0.into()));
        assert!(table.is_empty());
        assert_eq!(table.adjacent_variables(v(0)).count(), 0);
        assert_eq!(table.adjacent_variables(v(1)).count(), 0);
    }

    #[test]
    fn test_rewrite_same_value_is_noop() {
        let mut table = QuadraticTermTable::new();
        table.set_coefficient(v(0), v(1), 3.0.into());
        assert!(!table.set_coefficient(v(0), v(1), 3.0.into()));
        assert!(table.set_coefficient(v(0), v(1), 4.0.into()));
    }

    #[test]
    fn test_diagonal_term_single_adjacency() {
        let mut table = QuadraticTermTable::new();
        table.set_coefficient(v(2), v(2), 1.0.into());
        let partners: Vec<_> = table.adjacent_variables(v(2)).collect();
        assert_eq!(partners, vec![v(2)]);

        table.set_coefficient(v(2), v(2), 0.0.into());
        assert_eq!(table.adjacent_variables(v(2)).count(), 0);
    }

    #[test]
    fn test_delete_variable_purges_terms_and_back_edges() {
        let mut table = QuadraticTermTable::new();
        table.set_coefficient(v(0), v(1), 1.0.into());
        table.set_coefficient(v(0), v(2), 2.0.into());
        table.set_coefficient(v(0), v(0), 3.0.into());
        table.set_coefficient(v(1), v(2), 4.0.into());

        table.delete_variable(v(0));

        assert_eq!(table.get_coefficient(v(0), v(1)), 0.0);
        assert_eq!(table.get_coefficient(v(0), v(0)), 0.0);
        assert_eq!(table.get_coefficient(v(1), v(2)), 4.0);
        assert_eq!(
            table.adjacent_variables(v(1)).collect::<Vec<_>>(),
            vec![v(2)]
        );
        assert_eq!(table.adjacent_variables(v(0)).count(), 0);
    }

    #[test]
    fn test_terms_iterate_sorted() {
        let mut table = QuadraticTermTable::new();
        table.set_coefficient(v(3), v(1), 1.0.into());
        table.set_coefficient(v(0), v(2), 2.0.into());
        table.set_coefficient(v(0), v(0), 3.0.into());

        let keys: Vec<_> = table.terms().map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            vec![
                QuadraticKey::new(v(0), v(0)),
                QuadraticKey::new(v(0), v(2)),
                QuadraticKey::new(v(1), v(3)),
            ]
        );
    }

    #[test]
    fn test_nan_coefficient_round_trips() {
        let mut table = QuadraticTermTable::new();
        assert!(table.set_coefficient(v(0), v(1), f64::NAN.into()));
        assert!(table.get_coefficient(v(0), v(1)).is_nan());
        // NaN over NaN is a no-op, NaN over a number is a change.
        assert!(!table.set_coefficient(v(0), v(1), f64::NAN.into()));
        assert!(table.set_coefficient(v(0), v(1), 1.0.into()));
    }

    #[test]
    fn test_clear() {
        let mut table = QuadraticTermTable::new();
        table.set_coefficient(v(0), v(1), 1.0.into());
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.adjacent_variables(v(0)).count(), 0);
    }
}
