//! Normalized unordered variable pairs for quadratic terms.

use crate::ids::VariableId;

/// Key for a symmetric quadratic term, always stored as `(min, max)`.
///
/// The constructor does the ordering, so call sites never need to
/// normalize and lookups with swapped arguments agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuadraticKey {
    first: VariableId,
    second: VariableId,
}

impl QuadraticKey {
    pub fn new(a: VariableId, b: VariableId) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    /// The smaller variable id of the pair.
    pub fn first(self) -> VariableId {
        self.first
    }

    /// The larger variable id of the pair.
    pub fn second(self) -> VariableId {
        self.second
    }

    /// True for diagonal terms (`x * x`).
    pub fn is_diagonal(self) -> bool {
        self.first == self.second
    }
}
