//! Tagged numeric values with NaN-aware change detection.
//!
//! Every "did this setter actually change anything" decision in the store
//! goes through [`NumericValue`] equality: NaN equals NaN (so rewriting a
//! NaN bound is a no-op), NaN never equals any number, and everything else
//! compares by IEEE equality.

/// A number passed to a store setter: an exact integer or an IEEE double.
#[derive(Debug, Clone, Copy)]
pub enum NumericValue {
    Integer(i64),
    Real(f64),
}

impl NumericValue {
    /// The value as an f64, the representation the store keeps.
    pub fn as_f64(self) -> f64 {
        match self {
            NumericValue::Integer(value) => value as f64,
            NumericValue::Real(value) => value,
        }
    }

    /// True when this value represents zero. NaN is never zero.
    pub fn is_zero(self) -> bool {
        match self {
            NumericValue::Integer(value) => value == 0,
            NumericValue::Real(value) => value == 0.0,
        }
    }

    pub fn is_nan(self) -> bool {
        matches!(self, NumericValue::Real(value) if value.is_nan())
    }
}

impl PartialEq for NumericValue {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (NumericValue::Integer(a), NumericValue::Integer(b)) => a == b,
            (NumericValue::Real(a), NumericValue::Real(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (NumericValue::Integer(a), NumericValue::Real(b))
            | (NumericValue::Real(b), NumericValue::Integer(a)) => a as f64 == b,
        }
    }
}

impl From<f64> for NumericValue {
    fn from(value: f64) -> Self {
        NumericValue::Real(value)
    }
}

impl From<i64> for NumericValue {
    fn from(value: i64) -> Self {
        NumericValue::Integer(value)
    }
}
