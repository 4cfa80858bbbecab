//! Shared vocabulary types for the modelstore crates.

pub mod ids;
pub mod pair;
pub mod value;

pub use ids::{LinearConstraintId, VariableId};
pub use pair::QuadraticKey;
pub use value::NumericValue;
