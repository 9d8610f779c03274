//! Extensions of the arkworks polynomial and field types used across the
//! placeholder proof system crates.

pub mod dense_polynomial;
pub mod evaluations;
pub mod field_helpers;
pub mod math;
pub mod serialization;

pub use dense_polynomial::{vanishing_polynomial, ExtendedDensePolynomial};
pub use evaluations::ExtendedEvaluations;
pub use field_helpers::FieldHelpers;
