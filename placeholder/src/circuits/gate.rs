//! Gates, copy constraints and lookup gates.

use super::{expr::Constraint, expr::Term, variable::Variable};
use ark_ff::Field;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

/// A set of constraints enforced on every row where the selector column
/// `selector_index` is one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub struct Gate<F> {
    pub selector_index: usize,
    pub constraints: Vec<Constraint<F>>,
}

impl<F: Field> Gate<F> {
    pub fn new(selector_index: usize, constraints: Vec<Constraint<F>>) -> Self {
        Self {
            selector_index,
            constraints,
        }
    }
}

/// Forces two absolute cells to hold the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConstraint(pub Variable, pub Variable);

/// Looks the tuple `lookup_input` up among the rows of the tuple of columns
/// `lookup_value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub struct LookupConstraint<F> {
    pub lookup_input: Vec<Term<F>>,
    pub lookup_value: Vec<Variable>,
}

/// Lookup constraints enforced where the selector `selector_index` is one.
/// The input of the gate is the concatenation of the inputs of its
/// constraints, and likewise for the looked up value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub struct LookupGate<F> {
    pub selector_index: usize,
    pub constraints: Vec<LookupConstraint<F>>,
}

impl<F: Field> LookupGate<F> {
    pub fn new(selector_index: usize, constraints: Vec<LookupConstraint<F>>) -> Self {
        Self {
            selector_index,
            constraints,
        }
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Term<F>> {
        self.constraints
            .iter()
            .flat_map(|constraint| constraint.lookup_input.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &Variable> {
        self.constraints
            .iter()
            .flat_map(|constraint| constraint.lookup_value.iter())
    }
}
