//! This module implements the [`ProverError`] and [`SetupError`] types.

use placeholder_commitment::CommitmentError;
use thiserror::Error;

/// Errors that can arise when creating a proof
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProverError {
    #[error("the assignment does not match the table description: {0}")]
    AssignmentShape(&'static str),

    #[error("gate {gate} is not satisfied at row {row}")]
    GateNotSatisfied { gate: usize, row: usize },

    #[error("copy constraint {0} is not satisfied")]
    CopyConstraintNotSatisfied(usize),

    #[error("the permutation was not constructed correctly: {0}")]
    Permutation(&'static str),

    #[error("the lookup failed to find a match in the table: row={0}")]
    ValueNotInTable(usize),

    #[error("the lookup argument could not be constructed: {0}")]
    Lookup(&'static str),

    #[error("the constraint polynomial is not divisible by the vanishing polynomial")]
    QuotientNotExact,

    #[error("the commitment scheme failed: {0}")]
    Commitment(#[from] CommitmentError),
}

/// Errors that can arise when preparing the setup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainCreationError {
    #[error("construction of domain {0} for size {1} failed")]
    DomainConstructionFailed(String, usize),
}

/// Errors that can arise when preparing the setup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("the constraint system is invalid: {0}")]
    ConstraintSystem(String),

    #[error("the public assignment does not match the table description: {0}")]
    AssignmentShape(&'static str),

    #[error("the domain could not be constructed: {0}")]
    DomainCreation(#[from] DomainCreationError),

    #[error("the lookup constraint system cannot be constructed: {0}")]
    LookupCreation(&'static str),

    #[error("the commitment parameters are invalid: {0}")]
    Commitment(#[from] CommitmentError),
}
