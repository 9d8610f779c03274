//! Proof system parameters.

use crate::{circuits::table::TableDescription, error::SetupError};
use ark_ff::FftField;
use placeholder_commitment::{CommitmentError, FriParams, LpcParams};
use serde::{Deserialize, Serialize};

/// Parameters shared by the prover and the verifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderParams {
    /// Number of FRI repetitions per opening.
    pub lambda: usize,
    /// Folding arity. Only 2 is supported.
    pub m: usize,
    /// Number of FRI domains.
    pub r: usize,
    /// Proof-of-work bits ground before each batching challenge.
    pub grinding_bits: u32,
    /// Log2 of the ratio between the commitment domain and the trace domain.
    pub blowup_log: usize,
}

impl Default for PlaceholderParams {
    fn default() -> Self {
        Self {
            lambda: 40,
            m: 2,
            r: 2,
            grinding_bits: 0,
            blowup_log: 3,
        }
    }
}

impl PlaceholderParams {
    /// FRI parameters for a trace of the given shape: every committed
    /// polynomial has degree below the number of rows.
    pub fn fri_params<F: FftField>(
        &self,
        table: &TableDescription,
    ) -> Result<FriParams<F>, SetupError> {
        let max_degree = table
            .rows_amount
            .checked_sub(1)
            .ok_or(CommitmentError::InvalidParameters("the trace has no row"))?;
        let d0_size = table
            .rows_amount
            .checked_shl(self.blowup_log as u32)
            .filter(|size| *size >= table.rows_amount)
            .ok_or(CommitmentError::InvalidParameters("blowup factor too large"))?;
        Ok(FriParams::new(self.m, self.r, max_degree, d0_size)?)
    }

    pub fn lpc_params<F: FftField>(
        &self,
        table: &TableDescription,
    ) -> Result<LpcParams<F>, SetupError> {
        if self.lambda == 0 {
            return Err(CommitmentError::InvalidParameters("lambda must be positive").into());
        }
        Ok(LpcParams {
            lambda: self.lambda,
            grinding_bits: self.grinding_bits,
            fri: self.fri_params(table)?,
        })
    }
}
