//! The arguments the quotient polynomial is made of.
//!
//! Each argument has a prover side, producing constraint polynomials that
//! vanish on the trace domain, and a verifier side recomputing their values
//! at the evaluation challenge from the opened values.

pub mod gates;
pub mod lookup;
pub mod permutation;

use crate::{
    circuits::{table::TableDescription, variable::Variable},
    error::ProverError,
};
use ark_ff::{FftField, Field, PrimeField};
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial};
use placeholder_commitment::{
    lpc::{self, LpcParams, Precommitment},
    Digest,
};
use placeholder_transcript::Transcript;

/// Number of constraint polynomials: three for the permutation argument,
/// five for the lookup argument and one for the gates.
pub const CONSTRAINT_COUNT: usize = 9;

pub(crate) fn constant<F: Field>(c: F) -> DensePolynomial<F> {
    DensePolynomial::from_coefficients_vec(vec![c])
}

/// `1 - (q_last + q_blind)`, nonzero exactly on the usable rows.
pub(crate) fn usable_rows_selector<F: FftField>(
    q_last: &DensePolynomial<F>,
    q_blind: &DensePolynomial<F>,
) -> DensePolynomial<F> {
    &(&constant(F::one()) - q_last) - q_blind
}

/// Precommits a polynomial on its own and absorbs the commitment.
pub(crate) fn commit_polynomial<F, T>(
    poly: &DensePolynomial<F>,
    params: &LpcParams<F>,
    transcript: &mut T,
) -> Result<(Precommitment<F>, Digest), ProverError>
where
    F: PrimeField,
    T: Transcript<F>,
{
    let precommitment = lpc::precommit(std::slice::from_ref(poly), params.domain())?;
    let commitment = lpc::commit(&precommitment);
    transcript.absorb_digest(&commitment);
    Ok((precommitment, commitment))
}

/// Values of the row selectors at the evaluation challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpecialEvaluations<F> {
    pub lagrange_0: F,
    pub q_last: F,
    pub q_blind: F,
}

impl<F: Field> SpecialEvaluations<F> {
    pub fn usable_rows_selector(&self) -> F {
        F::one() - self.q_last - self.q_blind
    }
}

/// The opened values of the trace columns: entry `j` of a column is its value
/// at `zeta * omega^rotation`, for the `j`-th rotation of that column.
#[derive(Clone, Copy, Debug)]
pub struct TraceEvaluations<'a, F> {
    pub table: &'a TableDescription,
    pub rotations: &'a [Vec<i32>],
    pub witness: &'a [Vec<F>],
    pub public_input: &'a [Vec<F>],
    pub constant: &'a [Vec<F>],
    pub selector: &'a [Vec<F>],
}

impl<F: Copy> TraceEvaluations<'_, F> {
    /// The value of a relative variable. `None` when its column or rotation
    /// was not opened.
    pub fn get(&self, var: &Variable) -> Option<F> {
        use crate::circuits::table::ColumnType;

        let columns = match var.column_type {
            ColumnType::Witness => self.witness,
            ColumnType::PublicInput => self.public_input,
            ColumnType::Constant => self.constant,
            ColumnType::Selector => self.selector,
        };
        let rotations = self
            .rotations
            .get(self.table.global_index(var.column_type, var.index))?;
        let position = rotations.binary_search(&var.rotation).ok()?;
        columns.get(var.index)?.get(position).copied()
    }
}
