//! The copy-constraint argument.
//!
//! With `g = prod_i (f_i + beta * S_id_i + gamma)` and
//! `h = prod_i (f_i + beta * S_sigma_i + gamma)`, the accumulator `V_P`
//! starts at one and is multiplied by `g / h` at every usable row. It comes
//! back to one after the last usable row exactly when the cells related by
//! copy constraints hold equal values.

use super::{commit_polynomial, constant, usable_rows_selector, SpecialEvaluations};
use crate::{
    circuits::{assignment::AssignmentTable, polynomial::PolynomialTable},
    error::ProverError,
    preprocessor::PreprocessedPublicData,
};
use ark_ff::{batch_inversion, Field, PrimeField};
use ark_poly::{univariate::DensePolynomial, EvaluationDomain, Evaluations};
use log::debug;
use placeholder_commitment::{lpc::LpcParams, Digest, Precommitment};
use placeholder_transcript::Transcript;
use placeholder_utils::ExtendedDensePolynomial;
use rayon::prelude::*;

pub struct PermutationProof<F: PrimeField> {
    pub v_perm: DensePolynomial<F>,
    pub precommitment: Precommitment<F>,
    pub commitment: Digest,
    /// `F_0`, `F_1` and `F_2`.
    pub constraints: [DensePolynomial<F>; 3],
}

/// Row-wise product of `f_i + beta * s_i + gamma` over the first `rows` rows.
fn product<F: PrimeField>(
    columns: &[&[F]],
    labels: &[Vec<F>],
    beta: F,
    gamma: F,
    rows: usize,
) -> Vec<F> {
    columns
        .par_iter()
        .zip(labels.par_iter())
        .map(|(f, s)| {
            f.iter()
                .zip(s.iter())
                .take(rows)
                .map(|(f_j, s_j)| *f_j + beta * s_j + gamma)
                .collect::<Vec<_>>()
        })
        .reduce_with(|mut l, r| {
            for (l_j, r_j) in l.iter_mut().zip(r) {
                *l_j *= r_j;
            }
            l
        })
        .unwrap_or_else(|| vec![F::one(); rows])
}

/// Runs the prover side of the argument: draws `beta` and `gamma`, commits
/// to `V_P` and returns the constraint polynomials.
pub fn prove_eval<F, T>(
    public: &PreprocessedPublicData<F>,
    table: &PolynomialTable<F>,
    values: &AssignmentTable<F>,
    params: &LpcParams<F>,
    transcript: &mut T,
) -> Result<PermutationProof<F>, ProverError>
where
    F: PrimeField,
    T: Transcript<F>,
{
    let common = &public.common_data;
    let domain = common.basic_domain;
    let usable = common.usable_rows_amount;

    let beta = transcript.challenge();
    let gamma = transcript.challenge();

    let columns: Vec<&[F]> = values
        .private
        .witnesses
        .iter()
        .chain(values.public.public_inputs.iter())
        .chain(values.public.constants.iter())
        .map(Vec::as_slice)
        .collect();
    let fft = |polys: &[DensePolynomial<F>]| -> Vec<Vec<F>> {
        polys.par_iter().map(|p| domain.fft(&p.coeffs)).collect()
    };
    let id_values = fft(&public.identity_polynomials);
    let sigma_values = fft(&public.permutation_polynomials);
    if columns.len() != id_values.len() || columns.len() != sigma_values.len() {
        return Err(ProverError::Permutation("column count"));
    }

    let g = product(&columns, &id_values, beta, gamma, usable);
    let mut h = product(&columns, &sigma_values, beta, gamma, usable);
    if h.iter().any(|h_j| h_j.is_zero()) {
        return Err(ProverError::Permutation("zero denominator"));
    }
    batch_inversion(&mut h);

    // V_P[j + 1] = V_P[j] * g[j] / h[j] on the usable rows, zero afterwards
    let mut v = vec![F::zero(); domain.size()];
    v[0] = F::one();
    for j in 0..usable {
        v[j + 1] = v[j] * g[j] * h[j];
    }
    if v[usable] != F::one() {
        return Err(ProverError::Permutation("final value"));
    }

    let v_perm = Evaluations::from_vec_and_domain(v, domain).interpolate();
    let (precommitment, commitment) = commit_polynomial(&v_perm, params, transcript)?;

    let factor = |labels: &[DensePolynomial<F>]| {
        table
            .permutation_columns()
            .zip(labels.iter())
            .fold(constant(F::one()), |acc, (f, s)| {
                &acc * &(&(f + &s.scale(beta)) + &constant(gamma))
            })
    };
    let g_poly = factor(&public.identity_polynomials);
    let h_poly = factor(&public.permutation_polynomials);

    let one = constant(F::one());
    let f0 = &common.lagrange_0 * &(&one - &v_perm);
    let f1 = &usable_rows_selector(&public.q_last, &public.q_blind)
        * &(&(&v_perm.shifted(domain.group_gen) * &h_poly) - &(&v_perm * &g_poly));
    let f2 = &public.q_last * &(&(&v_perm * &v_perm) - &v_perm);

    debug!("permutation argument: V_P committed");

    Ok(PermutationProof {
        v_perm,
        precommitment,
        commitment,
        constraints: [f0, f1, f2],
    })
}

/// Values at the evaluation challenge the verifier recomputes the constraints
/// from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermutationEvaluations<F> {
    /// The permutation columns, at rotation zero.
    pub columns: Vec<F>,
    pub id: Vec<F>,
    pub sigma: Vec<F>,
    /// `V_P(zeta)`.
    pub v: F,
    /// `V_P(zeta * omega)`.
    pub v_next: F,
}

/// `F_0(zeta)`, `F_1(zeta)` and `F_2(zeta)`.
pub fn verify_eval<F: Field>(
    beta: F,
    gamma: F,
    evals: &PermutationEvaluations<F>,
    special: &SpecialEvaluations<F>,
) -> [F; 3] {
    let product = |labels: &[F]| {
        evals
            .columns
            .iter()
            .zip(labels.iter())
            .fold(F::one(), |acc, (f, s)| acc * (*f + beta * s + gamma))
    };
    let g = product(&evals.id);
    let h = product(&evals.sigma);

    [
        special.lagrange_0 * (F::one() - evals.v),
        special.usable_rows_selector() * (evals.v_next * h - evals.v * g),
        special.q_last * (evals.v.square() - evals.v),
    ]
}
