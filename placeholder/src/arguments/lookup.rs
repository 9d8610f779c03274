//! The lookup argument.
//!
//! On every usable row, the tuple looked up by the active lookup gate is
//! compressed with `theta` into `A`, and the row of the table into `S`. The
//! prover commits to a sorted permutation `A'` of `A` and to a permutation
//! `S'` of `S` such that every run of equal values in `A'` starts with the
//! same value in `S'`. A grand product then shows both are permutations.

use super::{commit_polynomial, constant, usable_rows_selector, SpecialEvaluations};
use crate::{
    circuits::{
        assignment::AssignmentTable,
        constraints::ConstraintSystem,
        gate::LookupGate,
        polynomial::PolynomialTable,
        variable::Variable,
    },
    error::ProverError,
    preprocessor::PreprocessedPublicData,
};
use ark_ff::{batch_inversion, Field, PrimeField};
use ark_poly::{
    univariate::DensePolynomial, EvaluationDomain, Evaluations, Radix2EvaluationDomain as D,
};
use log::debug;
use placeholder_commitment::{lpc::LpcParams, Digest, Precommitment};
use placeholder_transcript::Transcript;
use placeholder_utils::ExtendedDensePolynomial;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Commitments to the permuted input, the permuted table and the lookup
/// accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupCommitments {
    pub input: Digest,
    pub value: Digest,
    pub v_l: Digest,
}

pub struct LookupProof<F: PrimeField> {
    /// `A'`.
    pub input: DensePolynomial<F>,
    /// `S'`.
    pub value: DensePolynomial<F>,
    pub v_l: DensePolynomial<F>,
    pub input_precommitment: Precommitment<F>,
    pub value_precommitment: Precommitment<F>,
    pub v_l_precommitment: Precommitment<F>,
    pub commitments: LookupCommitments,
    /// `F_3` to `F_7`.
    pub constraints: [DensePolynomial<F>; 5],
}

/// `sum_i theta^i x_i`.
fn compress<F: Field>(theta: F, items: impl Iterator<Item = Option<F>>) -> Option<F> {
    let mut power = F::one();
    let mut acc = F::zero();
    for item in items {
        acc += power * item?;
        power *= theta;
    }
    Some(acc)
}

/// `A`: the sum over the lookup gates of their selector times their
/// compressed input, reading variables through `value`.
pub fn compressed_input<F: Field>(
    gates: &[LookupGate<F>],
    theta: F,
    value: impl Fn(&Variable) -> Option<F>,
) -> Option<F> {
    gates.iter().try_fold(F::zero(), |acc, gate| {
        let selector = value(&Variable::selector(gate.selector_index, 0))?;
        let input = compress(theta, gate.inputs().map(|term| term.evaluate(&value)))?;
        Some(acc + selector * input)
    })
}

/// `S`: the compressed table columns, reading variables through `value`.
pub fn compressed_value<F: Field>(
    table: &[Variable],
    theta: F,
    value: impl Fn(&Variable) -> Option<F>,
) -> Option<F> {
    compress(theta, table.iter().map(value))
}

fn compress_polynomials<F: PrimeField>(
    theta: F,
    polys: impl Iterator<Item = DensePolynomial<F>>,
) -> DensePolynomial<F> {
    let mut power = F::one();
    let mut acc = constant(F::zero());
    for poly in polys {
        acc += &poly.scale(power);
        power *= theta;
    }
    acc
}

/// Sorts `input` and arranges `table` so that the first occurrence of every
/// value of the sorted input faces the same value in the permuted table.
///
/// Fails with the row of the first input value missing from the table.
pub fn permute<F: PrimeField>(input: &[F], table: &[F]) -> Result<(Vec<F>, Vec<F>), ProverError> {
    let mut sorted: Vec<(F, usize)> = input.iter().copied().zip(0..).collect();
    sorted.sort_by_key(|(value, row)| (value.into_bigint(), *row));

    let mut unused: HashMap<F, usize> = HashMap::new();
    for value in table {
        *unused.entry(*value).or_default() += 1;
    }

    let mut permuted_table = vec![None; sorted.len()];
    for (j, (value, row)) in sorted.iter().enumerate() {
        if j > 0 && sorted[j - 1].0 == *value {
            continue;
        }
        match unused.get_mut(value) {
            Some(count) if *count > 0 => {
                *count -= 1;
                permuted_table[j] = Some(*value);
            }
            _ => return Err(ProverError::ValueNotInTable(*row)),
        }
    }

    let mut leftovers = table
        .iter()
        .filter(|value| match unused.get_mut(*value) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        })
        .copied();
    let permuted_table = permuted_table
        .into_iter()
        .map(|slot| {
            slot.or_else(|| leftovers.next())
                .ok_or(ProverError::Lookup("the table is shorter than the input"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let permuted_input = sorted.into_iter().map(|(value, _)| value).collect();
    Ok((permuted_input, permuted_table))
}

/// Pads `values` with zeros to the size of `domain` and interpolates.
fn interpolate_padded<F: PrimeField>(mut values: Vec<F>, domain: D<F>) -> DensePolynomial<F> {
    values.resize(domain.size(), F::zero());
    Evaluations::from_vec_and_domain(values, domain).interpolate()
}

/// Runs the prover side of the argument for the lookup gates of `cs`, which
/// may be empty.
pub fn prove_eval<F, T>(
    cs: &ConstraintSystem<F>,
    public: &PreprocessedPublicData<F>,
    table: &PolynomialTable<F>,
    values: &AssignmentTable<F>,
    params: &LpcParams<F>,
    transcript: &mut T,
) -> Result<LookupProof<F>, ProverError>
where
    F: PrimeField,
    T: Transcript<F>,
{
    let common = &public.common_data;
    let domain = common.basic_domain;
    let usable = common.usable_rows_amount;
    let lookup_table = cs.lookup_table();

    let theta = transcript.challenge();

    let missing = ProverError::Lookup("a lookup reads a missing column");
    let a = (0..usable)
        .map(|row| compressed_input(&cs.lookup_gates, theta, |var| values.value(var, row)))
        .collect::<Option<Vec<F>>>()
        .ok_or_else(|| missing.clone())?;
    let s = (0..usable)
        .map(|row| compressed_value(&lookup_table, theta, |var| values.value(var, row)))
        .collect::<Option<Vec<F>>>()
        .ok_or(missing)?;

    let (a_permuted, s_permuted) = permute(&a, &s)?;

    let input = interpolate_padded(a_permuted.clone(), domain);
    let value = interpolate_padded(s_permuted.clone(), domain);
    let (input_precommitment, input_commitment) = commit_polynomial(&input, params, transcript)?;
    let (value_precommitment, value_commitment) = commit_polynomial(&value, params, transcript)?;

    let beta = transcript.challenge();
    let gamma = transcript.challenge();

    let mut denominators: Vec<F> = a_permuted
        .iter()
        .zip(s_permuted.iter())
        .map(|(a_j, s_j)| (*a_j + beta) * (*s_j + gamma))
        .collect();
    if denominators.iter().any(|d| d.is_zero()) {
        return Err(ProverError::Lookup("zero denominator"));
    }
    batch_inversion(&mut denominators);

    let mut v = vec![F::zero(); domain.size()];
    v[0] = F::one();
    for j in 0..usable {
        v[j + 1] = v[j] * (a[j] + beta) * (s[j] + gamma) * denominators[j];
    }
    if v[usable] != F::one() {
        return Err(ProverError::Lookup("final value"));
    }
    let v_l = Evaluations::from_vec_and_domain(v, domain).interpolate();
    let (v_l_precommitment, v_l_commitment) = commit_polynomial(&v_l, params, transcript)?;

    // A and S as polynomials
    let variable = |var: &Variable| table.variable(var, &domain);
    let a_poly = cs.lookup_gates.iter().fold(constant(F::zero()), |acc, gate| {
        let input = compress_polynomials(
            theta,
            gate.inputs().map(|term| term.evaluate_polynomial(&variable)),
        );
        &acc + &(&variable(&Variable::selector(gate.selector_index, 0)) * &input)
    });
    let s_poly = compress_polynomials(theta, lookup_table.iter().map(variable));

    let one = constant(F::one());
    let active = usable_rows_selector(&public.q_last, &public.q_blind);
    let beta_poly = constant(beta);
    let gamma_poly = constant(gamma);
    let numerator = &(&a_poly + &beta_poly) * &(&s_poly + &gamma_poly);
    let denominator = &(&input + &beta_poly) * &(&value + &gamma_poly);
    let input_minus_value = &input - &value;

    let f3 = &common.lagrange_0 * &(&one - &v_l);
    let f4 = &public.q_last * &(&(&v_l * &v_l) - &v_l);
    let f5 = &active
        * &(&(&v_l.shifted(domain.group_gen) * &denominator) - &(&v_l * &numerator));
    let f6 = &common.lagrange_0 * &input_minus_value;
    let f7 = &active
        * &(&input_minus_value * &(&input - &input.shifted(domain.group_gen_inv)));

    debug!(
        "lookup argument: {} gates over a table of {} columns",
        cs.lookup_gates.len(),
        lookup_table.len()
    );

    Ok(LookupProof {
        input,
        value,
        v_l,
        input_precommitment,
        value_precommitment,
        v_l_precommitment,
        commitments: LookupCommitments {
            input: input_commitment,
            value: value_commitment,
            v_l: v_l_commitment,
        },
        constraints: [f3, f4, f5, f6, f7],
    })
}

/// Values at the evaluation challenge the verifier recomputes the constraints
/// from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookupEvaluations<F> {
    /// `A(zeta)`, computed from the trace openings.
    pub input: F,
    /// `S(zeta)`, computed from the trace openings.
    pub value: F,
    /// `A'(zeta)`.
    pub permuted_input: F,
    /// `A'(zeta * omega^-1)`.
    pub permuted_input_prev: F,
    /// `S'(zeta)`.
    pub permuted_value: F,
    /// `V_L(zeta)`.
    pub v: F,
    /// `V_L(zeta * omega)`.
    pub v_next: F,
}

/// `F_3(zeta)` to `F_7(zeta)`.
pub fn verify_eval<F: Field>(
    beta: F,
    gamma: F,
    evals: &LookupEvaluations<F>,
    special: &SpecialEvaluations<F>,
) -> [F; 5] {
    let active = special.usable_rows_selector();
    let numerator = (evals.input + beta) * (evals.value + gamma);
    let denominator = (evals.permuted_input + beta) * (evals.permuted_value + gamma);
    let input_minus_value = evals.permuted_input - evals.permuted_value;
    [
        special.lagrange_0 * (F::one() - evals.v),
        special.q_last * (evals.v.square() - evals.v),
        active * (evals.v_next * denominator - evals.v * numerator),
        special.lagrange_0 * input_minus_value,
        active * input_minus_value * (evals.permuted_input - evals.permuted_input_prev),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    fn f(values: &[u64]) -> Vec<Fr> {
        values.iter().map(|v| Fr::from(*v)).collect()
    }

    #[test]
    fn test_permute() {
        let input = f(&[3, 1, 3, 0, 2]);
        let table = f(&[0, 1, 2, 3, 4]);
        let (a, s) = permute(&input, &table).unwrap();
        assert_eq!(a, f(&[0, 1, 2, 3, 3]));
        assert_eq!(s[..4], f(&[0, 1, 2, 3])[..]);
        assert_eq!(s[4], Fr::from(4u64));

        for j in 0..a.len() {
            assert!(a[j] == s[j] || (j > 0 && a[j] == a[j - 1]));
        }
        let mut sorted_s = s.clone();
        sorted_s.sort_by_key(|v| ark_ff::PrimeField::into_bigint(*v));
        assert_eq!(sorted_s, table);
    }

    #[test]
    fn test_value_not_in_table() {
        let input = f(&[0, 7, 1]);
        let table = f(&[0, 1, 2]);
        assert_eq!(
            permute(&input, &table),
            Err(ProverError::ValueNotInTable(1))
        );
    }

    #[test]
    fn test_compress() {
        let theta = Fr::from(10u64);
        let table = [Variable::constant(0, 0), Variable::constant(1, 0)];
        let columns = f(&[3, 4]);
        assert_eq!(
            compressed_value(&table, theta, |var| columns.get(var.index).copied()),
            Some(Fr::from(43u64))
        );
        assert_eq!(compressed_value(&table, theta, |_| None), None);
    }
}
