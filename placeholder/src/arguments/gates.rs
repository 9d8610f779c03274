//! The gate argument: every constraint of every gate, gated by its selector
//! and combined with powers of `theta`.

use crate::circuits::{
    constraints::ConstraintSystem, gate::Gate, polynomial::PolynomialTable, variable::Variable,
};
use ark_ff::{Field, PrimeField};
use ark_poly::{univariate::DensePolynomial, Radix2EvaluationDomain as D};
use log::debug;
use placeholder_transcript::Transcript;
use placeholder_utils::ExtendedDensePolynomial;

/// Draws `theta` and returns `F_8 = sum_g q_g * sum_j theta^k C_j`, where `k`
/// runs over all the constraints of the circuit.
pub fn prove_eval<F, T>(
    cs: &ConstraintSystem<F>,
    table: &PolynomialTable<F>,
    domain: D<F>,
    transcript: &mut T,
) -> DensePolynomial<F>
where
    F: PrimeField,
    T: Transcript<F>,
{
    let theta = transcript.challenge();
    let variable = |var: &Variable| table.variable(var, &domain);

    let mut theta_power = F::one();
    let mut result = DensePolynomial { coeffs: vec![] };
    for gate in &cs.gates {
        let mut gate_result = DensePolynomial { coeffs: vec![] };
        for constraint in &gate.constraints {
            gate_result += &constraint.evaluate_polynomial(&variable).scale(theta_power);
            theta_power *= theta;
        }
        let selector = variable(&Variable::selector(gate.selector_index, 0));
        result += &(&selector * &gate_result);
    }

    debug!("gate argument: {} gates", cs.gates.len());
    result
}

/// `F_8(zeta)`, reading the opened values through `value`. `None` when a
/// variable has no opened value.
pub fn verify_eval<F: Field>(
    gates: &[Gate<F>],
    theta: F,
    value: impl Fn(&Variable) -> Option<F>,
) -> Option<F> {
    let mut theta_power = F::one();
    let mut result = F::zero();
    for gate in gates {
        let mut gate_result = F::zero();
        for constraint in &gate.constraints {
            gate_result += constraint.evaluate(&value)? * theta_power;
            theta_power *= theta;
        }
        result += value(&Variable::selector(gate.selector_index, 0))? * gate_result;
    }
    Some(result)
}
