//! Polynomial constraints over trace variables: a [Constraint] is a sum of
//! [Term]s, each term a coefficient times a product of variables.

use super::variable::Variable;
use ark_ff::{FftField, Field};
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use placeholder_utils::{serialization::SerdeAs, ExtendedDensePolynomial};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub struct Term<F> {
    #[serde_as(as = "SerdeAs")]
    pub coeff: F,
    pub vars: Vec<Variable>,
}

impl<F: Field> Term<F> {
    pub fn new(coeff: F, vars: Vec<Variable>) -> Self {
        Self { coeff, vars }
    }

    /// Evaluates the term, reading variables through `value`.
    pub fn evaluate(&self, value: impl Fn(&Variable) -> Option<F>) -> Option<F> {
        self.vars
            .iter()
            .try_fold(self.coeff, |acc, var| Some(acc * value(var)?))
    }
}

impl<F: FftField> Term<F> {
    /// The term as a polynomial, given the polynomial of each variable.
    pub fn evaluate_polynomial(
        &self,
        polynomial: &impl Fn(&Variable) -> DensePolynomial<F>,
    ) -> DensePolynomial<F> {
        match self.vars.split_first() {
            None => DensePolynomial::from_coefficients_vec(vec![self.coeff]),
            Some((first, rest)) => rest
                .iter()
                .fold(polynomial(first), |acc, var| &acc * &polynomial(var))
                .scale(self.coeff),
        }
    }
}

impl<F: Field> From<Variable> for Term<F> {
    fn from(var: Variable) -> Self {
        Term::new(F::one(), vec![var])
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub struct Constraint<F> {
    pub terms: Vec<Term<F>>,
}

impl<F: Field> Constraint<F> {
    pub fn new(terms: Vec<Term<F>>) -> Self {
        Self { terms }
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.terms.iter().flat_map(|term| term.vars.iter())
    }

    pub fn evaluate(&self, value: impl Fn(&Variable) -> Option<F>) -> Option<F> {
        self.terms
            .iter()
            .try_fold(F::zero(), |acc, term| Some(acc + term.evaluate(&value)?))
    }
}

impl<F: FftField> Constraint<F> {
    pub fn evaluate_polynomial(
        &self,
        polynomial: &impl Fn(&Variable) -> DensePolynomial<F>,
    ) -> DensePolynomial<F> {
        self.terms
            .iter()
            .fold(DensePolynomial::from_coefficients_vec(vec![]), |acc, term| {
                &acc + &term.evaluate_polynomial(polynomial)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_poly::Polynomial;

    #[test]
    fn test_constraint_evaluation() {
        // w0 * w1 - 3 * w2
        let w = |i| Variable::witness(i, 0);
        let constraint = Constraint::new(vec![
            Term::new(Fr::from(1u64), vec![w(0), w(1)]),
            Term::new(-Fr::from(3u64), vec![w(2)]),
        ]);
        assert_eq!(constraint.variables().count(), 3);

        let values = [Fr::from(6u64), Fr::from(5u64), Fr::from(10u64)];
        assert_eq!(
            constraint.evaluate(|v| values.get(v.index).copied()),
            Some(Fr::from(0u64))
        );
        assert_eq!(constraint.evaluate(|_| None), None);

        let polys: Vec<DensePolynomial<Fr>> = (1..4u64)
            .map(|i| DensePolynomial::from_coefficients_vec(vec![Fr::from(i), Fr::from(1u64)]))
            .collect();
        let poly = constraint.evaluate_polynomial(&|v: &Variable| polys[v.index].clone());
        let x = Fr::from(7u64);
        let expected = constraint.evaluate(|v| Some(polys[v.index].evaluate(&x)));
        assert_eq!(Some(poly.evaluate(&x)), expected);
    }

    #[test]
    fn test_constant_term() {
        let term = Term::<Fr>::new(Fr::from(9u64), vec![]);
        assert_eq!(term.evaluate(|_| None), Some(Fr::from(9u64)));
        assert_eq!(
            term.evaluate_polynomial(&|_: &Variable| DensePolynomial::from_coefficients_vec(vec![])),
            DensePolynomial::from_coefficients_vec(vec![Fr::from(9u64)])
        );
    }
}
