//! This adds a few utility functions for the [Evaluations] arkworks type.

use ark_ff::FftField;
use ark_poly::{EvaluationDomain, Evaluations, Radix2EvaluationDomain};
use rayon::prelude::*;

/// An extension for the [Evaluations] type.
pub trait ExtendedEvaluations<F: FftField> {
    /// One FRI folding step over evaluations in DFS order.
    ///
    /// With `N` the domain size and `w` its generator, the folded evaluations live on the
    /// domain of size `N/2` and are
    ///
    /// `f'[j] = 1/2 * ((1 + alpha * w^-j) * f[j] + (1 - alpha * w^-j) * f[j + N/2])`
    ///
    /// # Panics
    ///
    /// Panics if the domain has less than two elements.
    fn fold_dfs(&self, alpha: F) -> Self;
}

impl<F: FftField> ExtendedEvaluations<F> for Evaluations<F, Radix2EvaluationDomain<F>> {
    fn fold_dfs(&self, alpha: F) -> Self {
        let domain = self.domain();
        let n = domain.size();
        assert!(n >= 2, "cannot fold a domain of size {n}");
        let half = n / 2;
        let next_domain = Radix2EvaluationDomain::new(half)
            .expect("a subgroup of half the size always exists");

        let two_inv = F::from(2u64)
            .inverse()
            .expect("the characteristic is not two");
        let omega_inv = domain.group_gen_inv;

        let folded: Vec<F> = (0..half)
            .into_par_iter()
            .map(|j| {
                let t = alpha * omega_inv.pow([j as u64]);
                two_inv
                    * ((F::one() + t) * self.evals[j] + (F::one() - t) * self.evals[j + half])
            })
            .collect();

        Evaluations::from_vec_and_domain(folded, next_domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtendedDensePolynomial;
    use ark_bn254::Fr;
    use ark_ff::UniformRand;
    use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_fold_dfs_matches_coefficient_fold() {
        let mut rng = StdRng::seed_from_u64(7);
        let domain = Radix2EvaluationDomain::<Fr>::new(32).unwrap();
        let f = DensePolynomial::<Fr>::rand(15, &mut rng);
        let alpha = Fr::rand(&mut rng);

        let evals = f.clone().evaluate_over_domain(domain);
        let folded = evals.fold_dfs(alpha);
        let expected = f.fold(alpha).evaluate_over_domain(folded.domain());
        assert_eq!(folded.evals, expected.evals);
    }
}
