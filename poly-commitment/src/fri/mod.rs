//! FRI low-degree test with binary folding over Merkle commitments.
//!
//! The committed functions live on a chain of multiplicative subgroups
//! `D[0] ⊃ D[1] ⊃ ... ⊃ D[r-1]`, each half the size of the previous one.
//! Leaf `j` of a layer over `D[i]` stores the values at `w^j` and
//! `w^(j + |D[i]|/2) = -w^j` for every polynomial of the batch, so a single
//! opening covers both points a folding step needs.

pub mod prover;
pub mod verifier;

pub use prover::proof_eval;
pub use verifier::{verify_eval, RoundZero};

use crate::{
    error::CommitmentError,
    merkle::{leaf_bytes, MerklePath, MerkleTree},
};
use ark_ff::{FftField, PrimeField};
use ark_poly::{
    univariate::DensePolynomial, DenseUVPolynomial, EvaluationDomain, Evaluations, Polynomial,
    Radix2EvaluationDomain as D,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use placeholder_transcript::Digest;
use placeholder_utils::{math::exact_log2, ExtendedDensePolynomial, ExtendedEvaluations};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// The only folding arity supported.
pub const FOLDING_FACTOR: usize = 2;

/// Parameters of a FRI instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FriParams<F: FftField> {
    /// Number of domains. The protocol runs `r - 1` folding rounds.
    pub r: usize,
    /// Degree bound of the tested polynomial.
    pub max_degree: usize,
    /// `domains[i + 1]` is the subgroup of squares of `domains[i]`.
    pub domains: Vec<D<F>>,
}

impl<F: FftField> FriParams<F> {
    /// Builds the chain of domains starting from a subgroup of size `d0_size`.
    pub fn new(
        m: usize,
        r: usize,
        max_degree: usize,
        d0_size: usize,
    ) -> Result<Self, CommitmentError> {
        if m != FOLDING_FACTOR {
            return Err(CommitmentError::UnsupportedFolding(m));
        }
        if r < 2 {
            return Err(CommitmentError::NotEnoughRounds(r));
        }
        if !(max_degree + 1).is_power_of_two() {
            return Err(CommitmentError::InvalidParameters(
                "max_degree + 1 must be a power of two",
            ));
        }
        if !d0_size.is_power_of_two() || d0_size <= max_degree {
            return Err(CommitmentError::InvalidParameters(
                "the first domain must be a power of two larger than max_degree",
            ));
        }
        // d0_size > max_degree, so this also keeps |D[r-1]| >= 2
        if r - 1 > exact_log2(max_degree + 1).unwrap_or(0) {
            return Err(CommitmentError::InvalidParameters(
                "too many rounds for the domain and degree",
            ));
        }

        let domains = (0..r)
            .map(|i| {
                let size = d0_size >> i;
                D::new(size).ok_or(CommitmentError::DomainConstruction(size))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            r,
            max_degree,
            domains,
        })
    }

    /// Number of folding rounds.
    pub fn rounds(&self) -> usize {
        self.r - 1
    }

    /// Degree bound of the polynomial left after the last round.
    pub fn final_degree_bound(&self) -> usize {
        let log = exact_log2(self.max_degree + 1).unwrap_or(0);
        (1 << (log + 1 - self.r)) - 1
    }
}

/// A polynomial FRI can fold, in either coefficient or evaluation form.
pub trait Foldable<F: FftField>: Clone + Send + Sync {
    /// The values over `domain`, in the natural order of its elements.
    fn evaluations_over(&self, domain: D<F>) -> Vec<F>;

    /// The value at the `index`-th element of `domain`.
    fn evaluate_at_index(&self, domain: D<F>, index: usize) -> F;

    /// One folding step, producing a polynomial over the squares of `domain`.
    fn fold(&self, domain: D<F>, alpha: F) -> Self;

    fn into_coefficients(self) -> DensePolynomial<F>;
}

impl<F: FftField> Foldable<F> for DensePolynomial<F> {
    fn evaluations_over(&self, domain: D<F>) -> Vec<F> {
        let n = domain.size();
        if self.coeffs.len() <= n {
            return domain.fft(&self.coeffs);
        }
        // reduce modulo x^n - 1, which vanishes on the domain
        let mut reduced = vec![F::zero(); n];
        for (i, c) in self.coeffs.iter().enumerate() {
            reduced[i % n] += c;
        }
        domain.fft(&reduced)
    }

    fn evaluate_at_index(&self, domain: D<F>, index: usize) -> F {
        self.evaluate(&domain.element(index))
    }

    fn fold(&self, _domain: D<F>, alpha: F) -> Self {
        ExtendedDensePolynomial::fold(self, alpha)
    }

    fn into_coefficients(self) -> DensePolynomial<F> {
        self
    }
}

impl<F: FftField> Foldable<F> for Evaluations<F, D<F>> {
    fn evaluations_over(&self, domain: D<F>) -> Vec<F> {
        if domain == self.domain() {
            self.evals.clone()
        } else {
            self.interpolate_by_ref().evaluations_over(domain)
        }
    }

    fn evaluate_at_index(&self, domain: D<F>, index: usize) -> F {
        if domain == self.domain() {
            self.evals[index]
        } else {
            self.interpolate_by_ref()
                .evaluate(&domain.element(index))
        }
    }

    fn fold(&self, domain: D<F>, alpha: F) -> Self {
        if domain == self.domain() {
            self.fold_dfs(alpha)
        } else {
            Evaluations::from_vec_and_domain(self.evaluations_over(domain), domain).fold_dfs(alpha)
        }
    }

    fn into_coefficients(self) -> DensePolynomial<F> {
        self.interpolate()
    }
}

/// Commits to a batch of value vectors over the same domain, pairing
/// `values[j]` with `values[j + n/2]` in leaf `j`.
pub fn commit_batch<F: PrimeField>(batch: &[Vec<F>]) -> Result<MerkleTree, CommitmentError> {
    let n = match batch.first() {
        Some(values) => values.len(),
        None => return Err(CommitmentError::EmptyBatch),
    };
    if n < 2 || batch.iter().any(|values| values.len() != n) {
        return Err(CommitmentError::LeafCount(n / 2));
    }
    let half = n / 2;

    let leaves: Vec<Vec<u8>> = (0..half)
        .into_par_iter()
        .map(|j| {
            let pairs: Vec<[F; 2]> = batch
                .iter()
                .map(|values| [values[j], values[j + half]])
                .collect();
            leaf_bytes(&pairs)
        })
        .collect();

    MerkleTree::build(&leaves)
}

/// Reorders a `[value at x, value at -x]` pair into leaf order.
pub(crate) fn leaf_order<T: Copy>(pair: [T; 2], upper_half: bool) -> [T; 2] {
    if upper_half {
        [pair[1], pair[0]]
    } else {
        pair
    }
}

/// The data sent for one folding round.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub struct RoundProof<F> {
    /// `[value at x, value at -x]`, one pair per polynomial opened in this round.
    #[serde_as(as = "Vec<[placeholder_utils::serialization::SerdeAs; 2]>")]
    pub y: Vec<[F; 2]>,
    /// Opening of the leaf holding `y`.
    pub path: MerklePath,
    /// Root of the tree `path` opens.
    pub t_root: Digest,
    /// Value of the folded polynomial at `x^2`.
    #[serde_as(as = "placeholder_utils::serialization::SerdeAs")]
    pub colinear_value: F,
    /// Opening of `colinear_value` in the next layer.
    pub colinear_path: MerklePath,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub struct FriProof<F> {
    pub round_proofs: Vec<RoundProof<F>>,
    /// Coefficients of the polynomial left after the last fold.
    #[serde_as(as = "Vec<placeholder_utils::serialization::SerdeAs>")]
    pub final_polynomial: Vec<F>,
    /// Root of the commitment the proof was produced for, the one opened in
    /// the first round.
    pub target_commitment: Digest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::UniformRand;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_params_validation() {
        let params = FriParams::<Fr>::new(2, 3, 15, 64).unwrap();
        assert_eq!(params.rounds(), 2);
        assert_eq!(
            params.domains.iter().map(|d| d.size()).collect::<Vec<_>>(),
            vec![64, 32, 16]
        );
        assert_eq!(params.final_degree_bound(), 3);

        assert_eq!(
            FriParams::<Fr>::new(4, 3, 15, 64),
            Err(CommitmentError::UnsupportedFolding(4))
        );
        assert_eq!(
            FriParams::<Fr>::new(2, 1, 15, 64),
            Err(CommitmentError::NotEnoughRounds(1))
        );
        assert!(FriParams::<Fr>::new(2, 2, 14, 64).is_err());
        assert!(FriParams::<Fr>::new(2, 2, 15, 48).is_err());
        assert!(FriParams::<Fr>::new(2, 2, 15, 16).is_err());
        assert!(FriParams::<Fr>::new(2, 7, 15, 32).is_err());
    }

    #[test]
    fn test_final_degree_bound() {
        let params = FriParams::<Fr>::new(2, 2, 7, 64).unwrap();
        assert_eq!(params.final_degree_bound(), 3);
        let params = FriParams::<Fr>::new(2, 4, 7, 64).unwrap();
        assert_eq!(params.final_degree_bound(), 0);
    }

    #[test]
    fn test_forms_agree() {
        let mut rng = StdRng::seed_from_u64(11);
        let domain = D::<Fr>::new(32).unwrap();
        let poly = DensePolynomial::<Fr>::rand(15, &mut rng);
        let evals = Evaluations::from_vec_and_domain(poly.evaluations_over(domain), domain);

        for i in [0, 5, 16, 31] {
            assert_eq!(
                poly.evaluate_at_index(domain, i),
                evals.evaluate_at_index(domain, i)
            );
        }

        let alpha = Fr::rand(&mut rng);
        let folded = Foldable::fold(&poly, domain, alpha);
        let folded_evals = Foldable::fold(&evals, domain, alpha);
        assert_eq!(folded_evals.into_coefficients(), folded);
    }

    #[test]
    fn test_evaluations_over_wraps_large_polynomials() {
        let mut rng = StdRng::seed_from_u64(12);
        let domain = D::<Fr>::new(8).unwrap();
        let poly = DensePolynomial::<Fr>::rand(20, &mut rng);
        let values = poly.evaluations_over(domain);
        for (i, v) in values.iter().enumerate() {
            assert_eq!(*v, poly.evaluate(&domain.element(i)));
        }
    }

    #[test]
    fn test_commit_batch_layout() {
        let values: Vec<Fr> = (0..8u64).map(Fr::from).collect();
        let other: Vec<Fr> = (8..16u64).map(Fr::from).collect();
        let tree = commit_batch(&[values.clone(), other.clone()]).unwrap();
        assert_eq!(tree.leaves_count(), 4);

        let leaf = leaf_bytes(&[[values[1], values[5]], [other[1], other[5]]]);
        assert!(tree.proof(1).unwrap().validate(&leaf, &tree.root()));

        assert_eq!(
            commit_batch::<Fr>(&[]),
            Err(CommitmentError::EmptyBatch)
        );
        assert!(commit_batch(&[values, other[..4].to_vec()]).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]
        #[test]
        fn test_fold_halves_degree(log in 1usize..6, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let degree = (1 << log) - 1;
            let domain = D::<Fr>::new(4 << log).unwrap();
            let poly = DensePolynomial::<Fr>::rand(degree, &mut rng);
            let folded = Foldable::fold(&poly, domain, Fr::rand(&mut rng));
            prop_assert!(folded.degree() <= (degree + 1) / 2 - 1);
        }
    }
}
