//! List polynomial commitment: a Merkle commitment to a batch of
//! polynomials, opened at arbitrary points through FRI on the batched
//! quotient `sum_k theta^k (g_k - U_k) / V_k`.

use crate::{
    error::CommitmentError,
    fri::{self, commit_batch, FriParams, FriProof, RoundZero},
    merkle::MerkleTree,
    pow::Grinding,
};
use ark_ff::{FftField, PrimeField};
use ark_poly::{
    univariate::{DenseOrSparsePolynomial, DensePolynomial},
    DenseUVPolynomial, EvaluationDomain, Polynomial, Radix2EvaluationDomain as D,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use log::{debug, warn};
use placeholder_transcript::Digest;
use placeholder_utils::ExtendedDensePolynomial;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LpcParams<F: FftField> {
    /// Number of independent FRI repetitions.
    pub lambda: usize,
    /// Proof-of-work bits required before the batching challenge.
    pub grinding_bits: u32,
    pub fri: FriParams<F>,
}

impl<F: FftField> LpcParams<F> {
    pub fn max_degree(&self) -> usize {
        self.fri.max_degree
    }

    /// The domain commitments are computed over.
    pub fn domain(&self) -> D<F> {
        self.fri.domains[0]
    }
}

/// A committed batch, as kept by the prover.
#[derive(Clone, Debug)]
pub struct Precommitment<F: FftField> {
    pub domain: D<F>,
    pub tree: MerkleTree,
    /// Number of polynomials in the batch.
    pub batch_size: usize,
}

/// Commits to `polys` over `domain`. Leaf `j` pairs the values at
/// `w^j` and `-w^j` of every polynomial, in batch order.
pub fn precommit<F: PrimeField>(
    polys: &[DensePolynomial<F>],
    domain: D<F>,
) -> Result<Precommitment<F>, CommitmentError> {
    if polys.is_empty() {
        return Err(CommitmentError::EmptyBatch);
    }
    if let Some(p) = polys.iter().find(|p| p.degree() >= domain.size()) {
        return Err(CommitmentError::DegreeTooLarge {
            degree: p.degree(),
            bound: domain.size() - 1,
        });
    }

    let values: Vec<Vec<F>> = polys
        .par_iter()
        .map(|p| domain.fft(&p.coeffs))
        .collect();
    let tree = commit_batch(&values)?;

    Ok(Precommitment {
        domain,
        tree,
        batch_size: polys.len(),
    })
}

pub fn commit<F: FftField>(precommitment: &Precommitment<F>) -> Digest {
    precommitment.tree.root()
}

/// An evaluation proof for one committed batch.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    bound = "F: CanonicalSerialize + CanonicalDeserialize, N: CanonicalSerialize + CanonicalDeserialize"
)]
pub struct LpcProof<F, N> {
    /// `z[k][j]` is the value of the `k`-th polynomial at its `j`-th point.
    #[serde_as(as = "Vec<Vec<placeholder_utils::serialization::SerdeAs>>")]
    pub z: Vec<Vec<F>>,
    #[serde_as(as = "placeholder_utils::serialization::SerdeAs")]
    pub grinding_nonce: N,
    pub fri_proofs: Vec<FriProof<F>>,
}

/// The interpolants `U_k` of `(points[k], z[k])` and the vanishing
/// polynomials `V_k` of `points[k]`.
fn quotient_parts<F: PrimeField>(
    points: &[Vec<F>],
    z: &[Vec<F>],
) -> Result<(Vec<DensePolynomial<F>>, Vec<DensePolynomial<F>>), CommitmentError> {
    points
        .iter()
        .zip(z.iter())
        .enumerate()
        .map(|(k, (pts, values))| {
            let u = DensePolynomial::interpolate(pts, values)
                .ok_or(CommitmentError::RepeatedPoints(k))?;
            Ok((u, DensePolynomial::vanishing_on(pts)))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|parts| parts.into_iter().unzip())
}

/// Opens `polys` at `points`, where `points[k]` are the evaluation points of
/// `polys[k]`.
pub fn proof_eval<F, T>(
    points: &[Vec<F>],
    precommitment: &Precommitment<F>,
    polys: &[DensePolynomial<F>],
    params: &LpcParams<F>,
    transcript: &mut T,
) -> Result<LpcProof<F, T::Nonce>, CommitmentError>
where
    F: PrimeField,
    T: Grinding<F>,
{
    if polys.is_empty() {
        return Err(CommitmentError::EmptyBatch);
    }
    if polys.len() != points.len() || polys.len() != precommitment.batch_size {
        return Err(CommitmentError::BatchSizeMismatch {
            polys: polys.len(),
            points: points.len(),
        });
    }
    if precommitment.domain != params.domain() {
        return Err(CommitmentError::InvalidParameters(
            "the batch was committed over another domain",
        ));
    }
    if let Some(p) = polys.iter().find(|p| p.degree() > params.max_degree()) {
        return Err(CommitmentError::DegreeTooLarge {
            degree: p.degree(),
            bound: params.max_degree(),
        });
    }
    if params.grinding_bits > T::CHALLENGE_BITS {
        return Err(CommitmentError::GrindingBits {
            bits: params.grinding_bits,
            max: T::CHALLENGE_BITS,
        });
    }

    let z: Vec<Vec<F>> = polys
        .par_iter()
        .zip(points.par_iter())
        .map(|(g, pts)| pts.iter().map(|p| g.evaluate(p)).collect())
        .collect();
    for values in &z {
        transcript.absorb(values);
    }

    let grinding_nonce = transcript.generate_pow(params.grinding_bits);
    let theta = transcript.challenge();

    let (interpolants, denominators) = quotient_parts(points, &z)?;

    let quotients = polys
        .par_iter()
        .zip(interpolants.par_iter().zip(denominators.par_iter()))
        .map(|(g, (u, v))| {
            let numerator = g - u;
            let (quotient, remainder) = DenseOrSparsePolynomial::from(&numerator)
                .divide_with_q_and_r(&DenseOrSparsePolynomial::from(v))
                .ok_or(CommitmentError::NonExactDivision)?;
            if !remainder.is_zero_poly() {
                return Err(CommitmentError::NonExactDivision);
            }
            Ok(quotient)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut q = DensePolynomial::from_coefficients_vec(vec![]);
    let mut theta_pow = F::one();
    for quotient in &quotients {
        q += &quotient.scale(theta_pow);
        theta_pow *= theta;
    }

    debug!(
        "LPC: opening {} polynomials with {} FRI repetitions",
        polys.len(),
        params.lambda
    );

    let fri_proofs = (0..params.lambda)
        .map(|_| fri::proof_eval(&q, polys, &precommitment.tree, &params.fri, transcript))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LpcProof {
        z,
        grinding_nonce,
        fri_proofs,
    })
}

/// Checks an [LpcProof] for the batch committed as `commitment`.
pub fn verify_eval<F, T>(
    points: &[Vec<F>],
    commitment: &Digest,
    proof: &LpcProof<F, T::Nonce>,
    params: &LpcParams<F>,
    transcript: &mut T,
) -> bool
where
    F: PrimeField,
    T: Grinding<F>,
{
    if proof.z.len() != points.len()
        || points.is_empty()
        || proof
            .z
            .iter()
            .zip(points.iter())
            .any(|(values, pts)| values.len() != pts.len())
    {
        warn!("LPC verification failed: evaluations do not match the points");
        return false;
    }
    if proof.fri_proofs.len() != params.lambda {
        warn!("LPC verification failed: wrong number of FRI proofs");
        return false;
    }
    if params.grinding_bits > T::CHALLENGE_BITS {
        warn!("LPC verification failed: grinding bits out of range");
        return false;
    }

    for values in &proof.z {
        transcript.absorb(values);
    }

    if !transcript.verify_pow(proof.grinding_nonce, params.grinding_bits) {
        warn!("LPC verification failed: proof of work");
        return false;
    }
    let theta = transcript.challenge();

    let (interpolants, denominators) = match quotient_parts(points, &proof.z) {
        Ok(parts) => parts,
        Err(e) => {
            warn!("LPC verification failed: {e}");
            return false;
        }
    };
    let round_zero = RoundZero::Quotient {
        theta,
        interpolants: &interpolants,
        denominators: &denominators,
    };

    proof
        .fri_proofs
        .iter()
        .all(|fri_proof| fri::verify_eval(fri_proof, commitment, &round_zero, &params.fri, transcript))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::UniformRand;
    use placeholder_transcript::HashTranscript;
    use rand::{rngs::StdRng, SeedableRng};

    fn params(lambda: usize) -> LpcParams<Fr> {
        LpcParams {
            lambda,
            grinding_bits: 4,
            fri: FriParams::new(2, 3, 15, 64).unwrap(),
        }
    }

    #[test]
    fn test_precommit_rejects() {
        let domain = D::<Fr>::new(16).unwrap();
        assert!(matches!(
            precommit::<Fr>(&[], domain),
            Err(CommitmentError::EmptyBatch)
        ));
        let mut rng = StdRng::seed_from_u64(1);
        let big = DensePolynomial::<Fr>::rand(16, &mut rng);
        assert!(matches!(
            precommit(&[big], domain),
            Err(CommitmentError::DegreeTooLarge { degree: 16, .. })
        ));
    }

    #[test]
    fn test_open_batch() {
        let mut rng = StdRng::seed_from_u64(2);
        let params = params(2);
        let polys: Vec<_> = (0..3)
            .map(|_| DensePolynomial::<Fr>::rand(15, &mut rng))
            .collect();
        let points = vec![
            vec![Fr::rand(&mut rng)],
            vec![Fr::rand(&mut rng), Fr::rand(&mut rng)],
            vec![],
        ];

        let pre = precommit(&polys, params.domain()).unwrap();
        let root = commit(&pre);

        let mut prover = HashTranscript::<Fr>::new(b"lpc");
        let proof = proof_eval(&points, &pre, &polys, &params, &mut prover).unwrap();
        assert_eq!(proof.z[1][1], polys[1].evaluate(&points[1][1]));

        let mut verifier = HashTranscript::<Fr>::new(b"lpc");
        assert!(verify_eval(&points, &root, &proof, &params, &mut verifier));

        let mut tampered = proof.clone();
        tampered.z[0][0] += Fr::from(1u64);
        let mut verifier = HashTranscript::<Fr>::new(b"lpc");
        assert!(!verify_eval(&points, &root, &tampered, &params, &mut verifier));
    }

    #[test]
    fn test_mismatched_batch() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = params(1);
        let polys = vec![DensePolynomial::<Fr>::rand(7, &mut rng)];
        let pre = precommit(&polys, params.domain()).unwrap();
        let mut t = HashTranscript::<Fr>::new(b"lpc");
        assert_eq!(
            proof_eval(&[], &pre, &polys, &params, &mut t).unwrap_err(),
            CommitmentError::BatchSizeMismatch {
                polys: 1,
                points: 0
            }
        );
    }

    #[test]
    fn test_repeated_points() {
        let mut rng = StdRng::seed_from_u64(4);
        let params = params(1);
        let polys = vec![DensePolynomial::<Fr>::rand(7, &mut rng)];
        let p = Fr::rand(&mut rng);
        let pre = precommit(&polys, params.domain()).unwrap();
        let mut t = HashTranscript::<Fr>::new(b"lpc");
        assert_eq!(
            proof_eval(&[vec![p, p]], &pre, &polys, &params, &mut t).unwrap_err(),
            CommitmentError::RepeatedPoints(0)
        );
    }
}
