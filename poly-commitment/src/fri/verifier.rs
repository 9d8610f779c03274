use super::{commit_batch, leaf_order, FriParams, FriProof};
use crate::merkle::leaf_bytes;
use ark_ff::PrimeField;
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial, EvaluationDomain, Polynomial};
use log::{trace, warn};
use placeholder_transcript::{Digest, Transcript};

/// How the values opened in the first round relate to the tested polynomial.
pub enum RoundZero<'a, F: PrimeField> {
    /// A single committed polynomial, tested directly.
    Direct,
    /// The tested polynomial is `sum_k theta^k (g_k - U_k) / V_k`.
    Quotient {
        theta: F,
        interpolants: &'a [DensePolynomial<F>],
        denominators: &'a [DensePolynomial<F>],
    },
}

impl<F: PrimeField> RoundZero<'_, F> {
    fn batch_size(&self) -> Option<usize> {
        match self {
            RoundZero::Direct => Some(1),
            RoundZero::Quotient {
                interpolants,
                denominators,
                ..
            } => (interpolants.len() == denominators.len()).then_some(interpolants.len()),
        }
    }

    /// Values of the tested polynomial at `points`, given the batch values there.
    fn combine(&self, y: &[[F; 2]], points: [F; 2]) -> Option<[F; 2]> {
        match self {
            RoundZero::Direct => y.first().copied(),
            RoundZero::Quotient {
                theta,
                interpolants,
                denominators,
            } => {
                let mut acc = [F::zero(); 2];
                let mut theta_pow = F::one();
                for ((pair, u), v) in y.iter().zip(interpolants.iter()).zip(denominators.iter()) {
                    for side in 0..2 {
                        let point = points[side];
                        let denominator = v.evaluate(&point).inverse()?;
                        acc[side] += theta_pow * (pair[side] - u.evaluate(&point)) * denominator;
                    }
                    theta_pow *= theta;
                }
                Some(acc)
            }
        }
    }
}

fn reject(reason: &str) -> bool {
    warn!("FRI verification failed: {reason}");
    false
}

/// Checks a [FriProof] against `commitment`, replaying the prover's
/// transcript interactions.
pub fn verify_eval<F, T>(
    proof: &FriProof<F>,
    commitment: &Digest,
    round_zero: &RoundZero<F>,
    params: &FriParams<F>,
    transcript: &mut T,
) -> bool
where
    F: PrimeField,
    T: Transcript<F>,
{
    if proof.target_commitment != *commitment {
        return reject("proof was produced for another commitment");
    }

    let rounds = params.rounds();
    if proof.round_proofs.len() != rounds {
        return reject("wrong number of rounds");
    }

    let final_polynomial = DensePolynomial::from_coefficients_slice(&proof.final_polynomial);
    if final_polynomial.degree() > params.final_degree_bound() {
        return reject("final polynomial degree too large");
    }
    let final_domain = params.domains[rounds];
    let final_values = final_domain.fft(&final_polynomial.coeffs);
    // the last round opens its folded value against this root
    let final_root = match commit_batch(&[final_values.clone()]) {
        Ok(tree) => tree.root(),
        Err(_) => return reject("final polynomial cannot be committed"),
    };

    let two_inv = match F::from(2u64).inverse() {
        Some(inv) => inv,
        None => return reject("characteristic two"),
    };

    transcript.absorb_digest(commitment);
    let mut x = (transcript.int_challenge() % params.domains[0].size() as u64) as usize;
    let mut expected_root = *commitment;

    for (i, round) in proof.round_proofs.iter().enumerate() {
        let domain = params.domains[i];
        let half = domain.size() / 2;

        let alpha = transcript.challenge();

        if round.t_root != expected_root {
            return reject("round root is not bound to the previous layer");
        }

        let expected_len = if i == 0 { round_zero.batch_size() } else { Some(1) };
        if expected_len != Some(round.y.len()) {
            return reject("unexpected number of opened values");
        }

        let leaf: Vec<[F; 2]> = round
            .y
            .iter()
            .map(|pair| leaf_order(*pair, x >= half))
            .collect();
        if round.path.index != x % half || !round.path.validate(&leaf_bytes(&leaf), &round.t_root)
        {
            return reject("invalid opening of the queried leaf");
        }

        let s = domain.element(x);
        let values = if i == 0 {
            match round_zero.combine(&round.y, [s, -s]) {
                Some(values) => values,
                None => return reject("evaluation point in the query domain"),
            }
        } else {
            round.y[0]
        };

        let s_inv = match s.inverse() {
            Some(inv) => inv,
            None => return reject("zero query point"),
        };
        let interpolated = (values[0] + values[1]) * two_inv
            + alpha * (values[0] - values[1]) * two_inv * s_inv;
        if interpolated != round.colinear_value {
            return reject("folding is not colinear");
        }

        let next_domain = params.domains[i + 1];
        let next_half = next_domain.size() / 2;
        let next_x = x % next_domain.size();

        let (next_root, next_pair) = match proof.round_proofs.get(i + 1) {
            Some(next) => match next.y.first() {
                Some(pair) => (next.t_root, *pair),
                None => return reject("missing values in the next round"),
            },
            None => (
                final_root,
                [
                    final_values[next_x],
                    final_values[(next_x + next_half) % next_domain.size()],
                ],
            ),
        };
        transcript.absorb_digest(&next_root);

        if next_pair[0] != round.colinear_value {
            return reject("folded value differs from the next layer");
        }
        let next_leaf = leaf_order(next_pair, next_x >= next_half);
        if round.colinear_path.index != next_x % next_half
            || !round
                .colinear_path
                .validate(&leaf_bytes(&[next_leaf]), &next_root)
        {
            return reject("invalid opening of the folded value");
        }

        trace!("FRI round {i} verified");
        expected_root = next_root;
        x = next_x;
    }

    true
}
