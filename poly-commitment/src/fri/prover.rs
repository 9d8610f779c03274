use super::{commit_batch, Foldable, FriParams, FriProof, RoundProof};
use crate::{error::CommitmentError, merkle::MerkleTree};
use ark_ff::PrimeField;
use ark_poly::EvaluationDomain;
use log::trace;
use placeholder_transcript::Transcript;

/// Proves that `q` has degree at most `params.max_degree`.
///
/// `g` is the committed batch `q` is derived from and `g_tree` its commitment
/// over `params.domains[0]`. The first round opens every polynomial of `g`
/// at the query point, later rounds open the folded polynomials.
pub fn proof_eval<F, P, T>(
    q: &P,
    g: &[P],
    g_tree: &MerkleTree,
    params: &FriParams<F>,
    transcript: &mut T,
) -> Result<FriProof<F>, CommitmentError>
where
    F: PrimeField,
    P: Foldable<F>,
    T: Transcript<F>,
{
    if g.is_empty() {
        return Err(CommitmentError::EmptyBatch);
    }

    transcript.absorb_digest(&g_tree.root());
    let mut x = (transcript.int_challenge() % params.domains[0].size() as u64) as usize;

    let mut f = q.clone();
    let mut layer: Option<MerkleTree> = None;
    let mut round_proofs = Vec::with_capacity(params.rounds());

    for i in 0..params.rounds() {
        let domain = params.domains[i];
        let half = domain.size() / 2;
        let pair_index = (x + half) % domain.size();

        let alpha = transcript.challenge();

        let y = if i == 0 {
            g.iter()
                .map(|g_k| {
                    [
                        g_k.evaluate_at_index(domain, x),
                        g_k.evaluate_at_index(domain, pair_index),
                    ]
                })
                .collect()
        } else {
            vec![[
                f.evaluate_at_index(domain, x),
                f.evaluate_at_index(domain, pair_index),
            ]]
        };

        let tree = layer.as_ref().unwrap_or(g_tree);
        let path = tree.proof(x % half)?;
        let t_root = tree.root();

        f = f.fold(domain, alpha);

        let next_domain = params.domains[i + 1];
        let next_values = f.evaluations_over(next_domain);
        let next_tree = commit_batch(&[next_values])?;
        transcript.absorb_digest(&next_tree.root());

        let next_x = x % next_domain.size();
        let colinear_value = f.evaluate_at_index(next_domain, next_x);
        let colinear_path = next_tree.proof(next_x % (next_domain.size() / 2))?;

        trace!(
            "FRI round {i}: query {x} on a domain of size {}",
            domain.size()
        );

        round_proofs.push(RoundProof {
            y,
            path,
            t_root,
            colinear_value,
            colinear_path,
        });

        layer = Some(next_tree);
        x = next_x;
    }

    Ok(FriProof {
        round_proofs,
        final_polynomial: f.into_coefficients().coeffs,
        target_commitment: g_tree.root(),
    })
}
