//! This module implements the verifier.

use crate::{
    arguments::{
        gates,
        lookup::{self, LookupEvaluations},
        permutation::{self, PermutationEvaluations},
        SpecialEvaluations, TraceEvaluations, CONSTRAINT_COUNT,
    },
    circuits::{constraints::ConstraintSystem, variable::Variable},
    preprocessor::CommonData,
    proof::{OpeningPoints, Proof},
};
use ark_ff::{Field, PrimeField};
use ark_poly::Polynomial;
use log::{debug, warn};
use placeholder_commitment::{
    lpc::{self, LpcParams},
    Digest, Grinding, LpcProof,
};

fn reject(reason: &str) -> bool {
    warn!("proof rejected: {reason}");
    false
}

/// Challenges of the lookup argument: `theta`, `beta` and `gamma`.
struct LookupChallenges<F> {
    theta: F,
    beta: F,
    gamma: F,
}

/// The challenges, drawn in the order the prover draws them.
struct Challenges<F> {
    beta: F,
    gamma: F,
    lookup: Option<LookupChallenges<F>>,
    gate_theta: F,
    alphas: Vec<F>,
    zeta: F,
}

fn replay<F, T>(
    common: &CommonData<F>,
    proof: &Proof<F, T::Nonce>,
    transcript: &mut T,
) -> Challenges<F>
where
    F: PrimeField,
    T: Grinding<F>,
{
    common.absorb_into(transcript);
    transcript.absorb_digest(&proof.witness_commitment);

    let beta = transcript.challenge();
    let gamma = transcript.challenge();
    transcript.absorb_digest(&proof.v_perm_commitment);

    let lookup = proof.lookup_commitments.map(|commitments| {
        let theta = transcript.challenge();
        transcript.absorb_digest(&commitments.input);
        transcript.absorb_digest(&commitments.value);
        let beta = transcript.challenge();
        let gamma = transcript.challenge();
        transcript.absorb_digest(&commitments.v_l);
        LookupChallenges { theta, beta, gamma }
    });

    let gate_theta = transcript.challenge();
    let alphas = transcript.challenges(CONSTRAINT_COUNT);
    for commitment in &proof.t_commitments {
        transcript.absorb_digest(commitment);
    }
    let zeta = transcript.challenge();

    Challenges {
        beta,
        gamma,
        lookup,
        gate_theta,
        alphas,
        zeta,
    }
}

/// Checks one batch opening, logging which batch failed.
fn check_opening<F, T>(
    name: &str,
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
    lpc::verify_eval(points, commitment, proof, params, transcript)
        || reject(&format!("the opening of {name} is invalid"))
}

fn check_group<F, T>(
    name: &str,
    points: &[Vec<F>],
    commitment: Option<&Digest>,
    proof: Option<&LpcProof<F, T::Nonce>>,
    params: &LpcParams<F>,
    transcript: &mut T,
) -> bool
where
    F: PrimeField,
    T: Grinding<F>,
{
    match (commitment, proof) {
        (Some(commitment), Some(proof)) => {
            check_opening(name, points, commitment, proof, params, transcript)
        }
        (None, None) => true,
        _ => reject(&format!("unexpected opening of {name}")),
    }
}

/// Checks that the proof and the circuit agree on the batches present.
fn check_shape<F: PrimeField, N>(
    cs: &ConstraintSystem<F>,
    common: &CommonData<F>,
    proof: &Proof<F, N>,
) -> bool {
    let table = &cs.table_description;
    let eval = &proof.eval_proof;
    if common.rows_amount != table.rows_amount
        || common.usable_rows_amount != table.usable_rows_amount
        || common.columns_rotations.len() != table.table_width()
    {
        return reject("the common data does not match the circuit");
    }
    // a circuit without lookup gates may still carry the lookup argument
    let has_lookup_argument = proof.lookup_commitments.is_some();
    let lookup_batches = if has_lookup_argument { 3 } else { 0 };
    if (cs.has_lookups() && !has_lookup_argument) || eval.lookups.len() != lookup_batches {
        return reject("lookup commitments do not match the circuit");
    }
    if proof.t_commitments.is_empty() || proof.t_commitments.len() != eval.quotient.len() {
        return reject("wrong number of quotient chunks");
    }
    true
}

fn group_values<F, N>(proof: &Option<LpcProof<F, N>>) -> &[Vec<F>] {
    proof.as_ref().map(|p| p.z.as_slice()).unwrap_or_default()
}

/// `sum_i alpha_i F_i(zeta)`, computed from the opened values. `None` when a
/// value the constraints read was not opened.
fn combined_constraints<F: PrimeField, N>(
    cs: &ConstraintSystem<F>,
    common: &CommonData<F>,
    proof: &Proof<F, N>,
    challenges: &Challenges<F>,
) -> Option<F> {
    let table = &cs.table_description;
    let eval = &proof.eval_proof;
    let trace = TraceEvaluations {
        table,
        rotations: &common.columns_rotations,
        witness: &eval.witness.z,
        public_input: group_values(&eval.public_input),
        constant: group_values(&eval.constant),
        selector: group_values(&eval.selector),
    };
    let first = |proof: &LpcProof<F, N>, k: usize, j: usize| -> Option<F> {
        proof.z.get(k)?.get(j).copied()
    };

    let special = SpecialEvaluations {
        lagrange_0: common.lagrange_0.evaluate(&challenges.zeta),
        q_last: first(&eval.special_selectors, 0, 0)?,
        q_blind: first(&eval.special_selectors, 1, 0)?,
    };

    let permutation_evals = PermutationEvaluations {
        columns: (0..table.permutation_width())
            .map(|i| {
                let (column_type, index) = table.column_at(i)?;
                trace.get(&Variable::new(column_type, index, 0, true))
            })
            .collect::<Option<Vec<_>>>()?,
        id: (0..table.permutation_width())
            .map(|i| first(&eval.id_permutation, i, 0))
            .collect::<Option<Vec<_>>>()?,
        sigma: (0..table.permutation_width())
            .map(|i| first(&eval.sigma_permutation, i, 0))
            .collect::<Option<Vec<_>>>()?,
        v: first(&eval.permutation, 0, 0)?,
        v_next: first(&eval.permutation, 0, 1)?,
    };
    let mut values = permutation::verify_eval(
        challenges.beta,
        challenges.gamma,
        &permutation_evals,
        &special,
    )
    .to_vec();

    match &challenges.lookup {
        Some(lookup_challenges) => {
            let read = |var: &Variable| trace.get(var);
            let theta = lookup_challenges.theta;
            let [v_l, input, value] = eval.lookups.as_slice() else {
                return None;
            };
            let lookup_evals = LookupEvaluations {
                input: lookup::compressed_input(&cs.lookup_gates, theta, read)?,
                value: lookup::compressed_value(&cs.lookup_table(), theta, read)?,
                permuted_input: first(input, 0, 0)?,
                permuted_input_prev: first(input, 0, 1)?,
                permuted_value: first(value, 0, 0)?,
                v: first(v_l, 0, 0)?,
                v_next: first(v_l, 0, 1)?,
            };
            values.extend(lookup::verify_eval(
                lookup_challenges.beta,
                lookup_challenges.gamma,
                &lookup_evals,
                &special,
            ));
        }
        None => values.extend([F::zero(); 5]),
    }

    values.push(gates::verify_eval(
        &cs.gates,
        challenges.gate_theta,
        |var| trace.get(var),
    )?);

    Some(
        values
            .iter()
            .zip(challenges.alphas.iter())
            .map(|(value, alpha)| *value * alpha)
            .sum(),
    )
}

/// Verifies `proof` against the circuit `cs` and its preprocessed
/// `common` data. The transcript must be seeded as the prover's was.
pub fn verify<F, T>(
    cs: &ConstraintSystem<F>,
    common: &CommonData<F>,
    proof: &Proof<F, T::Nonce>,
    params: &LpcParams<F>,
    transcript: &mut T,
) -> bool
where
    F: PrimeField,
    T: Grinding<F>,
{
    if !check_shape(cs, common, proof) {
        return false;
    }

    let challenges = replay(common, proof, transcript);
    let eval = &proof.eval_proof;
    if eval.challenge != challenges.zeta {
        return reject("the evaluation challenge does not match the transcript");
    }

    // the openings, in the order they were produced
    let points = OpeningPoints::new(common, &cs.table_description, challenges.zeta);
    let commitments = &common.commitments;
    let mut openings_valid = check_opening(
        "the witness",
        &points.witness,
        &proof.witness_commitment,
        &eval.witness,
        params,
        transcript,
    ) && check_opening(
        "V_P",
        &points.zeta_next,
        &proof.v_perm_commitment,
        &eval.permutation,
        params,
        transcript,
    );
    if let (true, Some(lookup_commitments)) = (openings_valid, &proof.lookup_commitments) {
        openings_valid = check_opening(
            "V_L",
            &points.zeta_next,
            &lookup_commitments.v_l,
            &eval.lookups[0],
            params,
            transcript,
        ) && check_opening(
            "the permuted input",
            &points.zeta_prev,
            &lookup_commitments.input,
            &eval.lookups[1],
            params,
            transcript,
        ) && check_opening(
            "the permuted table",
            &points.zeta,
            &lookup_commitments.value,
            &eval.lookups[2],
            params,
            transcript,
        );
    }
    openings_valid = openings_valid
        && proof
            .t_commitments
            .iter()
            .zip(eval.quotient.iter())
            .all(|(commitment, opening)| {
                check_opening(
                    "a quotient chunk",
                    &points.zeta,
                    commitment,
                    opening,
                    params,
                    transcript,
                )
            })
        && check_opening(
            "the identity permutation",
            &points.permutation_columns,
            &commitments.id_permutation,
            &eval.id_permutation,
            params,
            transcript,
        )
        && check_opening(
            "the copy permutation",
            &points.permutation_columns,
            &commitments.sigma_permutation,
            &eval.sigma_permutation,
            params,
            transcript,
        )
        && check_group(
            "the public inputs",
            &points.public_input,
            commitments.public_input.as_ref(),
            eval.public_input.as_ref(),
            params,
            transcript,
        )
        && check_group(
            "the constants",
            &points.constant,
            commitments.constant.as_ref(),
            eval.constant.as_ref(),
            params,
            transcript,
        )
        && check_group(
            "the selectors",
            &points.selector,
            commitments.selector.as_ref(),
            eval.selector.as_ref(),
            params,
            transcript,
        )
        && check_opening(
            "the special selectors",
            &points.special,
            &commitments.special_selectors,
            &eval.special_selectors,
            params,
            transcript,
        );
    if !openings_valid {
        return false;
    }
    debug!("verifier: all openings valid");

    let Some(combined) = combined_constraints(cs, common, proof, &challenges) else {
        return reject("a constraint reads a value that was not opened");
    };

    // T(zeta) = sum_k zeta^(k N) T_k(zeta)
    let shift = challenges.zeta.pow([common.rows_amount as u64]);
    let mut power = F::one();
    let mut t_zeta = F::zero();
    for opening in &eval.quotient {
        let Some(value) = opening.z.first().and_then(|z| z.first()) else {
            return reject("empty quotient opening");
        };
        t_zeta += power * value;
        power *= shift;
    }

    if combined != common.z.evaluate(&challenges.zeta) * t_zeta {
        return reject("the quotient does not match the constraints");
    }
    true
}
