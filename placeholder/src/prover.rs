//! This module implements the prover.

use crate::{
    arguments::{gates, lookup, permutation, CONSTRAINT_COUNT},
    circuits::{constraints::ConstraintSystem, polynomial::PolynomialTable},
    error::ProverError,
    preprocessor::{PreprocessedPrivateData, PreprocessedPublicData},
    proof::{EvaluationProof, OpeningPoints, Proof},
};
use ark_ff::PrimeField;
use ark_poly::univariate::DensePolynomial;
use log::debug;
use placeholder_commitment::{
    lpc::{self, LpcParams},
    Digest, Grinding, LpcProof, Precommitment,
};
use placeholder_utils::ExtendedDensePolynomial;
use std::slice;

/// Opens a public group when it is present.
fn open_group<F, T>(
    points: &[Vec<F>],
    precommitment: Option<&Precommitment<F>>,
    polys: &[DensePolynomial<F>],
    params: &LpcParams<F>,
    transcript: &mut T,
) -> Result<Option<LpcProof<F, T::Nonce>>, ProverError>
where
    F: PrimeField,
    T: Grinding<F>,
{
    precommitment
        .map(|pre| lpc::proof_eval(points, pre, polys, params, transcript))
        .transpose()
        .map_err(ProverError::from)
}

impl<F: PrimeField, N> Proof<F, N> {
    /// Creates a proof that the witness of `private` satisfies `cs`.
    ///
    /// # Errors
    ///
    /// Will give error if the witness does not satisfy the circuit, or if a
    /// committed polynomial does not fit the commitment parameters.
    pub fn create<T>(
        cs: &ConstraintSystem<F>,
        public: &PreprocessedPublicData<F>,
        private: &PreprocessedPrivateData<F>,
        params: &LpcParams<F>,
        transcript: &mut T,
    ) -> Result<Self, ProverError>
    where
        T: Grinding<F, Nonce = N>,
    {
        Self::create_with_lookup_argument(cs, public, private, params, transcript, false)
    }

    /// [Proof::create], running the lookup argument even when `cs` has no
    /// lookup gates if `force_lookups` is set. The forced argument looks up
    /// zero in an empty table.
    pub(crate) fn create_with_lookup_argument<T>(
        cs: &ConstraintSystem<F>,
        public: &PreprocessedPublicData<F>,
        private: &PreprocessedPrivateData<F>,
        params: &LpcParams<F>,
        transcript: &mut T,
        force_lookups: bool,
    ) -> Result<Self, ProverError>
    where
        T: Grinding<F, Nonce = N>,
    {
        let common = &public.common_data;
        let table_description = &cs.table_description;
        let domain = common.basic_domain;
        let witnesses = &private.private_polynomial_table.witnesses;
        if witnesses.len() != table_description.witness_columns
            || common.rows_amount != table_description.rows_amount
            || common.usable_rows_amount != table_description.usable_rows_amount
        {
            return Err(ProverError::AssignmentShape(
                "the preprocessed data does not match the circuit",
            ));
        }

        // 1. seed the transcript with the public data
        common.absorb_into(transcript);

        // 2. commit to the witness
        let table = PolynomialTable::new(
            &private.private_polynomial_table,
            &public.public_polynomial_table,
        );
        let values = table.evaluations(&domain);
        let witness_precommitment = lpc::precommit(witnesses, params.domain())?;
        let witness_commitment = lpc::commit(&witness_precommitment);
        transcript.absorb_digest(&witness_commitment);
        debug!("prover: witness committed");

        // 3. permutation argument
        let permutation = permutation::prove_eval(public, &table, &values, params, transcript)?;

        // 4. lookup argument
        let lookup = if cs.has_lookups() || force_lookups {
            Some(lookup::prove_eval(
                cs,
                public,
                &table,
                &values,
                params,
                transcript,
            )?)
        } else {
            None
        };

        // 5. gate argument
        let gate_constraint = gates::prove_eval(cs, &table, domain, transcript);

        // 6. the quotient
        let alphas = transcript.challenges(CONSTRAINT_COUNT);
        let zero = || DensePolynomial { coeffs: vec![] };
        let lookup_constraints = match &lookup {
            Some(lookup) => lookup.constraints.to_vec(),
            None => vec![zero(); 5],
        };
        let constraints = permutation
            .constraints
            .iter()
            .cloned()
            .chain(lookup_constraints)
            .chain([gate_constraint]);
        let combined = constraints
            .zip(alphas.iter())
            .fold(zero(), |acc, (f, alpha)| &acc + &f.scale(*alpha));
        let (quotient, remainder) = combined
            .divide_by_vanishing_poly(domain)
            .ok_or(ProverError::QuotientNotExact)?;
        if !remainder.is_zero_poly() {
            return Err(ProverError::QuotientNotExact);
        }

        // 7. commit to the chunks of the quotient
        let chunks = quotient.split(common.rows_amount - 1);
        let mut t_precommitments = Vec::with_capacity(chunks.len());
        let mut t_commitments: Vec<Digest> = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let precommitment = lpc::precommit(slice::from_ref(chunk), params.domain())?;
            let commitment = lpc::commit(&precommitment);
            transcript.absorb_digest(&commitment);
            t_precommitments.push(precommitment);
            t_commitments.push(commitment);
        }
        debug!("prover: quotient split into {} chunks", chunks.len());

        // 8. open everything at zeta
        let zeta = transcript.challenge();
        let points = OpeningPoints::new(common, table_description, zeta);

        let witness = lpc::proof_eval(
            &points.witness,
            &witness_precommitment,
            witnesses,
            params,
            transcript,
        )?;
        let permutation_proof = lpc::proof_eval(
            &points.zeta_next,
            &permutation.precommitment,
            slice::from_ref(&permutation.v_perm),
            params,
            transcript,
        )?;
        let mut lookups = vec![];
        if let Some(lookup) = &lookup {
            lookups.push(lpc::proof_eval(
                &points.zeta_next,
                &lookup.v_l_precommitment,
                slice::from_ref(&lookup.v_l),
                params,
                transcript,
            )?);
            lookups.push(lpc::proof_eval(
                &points.zeta_prev,
                &lookup.input_precommitment,
                slice::from_ref(&lookup.input),
                params,
                transcript,
            )?);
            lookups.push(lpc::proof_eval(
                &points.zeta,
                &lookup.value_precommitment,
                slice::from_ref(&lookup.value),
                params,
                transcript,
            )?);
        }
        let mut quotient_proofs = Vec::with_capacity(chunks.len());
        for (chunk, precommitment) in chunks.iter().zip(t_precommitments.iter()) {
            quotient_proofs.push(lpc::proof_eval(
                &points.zeta,
                precommitment,
                slice::from_ref(chunk),
                params,
                transcript,
            )?);
        }

        let precommitments = &public.precommitments;
        let id_permutation = lpc::proof_eval(
            &points.permutation_columns,
            &precommitments.id_permutation,
            &public.identity_polynomials,
            params,
            transcript,
        )?;
        let sigma_permutation = lpc::proof_eval(
            &points.permutation_columns,
            &precommitments.sigma_permutation,
            &public.permutation_polynomials,
            params,
            transcript,
        )?;
        let public_table = &public.public_polynomial_table;
        let public_input = open_group(
            &points.public_input,
            precommitments.public_input.as_ref(),
            &public_table.public_inputs,
            params,
            transcript,
        )?;
        let constant = open_group(
            &points.constant,
            precommitments.constant.as_ref(),
            &public_table.constants,
            params,
            transcript,
        )?;
        let selector = open_group(
            &points.selector,
            precommitments.selector.as_ref(),
            &public_table.selectors,
            params,
            transcript,
        )?;
        let special_selectors = lpc::proof_eval(
            &points.special,
            &precommitments.special_selectors,
            &[public.q_last.clone(), public.q_blind.clone()],
            params,
            transcript,
        )?;
        debug!("prover: all batches opened");

        // 9. assemble the proof
        Ok(Proof {
            witness_commitment,
            v_perm_commitment: permutation.commitment,
            lookup_commitments: lookup.map(|lookup| lookup.commitments),
            t_commitments,
            eval_proof: EvaluationProof {
                challenge: zeta,
                witness,
                permutation: permutation_proof,
                lookups,
                quotient: quotient_proofs,
                id_permutation,
                sigma_permutation,
                public_input,
                constant,
                selector,
                special_selectors,
            },
        })
    }
}
