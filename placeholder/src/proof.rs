//! This module implements the data structures of a proof.

pub use crate::arguments::lookup::LookupCommitments;
use crate::{
    circuits::{
        polynomial::rotation_factor,
        table::{ColumnType, TableDescription},
    },
    preprocessor::CommonData,
};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use placeholder_commitment::{Digest, LpcProof};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// The openings of every committed batch at the evaluation challenge.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    bound = "F: CanonicalSerialize + CanonicalDeserialize, N: CanonicalSerialize + CanonicalDeserialize"
)]
pub struct EvaluationProof<F, N> {
    /// The evaluation challenge `zeta`.
    #[serde_as(as = "placeholder_utils::serialization::SerdeAs")]
    pub challenge: F,
    pub witness: LpcProof<F, N>,
    /// `V_P`.
    pub permutation: LpcProof<F, N>,
    /// `V_L`, `A'` and `S'`, when the circuit has lookups.
    pub lookups: Vec<LpcProof<F, N>>,
    /// One proof per chunk of the quotient.
    pub quotient: Vec<LpcProof<F, N>>,
    pub id_permutation: LpcProof<F, N>,
    pub sigma_permutation: LpcProof<F, N>,
    pub public_input: Option<LpcProof<F, N>>,
    pub constant: Option<LpcProof<F, N>>,
    pub selector: Option<LpcProof<F, N>>,
    /// `q_last` and `q_blind`.
    pub special_selectors: LpcProof<F, N>,
}

/// A proof, generic over the field and the grinding nonce of the transcript
/// it was produced with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    bound = "F: CanonicalSerialize + CanonicalDeserialize, N: CanonicalSerialize + CanonicalDeserialize"
)]
pub struct Proof<F, N> {
    pub witness_commitment: Digest,
    pub v_perm_commitment: Digest,
    pub lookup_commitments: Option<LookupCommitments>,
    /// Commitments to the chunks of the quotient polynomial.
    pub t_commitments: Vec<Digest>,
    pub eval_proof: EvaluationProof<F, N>,
}

/// The points every committed batch is opened at, shared by the prover and
/// the verifier.
pub(crate) struct OpeningPoints<F> {
    /// Per column, `zeta * omega^rotation` for each of its rotations.
    pub witness: Vec<Vec<F>>,
    pub public_input: Vec<Vec<F>>,
    pub constant: Vec<Vec<F>>,
    pub selector: Vec<Vec<F>>,
    /// `{zeta}`, for a single polynomial.
    pub zeta: Vec<Vec<F>>,
    /// `{zeta, zeta * omega}`.
    pub zeta_next: Vec<Vec<F>>,
    /// `{zeta, zeta * omega^-1}`.
    pub zeta_prev: Vec<Vec<F>>,
    /// `{zeta}` for each permutation column.
    pub permutation_columns: Vec<Vec<F>>,
    /// `{zeta}` for `q_last` and `q_blind`.
    pub special: Vec<Vec<F>>,
}

impl<F: PrimeField> OpeningPoints<F> {
    pub(crate) fn new(common: &CommonData<F>, table: &TableDescription, zeta: F) -> Self {
        let domain = common.basic_domain;
        let columns = |column_type| -> Vec<Vec<F>> {
            (0..table.columns(column_type))
                .map(|index| {
                    common
                        .rotations(table, column_type, index)
                        .iter()
                        .map(|rotation| zeta * rotation_factor(&domain, *rotation))
                        .collect()
                })
                .collect()
        };
        Self {
            witness: columns(ColumnType::Witness),
            public_input: columns(ColumnType::PublicInput),
            constant: columns(ColumnType::Constant),
            selector: columns(ColumnType::Selector),
            zeta: vec![vec![zeta]],
            zeta_next: vec![vec![zeta, zeta * domain.group_gen]],
            zeta_prev: vec![vec![zeta, zeta * domain.group_gen_inv]],
            permutation_columns: vec![vec![zeta]; table.permutation_width()],
            special: vec![vec![zeta]; 2],
        }
    }
}
