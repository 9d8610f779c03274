//! Preprocessing of the public part of a circuit: the permutation and
//! selector polynomials, their commitments, and the [CommonData] the
//! verifier works from.

use crate::{
    circuits::{
        assignment::PublicAssignment,
        constraints::ConstraintSystem,
        gate::CopyConstraint,
        polynomial::{interpolate_columns, PublicPolynomialTable},
        table::{ColumnType, TableDescription},
        variable::Variable,
    },
    error::{DomainCreationError, SetupError},
};
use ark_ff::{FftField, PrimeField};
use ark_poly::{
    univariate::DensePolynomial, EvaluationDomain, Evaluations, Radix2EvaluationDomain as D,
};
use log::debug;
use placeholder_commitment::{
    lpc::{self, LpcParams, Precommitment},
    Digest,
};
use placeholder_transcript::Transcript;
use placeholder_utils::{serialization::SerdeAs, vanishing_polynomial};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// The cycles of the copy-constraint permutation over the cells of the
/// permutation columns.
///
/// Cells are identified by `column * rows + row`. `mapping` sends a cell to
/// the next one in its cycle, `aux` to the label of its cycle and `sizes`
/// gives the size of the cycle with a given label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleRepresentation {
    rows: usize,
    mapping: Vec<usize>,
    aux: Vec<usize>,
    sizes: Vec<usize>,
}

impl CycleRepresentation {
    /// Builds the cycles of the permutation defined by `copy_constraints`.
    /// The variables must be absolute and outside of the selector columns.
    pub fn new(table: &TableDescription, copy_constraints: &[CopyConstraint]) -> Self {
        let cells = table.permutation_width() * table.rows_amount;
        let mut cycles = Self {
            rows: table.rows_amount,
            mapping: (0..cells).collect(),
            aux: (0..cells).collect(),
            sizes: vec![1; cells],
        };
        for CopyConstraint(a, b) in copy_constraints {
            let left = cycles.cell(table, a);
            let right = cycles.cell(table, b);
            cycles.merge(left, right);
        }
        cycles
    }

    fn cell(&self, table: &TableDescription, var: &Variable) -> usize {
        table.global_index(var.column_type, var.index) * self.rows + var.rotation as usize
    }

    fn merge(&mut self, mut left: usize, mut right: usize) {
        if self.aux[left] == self.aux[right] {
            return;
        }
        if self.sizes[self.aux[left]] < self.sizes[self.aux[right]] {
            std::mem::swap(&mut left, &mut right);
        }

        let label = self.aux[left];
        self.sizes[label] += self.sizes[self.aux[right]];

        // relabel the smaller cycle
        let mut next = right;
        loop {
            self.aux[next] = label;
            next = self.mapping[next];
            if next == right {
                break;
            }
        }

        // splice the two cycles together
        self.mapping.swap(left, right);
    }

    fn split(&self, cell: usize) -> (usize, usize) {
        (cell / self.rows, cell % self.rows)
    }

    /// The cell following `(column, row)` in its cycle.
    pub fn mapping(&self, column: usize, row: usize) -> (usize, usize) {
        self.split(self.mapping[column * self.rows + row])
    }

    /// A representative cell of the cycle of `(column, row)`.
    pub fn aux(&self, column: usize, row: usize) -> (usize, usize) {
        self.split(self.aux[column * self.rows + row])
    }

    /// The number of cells in the cycle of `(column, row)`.
    pub fn size(&self, column: usize, row: usize) -> usize {
        self.sizes[self.aux[column * self.rows + row]]
    }
}

/// `delta^i * omega^j` for column `i` and row `j`, `delta` being the
/// multiplicative generator of the field.
fn cell_label<F: FftField>(domain: &D<F>, column: usize, row: usize) -> F {
    F::GENERATOR.pow([column as u64]) * domain.element(row)
}

/// The identity permutation polynomials, `S_id_i(omega^j) = delta^i * omega^j`.
pub fn identity_polynomials<F: FftField>(count: usize, domain: D<F>) -> Vec<DensePolynomial<F>> {
    let columns: Vec<Vec<F>> = (0..count)
        .map(|i| {
            (0..domain.size())
                .map(|j| cell_label(&domain, i, j))
                .collect()
        })
        .collect();
    interpolate_columns(&columns, domain)
}

/// The copy-constraint permutation polynomials: `S_sigma_i(omega^j)` is the
/// label of the cell following `(i, j)` in its cycle.
pub fn permutation_polynomials<F: FftField>(
    count: usize,
    cycles: &CycleRepresentation,
    domain: D<F>,
) -> Vec<DensePolynomial<F>> {
    let columns: Vec<Vec<F>> = (0..count)
        .map(|i| {
            (0..domain.size())
                .map(|j| {
                    let (column, row) = cycles.mapping(i, j);
                    cell_label(&domain, column, row)
                })
                .collect()
        })
        .collect();
    interpolate_columns(&columns, domain)
}

/// The polynomial equal to one at `omega^index` and zero on the rest of the
/// domain.
pub fn lagrange_polynomial<F: FftField>(domain: D<F>, index: usize) -> DensePolynomial<F> {
    let mut evals = vec![F::zero(); domain.size()];
    evals[index] = F::one();
    Evaluations::from_vec_and_domain(evals, domain).interpolate()
}

/// The selector of the blinding rows, the rows after `q_last`.
pub fn selector_blind<F: FftField>(usable_rows: usize, domain: D<F>) -> DensePolynomial<F> {
    let evals = (0..domain.size())
        .map(|row| if row > usable_rows { F::one() } else { F::zero() })
        .collect();
    Evaluations::from_vec_and_domain(evals, domain).interpolate()
}

/// For every column of the table, the sorted rotations at which the
/// constraints read it. Rotation zero is always present.
pub fn columns_rotations<F: PrimeField>(cs: &ConstraintSystem<F>) -> Vec<Vec<i32>> {
    let table = &cs.table_description;
    let mut rotations = vec![vec![0]; table.table_width()];

    let gate_vars = cs
        .gates
        .iter()
        .flat_map(|gate| gate.constraints.iter())
        .flat_map(|constraint| constraint.variables());
    let lookup_vars = cs.lookup_gates.iter().flat_map(|gate| {
        gate.inputs()
            .flat_map(|term| term.vars.iter())
            .chain(gate.values())
    });
    for var in gate_vars.chain(lookup_vars).filter(|var| var.relative) {
        rotations[table.global_index(var.column_type, var.index)].push(var.rotation);
    }

    for column in &mut rotations {
        column.sort_unstable();
        column.dedup();
    }
    rotations
}

/// Commitments to the public polynomials. Groups without polynomials have no
/// commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCommitments {
    pub id_permutation: Digest,
    pub sigma_permutation: Digest,
    pub public_input: Option<Digest>,
    pub constant: Option<Digest>,
    pub selector: Option<Digest>,
    /// Commits to `(q_last, q_blind)`.
    pub special_selectors: Digest,
}

#[derive(Clone, Debug)]
pub struct PublicPrecommitments<F: FftField> {
    pub id_permutation: Precommitment<F>,
    pub sigma_permutation: Precommitment<F>,
    pub public_input: Option<Precommitment<F>>,
    pub constant: Option<Precommitment<F>>,
    pub selector: Option<Precommitment<F>>,
    pub special_selectors: Precommitment<F>,
}

impl<F: PrimeField> PublicPrecommitments<F> {
    pub fn commitments(&self) -> PublicCommitments {
        let commit = |pre: &Option<Precommitment<F>>| pre.as_ref().map(lpc::commit);
        PublicCommitments {
            id_permutation: lpc::commit(&self.id_permutation),
            sigma_permutation: lpc::commit(&self.sigma_permutation),
            public_input: commit(&self.public_input),
            constant: commit(&self.constant),
            selector: commit(&self.selector),
            special_selectors: lpc::commit(&self.special_selectors),
        }
    }
}

/// Everything the verifier needs besides the circuit and the proof.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: PrimeField")]
pub struct CommonData<F: PrimeField> {
    #[serde_as(as = "SerdeAs")]
    pub basic_domain: D<F>,
    /// `x^N - 1`, with `N` the number of rows.
    #[serde_as(as = "SerdeAs")]
    pub z: DensePolynomial<F>,
    #[serde_as(as = "SerdeAs")]
    pub lagrange_0: DensePolynomial<F>,
    /// Indexed by global column index.
    pub columns_rotations: Vec<Vec<i32>>,
    pub commitments: PublicCommitments,
    pub rows_amount: usize,
    pub usable_rows_amount: usize,
}

impl<F: PrimeField> CommonData<F> {
    /// Seeds a transcript with the public commitments and the trace shape.
    /// Both the prover and the verifier start this way.
    pub fn absorb_into<T: Transcript<F>>(&self, transcript: &mut T) {
        let commitments = &self.commitments;
        transcript.absorb_digest(&commitments.id_permutation);
        transcript.absorb_digest(&commitments.sigma_permutation);
        for digest in [
            &commitments.public_input,
            &commitments.constant,
            &commitments.selector,
        ]
        .into_iter()
        .flatten()
        {
            transcript.absorb_digest(digest);
        }
        transcript.absorb_digest(&commitments.special_selectors);
        transcript.absorb(&[
            F::from(self.rows_amount as u64),
            F::from(self.usable_rows_amount as u64),
        ]);
    }

    /// The rotations of a column.
    pub fn rotations(
        &self,
        table: &TableDescription,
        column_type: ColumnType,
        index: usize,
    ) -> &[i32] {
        self.columns_rotations
            .get(table.global_index(column_type, index))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug)]
pub struct PreprocessedPublicData<F: PrimeField> {
    pub public_polynomial_table: PublicPolynomialTable<F>,
    pub identity_polynomials: Vec<DensePolynomial<F>>,
    pub permutation_polynomials: Vec<DensePolynomial<F>>,
    pub q_last: DensePolynomial<F>,
    pub q_blind: DensePolynomial<F>,
    pub precommitments: PublicPrecommitments<F>,
    pub common_data: CommonData<F>,
}

fn precommit_group<F: PrimeField>(
    polys: &[DensePolynomial<F>],
    domain: D<F>,
) -> Result<Option<Precommitment<F>>, SetupError> {
    if polys.is_empty() {
        return Ok(None);
    }
    Ok(Some(lpc::precommit(polys, domain)?))
}

/// Interpolates and commits the public columns and the permutation of `cs`.
pub fn process<F: PrimeField>(
    cs: &ConstraintSystem<F>,
    assignment: &PublicAssignment<F>,
    params: &LpcParams<F>,
) -> Result<PreprocessedPublicData<F>, SetupError> {
    let table = &cs.table_description;
    if !assignment.matches(table) {
        return Err(SetupError::AssignmentShape("columns or rows do not match"));
    }
    let rows = table.rows_amount;
    let basic_domain = D::<F>::new(rows)
        .filter(|domain| domain.size() == rows)
        .ok_or_else(|| DomainCreationError::DomainConstructionFailed("basic".to_string(), rows))?;

    debug!(
        "preprocessing: {} rows, {} usable, {} columns",
        rows,
        table.usable_rows_amount,
        table.table_width()
    );

    let public_polynomial_table = PublicPolynomialTable {
        public_inputs: interpolate_columns(&assignment.public_inputs, basic_domain),
        constants: interpolate_columns(&assignment.constants, basic_domain),
        selectors: interpolate_columns(&assignment.selectors, basic_domain),
    };

    let cycles = CycleRepresentation::new(table, &cs.copy_constraints);
    let identity_polynomials = identity_polynomials(table.permutation_width(), basic_domain);
    let permutation_polynomials =
        permutation_polynomials(table.permutation_width(), &cycles, basic_domain);

    let q_last = lagrange_polynomial(basic_domain, table.usable_rows_amount);
    let q_blind = selector_blind(table.usable_rows_amount, basic_domain);

    let domain = params.domain();
    let groups = [
        identity_polynomials.as_slice(),
        permutation_polynomials.as_slice(),
        public_polynomial_table.public_inputs.as_slice(),
        public_polynomial_table.constants.as_slice(),
        public_polynomial_table.selectors.as_slice(),
    ];
    let mut precommitted = groups
        .par_iter()
        .map(|polys| precommit_group(polys, domain))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let mut next = || precommitted.next().flatten();
    let (id_permutation, sigma_permutation) = match (next(), next()) {
        (Some(id), Some(sigma)) => (id, sigma),
        _ => {
            return Err(SetupError::ConstraintSystem(
                "the table has no column for the permutation argument".to_string(),
            ))
        }
    };
    let precommitments = PublicPrecommitments {
        id_permutation,
        sigma_permutation,
        public_input: next(),
        constant: next(),
        selector: next(),
        special_selectors: lpc::precommit(&[q_last.clone(), q_blind.clone()], domain)?,
    };

    let common_data = CommonData {
        basic_domain,
        z: vanishing_polynomial(rows),
        lagrange_0: lagrange_polynomial(basic_domain, 0),
        columns_rotations: columns_rotations(cs),
        commitments: precommitments.commitments(),
        rows_amount: rows,
        usable_rows_amount: table.usable_rows_amount,
    };

    Ok(PreprocessedPublicData {
        public_polynomial_table,
        identity_polynomials,
        permutation_polynomials,
        q_last,
        q_blind,
        precommitments,
        common_data,
    })
}
