use crate::{
    circuits::{
        assignment::AssignmentTable,
        constraints::ConstraintSystem,
        expr::{Constraint, Term},
        gate::{CopyConstraint, Gate},
        table::{ColumnType, TableDescription},
        variable::Variable,
    },
    error::ProverError,
    params::PlaceholderParams,
    preprocessor::{private, public, PreprocessedPrivateData, PreprocessedPublicData},
    proof::Proof,
    verifier::verify,
};
use ark_ff::PrimeField;
use placeholder_commitment::{Grinding, LpcParams};
use std::marker::PhantomData;

/// Rows past the usable ones.
const BLINDING_ROWS: usize = 3;

pub struct BenchmarkCtx<F: PrimeField, T> {
    pub(crate) cs: ConstraintSystem<F>,
    pub(crate) public: PreprocessedPublicData<F>,
    pub(crate) private: PreprocessedPrivateData<F>,
    pub(crate) params: LpcParams<F>,
    transcript: PhantomData<fn() -> T>,
}

/// A chain of additions `w2 = w0 + w1`, where each output is the first input
/// of the next row and the first input is public.
fn addition_chain<F: PrimeField>(
    table: &TableDescription,
) -> (ConstraintSystem<F>, AssignmentTable<F>) {
    let usable = table.usable_rows_amount;
    let add = Gate::new(
        0,
        vec![Constraint::new(vec![
            Term::from(Variable::witness(0, 0)),
            Term::from(Variable::witness(1, 0)),
            Term::new(-F::one(), vec![Variable::witness(2, 0)]),
        ])],
    );
    let mut copies = vec![CopyConstraint(
        Variable::absolute(ColumnType::PublicInput, 0, 0),
        Variable::absolute(ColumnType::Witness, 0, 0),
    )];
    copies.extend((1..usable).map(|row| {
        CopyConstraint(
            Variable::absolute(ColumnType::Witness, 2, row - 1),
            Variable::absolute(ColumnType::Witness, 0, row),
        )
    }));

    let mut assignment = AssignmentTable::new(table);
    let mut x = F::one();
    assignment.public.public_inputs[0][0] = x;
    for row in 0..usable {
        let y = F::from(row as u64);
        assignment.private.witnesses[0][row] = x;
        assignment.private.witnesses[1][row] = y;
        assignment.private.witnesses[2][row] = x + y;
        assignment.public.selectors[0][row] = F::one();
        x += y;
    }

    let cs = ConstraintSystem::create(*table)
        .gates(vec![add])
        .copy_constraints(copies)
        .build()
        .expect("the addition chain is a valid circuit");
    (cs, assignment)
}

impl<F: PrimeField, T: Grinding<F> + Default> BenchmarkCtx<F, T> {
    /// This will create a context that allows for benchmarks of a trace of
    /// `2^rows_log` rows.
    pub fn new(rows_log: usize) -> Self {
        let rows = 1 << rows_log.max(2);
        let table = TableDescription {
            witness_columns: 3,
            public_input_columns: 1,
            constant_columns: 0,
            selector_columns: 1,
            rows_amount: rows,
            usable_rows_amount: rows - BLINDING_ROWS,
        };
        let (cs, assignment) = addition_chain(&table);

        let params = PlaceholderParams::default()
            .lpc_params(&table)
            .expect("default parameters fit every table");
        let public = public::process(&cs, &assignment.public, &params)
            .expect("the public assignment matches the table");
        let private = private::process(&cs, &assignment.private, public.common_data.basic_domain)
            .expect("the private assignment matches the table");

        BenchmarkCtx {
            cs,
            public,
            private,
            params,
            transcript: PhantomData,
        }
    }

    /// Produces a proof
    pub fn create_proof(&self) -> Result<Proof<F, T::Nonce>, ProverError> {
        Proof::create(
            &self.cs,
            &self.public,
            &self.private,
            &self.params,
            &mut T::default(),
        )
    }

    pub fn verify(&self, proof: &Proof<F, T::Nonce>) -> bool {
        verify(
            &self.cs,
            &self.public.common_data,
            proof,
            &self.params,
            &mut T::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use placeholder_transcript::HashTranscript;
    use std::time::Instant;

    #[test]
    fn test_bench() {
        let start = Instant::now();
        let ctx = BenchmarkCtx::<Fr, HashTranscript<Fr>>::new(4);
        println!("context created in {}ms", start.elapsed().as_millis());

        let start = Instant::now();
        let proof = ctx.create_proof().unwrap();
        println!("proof created in {}ms", start.elapsed().as_millis());

        let start = Instant::now();
        assert!(ctx.verify(&proof));
        println!("proof verified in {}ms", start.elapsed().as_millis());
    }
}
