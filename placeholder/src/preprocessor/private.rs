//! Preprocessing of the witness columns.

use crate::{
    circuits::{
        assignment::PrivateAssignment,
        constraints::ConstraintSystem,
        polynomial::{interpolate_columns, PrivatePolynomialTable},
    },
    error::ProverError,
};
use ark_ff::PrimeField;
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain as D};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreprocessedPrivateData<F: PrimeField> {
    pub private_polynomial_table: PrivatePolynomialTable<F>,
}

/// Interpolates the witness columns over the trace domain.
pub fn process<F: PrimeField>(
    cs: &ConstraintSystem<F>,
    assignment: &PrivateAssignment<F>,
    domain: D<F>,
) -> Result<PreprocessedPrivateData<F>, ProverError> {
    let table = &cs.table_description;
    if !assignment.matches(table) || domain.size() != table.rows_amount {
        return Err(ProverError::AssignmentShape(
            "the witness does not match the table description",
        ));
    }
    Ok(PreprocessedPrivateData {
        private_polynomial_table: PrivatePolynomialTable {
            witnesses: interpolate_columns(&assignment.witnesses, domain),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::table::TableDescription;
    use ark_bn254::Fr;
    use ark_poly::Polynomial;

    #[test]
    fn test_witness_polynomials() {
        let table = TableDescription {
            witness_columns: 2,
            public_input_columns: 0,
            constant_columns: 0,
            selector_columns: 1,
            rows_amount: 8,
            usable_rows_amount: 5,
        };
        let cs = ConstraintSystem::<Fr>::create(table).build().unwrap();
        let domain = D::new(8).unwrap();
        let witnesses: Vec<Vec<Fr>> = (0..2u64)
            .map(|c| (0..8u64).map(|r| Fr::from(10 * c + r)).collect())
            .collect();

        let data = process(&cs, &PrivateAssignment { witnesses }, domain).unwrap();
        let w1 = &data.private_polynomial_table.witnesses[1];
        assert_eq!(w1.evaluate(&domain.element(3)), Fr::from(13u64));

        let short = PrivateAssignment {
            witnesses: vec![vec![Fr::from(1u64); 8]],
        };
        assert!(matches!(
            process(&cs, &short, domain),
            Err(ProverError::AssignmentShape(_))
        ));
    }
}
