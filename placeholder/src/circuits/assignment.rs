//! Column values of a trace, split into the part known to the prover only
//! and the part shared with the verifier.

use super::{
    table::{ColumnType, TableDescription},
    variable::Variable,
};
use ark_ff::Field;

fn has_shape<F>(columns: &[Vec<F>], count: usize, rows: usize) -> bool {
    columns.len() == count && columns.iter().all(|column| column.len() == rows)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateAssignment<F> {
    pub witnesses: Vec<Vec<F>>,
}

impl<F> PrivateAssignment<F> {
    pub fn matches(&self, table: &TableDescription) -> bool {
        has_shape(&self.witnesses, table.witness_columns, table.rows_amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicAssignment<F> {
    pub public_inputs: Vec<Vec<F>>,
    pub constants: Vec<Vec<F>>,
    pub selectors: Vec<Vec<F>>,
}

impl<F> PublicAssignment<F> {
    pub fn matches(&self, table: &TableDescription) -> bool {
        has_shape(
            &self.public_inputs,
            table.public_input_columns,
            table.rows_amount,
        ) && has_shape(&self.constants, table.constant_columns, table.rows_amount)
            && has_shape(&self.selectors, table.selector_columns, table.rows_amount)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentTable<F> {
    pub private: PrivateAssignment<F>,
    pub public: PublicAssignment<F>,
}

impl<F: Field> AssignmentTable<F> {
    /// An all-zero assignment of the given shape.
    pub fn new(table: &TableDescription) -> Self {
        let zeros = |count| vec![vec![F::zero(); table.rows_amount]; count];
        Self {
            private: PrivateAssignment {
                witnesses: zeros(table.witness_columns),
            },
            public: PublicAssignment {
                public_inputs: zeros(table.public_input_columns),
                constants: zeros(table.constant_columns),
                selectors: zeros(table.selector_columns),
            },
        }
    }

    pub fn matches(&self, table: &TableDescription) -> bool {
        self.private.matches(table) && self.public.matches(table)
    }

    pub fn column(&self, column_type: ColumnType, index: usize) -> Option<&[F]> {
        let columns = match column_type {
            ColumnType::Witness => &self.private.witnesses,
            ColumnType::PublicInput => &self.public.public_inputs,
            ColumnType::Constant => &self.public.constants,
            ColumnType::Selector => &self.public.selectors,
        };
        columns.get(index).map(Vec::as_slice)
    }

    /// The value of `var` for a gate applied at `row`.
    pub fn value(&self, var: &Variable, row: usize) -> Option<F> {
        let column = self.column(var.column_type, var.index)?;
        column.get(var.resolve_row(row, column.len())).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn test_values() {
        let table = TableDescription {
            witness_columns: 2,
            public_input_columns: 1,
            constant_columns: 0,
            selector_columns: 1,
            rows_amount: 8,
            usable_rows_amount: 5,
        };
        let mut assignment = AssignmentTable::<Fr>::new(&table);
        assert!(assignment.matches(&table));

        for (row, cell) in assignment.private.witnesses[1].iter_mut().enumerate() {
            *cell = Fr::from(row as u64);
        }
        assert_eq!(
            assignment.value(&Variable::witness(1, -1), 0),
            Some(Fr::from(7u64))
        );
        assert_eq!(
            assignment.value(&Variable::absolute(ColumnType::Witness, 1, 3), 6),
            Some(Fr::from(3u64))
        );
        assert_eq!(assignment.value(&Variable::constant(0, 0), 0), None);

        assignment.public.selectors[0].pop();
        assert!(!assignment.matches(&table));
    }
}
