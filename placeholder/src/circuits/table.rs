//! The shape of an execution trace.

use serde::{Deserialize, Serialize};

/// The four kinds of columns of a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum ColumnType {
    Witness,
    PublicInput,
    Constant,
    Selector,
}

/// Column counts and row counts of a trace.
///
/// Columns are globally indexed with the witness columns first, followed by
/// the public input, constant and selector columns. The first three kinds
/// take part in the permutation argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescription {
    pub witness_columns: usize,
    pub public_input_columns: usize,
    pub constant_columns: usize,
    pub selector_columns: usize,
    /// Size of the trace domain, a power of two.
    pub rows_amount: usize,
    /// Rows constrained by gates. Row `usable_rows_amount` carries `q_last`
    /// and the rows after it are blinding rows.
    pub usable_rows_amount: usize,
}

impl TableDescription {
    pub fn table_width(&self) -> usize {
        self.witness_columns
            + self.public_input_columns
            + self.constant_columns
            + self.selector_columns
    }

    /// Number of columns taking part in the permutation argument.
    pub fn permutation_width(&self) -> usize {
        self.witness_columns + self.public_input_columns + self.constant_columns
    }

    /// Number of columns of the given type.
    pub fn columns(&self, column_type: ColumnType) -> usize {
        match column_type {
            ColumnType::Witness => self.witness_columns,
            ColumnType::PublicInput => self.public_input_columns,
            ColumnType::Constant => self.constant_columns,
            ColumnType::Selector => self.selector_columns,
        }
    }

    /// The index of the `index`-th column of `column_type` among all columns.
    pub fn global_index(&self, column_type: ColumnType, index: usize) -> usize {
        match column_type {
            ColumnType::Witness => index,
            ColumnType::PublicInput => self.witness_columns + index,
            ColumnType::Constant => self.witness_columns + self.public_input_columns + index,
            ColumnType::Selector => self.permutation_width() + index,
        }
    }

    /// Inverse of [TableDescription::global_index].
    pub fn column_at(&self, global_index: usize) -> Option<(ColumnType, usize)> {
        [
            ColumnType::Witness,
            ColumnType::PublicInput,
            ColumnType::Constant,
            ColumnType::Selector,
        ]
        .into_iter()
        .find_map(|column_type| {
            let start = self.global_index(column_type, 0);
            (global_index >= start && global_index < start + self.columns(column_type))
                .then(|| (column_type, global_index - start))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_global_index() {
        let table = TableDescription {
            witness_columns: 3,
            public_input_columns: 1,
            constant_columns: 2,
            selector_columns: 2,
            rows_amount: 16,
            usable_rows_amount: 13,
        };
        assert_eq!(table.table_width(), 8);
        assert_eq!(table.permutation_width(), 6);
        assert_eq!(table.global_index(ColumnType::Witness, 2), 2);
        assert_eq!(table.global_index(ColumnType::PublicInput, 0), 3);
        assert_eq!(table.global_index(ColumnType::Constant, 1), 5);
        assert_eq!(table.global_index(ColumnType::Selector, 1), 7);

        for i in 0..table.table_width() {
            let (column_type, index) = table.column_at(i).unwrap();
            assert_eq!(table.global_index(column_type, index), i);
        }
        assert_eq!(table.column_at(8), None);
    }

    proptest! {
        #[test]
        fn test_column_round_trip(column_type: ColumnType, index in 0usize..4) {
            let table = TableDescription {
                witness_columns: 4,
                public_input_columns: 4,
                constant_columns: 4,
                selector_columns: 4,
                rows_amount: 8,
                usable_rows_amount: 5,
            };
            let global = table.global_index(column_type, index);
            prop_assert_eq!(table.column_at(global), Some((column_type, index)));
        }
    }
}
