//! A reference to a cell of the trace.

use super::table::ColumnType;
use serde::{Deserialize, Serialize};

/// A cell reference.
///
/// A relative variable is read `rotation` rows after the row a gate is
/// applied to, wrapping around the trace. An absolute variable designates
/// row `rotation` itself and is what copy constraints are made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub index: usize,
    pub rotation: i32,
    pub relative: bool,
    pub column_type: ColumnType,
}

impl Variable {
    pub fn new(column_type: ColumnType, index: usize, rotation: i32, relative: bool) -> Self {
        Self {
            index,
            rotation,
            relative,
            column_type,
        }
    }

    pub fn witness(index: usize, rotation: i32) -> Self {
        Self::new(ColumnType::Witness, index, rotation, true)
    }

    pub fn public_input(index: usize, rotation: i32) -> Self {
        Self::new(ColumnType::PublicInput, index, rotation, true)
    }

    pub fn constant(index: usize, rotation: i32) -> Self {
        Self::new(ColumnType::Constant, index, rotation, true)
    }

    pub fn selector(index: usize, rotation: i32) -> Self {
        Self::new(ColumnType::Selector, index, rotation, true)
    }

    /// The cell at `row` of the given column.
    pub fn absolute(column_type: ColumnType, index: usize, row: usize) -> Self {
        Self::new(column_type, index, row as i32, false)
    }

    /// The row this variable designates when its gate is applied at `row`,
    /// in a trace of `rows` rows.
    pub fn resolve_row(&self, row: usize, rows: usize) -> usize {
        if self.relative {
            (row as i64 + self.rotation as i64).rem_euclid(rows as i64) as usize
        } else {
            self.rotation as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_row() {
        assert_eq!(Variable::witness(0, 1).resolve_row(3, 16), 4);
        assert_eq!(Variable::witness(0, -1).resolve_row(0, 16), 15);
        assert_eq!(Variable::witness(0, 2).resolve_row(15, 16), 1);
        assert_eq!(
            Variable::absolute(ColumnType::Witness, 1, 7).resolve_row(3, 16),
            7
        );
    }
}
