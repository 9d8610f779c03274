//! This module implements the [ConstraintSystem] and its builder.

use super::{
    assignment::AssignmentTable,
    gate::{CopyConstraint, Gate, LookupGate},
    table::{ColumnType, TableDescription},
    variable::Variable,
};
use crate::error::{ProverError, SetupError};
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A circuit: gates, copy constraints and lookup gates over a trace of the
/// shape given by the table description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "F: CanonicalSerialize + CanonicalDeserialize")]
pub struct ConstraintSystem<F> {
    pub table_description: TableDescription,
    pub gates: Vec<Gate<F>>,
    pub copy_constraints: Vec<CopyConstraint>,
    pub lookup_gates: Vec<LookupGate<F>>,
}

/// Configures a [ConstraintSystem]. Obtained from [ConstraintSystem::create].
pub struct Builder<F> {
    table_description: TableDescription,
    gates: Vec<Gate<F>>,
    copy_constraints: Vec<CopyConstraint>,
    lookup_gates: Vec<LookupGate<F>>,
}

impl<F: PrimeField> ConstraintSystem<F> {
    pub fn create(table_description: TableDescription) -> Builder<F> {
        Builder {
            table_description,
            gates: vec![],
            copy_constraints: vec![],
            lookup_gates: vec![],
        }
    }

    pub fn has_lookups(&self) -> bool {
        !self.lookup_gates.is_empty()
    }

    /// The columns of the lookup table, shared by every lookup gate.
    pub fn lookup_table(&self) -> Vec<Variable> {
        self.lookup_gates
            .first()
            .map(|gate| gate.values().copied().collect())
            .unwrap_or_default()
    }

    /// Checks that `assignment` satisfies every gate, copy constraint and
    /// lookup on the usable rows.
    pub fn check_assignment(&self, assignment: &AssignmentTable<F>) -> Result<(), ProverError> {
        let table = &self.table_description;
        if !assignment.matches(table) {
            return Err(ProverError::AssignmentShape("columns or rows do not match"));
        }
        let selector = |index: usize, row: usize| {
            assignment
                .column(ColumnType::Selector, index)
                .and_then(|column| column.get(row).copied())
                .unwrap_or_default()
        };

        for (i, gate) in self.gates.iter().enumerate() {
            for row in 0..table.usable_rows_amount {
                if selector(gate.selector_index, row).is_zero() {
                    continue;
                }
                for constraint in &gate.constraints {
                    let value = constraint
                        .evaluate(|var| assignment.value(var, row))
                        .ok_or(ProverError::AssignmentShape("a gate reads a missing cell"))?;
                    if !value.is_zero() {
                        return Err(ProverError::GateNotSatisfied { gate: i, row });
                    }
                }
            }
        }

        for (i, CopyConstraint(a, b)) in self.copy_constraints.iter().enumerate() {
            if assignment.value(a, 0) != assignment.value(b, 0) {
                return Err(ProverError::CopyConstraintNotSatisfied(i));
            }
        }

        let values = self.lookup_table();
        let table_rows: HashSet<Vec<F>> = (0..table.usable_rows_amount)
            .map(|row| {
                values
                    .iter()
                    .map(|var| assignment.value(var, row).unwrap_or_default())
                    .collect()
            })
            .collect();
        for gate in &self.lookup_gates {
            for row in 0..table.usable_rows_amount {
                if selector(gate.selector_index, row).is_zero() {
                    continue;
                }
                let input: Option<Vec<F>> = gate
                    .inputs()
                    .map(|term| term.evaluate(|var| assignment.value(var, row)))
                    .collect();
                match input {
                    Some(input) if table_rows.contains(&input) => (),
                    _ => return Err(ProverError::ValueNotInTable(row)),
                }
            }
        }

        Ok(())
    }
}

impl<F: PrimeField> Builder<F> {
    #[must_use]
    pub fn gates(mut self, gates: Vec<Gate<F>>) -> Self {
        self.gates = gates;
        self
    }

    #[must_use]
    pub fn copy_constraints(mut self, copy_constraints: Vec<CopyConstraint>) -> Self {
        self.copy_constraints = copy_constraints;
        self
    }

    #[must_use]
    pub fn lookup_gates(mut self, lookup_gates: Vec<LookupGate<F>>) -> Self {
        self.lookup_gates = lookup_gates;
        self
    }

    /// Validates the circuit against its table description.
    pub fn build(self) -> Result<ConstraintSystem<F>, SetupError> {
        let table = &self.table_description;
        let invalid = |msg: String| Err(SetupError::ConstraintSystem(msg));

        if !table.rows_amount.is_power_of_two() || table.rows_amount < 2 {
            return invalid(format!(
                "the number of rows must be a power of two, got {}",
                table.rows_amount
            ));
        }
        if table.usable_rows_amount == 0 || table.usable_rows_amount >= table.rows_amount {
            return invalid(format!(
                "usable rows must be in [1, {}), got {}",
                table.rows_amount, table.usable_rows_amount
            ));
        }
        if table.permutation_width() == 0 {
            return invalid("the table has no column for the permutation argument".to_string());
        }

        let check_relative = |var: &Variable| -> Result<(), SetupError> {
            if !var.relative
                || var.index >= table.columns(var.column_type)
                || var.rotation.unsigned_abs() as usize >= table.rows_amount
            {
                return Err(SetupError::ConstraintSystem(format!(
                    "invalid gate variable {var:?}"
                )));
            }
            Ok(())
        };

        for gate in &self.gates {
            if gate.selector_index >= table.selector_columns {
                return invalid(format!("missing selector {}", gate.selector_index));
            }
            for var in gate.constraints.iter().flat_map(|c| c.variables()) {
                check_relative(var)?;
            }
        }

        for CopyConstraint(a, b) in &self.copy_constraints {
            for var in [a, b] {
                if var.relative
                    || var.column_type == ColumnType::Selector
                    || var.index >= table.columns(var.column_type)
                    || var.rotation < 0
                    || var.rotation as usize >= table.usable_rows_amount
                {
                    return invalid(format!("invalid copy constraint variable {var:?}"));
                }
            }
        }

        if let Some(first) = self.lookup_gates.first() {
            let values: Vec<Variable> = first.values().copied().collect();
            if values.is_empty() {
                return Err(SetupError::LookupCreation("the lookup table has no column"));
            }
            for gate in &self.lookup_gates {
                if gate.selector_index >= table.selector_columns {
                    return invalid(format!("missing selector {}", gate.selector_index));
                }
                if !gate.values().copied().eq(values.iter().copied()) {
                    return Err(SetupError::LookupCreation(
                        "all lookup gates must use the same table",
                    ));
                }
                if gate.inputs().count() != values.len() {
                    return Err(SetupError::LookupCreation(
                        "lookup inputs and values have different widths",
                    ));
                }
                for var in gate
                    .inputs()
                    .flat_map(|term| term.vars.iter())
                    .chain(gate.values())
                    .unique()
                {
                    check_relative(var)?;
                }
            }
        }

        Ok(ConstraintSystem {
            table_description: self.table_description,
            gates: self.gates,
            copy_constraints: self.copy_constraints,
            lookup_gates: self.lookup_gates,
        })
    }
}
