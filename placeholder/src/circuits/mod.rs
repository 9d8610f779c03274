//! Circuit description: the trace shape, variables, constraints, gates and
//! the [constraints::ConstraintSystem] gathering them.

pub mod assignment;
pub mod constraints;
pub mod expr;
pub mod gate;
pub mod polynomial;
pub mod table;
pub mod variable;
