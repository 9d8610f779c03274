//! The trace columns interpolated over the trace domain.

use super::{
    assignment::{AssignmentTable, PrivateAssignment, PublicAssignment},
    table::ColumnType,
    variable::Variable,
};
use ark_ff::FftField;
use ark_poly::{
    univariate::DensePolynomial, EvaluationDomain, Evaluations, Radix2EvaluationDomain as D,
};
use placeholder_utils::ExtendedDensePolynomial;
use rayon::prelude::*;

/// `omega^rotation`, with `omega` the generator of `domain`.
pub fn rotation_factor<F: FftField>(domain: &D<F>, rotation: i32) -> F {
    if rotation >= 0 {
        domain.group_gen.pow([rotation as u64])
    } else {
        domain.group_gen_inv.pow([rotation.unsigned_abs() as u64])
    }
}

/// Interpolates each column over `domain`.
pub fn interpolate_columns<F: FftField>(
    columns: &[Vec<F>],
    domain: D<F>,
) -> Vec<DensePolynomial<F>> {
    columns
        .par_iter()
        .map(|column| Evaluations::from_vec_and_domain(column.clone(), domain).interpolate())
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivatePolynomialTable<F: FftField> {
    pub witnesses: Vec<DensePolynomial<F>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicPolynomialTable<F: FftField> {
    pub public_inputs: Vec<DensePolynomial<F>>,
    pub constants: Vec<DensePolynomial<F>>,
    pub selectors: Vec<DensePolynomial<F>>,
}

/// A view over both parts of the interpolated trace.
#[derive(Clone, Copy, Debug)]
pub struct PolynomialTable<'a, F: FftField> {
    pub private: &'a PrivatePolynomialTable<F>,
    pub public: &'a PublicPolynomialTable<F>,
}

impl<'a, F: FftField> PolynomialTable<'a, F> {
    pub fn new(
        private: &'a PrivatePolynomialTable<F>,
        public: &'a PublicPolynomialTable<F>,
    ) -> Self {
        Self { private, public }
    }

    pub fn column(&self, column_type: ColumnType, index: usize) -> Option<&'a DensePolynomial<F>> {
        match column_type {
            ColumnType::Witness => self.private.witnesses.get(index),
            ColumnType::PublicInput => self.public.public_inputs.get(index),
            ColumnType::Constant => self.public.constants.get(index),
            ColumnType::Selector => self.public.selectors.get(index),
        }
    }

    /// The columns taking part in the permutation argument, in global order.
    pub fn permutation_columns(&self) -> impl Iterator<Item = &'a DensePolynomial<F>> {
        self.private
            .witnesses
            .iter()
            .chain(self.public.public_inputs.iter())
            .chain(self.public.constants.iter())
    }

    /// The column values over `domain`, which is the trace domain.
    pub fn evaluations(&self, domain: &D<F>) -> AssignmentTable<F> {
        let fft = |polys: &[DensePolynomial<F>]| -> Vec<Vec<F>> {
            polys.par_iter().map(|p| domain.fft(&p.coeffs)).collect()
        };
        AssignmentTable {
            private: PrivateAssignment {
                witnesses: fft(&self.private.witnesses),
            },
            public: PublicAssignment {
                public_inputs: fft(&self.public.public_inputs),
                constants: fft(&self.public.constants),
                selectors: fft(&self.public.selectors),
            },
        }
    }

    /// The polynomial of a relative variable: its column shifted by the rotation.
    /// Missing columns read as zero.
    pub fn variable(&self, var: &Variable, domain: &D<F>) -> DensePolynomial<F> {
        match self.column(var.column_type, var.index) {
            Some(poly) if var.rotation == 0 => poly.clone(),
            Some(poly) => poly.shifted(rotation_factor(domain, var.rotation)),
            None => DensePolynomial { coeffs: vec![] },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_poly::Polynomial;

    #[test]
    fn test_rotated_variable() {
        let domain = D::<Fr>::new(8).unwrap();
        let column: Vec<Fr> = (0..8u64).map(|i| Fr::from(i * i)).collect();
        let private = PrivatePolynomialTable {
            witnesses: interpolate_columns(&[column.clone()], domain),
        };
        let public = PublicPolynomialTable {
            public_inputs: vec![],
            constants: vec![],
            selectors: vec![],
        };
        let table = PolynomialTable::new(&private, &public);

        for rotation in [-1, 0, 1, 3] {
            let poly = table.variable(&Variable::witness(0, rotation), &domain);
            for row in 0..8 {
                let expected = column[(row as i32 + rotation).rem_euclid(8) as usize];
                assert_eq!(poly.evaluate(&domain.element(row)), expected);
            }
        }
        assert_eq!(rotation_factor(&domain, -1) * domain.group_gen, Fr::from(1u64));
        assert_eq!(table.evaluations(&domain).private.witnesses[0], column);
        assert!(table
            .variable(&Variable::constant(0, 0), &domain)
            .coeffs
            .is_empty());
    }
}
