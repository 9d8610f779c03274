//! This adds a few utility functions for the [DensePolynomial] arkworks type.

use ark_ff::{FftField, Field};
use ark_poly::{univariate::DensePolynomial, DenseUVPolynomial};

//
// ExtendedDensePolynomial trait
//

/// An extension for the [DensePolynomial] type.
pub trait ExtendedDensePolynomial<F: Field>: Sized {
    /// This function "scales" (multiplies all the coefficients of) a polynomial with a scalar.
    fn scale(&self, elm: F) -> Self;

    /// Returns the polynomial `x -> p(factor * x)`.
    /// With `factor = omega^k` this is the polynomial rotated by `k` rows.
    fn shifted(&self, factor: F) -> Self;

    /// Splits the polynomial into chunks of `max_degree + 1` coefficients,
    /// such that `p(x) = sum_i chunk_i(x) * x^(i * (max_degree + 1))`.
    /// The zero polynomial yields a single zero chunk.
    fn split(&self, max_degree: usize) -> Vec<Self>;

    /// The product `prod_i (x - points[i])`.
    fn vanishing_on(points: &[F]) -> Self;

    /// The unique polynomial of degree `< points.len()` going through `(points[i], values[i])`.
    /// Returns `None` when two points coincide or the lengths differ.
    fn interpolate(points: &[F], values: &[F]) -> Option<Self>;

    /// One FRI folding step in coefficient form: `f_even(y) + alpha * f_odd(y)`.
    fn fold(&self, alpha: F) -> Self;

    /// Returns true if the polynomial has no non-zero coefficient.
    fn is_zero_poly(&self) -> bool;
}

impl<F: Field> ExtendedDensePolynomial<F> for DensePolynomial<F> {
    fn scale(&self, elm: F) -> Self {
        let mut result = self.clone();
        for coeff in &mut result.coeffs {
            *coeff *= &elm
        }
        result
    }

    fn shifted(&self, factor: F) -> Self {
        let mut pow = F::one();
        let coeffs = self
            .coeffs
            .iter()
            .map(|c| {
                let res = *c * pow;
                pow *= factor;
                res
            })
            .collect();
        DensePolynomial::from_coefficients_vec(coeffs)
    }

    fn split(&self, max_degree: usize) -> Vec<Self> {
        let chunk_size = max_degree + 1;
        if self.coeffs.is_empty() {
            return vec![DensePolynomial::from_coefficients_vec(vec![])];
        }
        let mut chunks = Vec::with_capacity(self.coeffs.len().div_ceil(chunk_size));
        let mut start = 0;
        while start < self.coeffs.len() {
            let end = std::cmp::min(self.coeffs.len(), start + chunk_size);
            chunks.push(DensePolynomial::from_coefficients_slice(
                &self.coeffs[start..end],
            ));
            start = end;
        }
        chunks
    }

    fn vanishing_on(points: &[F]) -> Self {
        let mut coeffs = vec![F::one()];
        for p in points {
            // multiply by (x - p)
            let mut next = vec![F::zero(); coeffs.len() + 1];
            for (i, c) in coeffs.iter().enumerate() {
                next[i + 1] += c;
                next[i] -= *c * p;
            }
            coeffs = next;
        }
        DensePolynomial::from_coefficients_vec(coeffs)
    }

    fn interpolate(points: &[F], values: &[F]) -> Option<Self> {
        if points.len() != values.len() {
            return None;
        }
        let mut result = vec![F::zero(); points.len()];
        for (i, (x_i, y_i)) in points.iter().zip(values.iter()).enumerate() {
            let others: Vec<F> = points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, x_j)| *x_j)
                .collect();
            let denominator = others
                .iter()
                .fold(F::one(), |acc, x_j| acc * (*x_i - x_j));
            let factor = *y_i * denominator.inverse()?;
            let basis = Self::vanishing_on(&others);
            for (r, c) in result.iter_mut().zip(basis.coeffs.iter()) {
                *r += factor * c;
            }
        }
        Some(DensePolynomial::from_coefficients_vec(result))
    }

    fn fold(&self, alpha: F) -> Self {
        let coeffs = self
            .coeffs
            .chunks(2)
            .map(|pair| match pair {
                [even, odd] => *even + alpha * odd,
                [even] => *even,
                _ => unreachable!("chunks of two"),
            })
            .collect();
        DensePolynomial::from_coefficients_vec(coeffs)
    }

    fn is_zero_poly(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_zero())
    }
}

/// Returns the vanishing polynomial `x^n - 1` of a multiplicative subgroup of size `n`.
pub fn vanishing_polynomial<F: FftField>(n: usize) -> DensePolynomial<F> {
    let mut coeffs = vec![F::zero(); n + 1];
    coeffs[0] = -F::one();
    coeffs[n] = F::one();
    DensePolynomial::from_coefficients_vec(coeffs)
}

//
// Tests
//

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{UniformRand, Zero};
    use ark_poly::Polynomial;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_split_recombines() {
        let mut rng = StdRng::seed_from_u64(0);
        let f = DensePolynomial::<Fr>::rand(37, &mut rng);
        let chunks = f.split(7);
        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| c.coeffs.len() <= 8));

        let x = Fr::rand(&mut rng);
        let x_chunk = x.pow([8u64]);
        let mut acc = Fr::zero();
        for chunk in chunks.iter().rev() {
            acc = acc * x_chunk + chunk.evaluate(&x);
        }
        assert_eq!(acc, f.evaluate(&x));
    }

    #[test]
    fn test_split_zero() {
        let f = DensePolynomial::<Fr>::from_coefficients_vec(vec![]);
        let chunks = f.split(3);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_zero_poly());
    }

    #[test]
    fn test_interpolate() {
        let mut rng = StdRng::seed_from_u64(1);
        let points: Vec<Fr> = (0..4).map(|_| Fr::rand(&mut rng)).collect();
        let values: Vec<Fr> = (0..4).map(|_| Fr::rand(&mut rng)).collect();
        let u = DensePolynomial::<Fr>::interpolate(&points, &values).unwrap();
        for (p, v) in points.iter().zip(values.iter()) {
            assert_eq!(u.evaluate(p), *v);
        }
        assert!(u.degree() < 4);

        let repeated = [points[0], points[0]];
        assert!(DensePolynomial::<Fr>::interpolate(&repeated, &values[..2]).is_none());
    }

    #[test]
    fn test_vanishing_on() {
        let points = [Fr::from(2u64), Fr::from(5u64)];
        let v = DensePolynomial::<Fr>::vanishing_on(&points);
        assert_eq!(v.degree(), 2);
        assert!(v.evaluate(&points[0]).is_zero());
        assert!(v.evaluate(&points[1]).is_zero());
        assert_eq!(v.evaluate(&Fr::from(3u64)), -Fr::from(2u64));
    }

    #[test]
    fn test_shifted() {
        let mut rng = StdRng::seed_from_u64(2);
        let f = DensePolynomial::<Fr>::rand(9, &mut rng);
        let c = Fr::rand(&mut rng);
        let x = Fr::rand(&mut rng);
        assert_eq!(f.shifted(c).evaluate(&x), f.evaluate(&(c * x)));
    }

    proptest! {
        #[test]
        fn test_fold_halves_degree(d in 1usize..64, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let f = DensePolynomial::<Fr>::rand(d, &mut rng);
            let alpha = Fr::rand(&mut rng);
            let folded = f.fold(alpha);
            prop_assert!(folded.degree() <= d / 2);

            // f(s) and f(-s) determine the folded value at s^2
            let s = Fr::rand(&mut rng);
            let two = Fr::from(2u64);
            let (fs, fms) = (f.evaluate(&s), f.evaluate(&-s));
            let expected = (fs + fms) / two + alpha * (fs - fms) / (two * s);
            prop_assert_eq!(folded.evaluate(&(s * s)), expected);
        }
    }
}
