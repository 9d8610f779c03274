use ark_ff::{BigInteger, PrimeField};

/// Fixed-width big-endian encoding of field elements, as hashed into
/// transcripts and Merkle leaves.
pub trait FieldHelpers<F> {
    /// Serialize to fixed-width big-endian bytes
    fn to_bytes_be(self) -> Vec<u8>;

    /// Field size in bytes
    fn size_in_bytes() -> usize;
}

impl<F: PrimeField> FieldHelpers<F> for F {
    fn to_bytes_be(self) -> Vec<u8> {
        self.into_bigint().to_bytes_be()
    }

    fn size_in_bytes() -> usize {
        F::BigInt::NUM_LIMBS * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::One;

    #[test]
    fn field_bytes() {
        let bytes = Fr::one().to_bytes_be();
        assert_eq!(bytes.len(), Fr::size_in_bytes());
        assert_eq!(bytes.last(), Some(&1));
        assert!(bytes[..bytes.len() - 1].iter().all(|b| *b == 0));

        let x = Fr::from(0x0102u64);
        let bytes = x.to_bytes_be();
        assert_eq!(Fr::from_be_bytes_mod_order(&bytes), x);
        assert_eq!(bytes[bytes.len() - 2..], [1, 2]);
    }
}
