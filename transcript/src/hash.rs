//! A transcript over a byte-oriented hash function.

use crate::{ByteTranscript, Digest, Transcript};
use ark_ff::PrimeField;
use blake2::{digest::consts::U32, Blake2b};
use placeholder_utils::FieldHelpers;
use std::marker::PhantomData;

/// Blake2b with a 256-bit output, the default transcript and Merkle hash.
pub type Blake2b256 = Blake2b<U32>;

/// Transcript whose state is a digest of the hash `H`.
///
/// - absorbing `data` sets `state = H(state || data)`
/// - a challenge sets `state = H(state)` and reads it as a big-endian integer
#[derive(Debug)]
pub struct HashTranscript<F, H = Blake2b256> {
    state: Vec<u8>,
    _field: PhantomData<fn() -> F>,
    _hash: PhantomData<fn() -> H>,
}

impl<F, H> Clone for HashTranscript<F, H> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            _field: PhantomData,
            _hash: PhantomData,
        }
    }
}

impl<F: PrimeField, H: blake2::Digest> HashTranscript<F, H> {
    /// Creates a transcript with `state = H(seed)`.
    pub fn new(seed: &[u8]) -> Self {
        Self {
            state: H::digest(seed).to_vec(),
            _field: PhantomData,
            _hash: PhantomData,
        }
    }

    /// The current digest.
    pub fn state(&self) -> &[u8] {
        &self.state
    }

    fn advance(&mut self) {
        self.state = H::digest(&self.state).to_vec();
    }
}

impl<F: PrimeField, H: blake2::Digest> Default for HashTranscript<F, H> {
    fn default() -> Self {
        Self::new(&[0])
    }
}

impl<F: PrimeField, H: blake2::Digest> Transcript<F> for HashTranscript<F, H> {
    fn absorb(&mut self, elems: &[F]) {
        let mut bytes = Vec::with_capacity(elems.len() * F::size_in_bytes());
        for elem in elems {
            bytes.extend(elem.to_bytes_be());
        }
        self.absorb_bytes(&bytes);
    }

    fn absorb_digest(&mut self, digest: &Digest) {
        self.absorb_bytes(digest);
    }

    fn challenge(&mut self) -> F {
        self.advance();
        F::from_be_bytes_mod_order(&self.state)
    }

    fn int_challenge(&mut self) -> u64 {
        self.advance();
        let mut bytes = [0u8; 8];
        let len = std::cmp::min(8, self.state.len());
        bytes[8 - len..].copy_from_slice(&self.state[..len]);
        u64::from_be_bytes(bytes)
    }
}

impl<F: PrimeField, H: blake2::Digest> ByteTranscript<F> for HashTranscript<F, H> {
    fn absorb_bytes(&mut self, bytes: &[u8]) {
        let mut hasher = H::new();
        hasher.update(&self.state);
        hasher.update(bytes);
        self.state = hasher.finalize().to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use blake2::{Blake2s256, Digest as _};
    use proptest::prelude::*;

    type Fs = HashTranscript<Fr>;

    #[test]
    fn test_default_state() {
        let t = Fs::default();
        assert_eq!(t.state(), Blake2b256::digest([0u8]).as_slice());
    }

    #[test]
    fn test_absorb_rehashes_state() {
        let mut t = Fs::new(b"seed");
        let before = t.state().to_vec();
        t.absorb_bytes(b"data");

        let mut expected = Blake2b256::new();
        expected.update(&before);
        expected.update(b"data");
        assert_eq!(t.state(), expected.finalize().as_slice());
    }

    #[test]
    fn test_int_challenge_is_big_endian_prefix() {
        let mut t = Fs::new(b"seed");
        let next = Blake2b256::digest(t.state());
        let expected = u64::from_be_bytes(next[..8].try_into().unwrap());
        assert_eq!(t.int_challenge(), expected);
    }

    #[test]
    fn test_other_hash() {
        let mut a = HashTranscript::<Fr, Blake2s256>::default();
        let mut b = Fs::default();
        assert_ne!(a.challenge(), b.challenge());
    }

    proptest! {
        #[test]
        fn test_determinism(
            seed in proptest::collection::vec(any::<u8>(), 0..32),
            data in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..64), 0..8),
            draws in 1usize..16,
        ) {
            let mut a = Fs::new(&seed);
            let mut b = Fs::new(&seed);
            for chunk in &data {
                a.absorb_bytes(chunk);
                b.absorb_bytes(chunk);
            }
            prop_assert_eq!(a.challenges(draws), b.challenges(draws));
            prop_assert_eq!(a.int_challenge(), b.int_challenge());

            // a snapshot continues identically
            let mut c = a.clone();
            prop_assert_eq!(a.challenge(), c.challenge());
        }
    }
}
