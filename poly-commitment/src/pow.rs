//! Proof-of-work grinding on a transcript.
//!
//! Before a challenge is accepted the prover searches for a nonce such that,
//! once absorbed, the next transcript challenge has its `bits` most
//! significant bits equal to zero. The verifier replays one absorption and
//! one draw. Both sides leave the transcript in the same state.

use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use log::debug;
use num_bigint::BigUint;
use placeholder_transcript::{ByteTranscript, HashTranscript, SpongeTranscript, Transcript};
use placeholder_poseidon::constants::SpongeConstants;
use rand::Rng;
use rayon::prelude::*;
use std::{
    fmt::Debug,
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
};

/// Number of nonces tried per search block.
pub const BLOCK_SIZE: u64 = 1 << 23;

/// Transcripts that support a grinding gate.
///
/// The hash family grinds over 64-bit nonces absorbed as big-endian bytes and
/// checks the integer challenge. The sponge family grinds over field elements
/// and checks the top bits of the field challenge.
pub trait Grinding<F: PrimeField>: Transcript<F> {
    /// What the prover sends.
    type Nonce: Copy
        + Debug
        + PartialEq
        + Send
        + Sync
        + CanonicalSerialize
        + CanonicalDeserialize;

    /// The mask a challenge is tested against.
    type Mask: Debug + Send + Sync;

    /// Width of the challenge the mask applies to.
    const CHALLENGE_BITS: u32;

    /// A mask with exactly `bits` bits set at the most significant end of the challenge.
    ///
    /// # Panics
    ///
    /// Panics if `bits > Self::CHALLENGE_BITS`.
    fn grinding_mask(bits: u32) -> Self::Mask;

    /// Maps the search counter to a nonce.
    fn nonce(counter: u64) -> Self::Nonce;

    fn absorb_nonce(&mut self, nonce: &Self::Nonce);

    /// Draws one challenge and returns true if `challenge & mask == 0`.
    fn check_challenge(&mut self, mask: &Self::Mask) -> bool;

    /// Searches for a nonce passing the gate, absorbs it and draws the
    /// challenge the verifier will draw.
    ///
    /// The hash family counts up from zero.
    fn generate_pow(&mut self, bits: u32) -> Self::Nonce {
        self.generate_pow_from(bits, 0)
    }

    /// [Grinding::generate_pow], with the search starting at counter `start`.
    ///
    /// Workers scan interleaved counters within a block and share a "found"
    /// flag and the smallest winning offset. A worker stops once it is past
    /// the smallest known winner, so for a given `start` the returned nonce
    /// is always the smallest satisfying counter of the first successful
    /// block.
    fn generate_pow_from(&mut self, bits: u32, start: u64) -> Self::Nonce {
        let mask = Self::grinding_mask(bits);
        let workers = rayon::current_num_threads().max(1) as u64;
        let mut base = start;

        loop {
            let found = AtomicBool::new(false);
            let winner = AtomicU64::new(u64::MAX);

            (0..workers).into_par_iter().for_each(|worker| {
                let mut offset = worker;
                while offset < BLOCK_SIZE {
                    if found.load(Ordering::Acquire) && offset > winner.load(Ordering::Acquire) {
                        break;
                    }
                    let mut fork = self.clone();
                    fork.absorb_nonce(&Self::nonce(base.wrapping_add(offset)));
                    if fork.check_challenge(&mask) {
                        winner.fetch_min(offset, Ordering::AcqRel);
                        found.store(true, Ordering::Release);
                        break;
                    }
                    offset += workers;
                }
            });

            if found.load(Ordering::Acquire) {
                let nonce = Self::nonce(base.wrapping_add(winner.load(Ordering::Acquire)));
                debug!("grinding found nonce {nonce:?} for {bits} bits");
                self.absorb_nonce(&nonce);
                let passed = self.check_challenge(&mask);
                debug_assert!(passed);
                return nonce;
            }

            base = base.wrapping_add(BLOCK_SIZE);
        }
    }

    /// Absorbs `nonce`, draws one challenge and checks it against the mask.
    fn verify_pow(&mut self, nonce: Self::Nonce, bits: u32) -> bool {
        let mask = Self::grinding_mask(bits);
        self.absorb_nonce(&nonce);
        self.check_challenge(&mask)
    }
}

impl<F: PrimeField, H: blake2::Digest> Grinding<F> for HashTranscript<F, H> {
    type Nonce = u64;
    type Mask = u64;

    const CHALLENGE_BITS: u32 = u64::BITS;

    fn grinding_mask(bits: u32) -> u64 {
        assert!(bits <= Self::CHALLENGE_BITS, "{bits} grinding bits");
        if bits == 0 {
            0
        } else {
            u64::MAX << (u64::BITS - bits)
        }
    }

    fn nonce(counter: u64) -> u64 {
        counter
    }

    fn absorb_nonce(&mut self, nonce: &u64) {
        self.absorb_bytes(&nonce.to_be_bytes());
    }

    fn check_challenge(&mut self, mask: &u64) -> bool {
        self.int_challenge() & mask == 0
    }
}

impl<F: PrimeField, SC: SpongeConstants> Grinding<F> for SpongeTranscript<F, SC> {
    type Nonce = F;
    type Mask = BigUint;

    const CHALLENGE_BITS: u32 = F::MODULUS_BIT_SIZE;

    fn grinding_mask(bits: u32) -> BigUint {
        assert!(bits <= Self::CHALLENGE_BITS, "{bits} grinding bits");
        let below = (BigUint::from(1u8) << F::MODULUS_BIT_SIZE) - 1u8;
        let low = (BigUint::from(1u8) << (F::MODULUS_BIT_SIZE - bits)) - 1u8;
        below ^ low
    }

    fn nonce(counter: u64) -> F {
        F::from(counter)
    }

    /// Field nonces start from a random counter.
    fn generate_pow(&mut self, bits: u32) -> F {
        let start = rand::thread_rng().gen::<u64>();
        self.generate_pow_from(bits, start)
    }

    fn absorb_nonce(&mut self, nonce: &F) {
        self.absorb(&[*nonce]);
    }

    fn check_challenge(&mut self, mask: &BigUint) -> bool {
        let challenge: BigUint = self.challenge().into();
        (challenge & mask) == BigUint::from(0u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::UniformRand;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    type Fs = HashTranscript<Fr>;
    type Sponge = SpongeTranscript<Fr>;

    #[test]
    fn test_hash_mask() {
        assert_eq!(Fs::grinding_mask(0), 0);
        assert_eq!(Fs::grinding_mask(1), 1 << 63);
        assert_eq!(Fs::grinding_mask(16), 0xffff_0000_0000_0000);
        assert_eq!(Fs::grinding_mask(64), u64::MAX);
        for bits in [0u32, 16, 32, 63] {
            let mask = Fs::grinding_mask(bits);
            assert_eq!(mask.count_ones(), bits);
            assert_eq!(mask.leading_ones(), bits);
        }
    }

    #[test]
    fn test_field_mask() {
        let modulus_bits = Fr::MODULUS_BIT_SIZE as u64;
        assert_eq!(Sponge::grinding_mask(0), BigUint::from(0u8));
        for bits in [1u32, 16, 32, 63] {
            let mask = Sponge::grinding_mask(bits);
            assert_eq!(mask.count_ones(), bits as u64);
            assert_eq!(mask.bits(), modulus_bits);
            assert_eq!(mask.trailing_zeros(), Some(modulus_bits - bits as u64));
        }
    }

    #[test]
    #[should_panic]
    fn test_mask_too_wide() {
        Fs::grinding_mask(65);
    }

    #[test]
    fn test_hash_round_trip() {
        for bits in [0u32, 4, 16] {
            let mut prover = Fs::new(b"grinding");
            prover.absorb_bytes(b"statement");
            let mut verifier = prover.clone();

            let nonce = prover.generate_pow(bits);
            assert!(verifier.verify_pow(nonce, bits));
            // both sides continue in lockstep
            assert_eq!(prover.int_challenge(), verifier.int_challenge());
        }
    }

    #[test]
    fn test_hash_generate_is_deterministic() {
        let mut a = Fs::new(b"determinism");
        let mut b = Fs::new(b"determinism");
        assert_eq!(a.generate_pow(12), b.generate_pow(12));
    }

    #[test]
    fn test_manual_check() {
        let mut t = Fs::new(b"manual");
        let mut replay = t.clone();
        let nonce = t.generate_pow(16);

        replay.absorb_bytes(&nonce.to_be_bytes());
        let challenge = replay.int_challenge();
        assert_eq!(challenge & 0xffff_0000_0000_0000, 0);
    }

    #[test]
    fn test_hash_rejections() {
        let mut prover = Fs::new(b"grinding");
        let mut verifier = prover.clone();
        let nonce = prover.generate_pow(16);

        // a stricter mask
        assert!(!verifier.clone().verify_pow(nonce, 63));
        // a different transcript
        let mut other = Fs::new(b"another statement");
        assert!(!other.verify_pow(nonce, 16));
        assert!(verifier.verify_pow(nonce, 16));
    }

    #[test]
    fn test_sponge_round_trip() {
        let mut rng = StdRng::seed_from_u64(5);
        for bits in [0u32, 8] {
            let mut prover = Sponge::new(&[Fr::rand(&mut rng)]);
            let mut verifier = prover.clone();
            let nonce = prover.generate_pow(bits);
            assert!(verifier.verify_pow(nonce, bits));
            assert_eq!(prover.challenge(), verifier.challenge());
        }
    }

    #[test]
    fn test_generate_from_start() {
        let start = 12_345u64;
        let mut prover = Fs::new(b"seeded");
        let mut verifier = prover.clone();
        let mut again = prover.clone();

        let nonce = prover.generate_pow_from(12, start);
        assert!(nonce >= start);
        assert!(verifier.verify_pow(nonce, 12));
        assert_eq!(prover.int_challenge(), verifier.int_challenge());
        // the same start gives the same nonce
        assert_eq!(again.generate_pow_from(12, start), nonce);

        // no smaller counter from the start passes
        for counter in start..nonce {
            assert!(!Fs::new(b"seeded").verify_pow(counter, 12));
        }
    }

    #[test]
    fn test_sponge_generate_from_start() {
        let start = 1 << 40;
        let mut prover = Sponge::new(&[Fr::from(3u64)]);
        let mut verifier = prover.clone();
        let nonce = prover.generate_pow_from(6, start);
        assert!(verifier.verify_pow(nonce, 6));
        assert_eq!(prover.challenge(), verifier.challenge());

        let mut replay = Sponge::new(&[Fr::from(3u64)]);
        assert_eq!(replay.generate_pow_from(6, start), nonce);
    }

    #[test]
    fn test_sponge_random_start() {
        // two searches from random starts both pass, whatever nonce they land on
        let prover = Sponge::new(&[Fr::from(7u64)]);
        for _ in 0..2 {
            let mut fork = prover.clone();
            let mut verifier = prover.clone();
            let nonce = fork.generate_pow(4);
            assert!(verifier.verify_pow(nonce, 4));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]
        #[test]
        fn test_zero_bits_always_pass(seed in any::<u64>()) {
            let mut t = Fs::new(&seed.to_be_bytes());
            let mut verifier = t.clone();
            let nonce = t.generate_pow(0);
            prop_assert_eq!(nonce, 0);
            prop_assert!(verifier.verify_pow(nonce, 0));
        }
    }
}
