//! Fiat-Shamir transcripts.
//!
//! A transcript is a deterministic, sequential source of verifier challenges:
//! every value sent by the prover is absorbed, and every challenge is derived
//! from everything absorbed so far. The prover and the verifier must absorb
//! and draw in exactly the same order.
//!
//! Two families are provided, selected statically by the type:
//!
//! - [HashTranscript](crate::hash::HashTranscript) re-hashes a byte digest and
//!   also implements [ByteTranscript] to absorb arbitrary bytes.
//! - [SpongeTranscript](crate::sponge::SpongeTranscript) drives an algebraic
//!   permutation over three field elements and only absorbs field elements.

pub mod hash;
pub mod sponge;

pub use hash::{Blake2b256, HashTranscript};
pub use sponge::SpongeTranscript;

use ark_ff::PrimeField;

/// Number of bytes of a commitment digest.
pub const DIGEST_LENGTH: usize = 32;

/// A Merkle commitment, as absorbed by transcripts.
pub type Digest = [u8; DIGEST_LENGTH];

/// A sequential Fiat-Shamir transcript producing challenges in `F`.
pub trait Transcript<F: PrimeField>: Clone + Send + Sync {
    /// Absorbs field elements, in order.
    fn absorb(&mut self, elems: &[F]);

    /// Absorbs a commitment digest.
    fn absorb_digest(&mut self, digest: &Digest);

    /// Advances the state and derives a field challenge from it.
    fn challenge(&mut self) -> F;

    /// Advances the state and derives a 64-bit integer challenge from it.
    fn int_challenge(&mut self) -> u64;

    /// Draws `n` challenges in sequence.
    fn challenges(&mut self, n: usize) -> Vec<F> {
        (0..n).map(|_| self.challenge()).collect()
    }
}

/// Transcripts that accept unstructured bytes.
pub trait ByteTranscript<F: PrimeField>: Transcript<F> {
    /// Absorbs raw bytes.
    fn absorb_bytes(&mut self, bytes: &[u8]);
}
