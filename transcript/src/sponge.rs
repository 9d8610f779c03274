//! A transcript over the Poseidon permutation.
//!
//! The state holds three field elements and a cursor into slots 1 and 2.
//! Absorbed elements overwrite the slot under the cursor; once slot 2 is
//! written the state is permuted, the last output limb is kept in slot 0
//! and the other two slots are cleared.

use crate::{Digest, Transcript, DIGEST_LENGTH};
use ark_ff::{BigInteger, PrimeField};
use placeholder_poseidon::{
    constants::{PlaceholderSpongeConstants, SpongeConstants},
    permutation::poseidon_block_cipher,
    ArithmeticSpongeParams,
};
use std::{marker::PhantomData, sync::Arc};

#[derive(Debug)]
pub struct SpongeTranscript<F: PrimeField, SC = PlaceholderSpongeConstants> {
    state: [F; 3],
    cursor: usize,
    params: Arc<ArithmeticSpongeParams<F>>,
    constants: PhantomData<fn() -> SC>,
}

impl<F: PrimeField, SC> Clone for SpongeTranscript<F, SC> {
    fn clone(&self) -> Self {
        Self {
            state: self.state,
            cursor: self.cursor,
            params: Arc::clone(&self.params),
            constants: PhantomData,
        }
    }
}

impl<F: PrimeField, SC: SpongeConstants> SpongeTranscript<F, SC> {
    /// Creates a transcript from the zero state and absorbs `seed`.
    pub fn new(seed: &[F]) -> Self {
        Self::with_params(Arc::new(ArithmeticSpongeParams::generate::<SC>()), seed)
    }

    /// Creates a transcript sharing already generated permutation parameters.
    pub fn with_params(params: Arc<ArithmeticSpongeParams<F>>, seed: &[F]) -> Self {
        let mut transcript = Self {
            state: [F::zero(); 3],
            cursor: 1,
            params,
            constants: PhantomData,
        };
        transcript.absorb(seed);
        transcript
    }

    /// The current state.
    pub fn state(&self) -> &[F; 3] {
        &self.state
    }

    fn permute(&mut self) {
        let mut state = self.state;
        poseidon_block_cipher::<F, SC>(&self.params, &mut state);
        self.state = [state[2], F::zero(), F::zero()];
        self.cursor = 1;
    }
}

impl<F: PrimeField, SC: SpongeConstants> Default for SpongeTranscript<F, SC> {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl<F: PrimeField, SC: SpongeConstants> Transcript<F> for SpongeTranscript<F, SC> {
    fn absorb(&mut self, elems: &[F]) {
        for x in elems {
            self.state[self.cursor] = *x;
            if self.cursor == 2 {
                self.permute();
            } else {
                self.cursor += 1;
            }
        }
    }

    fn absorb_digest(&mut self, digest: &Digest) {
        let (lo, hi) = digest.split_at(DIGEST_LENGTH / 2);
        self.absorb(&[F::from_le_bytes_mod_order(lo), F::from_le_bytes_mod_order(hi)]);
    }

    fn challenge(&mut self) -> F {
        self.permute();
        self.state[0]
    }

    fn int_challenge(&mut self) -> u64 {
        let limbs = self.challenge().into_bigint();
        let bytes = limbs.to_bytes_le();
        let mut low = [0u8; 8];
        low.copy_from_slice(&bytes[..8]);
        u64::from_le_bytes(low)
    }
}
