//! Parameters of the Poseidon permutation and the S-box.

use crate::constants::{total_rounds, SpongeConstants};
use ark_ff::PrimeField;
use blake2::{Blake2b512, Digest};

/// Domain separator for the round constants.
const ROUND_CONSTANTS_TAG: &[u8] = b"placeholder-poseidon-round-constants";

pub fn sbox<F: PrimeField, SC: SpongeConstants>(mut x: F) -> F {
    if SC::PERM_SBOX == 7 {
        // This is much faster than using the generic `pow`. Hard-code to get the ~50% speed-up
        // that it gives to hashing.
        let mut square = x;
        square.square_in_place();
        x *= square;
        square.square_in_place();
        x *= square;
        x
    } else if SC::PERM_SBOX == 5 {
        let mut square = x;
        square.square_in_place();
        square.square_in_place();
        x * square
    } else {
        x.pow([SC::PERM_SBOX as u64])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArithmeticSpongeParams<F: PrimeField> {
    pub round_constants: Vec<[F; 3]>,
    pub mds: [[F; 3]; 3],
}

impl<F: PrimeField> ArithmeticSpongeParams<F> {
    /// Deterministically derives parameters for the schedule `SC`.
    ///
    /// Round constants are Blake2b-512 outputs reduced into the field, indexed by
    /// `(round, column)`. The MDS matrix is the Cauchy matrix `1 / (x_i + y_j)` with
    /// `x_i = i` and `y_j = 3 + j`, which is MDS because all `x_i + y_j` are distinct
    /// and non-zero.
    ///
    /// These are test-grade parameters. They come from no published Poseidon
    /// instance, have not been analysed against algebraic attacks, and
    /// transcripts built on them do not interoperate with other
    /// implementations. Deployments should supply vetted constants through
    /// [ArithmeticSpongeParams::round_constants] and [ArithmeticSpongeParams::mds].
    pub fn generate<SC: SpongeConstants>() -> Self {
        let round_constants = (0..total_rounds::<SC>())
            .map(|round| {
                std::array::from_fn(|col| {
                    let mut hasher = Blake2b512::new();
                    hasher.update(ROUND_CONSTANTS_TAG);
                    hasher.update((round as u64).to_be_bytes());
                    hasher.update((col as u64).to_be_bytes());
                    F::from_le_bytes_mod_order(&hasher.finalize())
                })
            })
            .collect();

        let mds = std::array::from_fn(|i| {
            std::array::from_fn(|j| {
                F::from((i + 3 + j) as u64)
                    .inverse()
                    .unwrap_or_else(F::zero)
            })
        });

        Self {
            round_constants,
            mds,
        }
    }
}
