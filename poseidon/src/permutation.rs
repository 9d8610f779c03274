//! The permutation module contains the function implementing the permutation
//! used in Poseidon.

use ark_ff::PrimeField;

use crate::{
    constants::SpongeConstants,
    poseidon::{sbox, ArithmeticSpongeParams},
};

fn apply_mds_matrix<F: PrimeField, SC: SpongeConstants>(
    params: &ArithmeticSpongeParams<F>,
    state: &[F; 3],
) -> [F; 3] {
    if SC::PERM_FULL_MDS {
        std::array::from_fn(|i| {
            state
                .iter()
                .zip(params.mds[i].iter())
                .fold(F::zero(), |x, (s, &m)| m * s + x)
        })
    } else {
        [
            state[0] + state[2],
            state[0] + state[1],
            state[1] + state[2],
        ]
    }
}

fn add_round_constants<F: PrimeField>(
    params: &ArithmeticSpongeParams<F>,
    state: &mut [F; 3],
    r: usize,
) {
    for (state_i, x) in state.iter_mut().zip(params.round_constants[r].iter()) {
        *state_i += x;
    }
}

/// Apply a full round of the permutation.
/// A full round is composed of the following steps:
/// - Apply the S-box to each element of the state.
/// - Apply the MDS matrix to the state.
/// - Add the round constants to the state.
///
/// The function has side-effect and the parameter state is modified.
pub fn full_round<F: PrimeField, SC: SpongeConstants>(
    params: &ArithmeticSpongeParams<F>,
    state: &mut [F; 3],
    r: usize,
) {
    for state_i in state.iter_mut() {
        *state_i = sbox::<F, SC>(*state_i);
    }
    *state = apply_mds_matrix::<F, SC>(params, state);
    add_round_constants(params, state, r);
}

/// Hades schedule: full rounds, then partial rounds where only the first
/// element goes through the S-box, then full rounds again.
/// Round constants are added before the S-box layer.
pub fn half_rounds<F: PrimeField, SC: SpongeConstants>(
    params: &ArithmeticSpongeParams<F>,
    state: &mut [F; 3],
) {
    let mut r = 0;
    for _ in 0..SC::PERM_HALF_ROUNDS_FULL {
        add_round_constants(params, state, r);
        for state_i in state.iter_mut() {
            *state_i = sbox::<F, SC>(*state_i);
        }
        *state = apply_mds_matrix::<F, SC>(params, state);
        r += 1;
    }

    for _ in 0..SC::PERM_ROUNDS_PARTIAL {
        add_round_constants(params, state, r);
        state[0] = sbox::<F, SC>(state[0]);
        *state = apply_mds_matrix::<F, SC>(params, state);
        r += 1;
    }

    for _ in 0..SC::PERM_HALF_ROUNDS_FULL {
        add_round_constants(params, state, r);
        for state_i in state.iter_mut() {
            *state_i = sbox::<F, SC>(*state_i);
        }
        *state = apply_mds_matrix::<F, SC>(params, state);
        r += 1;
    }
}

pub fn poseidon_block_cipher<F: PrimeField, SC: SpongeConstants>(
    params: &ArithmeticSpongeParams<F>,
    state: &mut [F; 3],
) {
    if SC::PERM_HALF_ROUNDS_FULL == 0 {
        if SC::PERM_INITIAL_ARK {
            add_round_constants(params, state, 0);
            for r in 0..SC::PERM_ROUNDS_FULL {
                full_round::<F, SC>(params, state, r + 1);
            }
        } else {
            for r in 0..SC::PERM_ROUNDS_FULL {
                full_round::<F, SC>(params, state, r);
            }
        }
    } else {
        half_rounds::<F, SC>(params, state);
    }
}
