//! This crate provides a generic implementation of the Poseidon permutation
//! over a state of three field elements.
//!
//! Parameters are derived deterministically for any prime field with
//! [ArithmeticSpongeParams::generate](crate::poseidon::ArithmeticSpongeParams::generate):
//! ```rust
//! use ark_bn254::Fr;
//! use placeholder_poseidon::{
//!     constants::PlaceholderSpongeConstants, permutation::poseidon_block_cipher,
//!     poseidon::ArithmeticSpongeParams,
//! };
//!
//! let params = ArithmeticSpongeParams::<Fr>::generate::<PlaceholderSpongeConstants>();
//! let mut state = [Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];
//! poseidon_block_cipher::<Fr, PlaceholderSpongeConstants>(&params, &mut state);
//! ```

pub mod constants;
pub mod permutation;
pub mod poseidon;

pub use poseidon::ArithmeticSpongeParams;
