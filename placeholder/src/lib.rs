#![doc = include_str!("../README.md")]

pub use placeholder_commitment;
pub use placeholder_transcript;
pub use placeholder_utils;

pub mod arguments;
pub mod bench;
pub mod circuits;
pub mod error;
pub mod params;
pub mod preprocessor;
pub mod proof;
pub mod prover;
pub mod verifier;
