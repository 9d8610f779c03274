//! Merkle-tree based polynomial commitments.
//!
//! - [merkle]: Blake2b Merkle trees over paired evaluation leaves
//! - [pow]: proof-of-work grinding on a transcript
//! - [fri]: the FRI low-degree test with binary folding
//! - [lpc]: list polynomial commitments, batching openings into FRI

pub mod error;
pub mod fri;
pub mod lpc;
pub mod merkle;
pub mod pow;

pub use error::CommitmentError;
pub use fri::{FriParams, FriProof};
pub use lpc::{LpcParams, LpcProof, Precommitment};
pub use placeholder_transcript::Digest;
pub use pow::Grinding;
