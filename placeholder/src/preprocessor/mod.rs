//! Preprocessing turns a constraint system and its assignment into
//! committed polynomials: [public] for what the verifier shares and
//! [private] for the witness.

pub mod private;
pub mod public;

pub use private::PreprocessedPrivateData;
pub use public::{CommonData, PreprocessedPublicData, PublicCommitments};
