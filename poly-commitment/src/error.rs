use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitmentError {
    #[error("only binary folding is supported, got m = {0}")]
    UnsupportedFolding(usize),
    #[error("FRI needs at least two rounds, got r = {0}")]
    NotEnoughRounds(usize),
    #[error("invalid FRI parameters: {0}")]
    InvalidParameters(&'static str),
    #[error("a domain of size {0} could not be constructed")]
    DomainConstruction(usize),
    #[error("a polynomial of degree {degree} does not fit the bound {bound}")]
    DegreeTooLarge { degree: usize, bound: usize },
    #[error("cannot commit to an empty batch of polynomials")]
    EmptyBatch,
    #[error("the batch has {polys} polynomials but {points} sets of evaluation points")]
    BatchSizeMismatch { polys: usize, points: usize },
    #[error("a Merkle tree needs a power-of-two number of leaves, got {0}")]
    LeafCount(usize),
    #[error("leaf {index} is out of range for a tree of {leaves} leaves")]
    LeafOutOfRange { index: usize, leaves: usize },
    #[error("the evaluation points of polynomial {0} are not distinct")]
    RepeatedPoints(usize),
    #[error("the division by the vanishing polynomial of the evaluation points is not exact")]
    NonExactDivision,
    #[error("{bits} grinding bits exceed the {max} bits of the challenge")]
    GrindingBits { bits: u32, max: u32 },
}
