pub trait SpongeConstants {
    const SPONGE_CAPACITY: usize = 1;
    const SPONGE_WIDTH: usize = 3;
    const SPONGE_RATE: usize = 2;
    const PERM_ROUNDS_FULL: usize;
    const PERM_ROUNDS_PARTIAL: usize;
    const PERM_HALF_ROUNDS_FULL: usize;
    const PERM_SBOX: u32;
    const PERM_FULL_MDS: bool;
    const PERM_INITIAL_ARK: bool;
}

/// Total number of rounds, which is also the number of round-constant rows.
pub const fn total_rounds<SC: SpongeConstants>() -> usize {
    if SC::PERM_HALF_ROUNDS_FULL == 0 {
        SC::PERM_ROUNDS_FULL + SC::PERM_INITIAL_ARK as usize
    } else {
        2 * SC::PERM_HALF_ROUNDS_FULL + SC::PERM_ROUNDS_PARTIAL
    }
}

/// Hades-style schedule: 4 full rounds, 57 partial rounds, 4 full rounds,
/// with the `x^5` S-box.
#[derive(Clone, Debug)]
pub struct PlaceholderSpongeConstants {}

impl SpongeConstants for PlaceholderSpongeConstants {
    const SPONGE_CAPACITY: usize = 1;
    const SPONGE_WIDTH: usize = 3;
    const SPONGE_RATE: usize = 2;
    const PERM_ROUNDS_FULL: usize = 8;
    const PERM_ROUNDS_PARTIAL: usize = 57;
    const PERM_HALF_ROUNDS_FULL: usize = 4;
    const PERM_SBOX: u32 = 5;
    const PERM_FULL_MDS: bool = true;
    const PERM_INITIAL_ARK: bool = false;
}
