/// Returns log2(d) if `d` is a power of two.
pub fn exact_log2(d: usize) -> Option<usize> {
    d.is_power_of_two().then(|| d.trailing_zeros() as usize)
}
