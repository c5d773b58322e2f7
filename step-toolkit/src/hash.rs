//! Stable string hashing for the synthetic data sources.

/// FNV-1a over the UTF-8 bytes of `input`. Stable across runs and
/// platforms, unlike the default hasher.
pub(crate) fn fnv1a(input: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    for byte in input.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
