#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Verify `data` is non-decreasing.
pub fn is_sorted<T: PartialOrd>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

/// Verify `data` is non-increasing.
pub fn is_sorted_descending<T: PartialOrd>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] >= w[1])
}

/// Verify the same multiset of keys exists before and after sorting.
pub fn multiset_preserved<T: Ord + Copy>(before: &[T], after: &[T]) -> bool {
    if before.len() != after.len() {
        return false;
    }
    let mut a = before.to_vec();
    let mut b = after.to_vec();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}

/// Multiset preservation for f32 compared by bits (handles NaN).
pub fn multiset_preserved_f32(before: &[f32], after: &[f32]) -> bool {
    let a: Vec<u32> = before.iter().map(|v| v.to_bits()).collect();
    let b: Vec<u32> = after.iter().map(|v| v.to_bits()).collect();
    multiset_preserved(&a, &b)
}

/// Compare two f32 slices via to_bits() (handles NaN and signed zeros).
pub fn assert_bits_eq_f32(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a.to_bits(),
            e.to_bits(),
            "bit mismatch at index {i}: actual={a} (0x{:08x}), expected={e} (0x{:08x})",
            a.to_bits(),
            e.to_bits(),
        );
    }
}

/// Compare two f64 slices via to_bits().
pub fn assert_bits_eq_f64(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a.to_bits(),
            e.to_bits(),
            "bit mismatch at index {i}: actual={a}, expected={e}"
        );
    }
}
