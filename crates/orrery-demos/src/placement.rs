// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic placement: unit floats derived from blake3 hashes of
//! stable indices, so every mount of a page produces the same scene.

use blake3::Hasher;

/// Uniform value in `[0, 1]` for `(seed, index, lane)`.
pub(crate) fn unit(seed: u64, index: u64, lane: u32) -> f32 {
    let mut h = Hasher::new();
    h.update(&seed.to_le_bytes());
    h.update(&index.to_le_bytes());
    h.update(&lane.to_le_bytes());
    let digest = h.finalize();
    let v = u32::from_le_bytes(digest.as_bytes()[0..4].try_into().expect("digest is 32 bytes"));
    v as f32 / u32::MAX as f32
}

/// Uniform value in `[-radius, radius]`.
pub(crate) fn span(seed: u64, index: u64, lane: u32, radius: f32) -> f32 {
    (unit(seed, index, lane) - 0.5) * 2.0 * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_is_deterministic_and_bounded() {
        for i in 0..512 {
            let a = unit(7, i, 0);
            let b = unit(7, i, 0);
            assert_eq!(a, b);
            assert!((0.0..=1.0).contains(&a));
        }
    }

    #[test]
    fn lanes_decorrelate() {
        let same = (0..64).filter(|&i| unit(1, i, 0) == unit(1, i, 1)).count();
        assert_eq!(same, 0);
    }

    #[test]
    fn span_is_centered() {
        let mean: f32 = (0..4096).map(|i| span(3, i, 2, 10.0)).sum::<f32>() / 4096.0;
        assert!(mean.abs() < 0.5, "mean {mean} should hover near zero");
    }
}
