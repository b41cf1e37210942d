//! Deterministic random numbers.
//!
//! A 32-bit linear congruential generator plus a pure per-pixel seed
//! derivation. There is no global generator: every pixel builds its own
//! [`Lcg`] from [`derive_pixel_seed`], which is what keeps renders identical
//! across thread counts and tile layouts.

use rand::{Error, RngCore, SeedableRng};

/// Multiplier `a` of `state = a * state + c (mod 2^32)`.
pub const LCG_MULTIPLIER: u32 = 1_664_525;
/// Increment `c` of `state = a * state + c (mod 2^32)`.
pub const LCG_INCREMENT: u32 = 1_013_904_223;

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Linear congruential generator with the Numerical Recipes constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Reset the generator to `value`.
    pub fn seed(&mut self, value: u32) {
        self.state = value;
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Next value in `[0, 1)`: the advanced state divided by `2^32`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.step() as f64 / TWO_POW_32
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.step() as u64;
        let lo = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state as u32)
    }
}

/// Seed for pixel `(x, y)` of a `width` x `height` image.
///
/// Pure function of its inputs: the pixel's linear index and coordinates are
/// mixed into `base` with fixed odd weights, then scrambled by one LCG step.
/// Which worker renders the pixel, and in what order, cannot affect it.
pub fn derive_pixel_seed(base: u32, x: u32, y: u32, width: u32, height: u32) -> u32 {
    let index = y.wrapping_mul(width).wrapping_add(x);
    let mixed = base
        .wrapping_add(index.wrapping_mul(2_654_435_761))
        .wrapping_add(x.wrapping_mul(73_856_093))
        .wrapping_add(y.wrapping_mul(19_349_663))
        .wrapping_add(height.wrapping_mul(83_492_791));
    mixed
        .wrapping_mul(LCG_MULTIPLIER)
        .wrapping_add(LCG_INCREMENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lcg_known_sequence() {
        let mut rng = Lcg::new(0);
        assert_eq!(rng.next_u32(), 1_013_904_223);
        assert_eq!(rng.next_u32(), 1_196_435_762);
        assert_eq!(rng.next_u32(), 3_519_870_697);
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = Lcg::new(42);
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_seed_resets() {
        let mut rng = Lcg::new(7);
        let first: Vec<f64> = (0..5).map(|_| rng.next_f64()).collect();
        rng.seed(7);
        let second: Vec<f64> = (0..5).map(|_| rng.next_f64()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_seedable() {
        let a = Lcg::from_seed(99u32.to_le_bytes());
        let b = Lcg::seed_from_u64(99);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fill_bytes_partial_chunk() {
        let mut a = Lcg::new(5);
        let mut b = Lcg::new(5);
        let mut buf = [0u8; 6];
        a.fill_bytes(&mut buf);
        let first = b.next_u32().to_le_bytes();
        let second = b.next_u32().to_le_bytes();
        assert_eq!(&buf[..4], &first);
        assert_eq!(&buf[4..], &second[..2]);
    }

    #[test]
    fn test_pixel_seed_is_pure() {
        assert_eq!(
            derive_pixel_seed(42, 3, 7, 10, 10),
            derive_pixel_seed(42, 3, 7, 10, 10)
        );
    }

    #[test]
    fn test_pixel_seeds_distinct_within_image() {
        let (w, h) = (64, 48);
        let seeds: HashSet<u32> = (0..h)
            .flat_map(|y| (0..w).map(move |x| derive_pixel_seed(1234, x, y, w, h)))
            .collect();
        assert_eq!(seeds.len(), (w * h) as usize);
    }

    #[test]
    fn test_pixel_seed_depends_on_base() {
        assert_ne!(
            derive_pixel_seed(1, 5, 5, 10, 10),
            derive_pixel_seed(2, 5, 5, 10, 10)
        );
    }
}
