//! Randomness for dice and cosmetic jitter.
//!
//! Entropy comes from `getrandom` (browser crypto API on wasm). If that ever
//! fails we fall back to a linear-congruential step so gameplay never stalls.

use crate::engine::DiceSource;

/// Faces on the die.
pub const DIE_FACES: u8 = 6;

/// Process entropy source. Cheap to construct; holds only the LCG fallback state.
#[derive(Debug, Clone)]
pub struct Entropy {
    fallback: u32,
}

impl Default for Entropy {
    fn default() -> Self {
        Self::new()
    }
}

impl Entropy {
    pub fn new() -> Self {
        Self {
            fallback: 0x2545_f491,
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => u32::from_le_bytes(buf),
            Err(err) => {
                log::warn!("entropy source failed, using fallback generator: {err}");
                self.fallback = self
                    .fallback
                    .wrapping_mul(1_664_525)
                    .wrapping_add(1_013_904_223);
                self.fallback
            }
        }
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }
}

impl DiceSource for Entropy {
    fn roll(&mut self) -> u8 {
        // Rejection sampling keeps the faces uniform; 2^32 is not a multiple of 6.
        let limit = u32::MAX - (u32::MAX % u32::from(DIE_FACES));
        loop {
            let v = self.next_u32();
            if v < limit {
                return (v % u32::from(DIE_FACES)) as u8 + 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolls_stay_on_the_die() {
        let mut rng = Entropy::new();
        for _ in 0..500 {
            let face = rng.roll();
            assert!((1..=DIE_FACES).contains(&face));
        }
    }

    #[test]
    fn test_unit_is_half_open() {
        let mut rng = Entropy::new();
        for _ in 0..500 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
