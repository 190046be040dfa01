//! Mosaic construction: placement resolution, per-region planning, the placement log and the
//! run orchestration that ties them together.
use rand::Rng;

pub mod events;
pub mod log;
pub mod placement;
pub mod planner;
pub mod runner;
pub mod sampling;

/// Uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub(crate) fn uniform_index(rng: &mut dyn Rng, len: usize) -> usize {
    debug_assert!(len > 0);
    ((rng.next_u32() as u64 * len as u64) >> 32) as usize
}

/// Uniform integer in `lo..=hi`.
#[inline]
pub(crate) fn uniform_inclusive(rng: &mut dyn Rng, lo: i32, hi: i32) -> i32 {
    debug_assert!(lo <= hi);
    let span = (hi as i64 - lo as i64 + 1) as u64;
    (lo as i64 + ((rng.next_u32() as u64 * span) >> 32) as i64) as i32
}

#[cfg(test)]
pub(crate) mod test_support {
    use core::convert::Infallible;

    use rand::TryRng;

    /// Random source that always yields the same value.
    pub(crate) struct FixedRng {
        pub(crate) value: u32,
    }

    impl FixedRng {
        /// Draws land in the middle of every range.
        pub(crate) fn middle() -> Self {
            Self {
                value: u32::MAX / 2,
            }
        }
    }

    impl TryRng for FixedRng {
        type Error = Infallible;

        fn try_next_u32(&mut self) -> Result<u32, Infallible> {
            Ok(self.value)
        }

        fn try_next_u64(&mut self) -> Result<u64, Infallible> {
            Ok(self.value as u64)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Infallible> {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::FixedRng;
    use super::*;

    #[test]
    fn uniform_index_covers_the_range_ends() {
        assert_eq!(uniform_index(&mut FixedRng { value: 0 }, 6), 0);
        assert_eq!(uniform_index(&mut FixedRng { value: u32::MAX }, 6), 5);
        assert_eq!(uniform_index(&mut FixedRng::middle(), 6), 2);
        assert_eq!(uniform_index(&mut FixedRng { value: u32::MAX }, 1), 0);
    }

    #[test]
    fn uniform_inclusive_is_symmetric_in_the_middle() {
        assert_eq!(uniform_inclusive(&mut FixedRng::middle(), -2, 2), 0);
        assert_eq!(uniform_inclusive(&mut FixedRng::middle(), 0, 0), 0);
        assert_eq!(uniform_inclusive(&mut FixedRng { value: 0 }, -8, 8), -8);
        assert_eq!(uniform_inclusive(&mut FixedRng { value: u32::MAX }, -8, 8), 8);
    }
}
