//! A hasher which adds up the bytes it's given. It's about as weak as hashes
//! get: any two keys holding the same bytes in a different order collide. The
//! map's bucket layout (and so the tests that reason about it) depend on this
//! exact function, so don't go making it smarter.

use std::hash::{BuildHasher, Hasher};

/// Sums every byte written to it as an unsigned integer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteSumHasher(u64);

impl Hasher for ByteSumHasher {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = self.0.wrapping_add(u64::from(*byte));
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Builds new ByteSumHashers on demand.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildByteSumHasher;

impl BuildHasher for BuildByteSumHasher {
    type Hasher = ByteSumHasher;

    fn build_hasher(&self) -> Self::Hasher {
        ByteSumHasher(0)
    }
}
