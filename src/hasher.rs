//! Default hasher selection.
//!
//! Every table is generic over a [`BuildHasher`]. The default is picked at
//! compile time:
//!
//! - `foldhash` feature: [`foldhash::fast::RandomState`].
//! - `std` feature without `foldhash`: [`std::hash::RandomState`].
//! - neither: [`FnvBuildHasher`], an unkeyed FNV-1a hasher.

use core::hash::BuildHasher;
use core::hash::Hasher;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by `new` constructors.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by `new` constructors.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// The hasher builder used by `new` constructors.
        pub type DefaultHashBuilder = FnvBuildHasher;
    }
}

/// 64-bit FNV-1a hasher.
///
/// Not resistant to hash flooding. Used as the default only when neither
/// `std` nor `foldhash` is available.
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher {
    hash: u64,
}

impl FnvHasher {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    /// Creates a hasher seeded with the FNV offset basis.
    pub fn new() -> Self {
        Self {
            hash: Self::OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.hash ^= byte as u64;
            self.hash = self.hash.wrapping_mul(Self::PRIME);
        }
    }
}

/// Builds [`FnvHasher`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = FnvHasher;

    fn build_hasher(&self) -> Self::Hasher {
        FnvHasher::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_matches_reference_vectors() {
        let build = FnvBuildHasher;

        let mut h = build.build_hasher();
        h.write(b"");
        assert_eq!(h.finish(), 0xcbf2_9ce4_8422_2325);

        let mut h = build.build_hasher();
        h.write(b"a");
        assert_eq!(h.finish(), 0xaf63_dc4c_8601_ec8c);

        let mut h = build.build_hasher();
        h.write(b"foobar");
        assert_eq!(h.finish(), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn fnv_is_deterministic() {
        assert_eq!(
            FnvBuildHasher.hash_one(42u64),
            FnvBuildHasher.hash_one(42u64)
        );
        assert_ne!(
            FnvBuildHasher.hash_one(42u64),
            FnvBuildHasher.hash_one(43u64)
        );
    }
}
