//! Hash states used by the registry containers.
//!
//! - [`FixedHashState`] wraps *foldhash* with a constant seed, so hashing
//!   the same key gives the same result in every process.
//! - [`NoOpHashState`] forwards an already well distributed `u64`
//!   (such as the bits of a `TypeId`) without mixing it again.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const REGISTRY_SEED: FixedState = FixedState::with_seed(0x5DA7_A11C_E0DE_B10C);

/// Hasher produced by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// A [`BuildHasher`] with a fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use dv_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("field");
/// let b = FixedHashState.hash_one("field");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        REGISTRY_SEED.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// Hasher produced by [`NoOpHashState`].
///
/// `write_u64` stores the value as is. Other writes fold the bytes in, so a
/// single `write_u32(n)` and a single `write_u64(n)` agree.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        self.hash = bytes
            .iter()
            .rev()
            .fold(self.hash, |acc, byte| acc.rotate_left(8).wrapping_add(*byte as u64));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// A [`BuildHasher`] passing keys through unchanged.
///
/// Only suitable for keys that are already random looking, like `TypeId`.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use dv_utils::hash::NoOpHashState;
///
/// assert_eq!(NoOpHashState.hash_one(7_u64), 7);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;

    use super::{FixedHashState, NoOpHashState};

    #[test]
    fn narrow_writes_match_u64() {
        assert_eq!(NoOpHashState.hash_one(1234_u32), 1234);
        assert_eq!(NoOpHashState.hash_one(1234_u16), 1234);
        assert_eq!(NoOpHashState.hash_one(1234_u64), 1234);
    }

    #[test]
    fn fixed_state_is_stable() {
        let first = FixedHashState.hash_one(("Player", 3_u32));
        let second = FixedHashState.hash_one(("Player", 3_u32));
        assert_eq!(first, second);
        assert_ne!(first, FixedHashState.hash_one(("Player", 4_u32)));
    }
}
