//! Monotonic identity allocation
//!
//! Two independent counters starting at zero, incremented before use: the
//! first bundle of a fresh engine has id 1, the first stored asset has
//! nonce 1. Nonce allocation is global, not scoped per bundle, so
//! consecutive bundles receive disjoint increasing nonce ranges. Nonces are
//! never reclaimed, even after their entry is zeroed.

use openbundle_types::{BundleId, Nonce};
use serde::{Deserialize, Serialize};

/// The engine's two monotonic counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    bundle_id: u64,
    nonce: u64,
}

impl IdAllocator {
    /// Fresh allocator with both counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next bundle id (pre-increment)
    pub fn next_bundle_id(&mut self) -> BundleId {
        self.bundle_id += 1;
        BundleId(self.bundle_id)
    }

    /// Allocate the next asset nonce (pre-increment)
    pub fn next_nonce(&mut self) -> Nonce {
        self.nonce += 1;
        Nonce(self.nonce)
    }

    /// Number of bundle ids allocated so far
    pub fn bundles_allocated(&self) -> u64 {
        self.bundle_id
    }

    /// Number of nonces allocated so far
    pub fn nonces_allocated(&self) -> u64 {
        self.nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_allocations_yield_one() {
        let mut allocator = IdAllocator::new();
        assert_eq!(allocator.next_bundle_id(), BundleId(1));
        assert_eq!(allocator.next_nonce(), Nonce(1));
    }

    #[test]
    fn test_counters_are_independent() {
        let mut allocator = IdAllocator::new();
        allocator.next_nonce();
        allocator.next_nonce();
        allocator.next_nonce();
        assert_eq!(allocator.next_bundle_id(), BundleId(1));
        assert_eq!(allocator.next_nonce(), Nonce(4));
    }

    #[test]
    fn test_strictly_increasing() {
        let mut allocator = IdAllocator::new();
        let mut last = 0;
        for _ in 0..100 {
            let Nonce(n) = allocator.next_nonce();
            assert!(n > last);
            last = n;
        }
        assert_eq!(allocator.nonces_allocated(), 100);
        assert_eq!(allocator.bundles_allocated(), 0);
    }
}
