//! Asset and bundle registries
//!
//! The asset registry stores one entry per deposited asset, keyed by nonce;
//! the bundle registry stores, per bundle id, the ordered list of nonces it
//! owns. Lookups never fail: a missing or deleted asset entry reads as
//! zeroed, a missing or unwrapped bundle reads as an empty nonce list.

use openbundle_types::{Asset, BundleId, Nonce};
use std::collections::HashMap;

/// Stored asset entries, keyed by globally unique nonce
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    entries: HashMap<Nonce, Asset>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `asset` under `nonce`. The allocator guarantees nonces are
    /// never handed out twice, so this never overwrites a live entry.
    pub fn insert(&mut self, nonce: Nonce, asset: Asset) {
        self.entries.insert(nonce, asset);
    }

    /// The entry stored under `nonce`; zeroed for deleted or unknown nonces
    pub fn get(&self, nonce: Nonce) -> Asset {
        self.entries.get(&nonce).cloned().unwrap_or_else(Asset::zeroed)
    }

    /// Logically delete the entry under `nonce`
    pub fn zero(&mut self, nonce: Nonce) {
        self.entries.remove(&nonce);
    }

    /// Number of live entries (assets currently in custody)
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }
}

/// Ordered nonce lists, keyed by bundle id
#[derive(Debug, Clone, Default)]
pub struct BundleRegistry {
    bundles: HashMap<BundleId, Vec<Nonce>>,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist the ordered nonce list of a freshly created bundle
    pub fn insert(&mut self, id: BundleId, nonces: Vec<Nonce>) {
        self.bundles.insert(id, nonces);
    }

    /// The ordered nonce list of `id`; empty for unknown or unwrapped ids
    pub fn get(&self, id: BundleId) -> Vec<Nonce> {
        self.bundles.get(&id).cloned().unwrap_or_default()
    }

    /// Delete the bundle's nonce list in full
    pub fn remove(&mut self, id: BundleId) {
        self.bundles.remove(&id);
    }

    /// Number of live bundles
    pub fn live_count(&self) -> usize {
        self.bundles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openbundle_types::Address;

    #[test]
    fn test_unknown_nonce_reads_zeroed() {
        let registry = AssetRegistry::new();
        assert!(registry.get(Nonce(1)).is_zeroed());
    }

    #[test]
    fn test_zeroing_deletes_entry() {
        let mut registry = AssetRegistry::new();
        let asset = Asset::fungible(Address::new(), 1320);
        registry.insert(Nonce(1), asset.clone());
        assert_eq!(registry.get(Nonce(1)), asset);

        registry.zero(Nonce(1));
        assert!(registry.get(Nonce(1)).is_zeroed());
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_unknown_bundle_reads_empty() {
        let registry = BundleRegistry::new();
        assert!(registry.get(BundleId(1)).is_empty());
    }

    #[test]
    fn test_bundle_list_order_is_preserved() {
        let mut registry = BundleRegistry::new();
        let nonces = vec![Nonce(121), Nonce(122), Nonce(123)];
        registry.insert(BundleId(1), nonces.clone());
        assert_eq!(registry.get(BundleId(1)), nonces);

        registry.remove(BundleId(1));
        assert!(registry.get(BundleId(1)).is_empty());
    }
}
