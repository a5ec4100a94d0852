//! Identity types for OpenBundle
//!
//! All identity types are strongly typed wrappers to prevent accidental
//! mixing of different ID kinds. Principals and asset contracts share one
//! address space; bundle ids and asset nonces are monotonic counters owned
//! by the engine's allocator.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Address of a principal or an asset contract.
///
/// The zero address is reserved: it never holds balances and appears only as
/// the source of mint transfer events and the destination of burn transfer
/// events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub Uuid);

impl Address {
    /// The reserved zero address
    pub const ZERO: Address = Address(Uuid::nil());

    /// Create a new random address
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from a string (with or without the `addr_` prefix)
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        let s = s.strip_prefix("addr_").unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Whether this is the reserved zero address
    pub fn is_zero(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "addr_{}", self.0)
    }
}

impl From<Uuid> for Address {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Unique identifier for a bundle.
///
/// Allocated pre-increment by the engine; the first bundle of a fresh engine
/// has id 1. Ids are never rewound or reused, even after unwrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BundleId(pub u64);

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BundleId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Globally unique, monotonically assigned identifier for one stored asset
/// entry. Allocation is global across bundles, not scoped per bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Nonce(pub u64);

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Nonce {
    fn from(nonce: u64) -> Self {
        Self(nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new().is_zero());
    }

    #[test]
    fn test_address_roundtrip() {
        let addr = Address::new();
        let parsed = Address::parse(&addr.to_string()).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn test_id_ordering() {
        assert!(BundleId(1) < BundleId(2));
        assert!(Nonce(120) < Nonce(121));
    }
}
