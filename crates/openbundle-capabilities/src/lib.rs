//! OpenBundle Capabilities - "do you support operation group X" queries
//!
//! A capability identifier is the first four bytes of the Keccak-256 digest
//! of an operation signature; a group identifier is the XOR of its member
//! selectors. The scheme is wire-compatible with the EIP-165 interface
//! identifier convention, so the introspection, multi-token and receiver
//! groups match the well-known constants (`0x01ffc9a7`, `0xd9b67a26`,
//! `0x4e23d035`).
//!
//! The engine only matches against a fixed, precomputed table; combination
//! and derivation of new identifiers is tooling-side. Unrecognized
//! identifiers answer `false`, never an error.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

/// 4-byte opaque capability identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityId(pub [u8; 4]);

impl CapabilityId {
    /// Build an identifier from raw bytes
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Selector of a single operation signature
    pub fn from_signature(signature: &str) -> Self {
        let digest = Keccak256::digest(signature.as_bytes());
        Self([digest[0], digest[1], digest[2], digest[3]])
    }

    /// XOR-combine the selectors of a group of operation signatures
    pub fn from_signatures<'a>(signatures: impl IntoIterator<Item = &'a str>) -> Self {
        signatures
            .into_iter()
            .map(Self::from_signature)
            .fold(Self([0; 4]), |acc, id| acc.xor(id))
    }

    /// Combine two identifiers
    pub fn xor(self, other: Self) -> Self {
        let mut bytes = [0u8; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.0[i] ^ other.0[i];
        }
        Self(bytes)
    }

    /// Raw bytes of the identifier
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// The named operation groups the engine advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityGroup {
    /// Base introspection: the capability query itself
    Introspection,
    /// Ownership-ledger standard operations: balance query, batch balance
    /// query, approval-for-all, single/batch transfer
    OwnershipLedger,
    /// Semi-fungible receiver hooks (single/batch)
    Receiver,
    /// Bundler operations: create, unwrap, asset lookup, bundle lookup,
    /// max-size query
    Bundler,
}

impl CapabilityGroup {
    /// Canonical operation signatures of the group's members
    pub fn signatures(&self) -> &'static [&'static str] {
        match self {
            Self::Introspection => &["supportsInterface(bytes4)"],
            Self::OwnershipLedger => &[
                "balanceOf(address,uint256)",
                "balanceOfBatch(address[],uint256[])",
                "setApprovalForAll(address,bool)",
                "isApprovedForAll(address,address)",
                "safeTransferFrom(address,address,uint256,uint256,bytes)",
                "safeBatchTransferFrom(address,address,uint256[],uint256[],bytes)",
            ],
            Self::Receiver => &[
                "onERC1155Received(address,address,uint256,uint256,bytes)",
                "onERC1155BatchReceived(address,address,uint256[],uint256[],bytes)",
            ],
            Self::Bundler => &[
                "create((address,uint8,uint256,uint256)[])",
                "unwrap(uint256)",
                "token(uint256)",
                "bundle(uint256)",
                "maxSize()",
            ],
        }
    }

    /// Group identifier: XOR of the member selectors
    pub fn id(&self) -> CapabilityId {
        CapabilityId::from_signatures(self.signatures().iter().copied())
    }

    /// All groups, in advertisement order
    pub fn all() -> [CapabilityGroup; 4] {
        [
            Self::Introspection,
            Self::OwnershipLedger,
            Self::Receiver,
            Self::Bundler,
        ]
    }
}

/// Acknowledgement selector returned by the single-unit receiver hook
pub fn receiver_single_ack() -> CapabilityId {
    CapabilityId::from_signature(CapabilityGroup::Receiver.signatures()[0])
}

/// Acknowledgement selector returned by the batch receiver hook
pub fn receiver_batch_ack() -> CapabilityId {
    CapabilityId::from_signature(CapabilityGroup::Receiver.signatures()[1])
}

/// Fixed, precomputed capability table
#[derive(Debug, Clone)]
pub struct CapabilityTable {
    entries: Vec<(CapabilityId, CapabilityGroup)>,
}

impl CapabilityTable {
    /// The standard table: all four advertised groups
    pub fn standard() -> Self {
        Self {
            entries: CapabilityGroup::all()
                .into_iter()
                .map(|group| (group.id(), group))
                .collect(),
        }
    }

    /// Whether `id` matches one of the advertised groups
    pub fn supports(&self, id: CapabilityId) -> bool {
        self.group(id).is_some()
    }

    /// The group `id` identifies, if any
    pub fn group(&self, id: CapabilityId) -> Option<CapabilityGroup> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, group)| *group)
    }
}

impl Default for CapabilityTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_introspection_id_matches_reference_constant() {
        assert_eq!(
            CapabilityGroup::Introspection.id(),
            CapabilityId::from_bytes([0x01, 0xff, 0xc9, 0xa7])
        );
    }

    #[test]
    fn test_ownership_ledger_id_matches_reference_constant() {
        assert_eq!(
            CapabilityGroup::OwnershipLedger.id(),
            CapabilityId::from_bytes([0xd9, 0xb6, 0x7a, 0x26])
        );
    }

    #[test]
    fn test_receiver_id_matches_reference_constant() {
        assert_eq!(
            CapabilityGroup::Receiver.id(),
            CapabilityId::from_bytes([0x4e, 0x23, 0xd0, 0x35])
        );
    }

    #[test]
    fn test_table_matches_all_groups() {
        let table = CapabilityTable::standard();
        for group in CapabilityGroup::all() {
            assert!(table.supports(group.id()), "group {group:?} not matched");
            assert_eq!(table.group(group.id()), Some(group));
        }
    }

    #[test]
    fn test_unrecognized_id_is_false_not_an_error() {
        let table = CapabilityTable::standard();
        assert!(!table.supports(CapabilityId::from_bytes([0xde, 0xad, 0xbe, 0xef])));
    }

    #[test]
    fn test_xor_is_self_inverse() {
        let a = CapabilityId::from_signature("unwrap(uint256)");
        let b = CapabilityId::from_signature("maxSize()");
        assert_eq!(a.xor(b).xor(b), a);
    }

    #[test]
    fn test_display_renders_hex() {
        let id = CapabilityId::from_bytes([0x01, 0xff, 0xc9, 0xa7]);
        assert_eq!(id.to_string(), "0x01ffc9a7");
    }
}
