//! The asset model: categories and asset descriptors/entries

use crate::{Address, BundlerError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a tokenized asset.
///
/// A closed set: the dispatcher matches exhaustively over the three transfer
/// protocols. `Unknown` exists only for defensive matching and is never
/// produced by valid input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AssetCategory {
    /// Interchangeable units identified purely by quantity
    Fungible = 0,
    /// A single asset unit with its own unique identity
    NonFungible = 1,
    /// Units carrying both an identity (`id`) and a quantity (`amount`)
    SemiFungible = 2,
    /// Defensive placeholder, never valid input
    Unknown = 3,
}

impl AssetCategory {
    /// Numeric wire representation of the category
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for AssetCategory {
    type Error = BundlerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Fungible),
            1 => Ok(Self::NonFungible),
            2 => Ok(Self::SemiFungible),
            3 => Ok(Self::Unknown),
            other => Err(BundlerError::input_validation(format!(
                "invalid asset category: {other}"
            ))),
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fungible => "fungible",
            Self::NonFungible => "non-fungible",
            Self::SemiFungible => "semi-fungible",
            Self::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// One tokenized asset: the input descriptor of `create` and, unchanged, the
/// entry stored in the asset registry under its nonce.
///
/// The `amount`/`id` fields are interpreted per category: fungible assets use
/// `amount` only, non-fungible assets use `id` only, semi-fungible assets use
/// both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Contract address of the asset
    pub address: Address,
    /// Transfer protocol category
    pub category: AssetCategory,
    /// Quantity (fungible, semi-fungible)
    pub amount: u128,
    /// Unit identity (non-fungible, semi-fungible)
    pub id: u128,
}

impl Asset {
    /// Create a fungible asset descriptor
    pub fn fungible(address: Address, amount: u128) -> Self {
        Self {
            address,
            category: AssetCategory::Fungible,
            amount,
            id: 0,
        }
    }

    /// Create a non-fungible asset descriptor
    pub fn non_fungible(address: Address, id: u128) -> Self {
        Self {
            address,
            category: AssetCategory::NonFungible,
            amount: 1,
            id,
        }
    }

    /// Create a semi-fungible asset descriptor
    pub fn semi_fungible(address: Address, id: u128, amount: u128) -> Self {
        Self {
            address,
            category: AssetCategory::SemiFungible,
            amount,
            id,
        }
    }

    /// The logically-deleted entry: returned by registry lookups for nonces
    /// whose bundle has been unwrapped or that were never allocated.
    pub fn zeroed() -> Self {
        Self {
            address: Address::ZERO,
            category: AssetCategory::Fungible,
            amount: 0,
            id: 0,
        }
    }

    /// Whether this entry is logically deleted
    pub fn is_zeroed(&self) -> bool {
        self.address.is_zero()
            && self.category == AssetCategory::Fungible
            && self.amount == 0
            && self.id == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_codes() {
        assert_eq!(AssetCategory::Fungible.as_u8(), 0);
        assert_eq!(AssetCategory::NonFungible.as_u8(), 1);
        assert_eq!(AssetCategory::SemiFungible.as_u8(), 2);
        assert_eq!(AssetCategory::try_from(2).unwrap(), AssetCategory::SemiFungible);
        assert!(AssetCategory::try_from(4).is_err());
    }

    #[test]
    fn test_zeroed_entry() {
        let entry = Asset::zeroed();
        assert!(entry.is_zeroed());
        assert!(!Asset::fungible(Address::new(), 1320).is_zeroed());
    }

    #[test]
    fn test_asset_serde_roundtrip() {
        let asset = Asset::semi_fungible(Address::new(), 861829, 840);
        let json = serde_json::to_string(&asset).unwrap();
        let back: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(asset, back);
    }
}
