//! Bundle lifecycle events
//!
//! Events are appended to the engine's ordered log atomically with the state
//! change that triggers them. A `create` emits the mint transfer first, then
//! the bundle-created event; an `unwrap` emits the burn transfer first, then
//! the bundle-unwrapped event.

use crate::{Address, BundleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events emitted during bundle and ownership-ledger operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BundleEvent {
    /// One ownership unit moved. Mints use the zero address as `from`,
    /// burns use it as `to`.
    TransferSingle {
        operator: Address,
        from: Address,
        to: Address,
        id: BundleId,
        value: u128,
        timestamp: DateTime<Utc>,
    },

    /// Several ownership units moved in one ledger operation
    TransferBatch {
        operator: Address,
        from: Address,
        to: Address,
        ids: Vec<BundleId>,
        values: Vec<u128>,
        timestamp: DateTime<Utc>,
    },

    /// An owner granted or revoked operator rights over all their units
    ApprovalForAll {
        owner: Address,
        operator: Address,
        approved: bool,
        timestamp: DateTime<Utc>,
    },

    /// A bundle was created and its ownership unit minted to the creator
    BundleCreated {
        id: BundleId,
        creator: Address,
        timestamp: DateTime<Utc>,
    },

    /// A bundle was unwrapped and its ownership unit burned
    BundleUnwrapped {
        id: BundleId,
        timestamp: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serde_tagging() {
        let event = BundleEvent::BundleUnwrapped {
            id: BundleId(7),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"BundleUnwrapped\""));
    }
}
