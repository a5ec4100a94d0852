//! The bundler engine: create/unwrap over custody of tokenized assets
//!
//! Every operation is all-or-nothing. `create` pulls every asset first and
//! commits registry state only once all legs have succeeded; `unwrap` claims
//! the bundle — burns the ownership unit and erases the registries — in one
//! critical section before any asset leaves custody, and reinstates the claim
//! if a push leg fails. A collaborator that calls back into the engine
//! mid-dispatch observes either the full pre-operation state or the bundle
//! already gone, never a partial state. Already-executed transfer legs of a
//! failed operation are compensated in reverse order.

use crate::allocator::IdAllocator;
use crate::dispatch::Dispatcher;
use crate::ledger::OwnershipLedger;
use crate::registry::{AssetRegistry, BundleRegistry};
use chrono::Utc;
use openbundle_capabilities::{
    receiver_batch_ack, receiver_single_ack, CapabilityId, CapabilityTable,
};
use openbundle_tokens::TokenDirectory;
use openbundle_types::{
    Address, Asset, BundleEvent, BundleId, BundlerError, Nonce, Result,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Immutable construction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundlerConfig {
    /// Metadata URI template, returned identically for every bundle id
    pub metadata_uri: String,
    /// Ceiling on assets per bundle, fixed for the engine's lifetime
    pub max_size: usize,
    /// The custody account deposited assets are held under
    pub custody: Address,
}

impl BundlerConfig {
    /// Config with a freshly generated custody address
    pub fn new(metadata_uri: impl Into<String>, max_size: usize) -> Self {
        Self {
            metadata_uri: metadata_uri.into(),
            max_size,
            custody: Address::new(),
        }
    }
}

/// Everything mutable, guarded by one lock: the engine is a single global
/// serialized state machine.
#[derive(Debug, Default)]
struct EngineState {
    allocator: IdAllocator,
    assets: AssetRegistry,
    bundles: BundleRegistry,
    ledger: OwnershipLedger,
    events: Vec<BundleEvent>,
}

/// The OpenBundle engine
#[derive(Clone)]
pub struct TokenBundler {
    config: BundlerConfig,
    dispatcher: Dispatcher,
    capabilities: CapabilityTable,
    state: Arc<RwLock<EngineState>>,
}

impl std::fmt::Debug for TokenBundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBundler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenBundler {
    /// Create an engine over `directory` with the given immutable config
    pub fn new(config: BundlerConfig, directory: Arc<dyn TokenDirectory>) -> Result<Self> {
        if config.max_size == 0 {
            return Err(BundlerError::input_validation(
                "max bundle size must be positive",
            ));
        }
        if config.custody.is_zero() {
            return Err(BundlerError::input_validation(
                "custody address must not be zero",
            ));
        }
        let dispatcher = Dispatcher::new(directory, config.custody);
        Ok(Self {
            config,
            dispatcher,
            capabilities: CapabilityTable::standard(),
            state: Arc::new(RwLock::new(EngineState::default())),
        })
    }

    /// Deposit `assets` into custody and mint one bundle token to `caller`.
    ///
    /// Duplicated descriptors are not deduplicated: each consumes one slot
    /// toward the size ceiling and one nonce. Returns the freshly allocated
    /// bundle id (1 for the first bundle of a fresh engine).
    pub async fn create(&self, caller: &Address, assets: &[Asset]) -> Result<BundleId> {
        if assets.is_empty() {
            return Err(BundlerError::input_validation(
                "need to bundle at least one asset",
            ));
        }
        if assets.len() > self.config.max_size {
            return Err(BundlerError::input_validation(
                "number of assets exceeds max bundle size",
            ));
        }

        // Interactions before effects: pull everything into custody first,
        // commit registry state only once every leg has succeeded.
        for (index, asset) in assets.iter().enumerate() {
            if let Err(err) = self.dispatcher.pull_into_custody(caller, asset).await {
                self.refund_pulled(caller, &assets[..index]).await;
                return Err(err);
            }
        }

        let mut state = self.state.write().await;
        let mut nonces = Vec::with_capacity(assets.len());
        for asset in assets {
            let nonce = state.allocator.next_nonce();
            state.assets.insert(nonce, asset.clone());
            nonces.push(nonce);
        }
        let bundle_id = state.allocator.next_bundle_id();
        state.bundles.insert(bundle_id, nonces);
        state.ledger.mint(caller, bundle_id);

        let now = Utc::now();
        state.events.push(BundleEvent::TransferSingle {
            operator: *caller,
            from: Address::ZERO,
            to: *caller,
            id: bundle_id,
            value: 1,
            timestamp: now,
        });
        state.events.push(BundleEvent::BundleCreated {
            id: bundle_id,
            creator: *caller,
            timestamp: now,
        });

        info!(bundle = %bundle_id, assets = assets.len(), creator = %caller, "bundle created");
        Ok(bundle_id)
    }

    /// Push every asset of `bundle_id` back to `caller`, erase the bundle
    /// and burn the caller's ownership unit.
    ///
    /// The bundle is claimed before the first asset leaves custody: the unit
    /// is burned and the registries erased in one critical section, so a
    /// token contract that calls back in mid-push finds the bundle already
    /// gone and cannot withdraw it a second time.
    pub async fn unwrap(&self, caller: &Address, bundle_id: BundleId) -> Result<()> {
        let entries = {
            let mut state = self.state.write().await;
            let nonces = state.bundles.get(bundle_id);
            if nonces.is_empty() {
                return Err(BundlerError::UnknownEntity { bundle_id });
            }
            state.ledger.burn(caller, bundle_id)?;
            let entries = nonces
                .iter()
                .map(|nonce| (*nonce, state.assets.get(*nonce)))
                .collect::<Vec<(Nonce, Asset)>>();
            for (nonce, _) in &entries {
                state.assets.zero(*nonce);
            }
            state.bundles.remove(bundle_id);
            entries
        };

        for (index, (_, asset)) in entries.iter().enumerate() {
            if let Err(err) = self.dispatcher.push_from_custody(caller, asset).await {
                self.reclaim_pushed(caller, &entries[..index]).await;
                self.restore_claimed(caller, bundle_id, &entries).await;
                return Err(err);
            }
        }

        let mut state = self.state.write().await;
        let now = Utc::now();
        state.events.push(BundleEvent::TransferSingle {
            operator: *caller,
            from: *caller,
            to: Address::ZERO,
            id: bundle_id,
            value: 1,
            timestamp: now,
        });
        state.events.push(BundleEvent::BundleUnwrapped {
            id: bundle_id,
            timestamp: now,
        });

        info!(bundle = %bundle_id, owner = %caller, "bundle unwrapped");
        Ok(())
    }

    /// Compensate inbound legs of a failed `create` by pushing the already
    /// pulled assets back to their depositor, newest first.
    async fn refund_pulled(&self, depositor: &Address, pulled: &[Asset]) {
        for asset in pulled.iter().rev() {
            if let Err(err) = self.dispatcher.push_from_custody(depositor, asset).await {
                warn!(code = err.error_code(), depositor = %depositor, "refund leg failed: {err}");
            }
        }
    }

    /// Compensate outbound legs of a failed `unwrap` by pulling the already
    /// released assets back into custody, newest first.
    async fn reclaim_pushed(&self, holder: &Address, pushed: &[(Nonce, Asset)]) {
        for (_, asset) in pushed.iter().rev() {
            if let Err(err) = self.dispatcher.pull_into_custody(holder, asset).await {
                warn!(code = err.error_code(), holder = %holder, "reclaim leg failed: {err}");
            }
        }
    }

    /// Reinstate a claimed bundle after a failed `unwrap`: re-insert the
    /// asset entries under their original nonces, re-attach the nonce list
    /// and re-mint the ownership unit to `owner`.
    async fn restore_claimed(
        &self,
        owner: &Address,
        bundle_id: BundleId,
        entries: &[(Nonce, Asset)],
    ) {
        let mut state = self.state.write().await;
        for (nonce, asset) in entries {
            state.assets.insert(*nonce, asset.clone());
        }
        state
            .bundles
            .insert(bundle_id, entries.iter().map(|(nonce, _)| *nonce).collect());
        state.ledger.mint(owner, bundle_id);
    }

    /// The asset entry stored under `nonce`; zeroed for deleted or unknown
    /// nonces
    pub async fn token(&self, nonce: Nonce) -> Asset {
        self.state.read().await.assets.get(nonce)
    }

    /// The ordered nonce list of `bundle_id`; empty for unknown or unwrapped
    /// ids
    pub async fn bundle(&self, bundle_id: BundleId) -> Vec<Nonce> {
        self.state.read().await.bundles.get(bundle_id)
    }

    /// The bundle size ceiling fixed at construction
    pub fn max_size(&self) -> usize {
        self.config.max_size
    }

    /// The metadata URI template; shared by every bundle id
    pub fn uri(&self, _bundle_id: BundleId) -> String {
        self.config.metadata_uri.clone()
    }

    /// Ownership balance of `owner` for `bundle_id`
    pub async fn balance_of(&self, owner: &Address, bundle_id: BundleId) -> u128 {
        self.state.read().await.ledger.balance_of(owner, bundle_id)
    }

    /// Ownership balances for paired (owner, id) slices
    pub async fn balance_of_batch(
        &self,
        owners: &[Address],
        ids: &[BundleId],
    ) -> Result<Vec<u128>> {
        self.state.read().await.ledger.balance_of_batch(owners, ids)
    }

    /// Grant or revoke `operator` rights over every unit of `owner`
    pub async fn set_approval_for_all(
        &self,
        owner: &Address,
        operator: &Address,
        approved: bool,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state.ledger.set_approval_for_all(owner, operator, approved)?;
        state.events.push(BundleEvent::ApprovalForAll {
            owner: *owner,
            operator: *operator,
            approved,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    pub async fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        self.state.read().await.ledger.is_approved_for_all(owner, operator)
    }

    /// Move `value` ownership units of `id` from `from` to `to`
    pub async fn safe_transfer_from(
        &self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: BundleId,
        value: u128,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state.ledger.transfer(operator, from, to, id, value)?;
        state.events.push(BundleEvent::TransferSingle {
            operator: *operator,
            from: *from,
            to: *to,
            id,
            value,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Batch variant of `safe_transfer_from`
    pub async fn safe_batch_transfer_from(
        &self,
        operator: &Address,
        from: &Address,
        to: &Address,
        ids: &[BundleId],
        values: &[u128],
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state.ledger.transfer_batch(operator, from, to, ids, values)?;
        state.events.push(BundleEvent::TransferBatch {
            operator: *operator,
            from: *from,
            to: *to,
            ids: ids.to_vec(),
            values: values.to_vec(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Whether the engine supports the operation group identified by `id`.
    /// Unrecognized identifiers answer `false`, never an error.
    pub fn supports_capability(&self, id: CapabilityId) -> bool {
        self.capabilities.supports(id)
    }

    /// Semi-fungible receiver hook: custody accepts every single-unit
    /// deposit and answers with the acknowledgement selector
    pub fn on_semi_fungible_received(
        &self,
        _operator: &Address,
        _from: &Address,
        _id: u128,
        _amount: u128,
        _data: &[u8],
    ) -> CapabilityId {
        receiver_single_ack()
    }

    /// Batch variant of the receiver hook
    pub fn on_semi_fungible_batch_received(
        &self,
        _operator: &Address,
        _from: &Address,
        _ids: &[u128],
        _amounts: &[u128],
        _data: &[u8],
    ) -> CapabilityId {
        receiver_batch_ack()
    }

    /// Snapshot of the ordered event log
    pub async fn events(&self) -> Vec<BundleEvent> {
        self.state.read().await.events.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openbundle_tokens::InMemoryDirectory;

    #[test]
    fn test_config_serde_roundtrip() {
        let config = BundlerConfig::new("https://bundle.example/", 3);
        let json = serde_json::to_string(&config).unwrap();
        let back: BundlerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.metadata_uri, config.metadata_uri);
        assert_eq!(back.max_size, config.max_size);
        assert_eq!(back.custody, config.custody);
    }

    #[test]
    fn test_constructor_rejects_zero_custody() {
        let mut config = BundlerConfig::new("https://bundle.example/", 3);
        config.custody = Address::ZERO;
        let err = TokenBundler::new(config, Arc::new(InMemoryDirectory::new())).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_VALIDATION");
    }
}
