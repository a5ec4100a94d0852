//! Address → contract handle resolution
//!
//! The engine never holds token contracts directly; the dispatcher resolves
//! each asset's address through a directory at transfer time. An address the
//! directory cannot resolve is a transfer failure, not a panic.

use crate::{FungibleToken, NonFungibleToken, SemiFungibleToken};
use openbundle_types::Address;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves asset contract addresses to live handles
pub trait TokenDirectory: Send + Sync {
    /// Resolve a fungible asset contract
    fn fungible(&self, address: &Address) -> Option<Arc<dyn FungibleToken>>;

    /// Resolve a non-fungible asset contract
    fn non_fungible(&self, address: &Address) -> Option<Arc<dyn NonFungibleToken>>;

    /// Resolve a semi-fungible asset contract
    fn semi_fungible(&self, address: &Address) -> Option<Arc<dyn SemiFungibleToken>>;
}

/// In-memory directory populated up front, then handed to the engine
#[derive(Default)]
pub struct InMemoryDirectory {
    fungibles: HashMap<Address, Arc<dyn FungibleToken>>,
    non_fungibles: HashMap<Address, Arc<dyn NonFungibleToken>>,
    semi_fungibles: HashMap<Address, Arc<dyn SemiFungibleToken>>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fungible contract under `address`
    pub fn insert_fungible(&mut self, address: Address, token: Arc<dyn FungibleToken>) {
        self.fungibles.insert(address, token);
    }

    /// Register a non-fungible contract under `address`
    pub fn insert_non_fungible(&mut self, address: Address, token: Arc<dyn NonFungibleToken>) {
        self.non_fungibles.insert(address, token);
    }

    /// Register a semi-fungible contract under `address`
    pub fn insert_semi_fungible(&mut self, address: Address, token: Arc<dyn SemiFungibleToken>) {
        self.semi_fungibles.insert(address, token);
    }
}

impl TokenDirectory for InMemoryDirectory {
    fn fungible(&self, address: &Address) -> Option<Arc<dyn FungibleToken>> {
        self.fungibles.get(address).cloned()
    }

    fn non_fungible(&self, address: &Address) -> Option<Arc<dyn NonFungibleToken>> {
        self.non_fungibles.get(address).cloned()
    }

    fn semi_fungible(&self, address: &Address) -> Option<Arc<dyn SemiFungibleToken>> {
        self.semi_fungibles.get(address).cloned()
    }
}
