//! Category dispatcher
//!
//! Selects the correct transfer protocol per asset category. Inbound
//! transfers pull from the depositing owner into custody; outbound transfers
//! hand custody back. Fungible outbound uses a direct push of the custody
//! balance, since custody is the authorizing sender; the other two
//! categories issue pull-style calls with custody as source.
//!
//! The category set is closed: the match is exhaustive over the three
//! protocols, and the defensive `Unknown` arm fails as a transfer error
//! rather than panicking.

use openbundle_tokens::{TokenDirectory, TokenError};
use openbundle_types::{Address, Asset, AssetCategory, BundlerError, Result};
use std::sync::Arc;

/// Per-category transfer dispatch against the token directory
#[derive(Clone)]
pub struct Dispatcher {
    directory: Arc<dyn TokenDirectory>,
    custody: Address,
}

impl Dispatcher {
    pub fn new(directory: Arc<dyn TokenDirectory>, custody: Address) -> Self {
        Self { directory, custody }
    }

    /// The custody account assets are pulled into
    pub fn custody(&self) -> &Address {
        &self.custody
    }

    /// Inbound: pull `asset` from `owner` into custody
    pub async fn pull_into_custody(&self, owner: &Address, asset: &Asset) -> Result<()> {
        let outcome = match asset.category {
            AssetCategory::Fungible => {
                let token = self.fungible(asset)?;
                token
                    .transfer_from(&self.custody, owner, &self.custody, asset.amount)
                    .await
            }
            AssetCategory::NonFungible => {
                let token = self.non_fungible(asset)?;
                token
                    .transfer_from(&self.custody, owner, &self.custody, asset.id)
                    .await
            }
            AssetCategory::SemiFungible => {
                let token = self.semi_fungible(asset)?;
                token
                    .safe_transfer_from(&self.custody, owner, &self.custody, asset.id, asset.amount, &[])
                    .await
            }
            AssetCategory::Unknown => {
                return Err(BundlerError::transfer(describe(asset), "unknown asset category"))
            }
        };
        outcome.map_err(|err| token_error(asset, err))
    }

    /// Outbound: push `asset` out of custody to `recipient`
    pub async fn push_from_custody(&self, recipient: &Address, asset: &Asset) -> Result<()> {
        let outcome = match asset.category {
            AssetCategory::Fungible => {
                let token = self.fungible(asset)?;
                // Custody is the sender; no allowance involved
                token.transfer(&self.custody, recipient, asset.amount).await
            }
            AssetCategory::NonFungible => {
                let token = self.non_fungible(asset)?;
                token
                    .transfer_from(&self.custody, &self.custody, recipient, asset.id)
                    .await
            }
            AssetCategory::SemiFungible => {
                let token = self.semi_fungible(asset)?;
                token
                    .safe_transfer_from(&self.custody, &self.custody, recipient, asset.id, asset.amount, &[])
                    .await
            }
            AssetCategory::Unknown => {
                return Err(BundlerError::transfer(describe(asset), "unknown asset category"))
            }
        };
        outcome.map_err(|err| token_error(asset, err))
    }

    fn fungible(&self, asset: &Asset) -> Result<Arc<dyn openbundle_tokens::FungibleToken>> {
        self.directory
            .fungible(&asset.address)
            .ok_or_else(|| unresolved(asset))
    }

    fn non_fungible(&self, asset: &Asset) -> Result<Arc<dyn openbundle_tokens::NonFungibleToken>> {
        self.directory
            .non_fungible(&asset.address)
            .ok_or_else(|| unresolved(asset))
    }

    fn semi_fungible(&self, asset: &Asset) -> Result<Arc<dyn openbundle_tokens::SemiFungibleToken>> {
        self.directory
            .semi_fungible(&asset.address)
            .ok_or_else(|| unresolved(asset))
    }
}

fn describe(asset: &Asset) -> String {
    format!("{} asset {}", asset.category, asset.address)
}

fn unresolved(asset: &Asset) -> BundlerError {
    BundlerError::transfer(describe(asset), "asset contract not found in directory")
}

fn token_error(asset: &Asset, err: TokenError) -> BundlerError {
    BundlerError::transfer(describe(asset), err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use openbundle_tokens::{FungibleToken, InMemoryDirectory, InMemoryFungible};

    #[tokio::test]
    async fn test_pull_then_push_restores_owner() {
        let custody = Address::new();
        let owner = Address::new();
        let weth = Arc::new(InMemoryFungible::new("WETH"));
        let address = Address::new();

        weth.mint(&owner, 1000).await;
        weth.approve(&owner, &custody, 1000).await;

        let mut directory = InMemoryDirectory::new();
        directory.insert_fungible(address, weth.clone());
        let dispatcher = Dispatcher::new(Arc::new(directory), custody);

        let asset = Asset::fungible(address, 1000);
        dispatcher.pull_into_custody(&owner, &asset).await.unwrap();
        assert_eq!(weth.balance_of(&custody).await, 1000);

        dispatcher.push_from_custody(&owner, &asset).await.unwrap();
        assert_eq!(weth.balance_of(&owner).await, 1000);
    }

    #[tokio::test]
    async fn test_unresolvable_address_is_a_transfer_error() {
        let dispatcher = Dispatcher::new(Arc::new(InMemoryDirectory::new()), Address::new());
        let asset = Asset::fungible(Address::new(), 1);

        let err = dispatcher
            .pull_into_custody(&Address::new(), &asset)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "TRANSFER");
    }

    #[tokio::test]
    async fn test_unknown_category_is_defensive() {
        let dispatcher = Dispatcher::new(Arc::new(InMemoryDirectory::new()), Address::new());
        let asset = Asset {
            address: Address::new(),
            category: AssetCategory::Unknown,
            amount: 1,
            id: 1,
        };

        let err = dispatcher
            .push_from_custody(&Address::new(), &asset)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "TRANSFER");
    }
}
