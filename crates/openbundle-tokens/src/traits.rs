//! The three transfer protocols the category dispatcher selects between
//!
//! Every method takes the acting `operator` explicitly: there is no ambient
//! caller in this engine, so the authorization context the reference asset
//! protocols derive from the message sender is passed as a parameter.

use crate::TokenResult;
use async_trait::async_trait;
use openbundle_types::Address;

/// A fungible asset contract: interchangeable units identified purely by
/// quantity. Pull-style `transfer_from` is allowance gated; push-style
/// `transfer` is authorized by `from` being the operator itself.
#[async_trait]
pub trait FungibleToken: Send + Sync {
    /// Direct push of `amount` units from the sender's own balance.
    /// No allowance check: `from` is the authorizing party.
    async fn transfer(&self, from: &Address, to: &Address, amount: u128) -> TokenResult<()>;

    /// Pull `amount` units from `from` on behalf of `operator`, consuming
    /// allowance unless the operator is the owner.
    async fn transfer_from(
        &self,
        operator: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> TokenResult<()>;

    /// Current balance of `owner`
    async fn balance_of(&self, owner: &Address) -> u128;
}

/// A non-fungible asset contract: each unit has its own unique identity.
#[async_trait]
pub trait NonFungibleToken: Send + Sync {
    /// Move the unit identified by `id` from `from` to `to`. The operator
    /// must be the owner, the unit's approved address, or an approved
    /// operator of the owner.
    async fn transfer_from(
        &self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: u128,
    ) -> TokenResult<()>;

    /// Current owner of the unit, if it exists
    async fn owner_of(&self, id: u128) -> Option<Address>;
}

/// A semi-fungible asset contract: units sharing an `id` carry both an
/// identity and a quantity.
#[async_trait]
pub trait SemiFungibleToken: Send + Sync {
    /// Move `amount` units of `id` from `from` to `to`, forwarding the
    /// auxiliary payload to the destination. The operator must be the owner
    /// or an approved operator.
    async fn safe_transfer_from(
        &self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: u128,
        amount: u128,
        data: &[u8],
    ) -> TokenResult<()>;

    /// Current balance of `owner` for `id`
    async fn balance_of(&self, owner: &Address, id: u128) -> u128;
}
