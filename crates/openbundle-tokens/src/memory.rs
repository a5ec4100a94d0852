//! In-memory reference tokens
//!
//! Thread-safe reference implementations of the three transfer protocols,
//! used by the engine's tests and demos. Each token carries a halt switch so
//! tests can inject transfer failures mid-operation.

use crate::{FungibleToken, NonFungibleToken, SemiFungibleToken, TokenError, TokenResult};
use async_trait::async_trait;
use openbundle_types::Address;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct FungibleState {
    balances: HashMap<Address, u128>,
    /// (owner, spender) → remaining allowance
    allowances: HashMap<(Address, Address), u128>,
    halted: Option<String>,
}

/// In-memory fungible token with amount allowances
pub struct InMemoryFungible {
    symbol: String,
    state: Arc<RwLock<FungibleState>>,
}

impl InMemoryFungible {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            state: Arc::new(RwLock::new(FungibleState::default())),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Credit `amount` new units to `to`
    pub async fn mint(&self, to: &Address, amount: u128) {
        let mut state = self.state.write().await;
        *state.balances.entry(*to).or_default() += amount;
    }

    /// Grant `spender` an allowance of `amount` over `owner`'s balance
    pub async fn approve(&self, owner: &Address, spender: &Address, amount: u128) {
        let mut state = self.state.write().await;
        state.allowances.insert((*owner, *spender), amount);
    }

    /// Fail every transfer until `resume`
    pub async fn halt(&self, reason: impl Into<String>) {
        self.state.write().await.halted = Some(reason.into());
    }

    pub async fn resume(&self) {
        self.state.write().await.halted = None;
    }
}

fn debit(balances: &mut HashMap<Address, u128>, from: &Address, amount: u128) -> TokenResult<()> {
    let available = balances.get(from).copied().unwrap_or(0);
    if available < amount {
        return Err(TokenError::InsufficientBalance {
            available,
            required: amount,
        });
    }
    balances.insert(*from, available - amount);
    Ok(())
}

#[async_trait]
impl FungibleToken for InMemoryFungible {
    async fn transfer(&self, from: &Address, to: &Address, amount: u128) -> TokenResult<()> {
        let mut state = self.state.write().await;
        if let Some(reason) = &state.halted {
            return Err(TokenError::Halted {
                reason: reason.clone(),
            });
        }
        debit(&mut state.balances, from, amount)?;
        *state.balances.entry(*to).or_default() += amount;
        Ok(())
    }

    async fn transfer_from(
        &self,
        operator: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> TokenResult<()> {
        let mut state = self.state.write().await;
        if let Some(reason) = &state.halted {
            return Err(TokenError::Halted {
                reason: reason.clone(),
            });
        }
        if operator != from {
            let key = (*from, *operator);
            let allowance = state.allowances.get(&key).copied().unwrap_or(0);
            if allowance < amount {
                return Err(TokenError::InsufficientAllowance {
                    available: allowance,
                    required: amount,
                });
            }
            state.allowances.insert(key, allowance - amount);
        }
        debit(&mut state.balances, from, amount)?;
        *state.balances.entry(*to).or_default() += amount;
        Ok(())
    }

    async fn balance_of(&self, owner: &Address) -> u128 {
        self.state.read().await.balances.get(owner).copied().unwrap_or(0)
    }
}

#[derive(Default)]
struct NonFungibleState {
    owners: HashMap<u128, Address>,
    /// Per-unit approvals, cleared on transfer
    unit_approvals: HashMap<u128, Address>,
    operator_approvals: HashMap<(Address, Address), bool>,
    halted: Option<String>,
}

/// In-memory non-fungible token with per-unit and operator approvals
pub struct InMemoryNonFungible {
    symbol: String,
    state: Arc<RwLock<NonFungibleState>>,
}

impl InMemoryNonFungible {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            state: Arc::new(RwLock::new(NonFungibleState::default())),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Create the unit `id` owned by `to`
    pub async fn mint(&self, to: &Address, id: u128) {
        let mut state = self.state.write().await;
        state.owners.insert(id, *to);
    }

    /// Approve `operator` for the single unit `id`
    pub async fn approve(&self, operator: &Address, id: u128) {
        let mut state = self.state.write().await;
        state.unit_approvals.insert(id, *operator);
    }

    /// Grant or revoke `operator` rights over every unit of `owner`
    pub async fn set_approval_for_all(&self, owner: &Address, operator: &Address, approved: bool) {
        let mut state = self.state.write().await;
        state.operator_approvals.insert((*owner, *operator), approved);
    }

    pub async fn halt(&self, reason: impl Into<String>) {
        self.state.write().await.halted = Some(reason.into());
    }

    pub async fn resume(&self) {
        self.state.write().await.halted = None;
    }
}

#[async_trait]
impl NonFungibleToken for InMemoryNonFungible {
    async fn transfer_from(
        &self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: u128,
    ) -> TokenResult<()> {
        let mut state = self.state.write().await;
        if let Some(reason) = &state.halted {
            return Err(TokenError::Halted {
                reason: reason.clone(),
            });
        }
        let owner = state
            .owners
            .get(&id)
            .copied()
            .ok_or(TokenError::UnknownUnit { id })?;
        if owner != *from {
            return Err(TokenError::NotOwner {
                id,
                owner: from.to_string(),
            });
        }
        let authorized = operator == from
            || state.unit_approvals.get(&id) == Some(operator)
            || state
                .operator_approvals
                .get(&(*from, *operator))
                .copied()
                .unwrap_or(false);
        if !authorized {
            return Err(TokenError::NotAuthorized {
                operator: operator.to_string(),
                owner: from.to_string(),
            });
        }
        state.unit_approvals.remove(&id);
        state.owners.insert(id, *to);
        Ok(())
    }

    async fn owner_of(&self, id: u128) -> Option<Address> {
        self.state.read().await.owners.get(&id).copied()
    }
}

#[derive(Default)]
struct SemiFungibleState {
    /// (owner, id) → balance
    balances: HashMap<(Address, u128), u128>,
    operator_approvals: HashMap<(Address, Address), bool>,
    /// Recipients whose receiver hook refuses deposits
    rejecting: HashMap<Address, String>,
    halted: Option<String>,
}

/// In-memory semi-fungible token with operator approvals
pub struct InMemorySemiFungible {
    symbol: String,
    state: Arc<RwLock<SemiFungibleState>>,
}

impl InMemorySemiFungible {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            state: Arc::new(RwLock::new(SemiFungibleState::default())),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Credit `amount` units of `id` to `to`
    pub async fn mint(&self, to: &Address, id: u128, amount: u128) {
        let mut state = self.state.write().await;
        *state.balances.entry((*to, id)).or_default() += amount;
    }

    /// Grant or revoke `operator` rights over every unit of `owner`
    pub async fn set_approval_for_all(&self, owner: &Address, operator: &Address, approved: bool) {
        let mut state = self.state.write().await;
        state.operator_approvals.insert((*owner, *operator), approved);
    }

    /// Make `recipient`'s receiver hook refuse every deposit until
    /// `accept_deposits_to`
    pub async fn reject_deposits_to(&self, recipient: &Address, reason: impl Into<String>) {
        let mut state = self.state.write().await;
        state.rejecting.insert(*recipient, reason.into());
    }

    pub async fn accept_deposits_to(&self, recipient: &Address) {
        let mut state = self.state.write().await;
        state.rejecting.remove(recipient);
    }

    pub async fn halt(&self, reason: impl Into<String>) {
        self.state.write().await.halted = Some(reason.into());
    }

    pub async fn resume(&self) {
        self.state.write().await.halted = None;
    }
}

#[async_trait]
impl SemiFungibleToken for InMemorySemiFungible {
    async fn safe_transfer_from(
        &self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: u128,
        amount: u128,
        _data: &[u8],
    ) -> TokenResult<()> {
        let mut state = self.state.write().await;
        if let Some(reason) = &state.halted {
            return Err(TokenError::Halted {
                reason: reason.clone(),
            });
        }
        if let Some(reason) = state.rejecting.get(to) {
            return Err(TokenError::Rejected {
                reason: reason.clone(),
            });
        }
        let authorized = operator == from
            || state
                .operator_approvals
                .get(&(*from, *operator))
                .copied()
                .unwrap_or(false);
        if !authorized {
            return Err(TokenError::NotAuthorized {
                operator: operator.to_string(),
                owner: from.to_string(),
            });
        }
        let key = (*from, id);
        let available = state.balances.get(&key).copied().unwrap_or(0);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        state.balances.insert(key, available - amount);
        *state.balances.entry((*to, id)).or_default() += amount;
        Ok(())
    }

    async fn balance_of(&self, owner: &Address, id: u128) -> u128 {
        self.state
            .read()
            .await
            .balances
            .get(&(*owner, id))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fungible_allowance_is_consumed() {
        let token = InMemoryFungible::new("WETH");
        let owner = Address::new();
        let spender = Address::new();
        let sink = Address::new();

        token.mint(&owner, 1000).await;
        token.approve(&owner, &spender, 600).await;

        token
            .transfer_from(&spender, &owner, &sink, 400)
            .await
            .unwrap();
        assert_eq!(token.balance_of(&sink).await, 400);

        // 200 of allowance left, a further 400 must fail
        let err = token
            .transfer_from(&spender, &owner, &sink, 400)
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::InsufficientAllowance { .. }));
    }

    #[tokio::test]
    async fn test_fungible_owner_needs_no_allowance() {
        let token = InMemoryFungible::new("DAI");
        let owner = Address::new();
        let sink = Address::new();

        token.mint(&owner, 100).await;
        token
            .transfer_from(&owner, &owner, &sink, 100)
            .await
            .unwrap();
        assert_eq!(token.balance_of(&owner).await, 0);
    }

    #[tokio::test]
    async fn test_non_fungible_authorization() {
        let token = InMemoryNonFungible::new("NFT");
        let owner = Address::new();
        let operator = Address::new();
        let recipient = Address::new();

        token.mint(&owner, 312399).await;

        let err = token
            .transfer_from(&operator, &owner, &recipient, 312399)
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::NotAuthorized { .. }));

        token.set_approval_for_all(&owner, &operator, true).await;
        token
            .transfer_from(&operator, &owner, &recipient, 312399)
            .await
            .unwrap();
        assert_eq!(token.owner_of(312399).await, Some(recipient));
    }

    #[tokio::test]
    async fn test_semi_fungible_balances_per_id() {
        let token = InMemorySemiFungible::new("GAME");
        let owner = Address::new();
        let recipient = Address::new();

        token.mint(&owner, 861829, 840).await;
        token
            .safe_transfer_from(&owner, &owner, &recipient, 861829, 300, &[])
            .await
            .unwrap();

        assert_eq!(token.balance_of(&owner, 861829).await, 540);
        assert_eq!(token.balance_of(&recipient, 861829).await, 300);
        assert_eq!(token.balance_of(&recipient, 861830).await, 0);
    }

    #[tokio::test]
    async fn test_semi_fungible_destination_can_reject_deposits() {
        let token = InMemorySemiFungible::new("GAME");
        let owner = Address::new();
        let picky = Address::new();

        token.mint(&owner, 861829, 10).await;
        token.reject_deposits_to(&picky, "deposits refused").await;

        let err = token
            .safe_transfer_from(&owner, &owner, &picky, 861829, 5, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, TokenError::Rejected { .. }));
        assert_eq!(token.balance_of(&owner, 861829).await, 10);

        token.accept_deposits_to(&picky).await;
        token
            .safe_transfer_from(&owner, &owner, &picky, 861829, 5, &[])
            .await
            .unwrap();
        assert_eq!(token.balance_of(&picky, 861829).await, 5);
    }

    #[tokio::test]
    async fn test_halted_token_rejects_transfers() {
        let token = InMemoryFungible::new("WETH");
        let owner = Address::new();
        let sink = Address::new();

        token.mint(&owner, 100).await;
        token.halt("maintenance").await;

        let err = token.transfer(&owner, &sink, 1).await.unwrap_err();
        assert!(matches!(err, TokenError::Halted { .. }));

        token.resume().await;
        token.transfer(&owner, &sink, 1).await.unwrap();
    }
}
