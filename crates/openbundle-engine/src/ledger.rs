//! Ownership ledger
//!
//! Single-unit-per-bundle-id token balances on a mint/burn model: exactly
//! one principal holds balance 1 for a live bundle id. The ledger also
//! carries the standard multi-token operations (balance queries, operator
//! approvals, single/batch transfer) so the ownership unit is freely
//! transferable; whoever holds it may unwrap.
//!
//! The ledger is a plain struct: serialization of operations is the engine's
//! job, and every mutation here happens inside the engine's critical
//! section.

use openbundle_types::{Address, BundleId, BundlerError, Result};
use std::collections::HashMap;

/// Balances and operator approvals for bundle ownership units
#[derive(Debug, Clone, Default)]
pub struct OwnershipLedger {
    /// owner → (bundle id → balance)
    balances: HashMap<Address, HashMap<BundleId, u128>>,
    /// (owner, operator) → approved
    operator_approvals: HashMap<(Address, Address), bool>,
}

impl OwnershipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `owner` for `id` (0 or 1 for well-formed ids)
    pub fn balance_of(&self, owner: &Address, id: BundleId) -> u128 {
        self.balances
            .get(owner)
            .and_then(|account| account.get(&id))
            .copied()
            .unwrap_or(0)
    }

    /// Balances for paired (owner, id) slices
    pub fn balance_of_batch(&self, owners: &[Address], ids: &[BundleId]) -> Result<Vec<u128>> {
        if owners.len() != ids.len() {
            return Err(BundlerError::input_validation(
                "owners and ids length mismatch",
            ));
        }
        Ok(owners
            .iter()
            .zip(ids)
            .map(|(owner, id)| self.balance_of(owner, *id))
            .collect())
    }

    /// Grant or revoke `operator` rights over every unit of `owner`
    pub fn set_approval_for_all(
        &mut self,
        owner: &Address,
        operator: &Address,
        approved: bool,
    ) -> Result<()> {
        if owner == operator {
            return Err(BundlerError::input_validation(
                "cannot set approval status for self",
            ));
        }
        self.operator_approvals.insert((*owner, *operator), approved);
        Ok(())
    }

    pub fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        self.operator_approvals
            .get(&(*owner, *operator))
            .copied()
            .unwrap_or(false)
    }

    /// Mint the single ownership unit of `id` to `to`. Callers only mint for
    /// ids with no live unit, so `to`'s balance for `id` is always 0 here.
    pub fn mint(&mut self, to: &Address, id: BundleId) {
        *self
            .balances
            .entry(*to)
            .or_default()
            .entry(id)
            .or_default() += 1;
    }

    /// Burn the ownership unit held by `from`
    pub fn burn(&mut self, from: &Address, id: BundleId) -> Result<()> {
        if self.balance_of(from, id) != 1 {
            return Err(BundlerError::authorization("sender is not bundle owner"));
        }
        if let Some(account) = self.balances.get_mut(from) {
            account.remove(&id);
        }
        Ok(())
    }

    /// Move `value` units of `id` from `from` to `to` on behalf of
    /// `operator`
    pub fn transfer(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        id: BundleId,
        value: u128,
    ) -> Result<()> {
        self.transfer_batch(operator, from, to, &[id], &[value])
    }

    /// Batch variant of `transfer`; all-or-nothing across the batch
    pub fn transfer_batch(
        &mut self,
        operator: &Address,
        from: &Address,
        to: &Address,
        ids: &[BundleId],
        values: &[u128],
    ) -> Result<()> {
        if ids.len() != values.len() {
            return Err(BundlerError::input_validation(
                "ids and values length mismatch",
            ));
        }
        if to.is_zero() {
            return Err(BundlerError::input_validation(
                "transfer to the zero address",
            ));
        }
        if operator != from && !self.is_approved_for_all(from, operator) {
            return Err(BundlerError::authorization(
                "operator is not owner nor approved",
            ));
        }

        // Stage on a copy so a failing leg commits nothing
        let mut staged = self.balances.clone();
        for (id, value) in ids.iter().zip(values) {
            let available = staged
                .get(from)
                .and_then(|account| account.get(id))
                .copied()
                .unwrap_or(0);
            if available < *value {
                return Err(BundlerError::transfer(
                    format!("bundle token {id}"),
                    format!("insufficient balance: have {available}, need {value}"),
                ));
            }
            if *value == 0 {
                continue;
            }
            let account = staged.entry(*from).or_default();
            account.insert(*id, available - value);
            if available == *value {
                account.remove(id);
            }
            *staged.entry(*to).or_default().entry(*id).or_default() += value;
        }
        self.balances = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_burn() {
        let mut ledger = OwnershipLedger::new();
        let owner = Address::new();
        let id = BundleId(1);

        ledger.mint(&owner, id);
        assert_eq!(ledger.balance_of(&owner, id), 1);

        ledger.burn(&owner, id).unwrap();
        assert_eq!(ledger.balance_of(&owner, id), 0);
    }

    #[test]
    fn test_burn_requires_sole_ownership() {
        let mut ledger = OwnershipLedger::new();
        let owner = Address::new();
        let other = Address::new();
        let id = BundleId(1);

        ledger.mint(&owner, id);
        let err = ledger.burn(&other, id).unwrap_err();
        assert_eq!(err.error_code(), "AUTHORIZATION");
        assert_eq!(ledger.balance_of(&owner, id), 1);
    }

    #[test]
    fn test_transfer_moves_the_unit() {
        let mut ledger = OwnershipLedger::new();
        let owner = Address::new();
        let recipient = Address::new();
        let id = BundleId(1);

        ledger.mint(&owner, id);
        ledger
            .transfer(&owner, &owner, &recipient, id, 1)
            .unwrap();

        assert_eq!(ledger.balance_of(&owner, id), 0);
        assert_eq!(ledger.balance_of(&recipient, id), 1);
    }

    #[test]
    fn test_operator_transfer_requires_approval() {
        let mut ledger = OwnershipLedger::new();
        let owner = Address::new();
        let operator = Address::new();
        let recipient = Address::new();
        let id = BundleId(1);
        ledger.mint(&owner, id);

        let err = ledger
            .transfer(&operator, &owner, &recipient, id, 1)
            .unwrap_err();
        assert_eq!(err.error_code(), "AUTHORIZATION");

        ledger.set_approval_for_all(&owner, &operator, true).unwrap();
        ledger
            .transfer(&operator, &owner, &recipient, id, 1)
            .unwrap();
        assert_eq!(ledger.balance_of(&recipient, id), 1);
    }

    #[test]
    fn test_self_approval_rejected() {
        let mut ledger = OwnershipLedger::new();
        let owner = Address::new();
        let err = ledger
            .set_approval_for_all(&owner, &owner, true)
            .unwrap_err();
        assert_eq!(err.error_code(), "INPUT_VALIDATION");
    }

    #[test]
    fn test_batch_transfer_is_all_or_nothing() {
        let mut ledger = OwnershipLedger::new();
        let owner = Address::new();
        let recipient = Address::new();
        ledger.mint(&owner, BundleId(1));
        // BundleId(2) was never minted to owner

        let err = ledger
            .transfer_batch(
                &owner,
                &owner,
                &recipient,
                &[BundleId(1), BundleId(2)],
                &[1, 1],
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "TRANSFER");
        assert_eq!(ledger.balance_of(&owner, BundleId(1)), 1);
        assert_eq!(ledger.balance_of(&recipient, BundleId(1)), 0);
    }

    #[test]
    fn test_batch_balance_queries() {
        let mut ledger = OwnershipLedger::new();
        let a = Address::new();
        let b = Address::new();
        ledger.mint(&a, BundleId(1));
        ledger.mint(&b, BundleId(2));

        let balances = ledger
            .balance_of_batch(&[a, b, a], &[BundleId(1), BundleId(2), BundleId(2)])
            .unwrap();
        assert_eq!(balances, vec![1, 1, 0]);

        let err = ledger.balance_of_batch(&[a], &[]).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_VALIDATION");
    }
}
