//! Pull-payment balance pool.
//!
//! Owner fees and escrow payouts accumulate here until the beneficiary
//! withdraws them. The pool never moves value itself: `withdraw` zeroes the
//! entry and hands the amount back, and the host transfers it afterwards.
//! A transfer failure on the host side therefore can never leave the pool
//! half-updated, and nothing the host does during the transfer can re-enter
//! a pool that still shows the old balance.

use std::collections::HashMap;

use remittance_types::{Amount, Identity, PendingBalance, RemittanceError, Result};

/// Per-identity pending balances, split into owner fees and payouts.
#[derive(Debug, Default)]
pub struct BalancePool {
    /// Owner fees collected on deposits.
    fees: HashMap<Identity, Amount>,
    /// Redeemed and reclaimed escrow amounts.
    payouts: HashMap<Identity, Amount>,
}

impl BalancePool {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fees: HashMap::new(),
            payouts: HashMap::new(),
        }
    }

    /// Rebuild a pool from persisted entries. Zero entries are dropped.
    ///
    /// # Errors
    /// Returns `Internal` if an identity appears twice in the same table.
    pub fn from_entries(
        fees: impl IntoIterator<Item = (Identity, Amount)>,
        payouts: impl IntoIterator<Item = (Identity, Amount)>,
    ) -> Result<Self> {
        Ok(Self {
            fees: collect_unique(fees, "fee")?,
            payouts: collect_unique(payouts, "payout")?,
        })
    }

    /// Check that crediting `amount` to `identity` cannot overflow, either
    /// in the entry itself or in the identity's total.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if it would.
    pub fn check_credit(&self, identity: Identity, amount: Amount) -> Result<()> {
        self.pending(identity)
            .total()
            .and_then(|t| t.checked_add(amount))
            .map(|_| ())
            .ok_or(RemittanceError::ArithmeticOverflow {
                context: "pending balance",
            })
    }

    /// Credit an owner fee.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the balance would overflow. Nothing
    /// changes in that case.
    pub fn credit_fee(&mut self, owner: Identity, amount: Amount) -> Result<()> {
        self.check_credit(owner, amount)?;
        if amount > 0 {
            *self.fees.entry(owner).or_insert(0) += amount;
        }
        Ok(())
    }

    /// Credit a redeemed or reclaimed amount.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the balance would overflow. Nothing
    /// changes in that case.
    pub fn credit_payout(&mut self, beneficiary: Identity, amount: Amount) -> Result<()> {
        self.check_credit(beneficiary, amount)?;
        if amount > 0 {
            *self.payouts.entry(beneficiary).or_insert(0) += amount;
        }
        Ok(())
    }

    /// Zero everything pending for `identity` and return the amount the
    /// host must now transfer.
    ///
    /// # Errors
    /// Returns `ZeroBalance` if nothing is pending.
    pub fn withdraw(&mut self, identity: Identity) -> Result<Amount> {
        let pending = self.pending(identity);
        if pending.is_zero() {
            return Err(RemittanceError::ZeroBalance(identity));
        }
        let total = pending.total().ok_or(RemittanceError::ArithmeticOverflow {
            context: "pending balance",
        })?;

        self.fees.remove(&identity);
        self.payouts.remove(&identity);
        Ok(total)
    }

    /// Pending balance for one identity.
    #[must_use]
    pub fn pending(&self, identity: Identity) -> PendingBalance {
        PendingBalance {
            fees: self.pending_fees(identity),
            payouts: self.pending_payouts(identity),
        }
    }

    #[must_use]
    pub fn pending_fees(&self, identity: Identity) -> Amount {
        self.fees.get(&identity).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn pending_payouts(&self, identity: Identity) -> Amount {
        self.payouts.get(&identity).copied().unwrap_or(0)
    }

    /// Sum of everything pending across all identities.
    #[must_use]
    pub fn total_pending(&self) -> Amount {
        self.fees
            .values()
            .chain(self.payouts.values())
            .fold(0, |acc: Amount, a| acc.saturating_add(*a))
    }

    /// Fee entries sorted by identity.
    #[must_use]
    pub fn fee_entries(&self) -> Vec<(Identity, Amount)> {
        sorted(&self.fees)
    }

    /// Payout entries sorted by identity.
    #[must_use]
    pub fn payout_entries(&self) -> Vec<(Identity, Amount)> {
        sorted(&self.payouts)
    }
}

fn collect_unique(
    entries: impl IntoIterator<Item = (Identity, Amount)>,
    table: &str,
) -> Result<HashMap<Identity, Amount>> {
    let mut map = HashMap::new();
    for (identity, amount) in entries {
        if map.insert(identity, amount).is_some() {
            return Err(RemittanceError::Internal(format!(
                "duplicate {table} balance entry for {identity}"
            )));
        }
    }
    map.retain(|_, a| *a > 0);
    Ok(map)
}

fn sorted(map: &HashMap<Identity, Amount>) -> Vec<(Identity, Amount)> {
    let mut entries: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort_by_key(|(k, _)| *k);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_accumulates() {
        let mut pool = BalancePool::new();
        let owner = Identity::random();
        pool.credit_fee(owner, 500).unwrap();
        pool.credit_fee(owner, 500).unwrap();
        pool.credit_payout(owner, 9_500).unwrap();
        let p = pool.pending(owner);
        assert_eq!(p.fees, 1_000);
        assert_eq!(p.payouts, 9_500);
        assert_eq!(pool.total_pending(), 10_500);
    }

    #[test]
    fn withdraw_drains_both_ledgers_once() {
        let mut pool = BalancePool::new();
        let who = Identity::random();
        pool.credit_fee(who, 500).unwrap();
        pool.credit_payout(who, 9_500).unwrap();

        assert_eq!(pool.withdraw(who).unwrap(), 10_000);
        assert!(pool.pending(who).is_zero());
        assert_eq!(
            pool.withdraw(who),
            Err(RemittanceError::ZeroBalance(who))
        );
    }

    #[test]
    fn withdraw_unknown_identity_is_zero_balance() {
        let mut pool = BalancePool::new();
        let who = Identity::random();
        assert!(matches!(pool.withdraw(who), Err(RemittanceError::ZeroBalance(_))));
    }

    #[test]
    fn zero_credit_creates_no_entry() {
        let mut pool = BalancePool::new();
        let who = Identity::random();
        pool.credit_fee(who, 0).unwrap();
        assert!(pool.fee_entries().is_empty());
        assert!(pool.withdraw(who).is_err());
    }

    #[test]
    fn overflow_rejected_without_change() {
        let mut pool = BalancePool::new();
        let who = Identity::random();
        pool.credit_payout(who, Amount::MAX - 10).unwrap();
        let err = pool.credit_fee(who, 11).unwrap_err();
        assert!(matches!(err, RemittanceError::ArithmeticOverflow { .. }));
        assert_eq!(pool.pending_fees(who), 0);
        assert_eq!(pool.pending_payouts(who), Amount::MAX - 10);
        pool.credit_fee(who, 10).unwrap();
        assert_eq!(pool.withdraw(who).unwrap(), Amount::MAX);
    }

    #[test]
    fn identities_are_independent() {
        let mut pool = BalancePool::new();
        let a = Identity::random();
        let b = Identity::random();
        pool.credit_payout(a, 100).unwrap();
        pool.credit_payout(b, 200).unwrap();
        assert_eq!(pool.withdraw(a).unwrap(), 100);
        assert_eq!(pool.pending_payouts(b), 200);
    }

    #[test]
    fn entries_roundtrip_and_sorted() {
        let mut pool = BalancePool::new();
        for i in 1..=5u8 {
            pool.credit_payout(Identity([i; 32]), u128::from(i)).unwrap();
        }
        let entries = pool.payout_entries();
        assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));

        let rebuilt = BalancePool::from_entries(pool.fee_entries(), entries).unwrap();
        assert_eq!(rebuilt.total_pending(), 15);
    }

    #[test]
    fn from_entries_rejects_duplicate_identity() {
        let who = Identity([3u8; 32]);
        let err = BalancePool::from_entries([(who, 700), (who, 300)], Vec::new()).unwrap_err();
        assert!(matches!(err, RemittanceError::Internal(_)));

        // The same identity may hold both a fee and a payout.
        let pool = BalancePool::from_entries([(who, 700)], [(who, 300)]).unwrap();
        assert_eq!(pool.pending(who).total(), Some(1_000));
    }
}
