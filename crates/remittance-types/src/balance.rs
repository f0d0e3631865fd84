//! Balance types for the pull-payment pool.
//!
//! Every identity has two pending entries: owner `fees` collected on
//! deposits, and `payouts` from redeemed or reclaimed escrows. Both are
//! drained together by a withdrawal.

use serde::{Deserialize, Serialize};

/// Value in the host's smallest unit (e.g. wei). Unsigned; all arithmetic
/// on it is checked.
pub type Amount = u128;

/// Pending withdrawable value for one identity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingBalance {
    /// Owner fees collected while this identity owned the engine.
    pub fees: Amount,
    /// Redeemed or reclaimed escrow amounts.
    pub payouts: Amount,
}

impl PendingBalance {
    /// Total pending (`fees + payouts`), or `None` on overflow.
    #[must_use]
    pub fn total(&self) -> Option<Amount> {
        self.fees.checked_add(self.payouts)
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.fees == 0 && self.payouts == 0
    }
}
