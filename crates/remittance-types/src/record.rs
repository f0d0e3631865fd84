//! # EscrowRecord: one deposit awaiting redemption or reclaim
//!
//! ## State Machine
//!
//! ```text
//!              redeem (height < expiration)
//!   ┌─────────┐─────────────────────────────▶ REDEEMED  (record erased)
//!   │ CREATED │
//!   └─────────┘─────────────────────────────▶ RECLAIMED (record erased)
//!              reclaim (height >= expiration)
//! ```
//!
//! The two exits split height-space at `expiration_height`: the expiration
//! height itself belongs to reclaim. Both exits are terminal, so at most one
//! of them ever succeeds for a given commitment.

use serde::{Deserialize, Serialize};

use crate::{Amount, Height, Identity, RemittanceError, Result};

/// Lifecycle state of an escrow record.
///
/// Only `Created` records are stored. The terminal states exist on the
/// record value handed back by the ledger after it has been erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordState {
    /// Funds are escrowed and waiting.
    Created,
    /// The exchanger redeemed the funds.
    Redeemed,
    /// The sender reclaimed the funds after expiration.
    Reclaimed,
}

impl RecordState {
    /// Can a record move from `self` to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Created, Self::Redeemed | Self::Reclaimed))
    }
}

impl std::fmt::Display for RecordState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Redeemed => write!(f, "REDEEMED"),
            Self::Reclaimed => write!(f, "RECLAIMED"),
        }
    }
}

/// An escrowed deposit, keyed by its commitment in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// The depositor. Only they may reclaim.
    pub sender: Identity,
    /// The intended redeemer.
    pub exchanger: Identity,
    /// Deposit minus the fee charged at creation.
    pub net_amount: Amount,
    /// Fee charged at creation.
    pub fee: Amount,
    /// Height at which the record was created.
    pub created_at: Height,
    /// `created_at + duration`. First height at which reclaim is allowed.
    pub expiration_height: Height,
    /// Current lifecycle state.
    pub state: RecordState,
}

impl EscrowRecord {
    /// A live record holds value and has not been consumed.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state == RecordState::Created && self.net_amount > 0
    }

    /// Redeem is allowed strictly before expiration.
    #[must_use]
    pub fn is_redeemable_at(&self, height: Height) -> bool {
        height < self.expiration_height
    }

    /// Reclaim is allowed at or after expiration.
    #[must_use]
    pub fn is_reclaimable_at(&self, height: Height) -> bool {
        height >= self.expiration_height
    }

    /// Transition to REDEEMED.
    ///
    /// # Errors
    /// Returns `Internal` if the record is not CREATED.
    pub fn mark_redeemed(&mut self) -> Result<()> {
        self.transition(RecordState::Redeemed)
    }

    /// Transition to RECLAIMED.
    ///
    /// # Errors
    /// Returns `Internal` if the record is not CREATED.
    pub fn mark_reclaimed(&mut self) -> Result<()> {
        self.transition(RecordState::Reclaimed)
    }

    fn transition(&mut self, target: RecordState) -> Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(RemittanceError::Internal(format!(
                "cannot transition record from {} to {target}",
                self.state
            )));
        }
        self.state = target;
        Ok(())
    }
}

/// Dummy record for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl EscrowRecord {
    pub fn dummy(sender: Identity, exchanger: Identity, net_amount: Amount, expiration: Height) -> Self {
        Self {
            sender,
            exchanger,
            net_amount,
            fee: 0,
            created_at: Height(0),
            expiration_height: expiration,
            state: RecordState::Created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record() -> EscrowRecord {
        EscrowRecord::dummy(Identity::random(), Identity::random(), 9_500, Height(25))
    }

    #[test]
    fn created_record_is_live() {
        assert!(make_record().is_live());
    }

    #[test]
    fn zero_amount_record_is_not_live() {
        let mut rec = make_record();
        rec.net_amount = 0;
        assert!(!rec.is_live());
    }

    #[test]
    fn expiration_boundary_belongs_to_reclaim() {
        let rec = make_record();
        assert!(rec.is_redeemable_at(Height(24)));
        assert!(!rec.is_reclaimable_at(Height(24)));
        assert!(!rec.is_redeemable_at(Height(25)));
        assert!(rec.is_reclaimable_at(Height(25)));
        assert!(rec.is_reclaimable_at(Height(26)));
    }

    #[test]
    fn terminal_states_are_final() {
        let mut rec = make_record();
        rec.mark_redeemed().unwrap();
        assert_eq!(rec.state, RecordState::Redeemed);
        assert!(!rec.is_live());
        assert!(rec.mark_reclaimed().is_err());
        assert!(rec.mark_redeemed().is_err());
    }

    #[test]
    fn reclaim_transition() {
        let mut rec = make_record();
        rec.mark_reclaimed().unwrap();
        assert_eq!(rec.state, RecordState::Reclaimed);
        assert!(rec.mark_redeemed().is_err());
    }

    #[test]
    fn state_display() {
        assert_eq!(format!("{}", RecordState::Created), "CREATED");
        assert_eq!(format!("{}", RecordState::Redeemed), "REDEEMED");
        assert_eq!(format!("{}", RecordState::Reclaimed), "RECLAIMED");
    }

    #[test]
    fn record_serde_roundtrip() {
        let rec = make_record();
        let json = serde_json::to_string(&rec).unwrap();
        let back: EscrowRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
