//! Remittance ledger: the escrow state machine.
//!
//! Maps each commitment to at most one live [`EscrowRecord`]. A record is
//! born in [`RemittanceLedger::create`] and leaves the map through exactly
//! one of [`RemittanceLedger::redeem`] (before expiration, by the exchanger)
//! or [`RemittanceLedger::reclaim_expired`] (at or after expiration, by the
//! sender). Consumed records are erased, not zeroed, so a consumed
//! commitment looks exactly like one that never existed.
//!
//! Every operation checks all of its preconditions before touching any
//! state. A failed call leaves records, balances and policy unchanged.

use std::collections::HashMap;

use remittance_types::{
    Amount, Commitment, EscrowRecord, Height, Identity, RecordState, RemittanceError, Result,
    Secret,
};

use crate::{BalancePool, CommitmentHasher, HostContext, PolicyState};

/// Arguments of a deposit. The depositor is the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositRequest {
    /// Who may redeem, given the two secrets.
    pub exchanger: Identity,
    /// Public key from [`CommitmentHasher::derive_public_key`].
    pub commitment: Commitment,
    /// Lock duration in blocks.
    pub duration: u64,
    /// Value attached to the deposit, fee included.
    pub amount: Amount,
}

/// Owns every live escrow record.
#[derive(Debug, Default)]
pub struct RemittanceLedger {
    records: HashMap<Commitment, EscrowRecord>,
}

impl RemittanceLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Rebuild a ledger from persisted records.
    ///
    /// # Errors
    /// Returns `Internal` if an entry is not live, and
    /// `DuplicateCommitment` if a commitment appears twice.
    pub fn from_entries(entries: impl IntoIterator<Item = (Commitment, EscrowRecord)>) -> Result<Self> {
        let mut records = HashMap::new();
        for (commitment, record) in entries {
            if !record.is_live() {
                return Err(RemittanceError::Internal(format!(
                    "record {commitment} is {} with amount {}",
                    record.state, record.net_amount
                )));
            }
            if records.insert(commitment, record).is_some() {
                return Err(RemittanceError::DuplicateCommitment(commitment));
            }
        }
        Ok(Self { records })
    }

    /// Open a new escrow record.
    ///
    /// Checks, in order:
    /// 1. deposits are running (`NotRunning`)
    /// 2. `amount > 0` (`ZeroValue`)
    /// 3. duration within bounds (`DurationOutOfRange`)
    /// 4. no live record under the commitment (`DuplicateCommitment`)
    /// 5. `amount > fee` (`InsufficientAmount`)
    ///
    /// On success the fee is credited to the current owner and the stored
    /// record is returned.
    pub fn create(
        &mut self,
        policy: &PolicyState,
        pool: &mut BalancePool,
        ctx: &impl HostContext,
        req: &DepositRequest,
    ) -> Result<EscrowRecord> {
        policy.guard.require_running()?;
        if req.amount == 0 {
            return Err(RemittanceError::ZeroValue);
        }
        policy.durations.validate(req.duration)?;
        if self.is_live(&req.commitment) {
            return Err(RemittanceError::DuplicateCommitment(req.commitment));
        }
        policy.fees.validate(req.amount)?;

        let fee = policy.fees.fee();
        let net_amount = req.amount - fee;
        let created_at = ctx.current_height();
        let expiration_height = created_at
            .checked_add(req.duration)
            .ok_or(RemittanceError::ArithmeticOverflow {
                context: "expiration height",
            })?;
        let owner = policy.guard.owner();
        pool.check_credit(owner, fee)?;

        // All checks passed: apply.
        pool.credit_fee(owner, fee)?;
        let record = EscrowRecord {
            sender: ctx.caller(),
            exchanger: req.exchanger,
            net_amount,
            fee,
            created_at,
            expiration_height,
            state: RecordState::Created,
        };
        self.records.insert(req.commitment, record.clone());
        Ok(record)
    }

    /// Redeem with the two secrets. The caller acts as the exchanger: the
    /// commitment is recomputed from `(sender, caller, secret1, secret2)`.
    ///
    /// Checks, in order:
    /// 1. both secrets non-zero (`InvalidSecret`)
    /// 2. a live record exists under the recomputed commitment (`RecordNotLive`)
    /// 3. `height < expiration_height` (`RecordNotLive`)
    ///
    /// Credits the caller and erases the record. Returns the commitment and
    /// the consumed record in state `Redeemed`.
    pub fn redeem(
        &mut self,
        hasher: &CommitmentHasher,
        pool: &mut BalancePool,
        ctx: &impl HostContext,
        sender: Identity,
        secret1: &Secret,
        secret2: &Secret,
    ) -> Result<(Commitment, EscrowRecord)> {
        let caller = ctx.caller();
        let commitment = hasher.derive_public_key(sender, caller, secret1, secret2)?;
        let record = self.live(&commitment)?;
        if !record.is_redeemable_at(ctx.current_height()) {
            return Err(RemittanceError::RecordNotLive(commitment));
        }
        pool.check_credit(caller, record.net_amount)?;

        let mut record = self.take(&commitment)?;
        pool.credit_payout(caller, record.net_amount)?;
        record.mark_redeemed()?;
        Ok((commitment, record))
    }

    /// Reclaim an expired record as its original sender.
    ///
    /// Checks, in order:
    /// 1. a live record exists (`RecordNotLive`)
    /// 2. caller is the record's sender (`WrongCaller`)
    /// 3. `height >= expiration_height` (`NotExpired`)
    ///
    /// Existence is checked first so a stranger learns nothing beyond
    /// "not live". Credits the sender and erases the record.
    pub fn reclaim_expired(
        &mut self,
        pool: &mut BalancePool,
        ctx: &impl HostContext,
        commitment: Commitment,
    ) -> Result<EscrowRecord> {
        let record = self.live(&commitment)?;
        let caller = ctx.caller();
        if caller != record.sender {
            tracing::warn!(commitment = %commitment, caller = %caller, "Reclaim by non-depositor rejected");
            return Err(RemittanceError::WrongCaller { caller });
        }
        let current = ctx.current_height();
        if !record.is_reclaimable_at(current) {
            return Err(RemittanceError::NotExpired {
                current,
                expiration: record.expiration_height,
            });
        }
        pool.check_credit(record.sender, record.net_amount)?;

        let mut record = self.take(&commitment)?;
        pool.credit_payout(record.sender, record.net_amount)?;
        record.mark_reclaimed()?;
        Ok(record)
    }

    fn live(&self, commitment: &Commitment) -> Result<&EscrowRecord> {
        self.records
            .get(commitment)
            .filter(|r| r.is_live())
            .ok_or(RemittanceError::RecordNotLive(*commitment))
    }

    fn take(&mut self, commitment: &Commitment) -> Result<EscrowRecord> {
        self.records
            .remove(commitment)
            .ok_or(RemittanceError::RecordNotLive(*commitment))
    }

    /// Look up a live record.
    #[must_use]
    pub fn get(&self, commitment: &Commitment) -> Option<&EscrowRecord> {
        self.records.get(commitment).filter(|r| r.is_live())
    }

    #[must_use]
    pub fn is_live(&self, commitment: &Commitment) -> bool {
        self.get(commitment).is_some()
    }

    /// Number of live records.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.records.values().filter(|r| r.is_live()).count()
    }

    /// Total value held in live records.
    #[must_use]
    pub fn total_escrowed(&self) -> Amount {
        self.records
            .values()
            .filter(|r| r.is_live())
            .fold(0, |acc: Amount, r| acc.saturating_add(r.net_amount))
    }

    /// Live records whose reclaim window is open at `height`.
    #[must_use]
    pub fn expired_at(&self, height: Height) -> Vec<Commitment> {
        let mut out: Vec<_> = self
            .records
            .iter()
            .filter(|(_, r)| r.is_live() && r.is_reclaimable_at(height))
            .map(|(c, _)| *c)
            .collect();
        out.sort();
        out
    }

    /// All records, sorted by commitment.
    #[must_use]
    pub fn entries(&self) -> Vec<(Commitment, EscrowRecord)> {
        let mut out: Vec<_> = self
            .records
            .iter()
            .map(|(c, r)| (*c, r.clone()))
            .collect();
        out.sort_by_key(|(c, _)| *c);
        out
    }
}

#[cfg(test)]
mod tests {
    use remittance_types::{EngineConfig, EngineId, Hash256};

    use super::*;
    use crate::CallContext;

    struct Setup {
        ledger: RemittanceLedger,
        pool: BalancePool,
        policy: PolicyState,
        hasher: CommitmentHasher,
        owner: Identity,
        sender: Identity,
        exchanger: Identity,
        s1: Secret,
        s2: Secret,
    }

    fn setup() -> Setup {
        let owner = Identity::random();
        let cfg = EngineConfig::new(owner).with_fee(500).with_durations(1, 18);
        Setup {
            ledger: RemittanceLedger::new(),
            pool: BalancePool::new(),
            policy: PolicyState::from_config(&cfg).unwrap(),
            hasher: CommitmentHasher::new(EngineId::new()),
            owner,
            sender: Identity::random(),
            exchanger: Identity::random(),
            s1: Secret::from_passphrase("One-Time-Password1"),
            s2: Secret::from_passphrase("One-Time-Password2"),
        }
    }

    impl Setup {
        fn commitment(&self) -> Commitment {
            self.hasher
                .derive_public_key(self.sender, self.exchanger, &self.s1, &self.s2)
                .unwrap()
        }

        fn request(&self, duration: u64, amount: Amount) -> DepositRequest {
            DepositRequest {
                exchanger: self.exchanger,
                commitment: self.commitment(),
                duration,
                amount,
            }
        }

        fn deposit_at(&mut self, height: u64) -> Result<EscrowRecord> {
            let req = self.request(15, 10_000);
            let ctx = CallContext::new(self.sender, Height(height));
            self.ledger.create(&self.policy, &mut self.pool, &ctx, &req)
        }

        fn redeem_at(&mut self, height: u64) -> Result<(Commitment, EscrowRecord)> {
            let ctx = CallContext::new(self.exchanger, Height(height));
            self.ledger
                .redeem(&self.hasher, &mut self.pool, &ctx, self.sender, &self.s1, &self.s2)
        }

        fn reclaim_at(&mut self, caller: Identity, height: u64) -> Result<EscrowRecord> {
            let c = self.commitment();
            let ctx = CallContext::new(caller, Height(height));
            self.ledger.reclaim_expired(&mut self.pool, &ctx, c)
        }
    }

    #[test]
    fn create_stores_net_and_credits_fee() {
        let mut s = setup();
        let rec = s.deposit_at(10).unwrap();
        assert_eq!(rec.net_amount, 9_500);
        assert_eq!(rec.fee, 500);
        assert_eq!(rec.expiration_height, Height(25));
        assert_eq!(rec.sender, s.sender);
        assert_eq!(rec.exchanger, s.exchanger);
        assert_eq!(s.pool.pending_fees(s.owner), 500);
        assert_eq!(s.ledger.live_count(), 1);
        assert_eq!(s.ledger.total_escrowed(), 9_500);
    }

    #[test]
    fn create_checks_in_order() {
        let mut s = setup();
        let ctx = CallContext::new(s.sender, Height(1));

        // stopped + zero amount + bad duration: NotRunning wins
        s.policy.guard.set_running(s.owner, false).unwrap();
        let req = s.request(0, 0);
        assert_eq!(
            s.ledger.create(&s.policy, &mut s.pool, &ctx, &req),
            Err(RemittanceError::NotRunning)
        );
        s.policy.guard.set_running(s.owner, true).unwrap();

        // zero amount + bad duration: ZeroValue wins
        assert_eq!(
            s.ledger.create(&s.policy, &mut s.pool, &ctx, &req),
            Err(RemittanceError::ZeroValue)
        );

        // bad duration + insufficient amount: DurationOutOfRange wins
        let req = s.request(19, 100);
        assert!(matches!(
            s.ledger.create(&s.policy, &mut s.pool, &ctx, &req),
            Err(RemittanceError::DurationOutOfRange { .. })
        ));

        // duplicate + insufficient amount: DuplicateCommitment wins
        s.deposit_at(1).unwrap();
        let req = s.request(15, 100);
        assert!(matches!(
            s.ledger.create(&s.policy, &mut s.pool, &ctx, &req),
            Err(RemittanceError::DuplicateCommitment(_))
        ));
    }

    #[test]
    fn create_insufficient_amount() {
        let mut s = setup();
        let ctx = CallContext::new(s.sender, Height(1));
        let req = s.request(15, 500);
        assert_eq!(
            s.ledger.create(&s.policy, &mut s.pool, &ctx, &req),
            Err(RemittanceError::InsufficientAmount { amount: 500, fee: 500 })
        );
        assert_eq!(s.ledger.live_count(), 0);
        assert_eq!(s.pool.total_pending(), 0);
    }

    #[test]
    fn duplicate_regardless_of_amount_and_duration() {
        let mut s = setup();
        s.deposit_at(1).unwrap();
        let ctx = CallContext::new(s.sender, Height(2));
        let req = s.request(3, 77_777);
        assert!(matches!(
            s.ledger.create(&s.policy, &mut s.pool, &ctx, &req),
            Err(RemittanceError::DuplicateCommitment(_))
        ));
        assert_eq!(s.pool.pending_fees(s.owner), 500);
    }

    #[test]
    fn expiration_overflow_rejected_atomically() {
        let mut s = setup();
        s.policy.durations.set_max(u64::MAX).unwrap();
        let ctx = CallContext::new(s.sender, Height(u64::MAX - 1));
        let req = s.request(5, 10_000);
        assert!(matches!(
            s.ledger.create(&s.policy, &mut s.pool, &ctx, &req),
            Err(RemittanceError::ArithmeticOverflow { .. })
        ));
        assert_eq!(s.pool.total_pending(), 0);
        assert_eq!(s.ledger.live_count(), 0);
    }

    #[test]
    fn redeem_before_expiration() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        let (c, rec) = s.redeem_at(24).unwrap();
        assert_eq!(c, s.commitment());
        assert_eq!(rec.state, RecordState::Redeemed);
        assert_eq!(rec.net_amount, 9_500);
        assert_eq!(s.pool.pending_payouts(s.exchanger), 9_500);
        assert!(!s.ledger.is_live(&c));
    }

    #[test]
    fn redeem_at_expiration_fails() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        assert!(matches!(s.redeem_at(25), Err(RemittanceError::RecordNotLive(_))));
        assert!(s.ledger.is_live(&s.commitment()));
        assert_eq!(s.pool.pending_payouts(s.exchanger), 0);
    }

    #[test]
    fn redeem_twice_fails() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        s.redeem_at(11).unwrap();
        assert!(matches!(s.redeem_at(12), Err(RemittanceError::RecordNotLive(_))));
    }

    #[test]
    fn redeem_by_wrong_caller_is_not_live() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        let stranger = Identity::random();
        let ctx = CallContext::new(stranger, Height(11));
        let err = s
            .ledger
            .redeem(&s.hasher, &mut s.pool, &ctx, s.sender, &s.s1, &s.s2)
            .unwrap_err();
        assert!(matches!(err, RemittanceError::RecordNotLive(_)));
    }

    #[test]
    fn redeem_with_wrong_secret_is_not_live() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        let ctx = CallContext::new(s.exchanger, Height(11));
        let wrong = Secret::from_passphrase("guess");
        let err = s
            .ledger
            .redeem(&s.hasher, &mut s.pool, &ctx, s.sender, &s.s1, &wrong)
            .unwrap_err();
        assert!(matches!(err, RemittanceError::RecordNotLive(_)));
    }

    #[test]
    fn redeem_with_zero_secret_is_invalid() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        let ctx = CallContext::new(s.exchanger, Height(11));
        let err = s
            .ledger
            .redeem(&s.hasher, &mut s.pool, &ctx, s.sender, &Secret::ZERO, &s.s2)
            .unwrap_err();
        assert_eq!(err, RemittanceError::InvalidSecret);
    }

    #[test]
    fn reclaim_at_expiration() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        let rec = s.reclaim_at(s.sender, 25).unwrap();
        assert_eq!(rec.state, RecordState::Reclaimed);
        assert_eq!(s.pool.pending_payouts(s.sender), 9_500);
        assert!(matches!(s.redeem_at(20), Err(RemittanceError::RecordNotLive(_))));
    }

    #[test]
    fn reclaim_one_block_early_fails() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        assert_eq!(
            s.reclaim_at(s.sender, 24),
            Err(RemittanceError::NotExpired {
                current: Height(24),
                expiration: Height(25)
            })
        );
    }

    #[test]
    fn reclaim_by_stranger_is_wrong_caller_but_absent_first() {
        let mut s = setup();
        let stranger = Identity::random();
        // nothing exists yet: stranger sees only "not live"
        assert!(matches!(
            s.reclaim_at(stranger, 30),
            Err(RemittanceError::RecordNotLive(_))
        ));
        s.deposit_at(10).unwrap();
        assert_eq!(
            s.reclaim_at(stranger, 30),
            Err(RemittanceError::WrongCaller { caller: stranger })
        );
        // exchanger is not the depositor either
        assert!(matches!(
            s.reclaim_at(s.exchanger, 30),
            Err(RemittanceError::WrongCaller { .. })
        ));
    }

    #[test]
    fn wrong_caller_checked_before_window() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        let stranger = Identity::random();
        assert!(matches!(
            s.reclaim_at(stranger, 11),
            Err(RemittanceError::WrongCaller { .. })
        ));
    }

    #[test]
    fn reclaim_twice_fails() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        s.reclaim_at(s.sender, 40).unwrap();
        assert!(matches!(
            s.reclaim_at(s.sender, 41),
            Err(RemittanceError::RecordNotLive(_))
        ));
    }

    #[test]
    fn commitment_reusable_after_consumption() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        s.redeem_at(11).unwrap();
        // the key is free again: a new deposit under it is a fresh record
        let rec = s.deposit_at(12).unwrap();
        assert_eq!(rec.expiration_height, Height(27));
    }

    #[test]
    fn expired_at_lists_reclaimable() {
        let mut s = setup();
        s.deposit_at(10).unwrap();
        assert!(s.ledger.expired_at(Height(24)).is_empty());
        assert_eq!(s.ledger.expired_at(Height(25)), vec![s.commitment()]);
    }

    #[test]
    fn from_entries_rejects_dead_records() {
        let mut rec = EscrowRecord::dummy(Identity::random(), Identity::random(), 0, Height(5));
        let c = Hash256([1u8; 32]);
        assert!(RemittanceLedger::from_entries([(c, rec.clone())]).is_err());
        rec.net_amount = 10;
        let ledger = RemittanceLedger::from_entries([(c, rec)]).unwrap();
        assert!(ledger.is_live(&c));
    }
}
