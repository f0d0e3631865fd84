//! The Remittance engine, one instance of the escrow contract.
//!
//! Composes the commitment hasher, policy state, ledger and balance pool
//! behind the operations a host drives. Every operation takes a
//! [`HostContext`] for the caller and the current height, runs to
//! completion synchronously, and either returns an [`Outcome`] with the
//! emitted events or fails without changing anything.
//!
//! ## Flow
//!
//! ```text
//! sender:    derive_public_key → create ─┐
//!                                        ├─ redeem (exchanger, height < expiry)
//!                                        └─ reclaim_expired (sender, height ≥ expiry)
//! anyone:    withdraw → host transfers the returned amount
//! owner:     set_fee / set_*_duration / set_running / transfer_ownership
//! ```
//!
//! The engine has no internal locking. A concurrent host must serialize
//! calls against one instance.

use remittance_types::{
    Amount, Commitment, EngineConfig, EngineId, EscrowRecord, Height, Identity, Outcome,
    PendingBalance, RemittanceEvent, Result, Secret,
};

use crate::{
    AdminSurface, BalancePool, CommitmentHasher, DepositRequest, DurationPolicy, EngineSnapshot,
    HostContext, PolicyState, RemittanceLedger,
};

/// One escrow engine instance: commitment hashing, policy, the live
/// records and the pending balances behind a single call surface.
///
/// Every state-changing operation takes the caller and block height from a
/// [`HostContext`] and returns an [`Outcome`] carrying its events. A failed
/// operation leaves the engine untouched.
pub struct RemittanceEngine {
    hasher: CommitmentHasher,
    policy: PolicyState,
    ledger: RemittanceLedger,
    pool: BalancePool,
}

impl RemittanceEngine {
    /// Create an engine with a fresh instance id.
    pub fn new(cfg: &EngineConfig) -> Result<Self> {
        Self::with_engine_id(cfg, EngineId::new())
    }

    /// Create an engine with a known instance id.
    pub fn with_engine_id(cfg: &EngineConfig, engine_id: EngineId) -> Result<Self> {
        let policy = PolicyState::from_config(cfg)?;
        tracing::info!(
            engine = %engine_id,
            owner = %cfg.owner,
            fee = cfg.fee,
            min_duration = cfg.min_duration,
            max_duration = cfg.max_duration,
            running = cfg.running,
            "Remittance engine initialized"
        );
        Ok(Self {
            hasher: CommitmentHasher::new(engine_id),
            policy,
            ledger: RemittanceLedger::new(),
            pool: BalancePool::new(),
        })
    }

    // ----------------------------------------------------------------------
    // Escrow operations
    // ----------------------------------------------------------------------

    /// Public key under which a deposit for `(sender, exchanger)` guarded by
    /// the two secrets is stored on this instance.
    pub fn derive_public_key(
        &self,
        sender: Identity,
        exchanger: Identity,
        secret1: &Secret,
        secret2: &Secret,
    ) -> Result<Commitment> {
        self.hasher.derive_public_key(sender, exchanger, secret1, secret2)
    }

    /// Deposit `req.amount` as the caller. Returns the expiration height.
    ///
    /// Events: `Deposited`, `FeeCollected`.
    pub fn create(&mut self, ctx: &impl HostContext, req: &DepositRequest) -> Result<Outcome<Height>> {
        let record = self.ledger.create(&self.policy, &mut self.pool, ctx, req)?;
        let owner = self.policy.guard.owner();

        tracing::info!(
            commitment = %req.commitment,
            sender = %record.sender,
            exchanger = %record.exchanger,
            net_amount = record.net_amount,
            fee = record.fee,
            expiration = %record.expiration_height,
            "Escrow created"
        );

        Ok(Outcome::new(record.expiration_height)
            .with_event(RemittanceEvent::Deposited {
                commitment: req.commitment,
                net_amount: record.net_amount,
                expiration_height: record.expiration_height,
            })
            .with_event(RemittanceEvent::FeeCollected {
                owner,
                amount: record.fee,
            }))
    }

    /// Redeem as the exchanger with both secrets. Returns the amount
    /// credited to the caller's pending balance.
    ///
    /// Event: `Redeemed`.
    pub fn redeem(
        &mut self,
        ctx: &impl HostContext,
        sender: Identity,
        secret1: &Secret,
        secret2: &Secret,
    ) -> Result<Outcome<Amount>> {
        let (commitment, record) =
            self.ledger
                .redeem(&self.hasher, &mut self.pool, ctx, sender, secret1, secret2)?;

        tracing::info!(
            commitment = %commitment,
            to = %record.exchanger,
            amount = record.net_amount,
            height = %ctx.current_height(),
            "Escrow redeemed"
        );

        Ok(Outcome::new(record.net_amount).with_event(RemittanceEvent::Redeemed {
            commitment,
            amount: record.net_amount,
            to: record.exchanger,
        }))
    }

    /// Reclaim an expired escrow as its sender. Returns the amount credited
    /// to the sender's pending balance.
    ///
    /// Event: `Reclaimed`.
    pub fn reclaim_expired(
        &mut self,
        ctx: &impl HostContext,
        commitment: Commitment,
    ) -> Result<Outcome<Amount>> {
        let record = self.ledger.reclaim_expired(&mut self.pool, ctx, commitment)?;

        tracing::info!(
            commitment = %commitment,
            to = %record.sender,
            amount = record.net_amount,
            height = %ctx.current_height(),
            "Escrow reclaimed"
        );

        Ok(Outcome::new(record.net_amount).with_event(RemittanceEvent::Reclaimed {
            commitment,
            amount: record.net_amount,
            to: record.sender,
        }))
    }

    /// Drain the caller's pending balance. The host must transfer the
    /// returned amount to the caller.
    ///
    /// Event: `Withdrawn`.
    pub fn withdraw(&mut self, ctx: &impl HostContext) -> Result<Outcome<Amount>> {
        let identity = ctx.caller();
        let amount = self.pool.withdraw(identity)?;

        tracing::info!(identity = %identity, amount, "Balance withdrawn");

        Ok(Outcome::new(amount).with_event(RemittanceEvent::Withdrawn { identity, amount }))
    }

    // ----------------------------------------------------------------------
    // Admin operations
    // ----------------------------------------------------------------------

    /// Event: `FeeChanged`.
    pub fn set_fee(&mut self, ctx: &impl HostContext, fee: Amount) -> Result<Outcome<()>> {
        let ev = self.admin().set_fee(ctx.caller(), fee)?;
        tracing::info!(fee, "Owner fee changed");
        Ok(Outcome::new(()).with_event(ev))
    }

    /// Event: `DurationChanged`.
    pub fn set_min_duration(&mut self, ctx: &impl HostContext, min: u64) -> Result<Outcome<()>> {
        let ev = self.admin().set_min_duration(ctx.caller(), min)?;
        tracing::info!(min, "Minimum duration changed");
        Ok(Outcome::new(()).with_event(ev))
    }

    /// Event: `DurationChanged`.
    pub fn set_max_duration(&mut self, ctx: &impl HostContext, max: u64) -> Result<Outcome<()>> {
        let ev = self.admin().set_max_duration(ctx.caller(), max)?;
        tracing::info!(max, "Maximum duration changed");
        Ok(Outcome::new(()).with_event(ev))
    }

    /// Event: `DurationChanged`.
    pub fn set_duration_interval(
        &mut self,
        ctx: &impl HostContext,
        min: u64,
        max: u64,
    ) -> Result<Outcome<()>> {
        let ev = self.admin().set_duration_interval(ctx.caller(), min, max)?;
        tracing::info!(min, max, "Duration interval changed");
        Ok(Outcome::new(()).with_event(ev))
    }

    /// Event: `RunStateChanged`.
    pub fn set_running(&mut self, ctx: &impl HostContext, running: bool) -> Result<Outcome<()>> {
        let ev = self.admin().set_running(ctx.caller(), running)?;
        tracing::info!(running, "Run state changed");
        Ok(Outcome::new(()).with_event(ev))
    }

    /// Event: `OwnerChanged`.
    pub fn transfer_ownership(
        &mut self,
        ctx: &impl HostContext,
        new_owner: Identity,
    ) -> Result<Outcome<()>> {
        let ev = self.admin().transfer_ownership(ctx.caller(), new_owner)?;
        tracing::info!(old = %ctx.caller(), new = %new_owner, "Ownership transferred");
        Ok(Outcome::new(()).with_event(ev))
    }

    fn admin(&mut self) -> AdminSurface<'_> {
        AdminSurface::new(&mut self.policy)
    }

    // ----------------------------------------------------------------------
    // Queries
    // ----------------------------------------------------------------------

    /// Instance id mixed into every commitment.
    #[must_use]
    pub fn engine_id(&self) -> EngineId {
        self.hasher.engine_id()
    }

    /// Fee, duration bounds, owner and running flag.
    #[must_use]
    pub fn policy(&self) -> &PolicyState {
        &self.policy
    }

    /// Current owner.
    #[must_use]
    pub fn owner(&self) -> Identity {
        self.policy.guard.owner()
    }

    /// Fee charged on new deposits.
    #[must_use]
    pub fn fee(&self) -> Amount {
        self.policy.fees.fee()
    }

    /// Shortest accepted deposit duration, in blocks.
    #[must_use]
    pub fn min_duration(&self) -> u64 {
        self.policy.durations.min()
    }

    /// Longest accepted deposit duration, in blocks.
    #[must_use]
    pub fn max_duration(&self) -> u64 {
        self.policy.durations.max()
    }

    /// Whether new deposits are accepted.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.policy.guard.is_running()
    }

    /// The live record under `commitment`, if any.
    #[must_use]
    pub fn record(&self, commitment: &Commitment) -> Option<&EscrowRecord> {
        self.ledger.get(commitment)
    }

    /// What `identity` could withdraw right now.
    #[must_use]
    pub fn pending(&self, identity: Identity) -> PendingBalance {
        self.pool.pending(identity)
    }

    /// Live escrow records.
    #[must_use]
    pub fn ledger(&self) -> &RemittanceLedger {
        &self.ledger
    }

    /// Pending fees and payouts.
    #[must_use]
    pub fn pool(&self) -> &BalancePool {
        &self.pool
    }

    // ----------------------------------------------------------------------
    // Persistence
    // ----------------------------------------------------------------------

    /// Serializable copy of the full engine state, in sorted order.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            engine_id: self.engine_id(),
            policy: self.policy,
            records: self.ledger.entries(),
            owner_fees: self.pool.fee_entries(),
            beneficiary_balances: self.pool.payout_entries(),
        }
    }

    /// Rebuild an engine from a snapshot. Duration bounds, record liveness
    /// and balance uniqueness are re-validated since deserialization
    /// bypasses them.
    pub fn restore(snapshot: EngineSnapshot) -> Result<Self> {
        let durations = &snapshot.policy.durations;
        DurationPolicy::new(durations.min(), durations.max())?;
        let ledger = RemittanceLedger::from_entries(snapshot.records)?;
        let pool = BalancePool::from_entries(snapshot.owner_fees, snapshot.beneficiary_balances)?;

        tracing::info!(
            engine = %snapshot.engine_id,
            records = ledger.live_count(),
            "Remittance engine restored"
        );

        Ok(Self {
            hasher: CommitmentHasher::new(snapshot.engine_id),
            policy: snapshot.policy,
            ledger,
            pool,
        })
    }
}
