//! # remittance-core
//!
//! The **Remittance** escrow engine: a sender locks value under a commitment
//! derived from two one-time secrets, and the named exchanger unlocks it by
//! presenting both secrets before the deadline. After the deadline only the
//! sender can take it back.
//!
//! - [`CommitmentHasher`]: instance-bound derivation of escrow public keys
//! - [`DurationPolicy`] / [`FeePolicy`] / [`AccessGuard`]: the mutable policy
//! - [`RemittanceLedger`]: the escrow record state machine
//! - [`BalancePool`]: pull-payment balances for owner fees and payouts
//! - [`AdminSurface`]: owner-gated policy changes
//! - [`RemittanceEngine`]: the facade a host drives
//!
//! ## Record Lifecycle
//!
//! ```text
//!              create
//!   (none) ─────────────▶ CREATED ──── redeem (height < expiry) ────▶ (erased)
//!                            │
//!                            └──── reclaim_expired (height ≥ expiry) ─▶ (erased)
//! ```
//!
//! Value never leaves the engine directly. Redeemed and reclaimed amounts
//! land in the [`BalancePool`], and the host pays them out after
//! [`RemittanceEngine::withdraw`] has zeroed the balance.

pub mod admin;
pub mod balance_pool;
pub mod commitment;
pub mod duration_policy;
pub mod engine;
pub mod fee_policy;
pub mod guard;
pub mod host;
pub mod ledger;
pub mod policy;
pub mod snapshot;

pub use admin::AdminSurface;
pub use balance_pool::BalancePool;
pub use commitment::CommitmentHasher;
pub use duration_policy::DurationPolicy;
pub use engine::RemittanceEngine;
pub use fee_policy::FeePolicy;
pub use guard::AccessGuard;
pub use host::{CallContext, HostContext, ValueTransfer};
pub use ledger::{DepositRequest, RemittanceLedger};
pub use policy::PolicyState;
pub use snapshot::EngineSnapshot;
