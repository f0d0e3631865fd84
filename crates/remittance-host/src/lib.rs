//! # remittance-host
//!
//! Reference in-memory host for the Remittance engine.
//!
//! The engine never moves value or reads a clock by itself. This crate
//! supplies both the way a chain would:
//!
//! - [`SimulatedChain`]: block height, per-transaction caller, wallet debits
//!   on deposit and payouts after withdrawal, an event log
//! - [`Wallets`]: spendable balances; the host's [`remittance_core::ValueTransfer`]
//! - [`SupplyConservation`]: audits that no value is created or lost
//! - [`HostConfig`]: JSON genesis (engine policy, start height, wallets)
//!
//! The `remittance-sim` binary runs a full deposit, redeem and withdraw
//! cycle on top of it.

pub mod chain;
pub mod supply_conservation;
pub mod wallet;

pub use chain::{HostConfig, SimulatedChain};
pub use supply_conservation::SupplyConservation;
pub use wallet::{Wallets, named_identity};
