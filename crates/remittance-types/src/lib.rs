//! # remittance-types
//!
//! Shared types, errors, and configuration for the **Remittance** escrow engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Identity`], [`Hash256`] / [`Commitment`], [`Secret`], [`EngineId`], [`Height`]
//! - **Escrow model**: [`EscrowRecord`], [`RecordState`]
//! - **Balance model**: [`PendingBalance`], [`Amount`]
//! - **Events**: [`RemittanceEvent`], [`Outcome`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`RemittanceError`] with `RM_ERR_` prefix codes
//! - **Constants**: policy defaults and hashing domains

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod record;

// Re-export all primary types at crate root for ergonomic imports:
//   use remittance_types::{Identity, EscrowRecord, RemittanceEvent, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use record::*;

// Constants are accessed via `remittance_types::constants::FOO`
// (not re-exported to avoid name collisions).
