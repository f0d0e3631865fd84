//! Error types for the Remittance escrow engine.
//!
//! All errors use the `RM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Access / run-state errors
//! - 2xx: Deposit validation errors
//! - 3xx: Escrow record errors
//! - 4xx: Balance errors
//! - 5xx: Policy errors
//! - 9xx: General / host errors
//!
//! Every failure is a deterministic function of the arguments and the
//! engine state; none of them is transient and none is retried.

use thiserror::Error;

use crate::{Amount, Hash256, Height, Identity};

/// Central error enum for all Remittance operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemittanceError {
    // =================================================================
    // Access / Run-State Errors (1xx)
    // =================================================================
    /// The caller is not the engine owner.
    #[error("RM_ERR_100: Unauthorized caller {caller}")]
    Unauthorized { caller: Identity },

    /// Deposits are switched off.
    #[error("RM_ERR_101: Engine is not running")]
    NotRunning,

    // =================================================================
    // Deposit Validation Errors (2xx)
    // =================================================================
    /// A deposit carried no value.
    #[error("RM_ERR_200: Deposit amount must be greater than zero")]
    ZeroValue,

    /// The requested lock duration is outside `[min, max]`.
    #[error("RM_ERR_201: Duration {duration} out of range [{min}, {max}]")]
    DurationOutOfRange { duration: u64, min: u64, max: u64 },

    /// The deposit does not exceed the owner fee.
    #[error("RM_ERR_202: Insufficient amount: deposit {amount} must exceed fee {fee}")]
    InsufficientAmount { amount: Amount, fee: Amount },

    /// A secret was the zero sentinel.
    #[error("RM_ERR_203: Invalid secret: zero value is not allowed")]
    InvalidSecret,

    // =================================================================
    // Escrow Record Errors (3xx)
    // =================================================================
    /// A live record already exists under this commitment.
    #[error("RM_ERR_300: Duplicate commitment: {0}")]
    DuplicateCommitment(Hash256),

    /// No live record under this commitment (never created, consumed, or
    /// past its redeem window).
    #[error("RM_ERR_301: No live record for commitment {0}")]
    RecordNotLive(Hash256),

    /// The caller is not the original depositor.
    #[error("RM_ERR_302: Caller {caller} is not the depositor")]
    WrongCaller { caller: Identity },

    /// Reclaim attempted before the expiration height.
    #[error("RM_ERR_303: Not expired: current height {current}, expires at {expiration}")]
    NotExpired { current: Height, expiration: Height },

    // =================================================================
    // Balance Errors (4xx)
    // =================================================================
    /// Nothing pending for this identity.
    #[error("RM_ERR_400: Zero balance for {0}")]
    ZeroBalance(Identity),

    /// An amount or height computation overflowed.
    #[error("RM_ERR_401: Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    // =================================================================
    // Policy Errors (5xx)
    // =================================================================
    /// The new value equals the current one.
    #[error("RM_ERR_500: {field} is already set to this value")]
    NoOpChange { field: &'static str },

    /// The change would leave `min > max`.
    #[error("RM_ERR_501: Invalid duration bounds: min {min} > max {max}")]
    InvalidDurationBounds { min: u64, max: u64 },

    // =================================================================
    // General / Host (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("RM_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("RM_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("RM_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("RM_ERR_903: I/O error: {0}")]
    Io(String),

    /// The host's value transfer failed after a withdrawal.
    #[error("RM_ERR_904: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// Value held by the host no longer adds up to the minted supply.
    #[error("RM_ERR_905: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, RemittanceError>;

impl From<std::io::Error> for RemittanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RemittanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
