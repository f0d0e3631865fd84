//! Policy state: owner, run switch, fee, and duration bounds in one place.
//!
//! Consulted by the ledger on every deposit and mutated only through the
//! admin surface.

use remittance_types::{EngineConfig, Result};
use serde::{Deserialize, Serialize};

use crate::{AccessGuard, DurationPolicy, FeePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyState {
    pub guard: AccessGuard,
    pub durations: DurationPolicy,
    pub fees: FeePolicy,
}

impl PolicyState {
    /// # Errors
    /// Returns `InvalidDurationBounds` if the config's bounds are inverted.
    pub fn from_config(cfg: &EngineConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            guard: AccessGuard::new(cfg.owner, cfg.running),
            durations: DurationPolicy::new(cfg.min_duration, cfg.max_duration)?,
            fees: FeePolicy::new(cfg.fee),
        })
    }
}
