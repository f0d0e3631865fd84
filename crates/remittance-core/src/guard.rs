//! Access & run-state guard.
//!
//! One owner may change policy. A run switch (circuit breaker) gates new
//! deposits only: redeem, reclaim and withdraw keep working while the
//! engine is stopped, so funds already escrowed can always leave.

use remittance_types::{Identity, RemittanceError, Result};
use serde::{Deserialize, Serialize};

/// Single-owner authorization plus the deposit switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGuard {
    owner: Identity,
    running: bool,
}

impl AccessGuard {
    #[must_use]
    pub fn new(owner: Identity, running: bool) -> Self {
        Self { owner, running }
    }

    #[must_use]
    pub fn owner(&self) -> Identity {
        self.owner
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// # Errors
    /// Returns `Unauthorized` unless `caller` is the owner.
    pub fn require_owner(&self, caller: Identity) -> Result<()> {
        if caller != self.owner {
            tracing::warn!(caller = %caller, owner = %self.owner, "Owner-only call rejected");
            return Err(RemittanceError::Unauthorized { caller });
        }
        Ok(())
    }

    /// # Errors
    /// Returns `NotRunning` if deposits are switched off.
    pub fn require_running(&self) -> Result<()> {
        if self.running {
            Ok(())
        } else {
            Err(RemittanceError::NotRunning)
        }
    }

    /// Flip the deposit switch. Repeating the current value is allowed.
    ///
    /// # Errors
    /// Returns `Unauthorized` unless `caller` is the owner.
    pub fn set_running(&mut self, caller: Identity, running: bool) -> Result<()> {
        self.require_owner(caller)?;
        self.running = running;
        Ok(())
    }

    /// Hand ownership to `new_owner`, effective immediately. Returns the
    /// previous owner.
    ///
    /// # Errors
    /// Returns `Unauthorized` unless `caller` is the owner.
    pub fn transfer_ownership(&mut self, caller: Identity, new_owner: Identity) -> Result<Identity> {
        self.require_owner(caller)?;
        let old = self.owner;
        self.owner = new_owner;
        Ok(old)
    }
}
