//! Admin surface: owner-gated policy changes.
//!
//! Each call checks the caller against the guard, delegates to the policy
//! setter, and reports the change as an event. It holds no state of its own.

use remittance_types::{Amount, Identity, RemittanceEvent, Result};

use crate::PolicyState;

/// Borrowed view over the policy that only the owner can drive.
pub struct AdminSurface<'a> {
    policy: &'a mut PolicyState,
}

impl<'a> AdminSurface<'a> {
    /// Wrap the engine's policy for one admin call.
    pub fn new(policy: &'a mut PolicyState) -> Self {
        Self { policy }
    }

    /// Change the fee charged on future deposits.
    ///
    /// # Errors
    /// `Unauthorized` for anyone but the owner, `NoOpChange` if `fee` is
    /// already in force.
    pub fn set_fee(&mut self, caller: Identity, fee: Amount) -> Result<RemittanceEvent> {
        self.policy.guard.require_owner(caller)?;
        self.policy.fees.set_fee(fee)?;
        Ok(RemittanceEvent::FeeChanged {
            owner: caller,
            amount: fee,
        })
    }

    /// Change the shortest accepted duration. Emits `DurationChanged`
    /// with the resulting range.
    pub fn set_min_duration(&mut self, caller: Identity, min: u64) -> Result<RemittanceEvent> {
        self.policy.guard.require_owner(caller)?;
        self.policy.durations.set_min(min)?;
        Ok(self.duration_changed(caller))
    }

    /// Change the longest accepted duration. Emits `DurationChanged`
    /// with the resulting range.
    pub fn set_max_duration(&mut self, caller: Identity, max: u64) -> Result<RemittanceEvent> {
        self.policy.guard.require_owner(caller)?;
        self.policy.durations.set_max(max)?;
        Ok(self.duration_changed(caller))
    }

    /// Replace both duration bounds at once.
    pub fn set_duration_interval(
        &mut self,
        caller: Identity,
        min: u64,
        max: u64,
    ) -> Result<RemittanceEvent> {
        self.policy.guard.require_owner(caller)?;
        self.policy.durations.set_interval(min, max)?;
        Ok(self.duration_changed(caller))
    }

    /// Stop or resume new deposits. Redeem, reclaim and withdraw are
    /// unaffected.
    pub fn set_running(&mut self, caller: Identity, running: bool) -> Result<RemittanceEvent> {
        self.policy.guard.set_running(caller, running)?;
        Ok(RemittanceEvent::RunStateChanged {
            owner: caller,
            running,
        })
    }

    /// Hand the owner role to `new_owner`. Fees already credited stay with
    /// the previous owner.
    pub fn transfer_ownership(
        &mut self,
        caller: Identity,
        new_owner: Identity,
    ) -> Result<RemittanceEvent> {
        let old_owner = self.policy.guard.transfer_ownership(caller, new_owner)?;
        Ok(RemittanceEvent::OwnerChanged {
            old_owner,
            new_owner,
        })
    }

    fn duration_changed(&self, owner: Identity) -> RemittanceEvent {
        RemittanceEvent::DurationChanged {
            owner,
            min: self.policy.durations.min(),
            max: self.policy.durations.max(),
        }
    }
}
