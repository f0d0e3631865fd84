//! Capabilities the host supplies to the engine.
//!
//! The engine never reads a caller or a clock from process-global state.
//! Each call receives a [`HostContext`]; moving value happens outside the
//! engine through [`ValueTransfer`], after a withdrawal has already zeroed
//! the pending balance.

use remittance_types::{Amount, Height, Identity, Result};

/// Per-call view of the host: who is calling, and at what height.
pub trait HostContext {
    /// The authenticated caller of the current operation.
    fn caller(&self) -> Identity;

    /// The host's current block height.
    fn current_height(&self) -> Height;
}

/// Moves value out of the host's custody. Invoked only by the host, and
/// only with an amount returned by a successful withdrawal.
pub trait ValueTransfer {
    /// # Errors
    /// Returns `TransferFailed` if the host could not move the value.
    fn transfer(&mut self, to: Identity, amount: Amount) -> Result<()>;
}

/// Plain [`HostContext`] value: a caller at a height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Identity,
    pub height: Height,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: Identity, height: Height) -> Self {
        Self { caller, height }
    }
}

impl HostContext for CallContext {
    fn caller(&self) -> Identity {
        self.caller
    }

    fn current_height(&self) -> Height {
        self.height
    }
}
