//! Notification events for host observability.
//!
//! Every successful operation returns an [`Outcome`]: its result value plus
//! the ordered events it emitted. The host may forward, persist, or drop
//! them; engine correctness never depends on them being observed.

use serde::{Deserialize, Serialize};

use crate::{Amount, Commitment, Height, Identity};

/// An event emitted by a state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemittanceEvent {
    /// A new escrow record was created.
    Deposited {
        commitment: Commitment,
        net_amount: Amount,
        expiration_height: Height,
    },
    /// The owner's fee balance was credited on a deposit.
    FeeCollected { owner: Identity, amount: Amount },
    /// The exchanger redeemed an escrow.
    Redeemed {
        commitment: Commitment,
        amount: Amount,
        to: Identity,
    },
    /// The sender reclaimed an expired escrow.
    Reclaimed {
        commitment: Commitment,
        amount: Amount,
        to: Identity,
    },
    /// A pending balance was drained for transfer by the host.
    Withdrawn { identity: Identity, amount: Amount },
    /// The owner fee changed.
    FeeChanged { owner: Identity, amount: Amount },
    /// The duration bounds changed.
    DurationChanged { owner: Identity, min: u64, max: u64 },
    /// Deposits were switched on or off.
    RunStateChanged { owner: Identity, running: bool },
    /// Ownership moved to a new identity.
    OwnerChanged {
        old_owner: Identity,
        new_owner: Identity,
    },
}

impl RemittanceEvent {
    /// Stable upper-case event name, e.g. `"DEPOSITED"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "DEPOSITED",
            Self::FeeCollected { .. } => "FEE_COLLECTED",
            Self::Redeemed { .. } => "REDEEMED",
            Self::Reclaimed { .. } => "RECLAIMED",
            Self::Withdrawn { .. } => "WITHDRAWN",
            Self::FeeChanged { .. } => "FEE_CHANGED",
            Self::DurationChanged { .. } => "DURATION_CHANGED",
            Self::RunStateChanged { .. } => "RUN_STATE_CHANGED",
            Self::OwnerChanged { .. } => "OWNER_CHANGED",
        }
    }
}

impl std::fmt::Display for RemittanceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

/// The result of a successful operation plus the events it emitted, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub events: Vec<RemittanceEvent>,
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_event(mut self, event: RemittanceEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Drop the events and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }
}
