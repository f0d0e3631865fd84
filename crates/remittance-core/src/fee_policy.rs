//! Owner fee charged on each deposit.

use remittance_types::{Amount, RemittanceError, Result};
use serde::{Deserialize, Serialize};

/// The flat fee taken from every deposit and credited to the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePolicy {
    fee: Amount,
}

impl FeePolicy {
    #[must_use]
    pub fn new(fee: Amount) -> Self {
        Self { fee }
    }

    #[must_use]
    pub fn fee(&self) -> Amount {
        self.fee
    }

    /// A deposit must leave something after the fee.
    ///
    /// # Errors
    /// Returns `InsufficientAmount` unless `deposit > fee`.
    pub fn validate(&self, deposit: Amount) -> Result<()> {
        if deposit <= self.fee {
            return Err(RemittanceError::InsufficientAmount {
                amount: deposit,
                fee: self.fee,
            });
        }
        Ok(())
    }

    /// # Errors
    /// Returns `NoOpChange` if `new_fee` equals the current fee.
    pub fn set_fee(&mut self, new_fee: Amount) -> Result<()> {
        if new_fee == self.fee {
            return Err(RemittanceError::NoOpChange { field: "fee" });
        }
        self.fee = new_fee;
        Ok(())
    }
}
