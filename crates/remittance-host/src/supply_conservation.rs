//! Supply conservation invariant checker.
//!
//! Value is minted into wallets and afterwards only moves between wallets,
//! live escrow records and pending balances. After every transaction:
//! ```text
//! Σ(wallets) + Σ(escrowed net amounts) + Σ(pending fees and payouts) == Σ(minted)
//! ```

use remittance_types::{Amount, RemittanceError, Result};

/// Tracks the total minted supply of the host's single native asset.
#[derive(Debug, Default)]
pub struct SupplyConservation {
    minted: Amount,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self { minted: 0 }
    }

    /// Record newly minted value.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the supply would exceed [`Amount::MAX`].
    pub fn record_mint(&mut self, amount: Amount) -> Result<()> {
        self.minted = self
            .minted
            .checked_add(amount)
            .ok_or(RemittanceError::ArithmeticOverflow {
                context: "minted supply",
            })?;
        Ok(())
    }

    #[must_use]
    pub fn expected_supply(&self) -> Amount {
        self.minted
    }

    /// Verify that the value the host can account for matches what was minted.
    ///
    /// # Errors
    /// Returns [`RemittanceError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, actual_supply: Amount) -> Result<()> {
        if actual_supply != self.minted {
            tracing::error!(
                actual = actual_supply,
                expected = self.minted,
                "Supply invariant violated"
            );
            return Err(RemittanceError::SupplyInvariantViolation {
                reason: format!(
                    "actual supply {actual_supply} != minted {}",
                    self.minted
                ),
            });
        }
        Ok(())
    }
}
