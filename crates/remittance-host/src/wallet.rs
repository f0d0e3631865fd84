//! Spendable balances held by the host, outside the engine.

use std::collections::HashMap;

use remittance_core::ValueTransfer;
use remittance_types::{Amount, Identity, RemittanceError, Result};
use sha2::{Digest, Sha256};

/// Per-identity wallet balances of the host's native asset.
#[derive(Debug, Default, Clone)]
pub struct Wallets {
    balances: HashMap<Identity, Amount>,
}

impl Wallets {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    #[must_use]
    pub fn balance(&self, identity: Identity) -> Amount {
        self.balances.get(&identity).copied().unwrap_or(0)
    }

    /// Whether crediting `amount` to `identity` would fit.
    #[must_use]
    pub fn can_receive(&self, identity: Identity, amount: Amount) -> bool {
        self.balance(identity).checked_add(amount).is_some()
    }

    /// Take `amount` out of a wallet, e.g. as value attached to a deposit.
    ///
    /// # Errors
    /// Returns `TransferFailed` if the wallet holds less than `amount`.
    pub fn debit(&mut self, identity: Identity, amount: Amount) -> Result<()> {
        let balance = self.balance(identity);
        let rest = balance
            .checked_sub(amount)
            .ok_or_else(|| RemittanceError::TransferFailed {
                reason: format!("{identity} holds {balance}, needs {amount}"),
            })?;
        self.balances.insert(identity, rest);
        Ok(())
    }

    /// Sum of all wallets.
    ///
    /// # Errors
    /// Returns `ArithmeticOverflow` if the sum does not fit in [`Amount`].
    pub fn total(&self) -> Result<Amount> {
        self.balances
            .values()
            .try_fold(0, |acc: Amount, b| acc.checked_add(*b))
            .ok_or(RemittanceError::ArithmeticOverflow {
                context: "wallet total",
            })
    }
}

impl ValueTransfer for Wallets {
    fn transfer(&mut self, to: Identity, amount: Amount) -> Result<()> {
        let balance = self.balance(to);
        let next = balance
            .checked_add(amount)
            .ok_or_else(|| RemittanceError::TransferFailed {
                reason: format!("{to} cannot hold {amount} more"),
            })?;
        self.balances.insert(to, next);
        Ok(())
    }
}

/// Deterministic account identity for a name: the ed25519 public key whose
/// secret seed is `SHA-256(name)`. For demos and fixtures only.
#[must_use]
pub fn named_identity(name: &str) -> Identity {
    let seed: [u8; 32] = Sha256::digest(name.as_bytes()).into();
    let key = ed25519_dalek::SigningKey::from_bytes(&seed);
    Identity::from_verifying_key(&key.verifying_key())
}
