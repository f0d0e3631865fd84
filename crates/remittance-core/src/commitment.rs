//! Commitment hasher: derives the public key of an escrow.
//!
//! Depositor and exchanger must call [`CommitmentHasher::derive_public_key`]
//! with the same arguments in the same order against the same engine
//! instance. Any difference produces an unrelated hash, which the ledger
//! cannot tell apart from a wrong secret.

use remittance_types::{Commitment, EngineId, Hash256, Identity, RemittanceError, Result, Secret, constants};
use sha2::{Digest, Sha256};

/// Binds commitments to one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitmentHasher {
    engine_id: EngineId,
}

impl CommitmentHasher {
    #[must_use]
    pub fn new(engine_id: EngineId) -> Self {
        Self { engine_id }
    }

    #[must_use]
    pub fn engine_id(&self) -> EngineId {
        self.engine_id
    }

    /// Derive the commitment for `(sender, exchanger, secret1, secret2)`.
    ///
    /// `SHA-256(domain || sender || exchanger || secret1 || secret2 || engine_id)`
    ///
    /// # Errors
    /// Returns `InvalidSecret` if either secret is the zero sentinel.
    pub fn derive_public_key(
        &self,
        sender: Identity,
        exchanger: Identity,
        secret1: &Secret,
        secret2: &Secret,
    ) -> Result<Commitment> {
        if secret1.is_zero() || secret2.is_zero() {
            return Err(RemittanceError::InvalidSecret);
        }

        let mut hasher = Sha256::new();
        hasher.update(constants::COMMITMENT_DOMAIN);
        hasher.update(sender.as_bytes());
        hasher.update(exchanger.as_bytes());
        hasher.update(secret1.as_bytes());
        hasher.update(secret2.as_bytes());
        hasher.update(self.engine_id.as_bytes());

        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        Ok(Hash256(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        hasher: CommitmentHasher,
        sender: Identity,
        exchanger: Identity,
        s1: Secret,
        s2: Secret,
    }

    fn fixture() -> Fixture {
        Fixture {
            hasher: CommitmentHasher::new(EngineId::new()),
            sender: Identity::random(),
            exchanger: Identity::random(),
            s1: Secret::from_passphrase("One-Time-Password1"),
            s2: Secret::from_passphrase("One-Time-Password2"),
        }
    }

    #[test]
    fn deterministic() {
        let f = fixture();
        let a = f.hasher.derive_public_key(f.sender, f.exchanger, &f.s1, &f.s2).unwrap();
        let b = f.hasher.derive_public_key(f.sender, f.exchanger, &f.s1, &f.s2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_argument_matters() {
        let f = fixture();
        let base = f.hasher.derive_public_key(f.sender, f.exchanger, &f.s1, &f.s2).unwrap();
        let other = Identity::random();
        let variants = [
            f.hasher.derive_public_key(other, f.exchanger, &f.s1, &f.s2).unwrap(),
            f.hasher.derive_public_key(f.sender, other, &f.s1, &f.s2).unwrap(),
            f.hasher.derive_public_key(f.sender, f.exchanger, &Secret::random(), &f.s2).unwrap(),
            f.hasher.derive_public_key(f.sender, f.exchanger, &f.s1, &Secret::random()).unwrap(),
        ];
        for v in variants {
            assert_ne!(v, base);
        }
    }

    #[test]
    fn argument_order_matters() {
        let f = fixture();
        let ab = f.hasher.derive_public_key(f.sender, f.exchanger, &f.s1, &f.s2).unwrap();
        let ba = f.hasher.derive_public_key(f.exchanger, f.sender, &f.s1, &f.s2).unwrap();
        let swapped = f.hasher.derive_public_key(f.sender, f.exchanger, &f.s2, &f.s1).unwrap();
        assert_ne!(ab, ba);
        assert_ne!(ab, swapped);
    }

    #[test]
    fn engine_instance_binds_commitment() {
        let f = fixture();
        let other_engine = CommitmentHasher::new(EngineId::new());
        let here = f.hasher.derive_public_key(f.sender, f.exchanger, &f.s1, &f.s2).unwrap();
        let there = other_engine.derive_public_key(f.sender, f.exchanger, &f.s1, &f.s2).unwrap();
        assert_ne!(here, there);
    }

    #[test]
    fn zero_secret_rejected() {
        let f = fixture();
        let err = f
            .hasher
            .derive_public_key(f.sender, f.exchanger, &Secret::ZERO, &f.s2)
            .unwrap_err();
        assert_eq!(err, RemittanceError::InvalidSecret);
        let err = f
            .hasher
            .derive_public_key(f.sender, f.exchanger, &f.s1, &Secret::ZERO)
            .unwrap_err();
        assert_eq!(err, RemittanceError::InvalidSecret);
    }
}
