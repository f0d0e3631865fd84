//! Identifiers used throughout the Remittance engine.
//!
//! Identities and commitments are raw 32-byte values that serialize as
//! lowercase hex. Engine instances use UUIDv7. Heights are the host's
//! logical block counter; there is no wall-clock time anywhere in the engine.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{RemittanceError, constants};

fn decode_hex32(s: &str, what: &str) -> Result<[u8; 32], RemittanceError> {
    let mut out = [0u8; 32];
    hex::decode_to_slice(s.trim_start_matches("0x"), &mut out)
        .map_err(|e| RemittanceError::Serialization(format!("invalid {what} hex: {e}")))?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// An account identity as seen by the host (caller, depositor, exchanger, owner).
///
/// Usually the raw ed25519 public key of the account (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Identity(pub [u8; 32]);

impl Identity {
    /// The all-zero identity. Never a real account.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Identity of the holder of an ed25519 key.
    #[must_use]
    pub fn from_verifying_key(key: &ed25519_dalek::VerifyingKey) -> Self {
        Self(key.to_bytes())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{}", hex::encode(&self.0[..8]))
    }
}

impl FromStr for Identity {
    type Err = RemittanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex32(s, "identity").map(Self)
    }
}

impl From<Identity> for String {
    fn from(id: Identity) -> Self {
        hex::encode(id.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = RemittanceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Hash256 / Commitment
// ---------------------------------------------------------------------------

/// A 256-bit SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Hash256(pub [u8; 32]);

/// The public secret hash under which an escrow record is stored.
pub type Commitment = Hash256;

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Hash256 {
    type Err = RemittanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex32(s, "hash").map(Self)
    }
}

impl From<Hash256> for String {
    fn from(h: Hash256) -> Self {
        hex::encode(h.0)
    }
}

impl TryFrom<String> for Hash256 {
    type Error = RemittanceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// A one-time password. The all-zero value is reserved and never accepted.
///
/// `Debug` never prints the secret bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secret(pub [u8; 32]);

impl Secret {
    /// The zero sentinel (the host's default for an unset 256-bit field).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Derive a secret from a human passphrase.
    ///
    /// `SHA-256("remittance:secret:v1:" || passphrase)`
    #[must_use]
    pub fn from_passphrase(passphrase: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(constants::SECRET_DOMAIN);
        hasher.update(passphrase.as_bytes());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            write!(f, "Secret(ZERO)")
        } else {
            write!(f, "Secret(<redacted>)")
        }
    }
}

// ---------------------------------------------------------------------------
// EngineId
// ---------------------------------------------------------------------------

/// Identifies one engine instance. Mixed into every commitment so a
/// commitment registered with one instance is useless against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EngineId(pub Uuid);

impl EngineId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for EngineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Height
// ---------------------------------------------------------------------------

/// The host's logical clock (block number). Monotonically increasing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Height(pub u64);

impl Height {
    /// `self + blocks`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, blocks: u64) -> Option<Self> {
        self.0.checked_add(blocks).map(Self)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Random identities and secrets for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Identity {
    /// Identity of a freshly generated ed25519 keypair.
    pub fn random() -> Self {
        let key = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
        Self::from_verifying_key(&key.verifying_key())
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Secret {
    pub fn random() -> Self {
        loop {
            let bytes: [u8; 32] = rand::random();
            if bytes != [0u8; 32] {
                return Self(bytes);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
