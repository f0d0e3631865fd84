//! System-wide constants for the Remittance escrow engine.

/// Default minimum lock duration, in blocks.
pub const DEFAULT_MIN_DURATION: u64 = 1;

/// Default maximum lock duration, in blocks.
pub const DEFAULT_MAX_DURATION: u64 = 200;

/// Default owner fee in base units (500 gwei).
pub const DEFAULT_OWNER_FEE: u128 = 500_000_000_000;

/// Whether a freshly constructed engine accepts deposits.
pub const DEFAULT_RUNNING: bool = true;

/// Domain separator for commitment hashing.
pub const COMMITMENT_DOMAIN: &[u8] = b"remittance:commitment:v1:";

/// Domain separator for passphrase-derived secrets.
pub const SECRET_DOMAIN: &[u8] = b"remittance:secret:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Remittance";
