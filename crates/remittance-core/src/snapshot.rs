//! Persisted engine state.
//!
//! Four independent tables: policy, records, owner fees, and beneficiary
//! balances. Table entries are sorted by key so equal states serialize to
//! equal bytes.

use remittance_types::{Amount, Commitment, EngineId, EscrowRecord, Identity, Result};
use serde::{Deserialize, Serialize};

use crate::PolicyState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub engine_id: EngineId,
    pub policy: PolicyState,
    pub records: Vec<(Commitment, EscrowRecord)>,
    pub owner_fees: Vec<(Identity, Amount)>,
    pub beneficiary_balances: Vec<(Identity, Amount)>,
}

impl EngineSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
