//! Simulated chain hosting one Remittance engine.
//!
//! Plays the part a blockchain plays for the escrow contract: it keeps the
//! block height, authenticates the caller of every transaction, takes the
//! value attached to deposits out of the sender's wallet, and pays out
//! whatever a successful `withdraw` releases.
//!
//! Wallet pre-checks run before the engine is called, so a rejected
//! transaction changes nothing. Every applied transaction is followed by a
//! supply conservation audit. The audit cannot undo a transaction that has
//! already been applied, so a failed audit halts the chain: the failing
//! call and every later transaction return `SupplyInvariantViolation`.

use std::path::Path;

use remittance_core::{CallContext, DepositRequest, RemittanceEngine, ValueTransfer};
use remittance_types::{
    Amount, Commitment, EngineConfig, Height, Identity, Outcome, RemittanceError, RemittanceEvent,
    Result, Secret,
};
use serde::{Deserialize, Serialize};

use crate::{SupplyConservation, Wallets};

/// Genesis of a simulated chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Configuration of the hosted engine.
    pub engine: EngineConfig,
    /// Height of the first block.
    #[serde(default)]
    pub start_height: u64,
    /// Wallet balances minted at genesis, in order.
    #[serde(default)]
    pub wallets: Vec<(Identity, Amount)>,
}

impl HostConfig {
    /// Genesis at height 0 with no wallets.
    #[must_use]
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            engine,
            start_height: 0,
            wallets: Vec::new(),
        }
    }

    /// Start the chain at `height`.
    #[must_use]
    pub fn with_start_height(mut self, height: u64) -> Self {
        self.start_height = height;
        self
    }

    /// Mint `amount` to `identity` at genesis.
    #[must_use]
    pub fn with_wallet(mut self, identity: Identity, amount: Amount) -> Self {
        self.wallets.push((identity, amount));
        self
    }

    /// Parse and validate a JSON host configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| RemittanceError::Configuration(e.to_string()))?;
        cfg.engine.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON host configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Single-node chain that runs one [`RemittanceEngine`] and the wallets
/// around it.
///
/// Transactions run one at a time in the current block. Use [`mine`] to
/// advance the height.
///
/// [`mine`]: SimulatedChain::mine
pub struct SimulatedChain {
    engine: RemittanceEngine,
    wallets: Wallets,
    height: Height,
    supply: SupplyConservation,
    /// Every event emitted so far, with the height it was emitted at.
    log: Vec<(Height, RemittanceEvent)>,
    /// Set by the first failed supply audit.
    halted: Option<RemittanceError>,
}

impl SimulatedChain {
    /// Start a chain from its genesis configuration.
    pub fn new(cfg: &HostConfig) -> Result<Self> {
        let mut chain = Self {
            engine: RemittanceEngine::new(&cfg.engine)?,
            wallets: Wallets::new(),
            height: Height(cfg.start_height),
            supply: SupplyConservation::new(),
            log: Vec::new(),
            halted: None,
        };
        for (identity, amount) in &cfg.wallets {
            chain.mint(*identity, *amount)?;
        }
        tracing::info!(
            height = %chain.height,
            wallets = cfg.wallets.len(),
            supply = chain.supply.expected_supply(),
            "Simulated chain started"
        );
        Ok(chain)
    }

    // ----------------------------------------------------------------------
    // Blocks and wallets
    // ----------------------------------------------------------------------

    /// Height of the current block.
    #[must_use]
    pub fn height(&self) -> Height {
        self.height
    }

    /// Produce one block.
    pub fn mine(&mut self) -> Result<Height> {
        self.mine_blocks(1)
    }

    /// Produce `blocks` blocks.
    pub fn mine_blocks(&mut self, blocks: u64) -> Result<Height> {
        self.height = self
            .height
            .checked_add(blocks)
            .ok_or(RemittanceError::ArithmeticOverflow {
                context: "block height",
            })?;
        tracing::debug!(height = %self.height, "Mined");
        Ok(self.height)
    }

    /// Create new value in a wallet.
    pub fn mint(&mut self, to: Identity, amount: Amount) -> Result<()> {
        self.ensure_running()?;
        if !self.wallets.can_receive(to, amount) {
            return Err(RemittanceError::ArithmeticOverflow {
                context: "wallet balance",
            });
        }
        self.supply.record_mint(amount)?;
        self.wallets.transfer(to, amount)
    }

    /// Spendable balance of `identity`.
    #[must_use]
    pub fn wallet(&self, identity: Identity) -> Amount {
        self.wallets.balance(identity)
    }

    /// The hosted engine, for queries.
    #[must_use]
    pub fn engine(&self) -> &RemittanceEngine {
        &self.engine
    }

    /// Every event emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[(Height, RemittanceEvent)] {
        &self.log
    }

    /// Context for a transaction sent by `caller` in the current block.
    #[must_use]
    pub fn context(&self, caller: Identity) -> CallContext {
        CallContext::new(caller, self.height)
    }

    // ----------------------------------------------------------------------
    // Transactions
    // ----------------------------------------------------------------------

    /// Deposit with `req.amount` taken from the sender's wallet.
    pub fn create(&mut self, sender: Identity, req: &DepositRequest) -> Result<Outcome<Height>> {
        self.ensure_running()?;
        let balance = self.wallets.balance(sender);
        if balance < req.amount {
            return Err(RemittanceError::TransferFailed {
                reason: format!("{sender} holds {balance}, needs {}", req.amount),
            });
        }
        let ctx = self.context(sender);
        let out = self.engine.create(&ctx, req)?;
        self.wallets.debit(sender, req.amount)?;
        self.settle(out)
    }

    /// Redeem sent by `exchanger`. The payout stays pending until withdrawn.
    pub fn redeem(
        &mut self,
        exchanger: Identity,
        sender: Identity,
        secret1: &Secret,
        secret2: &Secret,
    ) -> Result<Outcome<Amount>> {
        self.ensure_running()?;
        let ctx = self.context(exchanger);
        let out = self.engine.redeem(&ctx, sender, secret1, secret2)?;
        self.settle(out)
    }

    /// Reclaim of an expired deposit, sent by its sender.
    pub fn reclaim_expired(
        &mut self,
        sender: Identity,
        commitment: Commitment,
    ) -> Result<Outcome<Amount>> {
        self.ensure_running()?;
        let ctx = self.context(sender);
        let out = self.engine.reclaim_expired(&ctx, commitment)?;
        self.settle(out)
    }

    /// Withdraw everything pending for `who` into their wallet.
    pub fn withdraw(&mut self, who: Identity) -> Result<Outcome<Amount>> {
        self.ensure_running()?;
        let pending = self.engine.pending(who).total().unwrap_or(Amount::MAX);
        if !self.wallets.can_receive(who, pending) {
            return Err(RemittanceError::TransferFailed {
                reason: format!("{who} cannot hold {pending} more"),
            });
        }
        let ctx = self.context(who);
        let out = self.engine.withdraw(&ctx)?;
        self.wallets.transfer(who, out.value)?;
        self.settle(out)
    }

    /// Send any other engine operation (typically an admin call) as `caller`.
    pub fn call<T>(
        &mut self,
        caller: Identity,
        op: impl FnOnce(&mut RemittanceEngine, &CallContext) -> Result<Outcome<T>>,
    ) -> Result<Outcome<T>> {
        self.ensure_running()?;
        let ctx = self.context(caller);
        let out = op(&mut self.engine, &ctx)?;
        self.settle(out)
    }

    /// Check that wallets, escrowed records and pending balances add up to
    /// the minted supply.
    pub fn audit(&self) -> Result<()> {
        let overflow = RemittanceError::ArithmeticOverflow {
            context: "audited supply",
        };
        let actual = self
            .wallets
            .total()?
            .checked_add(self.engine.ledger().total_escrowed())
            .and_then(|s| s.checked_add(self.engine.pool().total_pending()))
            .ok_or(overflow)?;
        self.supply.verify(actual)
    }

    /// The audit failure that halted the chain, if any.
    #[must_use]
    pub fn halted(&self) -> Option<&RemittanceError> {
        self.halted.as_ref()
    }

    fn ensure_running(&self) -> Result<()> {
        match &self.halted {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn settle<T>(&mut self, out: Outcome<T>) -> Result<Outcome<T>> {
        for ev in &out.events {
            tracing::debug!(height = %self.height, kind = ev.kind(), "Event");
            self.log.push((self.height, ev.clone()));
        }
        if let Err(err) = self.audit() {
            tracing::error!(height = %self.height, error = %err, "Chain halted");
            self.halted = Some(err.clone());
            return Err(err);
        }
        Ok(out)
    }
}
