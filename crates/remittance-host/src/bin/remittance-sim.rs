//! Remittance simulator.
//!
//! Runs one escrow cycle on a simulated chain and prints every emitted event
//! as a JSON line on stdout:
//!
//! ```text
//! remittance-sim [--json] [HOST_CONFIG.json]
//! ```
//!
//! The first two configured wallets act as sender and exchanger. Without a
//! config file, demo accounts are funded. `RUST_LOG` sets the log filter
//! (default `info`); `--json` switches log output to JSON.

use remittance_core::DepositRequest;
use remittance_host::{HostConfig, SimulatedChain, named_identity};
use remittance_types::{Amount, EngineConfig, RemittanceError, Result, Secret, constants};
use tracing_subscriber::EnvFilter;

/// 10 units at 18 decimals.
const DEMO_FUNDING: Amount = 10_000_000_000_000_000_000;

fn main() -> Result<()> {
    let mut json_logs = false;
    let mut config_path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json_logs = true;
        } else {
            config_path = Some(arg);
        }
    }
    init_tracing(json_logs);
    tracing::info!(version = constants::VERSION, "{} simulator", constants::ENGINE_NAME);

    let cfg = match config_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading host config");
            HostConfig::from_file(&path)?
        }
        None => demo_config(),
    };
    run(&cfg)
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn demo_config() -> HostConfig {
    HostConfig::new(EngineConfig::new(named_identity("owner")))
        .with_start_height(1)
        .with_wallet(named_identity("alice"), DEMO_FUNDING)
        .with_wallet(named_identity("bob"), 0)
}

fn run(cfg: &HostConfig) -> Result<()> {
    let [(sender, _), (exchanger, _), ..] = cfg.wallets.as_slice() else {
        return Err(RemittanceError::Configuration(
            "at least two wallets are required".into(),
        ));
    };
    let (sender, exchanger) = (*sender, *exchanger);
    let owner = cfg.engine.owner;
    let mut chain = SimulatedChain::new(cfg)?;

    let secret1 = Secret::from_passphrase("One-Time-Password1");
    let secret2 = Secret::from_passphrase("One-Time-Password2");
    let commitment = chain
        .engine()
        .derive_public_key(sender, exchanger, &secret1, &secret2)?;
    let duration = cfg.engine.max_duration;
    let amount = chain.wallet(sender) / 2;

    chain.create(
        sender,
        &DepositRequest {
            exchanger,
            commitment,
            duration,
            amount,
        },
    )?;
    chain.mine_blocks(duration.saturating_sub(1))?;
    chain.redeem(exchanger, sender, &secret1, &secret2)?;
    chain.mine()?;
    chain.withdraw(exchanger)?;
    if !chain.engine().pending(owner).is_zero() {
        chain.withdraw(owner)?;
    }

    for (height, event) in chain.events() {
        let line = serde_json::json!({ "height": height.0, "event": event });
        println!("{line}");
    }
    tracing::info!(
        height = %chain.height(),
        sender = chain.wallet(sender),
        exchanger = chain.wallet(exchanger),
        owner = chain.wallet(owner),
        "Simulation finished"
    );
    Ok(())
}
