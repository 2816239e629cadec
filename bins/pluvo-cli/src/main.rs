//! pluvo-cli — command-line driver for a Pluvo ledger.
//!
//! Each invocation loads the ledger snapshot from the data directory, runs a
//! single query or operation as `--caller` at time `--now`, prints the result
//! as JSON, and saves the snapshot back if the operation committed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use pluvo_core::events::LedgerEvent;
use pluvo_core::traits::LedgerView;
use pluvo_core::types::{Address, CallContext};
use pluvo_ledger::{GenesisConfig, Ledger};
use serde_json::json;
use tracing::info;

const SNAPSHOT_FILE: &str = "ledger.json";

/// Pluvo: a token that evaporates and comes back as rain.
#[derive(Parser, Debug)]
#[command(name = "pluvo-cli", version, about = "Evaporating token ledger with scheduled rainfall")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Directory holding the ledger snapshot (default: <data dir>/pluvo)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Address the operation is performed as
    #[arg(long, global = true)]
    caller: Option<Address>,

    /// Unix time of the operation (default: current time)
    #[arg(long, global = true)]
    now: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new ledger snapshot.
    Init {
        /// Genesis configuration JSON. PLUVO_* variables override it.
        #[arg(long)]
        genesis: Option<PathBuf>,
        /// Replace an existing snapshot.
        #[arg(long)]
        force: bool,
    },
    /// Show parameters, roles, supply and rainfall state.
    Status,
    /// Effective balance of an address at `--now`.
    Balance { address: Address },
    /// Remaining quota `spender` may move from `owner`.
    Allowance { owner: Address, spender: Address },
    /// Evaporation pending for an address at `--now`.
    Evaporation { address: Address },
    /// Payout recorded for a rainfall index, or the next tick's payout.
    Payout { index: Option<u64> },
    /// Committed event log.
    Events,
    /// Move tokens from the caller.
    Transfer { to: Address, amount: u64 },
    /// Set the caller's quota for a spender.
    Approve { spender: Address, amount: u64 },
    /// Move tokens on behalf of `from` using the caller's quota.
    TransferFrom { from: Address, to: Address, amount: u64 },
    /// Add a rainfall participant (registrar only).
    Register { address: Address },
    /// Remove a rainfall participant (registrar only).
    Unregister { address: Address },
    /// Resolve elapsed rainfall ticks.
    Rain,
    /// Collect owed rainfall as the caller.
    Collect {
        /// Collect at most this many rainfall indices.
        #[arg(long)]
        max: Option<u64>,
    },
    /// Realise pending evaporation of an address.
    Evaporate { address: Address },
    /// Change the evaporation rate (parameter setter only).
    SetRate { numerator: u64, denominator: u64 },
    /// Change the rainfall period in seconds (parameter setter only).
    SetPeriod { seconds: u64 },
    /// Change the decay precision (parameter setter only).
    SetPrecision { precision: u32 },
    /// Hand the registrar role to another address.
    ChangeRegistrar { address: Address },
    /// Hand the parameter setter role to another address.
    ChangeParameterSetter { address: Address },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.global.log_level, &cli.global.log_format);

    let data_dir = resolve_data_dir(cli.global.data_dir.clone())?;
    let snapshot = data_dir.join(SNAPSHOT_FILE);

    let command = match cli.command {
        Commands::Init { genesis, force } => {
            return init(&data_dir, &snapshot, genesis.as_deref(), force);
        }
        other => other,
    };

    let mut ledger = Ledger::load_snapshot(&snapshot)
        .with_context(|| format!("failed to load ledger from {}", snapshot.display()))?;
    let now = resolve_now(cli.global.now)?;
    let caller = cli.global.caller;
    let ctx = || -> Result<CallContext> {
        let caller = caller.context("this command needs --caller")?;
        Ok(CallContext::new(caller, now))
    };

    let committed_before = ledger.events().len();
    let output = match command {
        Commands::Init { .. } => bail!("ledger is already initialised"),
        Commands::Status => {
            print_json(&status(&ledger)?)?;
            return Ok(());
        }
        Commands::Balance { address } => {
            print_json(&json!({ "address": address, "now": now, "balance": ledger.balance_of(&address, now)? }))?;
            return Ok(());
        }
        Commands::Allowance { owner, spender } => {
            print_json(&json!({ "owner": owner, "spender": spender, "allowance": ledger.allowance(&owner, &spender) }))?;
            return Ok(());
        }
        Commands::Evaporation { address } => {
            let pending = ledger.calculate_evaporation(&address, now)?;
            print_json(&json!({ "address": address, "now": now, "evaporation": pending }))?;
            return Ok(());
        }
        Commands::Payout { index: Some(index) } => {
            print_json(&json!({ "index": index, "payout": ledger.rainfall_payout(index)? }))?;
            return Ok(());
        }
        Commands::Payout { index: None } => {
            print_json(&json!({ "next_payout": ledger.rain_per_rainfall_per_person()? }))?;
            return Ok(());
        }
        Commands::Events => {
            print_json(&json!(ledger.events()))?;
            return Ok(());
        }
        Commands::Transfer { to, amount } => {
            ledger.transfer(ctx()?, to, amount)?;
            json!({ "transferred": amount })
        }
        Commands::Approve { spender, amount } => {
            ledger.approve(ctx()?, spender, amount)?;
            json!({ "approved": amount })
        }
        Commands::TransferFrom { from, to, amount } => {
            ledger.transfer_from(ctx()?, from, to, amount)?;
            json!({ "transferred": amount })
        }
        Commands::Register { address } => json!({ "registered": ledger.register(ctx()?, address)? }),
        Commands::Unregister { address } => {
            json!({ "unregistered": ledger.unregister(ctx()?, address)? })
        }
        Commands::Rain => {
            // Anyone may trigger a catch-up; no caller required.
            let ctx = CallContext::new(caller.unwrap_or(Address::ZERO), now);
            json!({ "ticks": ledger.rain(ctx)? })
        }
        Commands::Collect { max: Some(max) } => {
            json!({ "collected": ledger.collect_rainfalls(ctx()?, max)? })
        }
        Commands::Collect { max: None } => json!({ "collected": ledger.collect_rainfall(ctx()?)? }),
        Commands::Evaporate { address } => {
            let ctx = CallContext::new(caller.unwrap_or(Address::ZERO), now);
            json!({ "evaporated": ledger.evaporate(ctx, address)? })
        }
        Commands::SetRate { numerator, denominator } => {
            ledger.set_evaporation_rate(ctx()?, numerator, denominator)?;
            json!({ "evaporation_rate": ledger.evaporation_rate().to_string() })
        }
        Commands::SetPeriod { seconds } => {
            ledger.set_rainfall_period(ctx()?, seconds)?;
            json!({ "seconds_between_rainfalls": seconds })
        }
        Commands::SetPrecision { precision } => {
            ledger.set_precision(ctx()?, precision)?;
            json!({ "precision": precision })
        }
        Commands::ChangeRegistrar { address } => {
            ledger.change_registrar(ctx()?, address)?;
            json!({ "registrar": address })
        }
        Commands::ChangeParameterSetter { address } => {
            ledger.change_parameter_setter(ctx()?, address)?;
            json!({ "parameter_setter": address })
        }
    };

    ledger
        .save_snapshot(&snapshot)
        .with_context(|| format!("failed to save ledger to {}", snapshot.display()))?;

    let emitted: &[LedgerEvent] = &ledger.events()[committed_before..];
    print_json(&json!({ "result": output, "events": emitted }))?;
    info!(state_root = %hex::encode(ledger.state_root()?), "ledger saved");
    Ok(())
}

fn init(data_dir: &Path, snapshot: &Path, genesis: Option<&Path>, force: bool) -> Result<()> {
    if snapshot.exists() && !force {
        bail!("ledger already exists: {} (use --force to replace)", snapshot.display());
    }

    let config = match genesis {
        Some(path) => GenesisConfig::from_file(path)?,
        None => GenesisConfig::default(),
    }
    .with_env()?;

    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create directory: {}", data_dir.display()))?;

    let ledger = Ledger::new(&config)?;
    ledger.save_snapshot(snapshot)?;
    info!(path = %snapshot.display(), "ledger initialised");
    print_json(&status(&ledger)?)
}

fn status(ledger: &Ledger) -> Result<serde_json::Value> {
    Ok(json!({
        "name": ledger.name(),
        "symbol": ledger.symbol(),
        "decimals": ledger.decimals(),
        "total_supply": ledger.total_supply(),
        "max_supply": ledger.max_supply(),
        "evaporation_rate": ledger.evaporation_rate().to_string(),
        "seconds_between_rainfalls": ledger.seconds_between_rainfalls(),
        "precision": ledger.precision(),
        "registrar": ledger.registrar(),
        "parameter_setter": ledger.parameter_setter(),
        "number_of_rainees": ledger.number_of_rainees(),
        "rainees": ledger.rainees().collect::<Vec<_>>(),
        "current_rainfall_index": ledger.current_rainfall_index(),
        "last_rain_time": ledger.last_rain_time(),
        "rain_per_rainfall_per_person": ledger.rain_per_rainfall_per_person()?,
        "state_root": hex::encode(ledger.state_root()?),
    }))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|dir| dir.join("pluvo"))
            .context("no data directory found; pass --data-dir"),
    }
}

fn resolve_now(explicit: Option<u64>) -> Result<u64> {
    match explicit {
        Some(now) => Ok(now),
        None => u64::try_from(chrono::Utc::now().timestamp())
            .context("system clock is before the Unix epoch"),
    }
}

fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
