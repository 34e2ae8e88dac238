//! CLI surface and runtime configuration. Mirrors how `lottery`/`quickpick`
//! centralize their tunables in `constants.rs`: every operator-adjustable
//! knob lives here, nothing is scattered across `daemon.rs`/`chain.rs`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use solana_sdk::pubkey::Pubkey;

use crate::error::IndexerError;

#[derive(Debug, Parser)]
#[command(name = "lotto-indexer", version, about = "Off-chain scanner and operator daemon for the dual-game lottery protocol")]
pub struct Cli {
    /// Solana RPC endpoint the daemon polls and submits transactions to.
    #[arg(long, env = "LOTTO_RPC_URL", default_value = "https://api.mainnet-beta.solana.com")]
    pub rpc_url: String,

    /// Path to the authority keypair used to sign `commit_randomness`,
    /// `execute_draw`, `finalize_draw` and `abort_draw`.
    #[arg(long, env = "LOTTO_AUTHORITY_KEYPAIR")]
    pub authority_keypair: Option<PathBuf>,

    /// Main game program id, base58.
    #[arg(long, env = "LOTTO_MAIN_PROGRAM_ID")]
    pub main_program_id: Option<String>,

    /// QuickPick program id, base58.
    #[arg(long, env = "LOTTO_QP_PROGRAM_ID")]
    pub qp_program_id: Option<String>,

    /// Directory backing the persisted `sled` state store.
    #[arg(long, env = "LOTTO_STATE_DIR", default_value = "./lotto-indexer-state")]
    pub state_dir: PathBuf,

    /// Seconds between phase-polling ticks, per game.
    #[arg(long, env = "LOTTO_POLL_INTERVAL_SECS", default_value_t = 10)]
    pub poll_interval_secs: u64,

    /// Indexer-side retries on a verification-hash mismatch before giving up
    /// and notifying the operator.
    #[arg(long, env = "LOTTO_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u8,

    /// Seconds allotted to a single draw's ticket scan (`getProgramAccounts`
    /// fetch plus tally) before it's abandoned as a `Timeout`.
    #[arg(long, env = "LOTTO_SCAN_TIMEOUT_SECS", default_value_t = 30)]
    pub scan_timeout_secs: u64,

    /// Webhook URL notified of draw outcomes and faults. Set with
    /// `set-webhook`, or directly via `LOTTO_WEBHOOK_URL`.
    #[arg(long, env = "LOTTO_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Bearer token sent with webhook notifications.
    #[arg(long, env = "LOTTO_WEBHOOK_TOKEN")]
    pub webhook_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Persist a webhook URL and bearer token for future `run`/`dry-run` invocations.
    SetWebhook { url: String, token: String },
    /// Run the daemon: poll both games, scan tickets, submit finalize_draw.
    Run,
    /// Run the daemon loop without submitting any transactions; logs what it would do.
    DryRun,
}

/// Fully validated runtime configuration, built once at startup from `Cli`.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub rpc_url: String,
    pub authority_keypair: Option<PathBuf>,
    pub main_program_id: Pubkey,
    pub qp_program_id: Pubkey,
    pub state_dir: PathBuf,
    pub poll_interval: Duration,
    pub max_retries: u8,
    pub scan_timeout: Duration,
    pub webhook_url: Option<String>,
    pub webhook_token: Option<String>,
    pub dry_run: bool,
}

impl BotConfig {
    /// Builds and validates config for `run`/`dry-run`. `set-webhook` doesn't
    /// need on-chain program ids or an authority keypair, so it's validated
    /// separately in `main.rs` before this is ever called.
    pub fn from_cli(cli: &Cli, dry_run: bool) -> Result<Self, IndexerError> {
        let main_program_id = match cli.main_program_id.as_deref() {
            Some(s) => s
                .parse::<Pubkey>()
                .map_err(|e| IndexerError::Config(format!("invalid --main-program-id: {e}")))?,
            None => lottery::ID,
        };

        let qp_program_id = match cli.qp_program_id.as_deref() {
            Some(s) => s
                .parse::<Pubkey>()
                .map_err(|e| IndexerError::Config(format!("invalid --qp-program-id: {e}")))?,
            None => quickpick::ID,
        };

        if !dry_run && cli.authority_keypair.is_none() {
            return Err(IndexerError::Config(
                "--authority-keypair (or LOTTO_AUTHORITY_KEYPAIR) is required outside dry-run mode"
                    .to_string(),
            ));
        }

        if cli.poll_interval_secs == 0 {
            return Err(IndexerError::Config("--poll-interval-secs must be > 0".to_string()));
        }
        if cli.max_retries == 0 {
            return Err(IndexerError::Config("--max-retries must be > 0".to_string()));
        }
        if cli.scan_timeout_secs == 0 {
            return Err(IndexerError::Config("--scan-timeout-secs must be > 0".to_string()));
        }

        Ok(Self {
            rpc_url: cli.rpc_url.clone(),
            authority_keypair: cli.authority_keypair.clone(),
            main_program_id,
            qp_program_id,
            state_dir: cli.state_dir.clone(),
            poll_interval: Duration::from_secs(cli.poll_interval_secs),
            max_retries: cli.max_retries,
            scan_timeout: Duration::from_secs(cli.scan_timeout_secs),
            webhook_url: cli.webhook_url.clone(),
            webhook_token: cli.webhook_token.clone(),
            dry_run,
        })
    }
}
