//! `lotto-indexer` operator daemon entry point.
//!
//! Exit codes:
//! - 0: clean shutdown (Ctrl-C or `set-webhook` success)
//! - 1: fatal configuration error (bad RPC url, missing authority keypair, invalid program id)
//! - 2: unrecoverable on-chain error (RPC/submission failure after the daemon gave up)
//! - 3: indexer verification-hash mismatch persisted past `--max-retries`

use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use solana_sdk::signature::{read_keypair_file, Keypair};
use tracing_subscriber::EnvFilter;

use indexer::chain::ChainClient;
use indexer::config::{Cli, Command};
use indexer::daemon::Daemon;
use indexer::error::IndexerError;
use indexer::notify::Notifier;
use indexer::state::Store;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "lotto-indexer exiting");
            match e {
                IndexerError::Config(_) => ExitCode::from(1),
                IndexerError::VerificationHashMismatch { .. } => ExitCode::from(3),
                _ => ExitCode::from(2),
            }
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, IndexerError> {
    match &cli.command {
        Command::SetWebhook { url, token } => {
            let notifier = Notifier::new(Some(url.clone()), Some(token.clone()));
            notifier.verify().await?;
            tracing::info!(url = %url, "webhook verified and ready; pass --webhook-url/--webhook-token (or LOTTO_WEBHOOK_URL/LOTTO_WEBHOOK_TOKEN) on future runs");
            Ok(ExitCode::SUCCESS)
        }
        Command::Run => run_daemon(cli, false).await,
        Command::DryRun => run_daemon(cli, true).await,
    }
}

async fn run_daemon(cli: Cli, dry_run: bool) -> Result<ExitCode, IndexerError> {
    let config = indexer::config::BotConfig::from_cli(&cli, dry_run)?;

    let authority = match &config.authority_keypair {
        Some(path) => read_keypair_file(path)
            .map_err(|e| IndexerError::Config(format!("failed to read authority keypair: {e}")))?,
        None => Keypair::new(),
    };

    let chain = ChainClient::new(&config, Rc::new(authority))?;
    let store = Store::open(&config.state_dir)?;
    let notifier = Notifier::new(config.webhook_url.clone(), config.webhook_token.clone());

    tracing::info!(
        rpc_url = %chain.rpc_url(),
        dry_run,
        poll_interval_secs = config.poll_interval.as_secs(),
        "lotto-indexer starting"
    );

    let daemon = Daemon::new(chain, store, notifier, config);
    daemon.run().await?;
    Ok(ExitCode::SUCCESS)
}
