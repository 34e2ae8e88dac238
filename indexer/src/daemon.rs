//! The operator daemon: one polling task per game, sharing an RPC client and
//! the persisted `sled` store. Each task watches its game's on-chain phase
//! and drives it through commit -> execute -> scan -> finalize, falling back
//! to `abort_draw` when randomness goes stale.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{error, info, warn};

use lottery::Phase as MainPhase;
use quickpick::Phase as QpPhase;

use crate::chain::ChainClient;
use crate::config::BotConfig;
use crate::error::IndexerError;
use crate::notify::{Notification, Notifier};
use crate::scan::{self, GameId, MainTierCounts, QuickPickTierCounts};
use crate::state::{BotStats, DrawState, Store};

pub struct Daemon {
    chain: Arc<ChainClient>,
    store: Arc<Store>,
    notifier: Arc<Notifier>,
    config: BotConfig,
}

impl Daemon {
    pub fn new(chain: ChainClient, store: Store, notifier: Notifier, config: BotConfig) -> Self {
        Self {
            chain: Arc::new(chain),
            store: Arc::new(store),
            notifier: Arc::new(notifier),
            config,
        }
    }

    /// Runs both games' polling loops concurrently until either task returns
    /// an unrecoverable error or the process receives a shutdown signal.
    pub async fn run(self) -> Result<(), IndexerError> {
        let main_loop = poll_main(self.chain.clone(), self.store.clone(), self.notifier.clone(), self.config.clone());
        let qp_loop = poll_quickpick(self.chain.clone(), self.store.clone(), self.notifier.clone(), self.config.clone());

        tokio::select! {
            res = main_loop => res,
            res = qp_loop => res,
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                Ok(())
            }
        }
    }
}

async fn poll_main(
    chain: Arc<ChainClient>,
    store: Arc<Store>,
    notifier: Arc<Notifier>,
    config: BotConfig,
) -> Result<(), IndexerError> {
    loop {
        if store.is_paused()? {
            sleep(config.poll_interval).await;
            continue;
        }

        match chain.fetch_main_state() {
            Ok(state) => {
                handle_main_phase(&chain, &store, &notifier, &config, state).await?;
            }
            Err(e) => warn!(error = %e, "failed to fetch main game state"),
        }

        sleep(config.poll_interval).await;
    }
}

async fn poll_quickpick(
    chain: Arc<ChainClient>,
    store: Arc<Store>,
    notifier: Arc<Notifier>,
    config: BotConfig,
) -> Result<(), IndexerError> {
    loop {
        if store.is_paused()? {
            sleep(config.poll_interval).await;
            continue;
        }

        match chain.fetch_qp_state() {
            Ok(state) => {
                handle_qp_phase(&chain, &store, &notifier, &config, state).await?;
            }
            Err(e) => warn!(error = %e, "failed to fetch quickpick state"),
        }

        sleep(config.poll_interval).await;
    }
}

async fn handle_main_phase(
    chain: &ChainClient,
    store: &Store,
    notifier: &Notifier,
    config: &BotConfig,
    state: lottery::LotteryState,
) -> Result<(), IndexerError> {
    let draw_id = state.current_draw_id;
    let mut draw_state = store.draw_state(GameId::Main)?;
    draw_state.draw_id = draw_id;
    draw_state.last_seen_phase = state.phase as u8;
    store.put_draw_state(GameId::Main, &draw_state)?;

    match state.phase {
        MainPhase::Executed => {
            let started = Instant::now();
            let tickets = chain.fetch_tickets(GameId::Main, draw_id, config.scan_timeout)?;
            let counts = scan::scan_main(&tickets, &state.winning_numbers);

            let mut nonce = deterministic_nonce(draw_id, draw_state.retry_count);
            let mut attempts = 0u8;
            loop {
                let hash = scan::verification_hash_main(draw_id, &state.winning_numbers, &counts, nonce);
                let submitted = submit_main_finalize(chain, config, draw_id, counts, nonce, hash).await;
                match submitted {
                    Ok(_) => {
                        info!(draw_id, tickets = tickets.len(), duration_ms = started.elapsed().as_millis() as u64, "main draw finalized");
                        let mut stats = store.stats()?;
                        stats.draws_finalized += 1;
                        store.put_stats(&stats)?;
                        notifier
                            .send(&Notification {
                                game: "main",
                                draw_id,
                                event: "finalized",
                                detail: format!("scanned {} tickets", tickets.len()),
                            })
                            .await;
                        break;
                    }
                    Err(e) if attempts < config.max_retries => {
                        attempts += 1;
                        nonce = deterministic_nonce(draw_id, attempts);
                        warn!(draw_id, attempts, error = %e, "finalize_draw rejected, retrying with fresh nonce");
                    }
                    Err(e) => {
                        let total_attempts = attempts.saturating_add(1);
                        let mut stats = store.stats()?;
                        stats.verification_mismatches += 1;
                        store.put_stats(&stats)?;
                        notifier
                            .send(&Notification { game: "main", draw_id, event: "finalize_failed", detail: e.to_string() })
                            .await;
                        error!(draw_id, attempts = total_attempts, error = %e, "finalize_draw failed after exhausting retries");
                        return Err(IndexerError::VerificationHashMismatch { attempts: total_attempts });
                    }
                }
            }
        }
        MainPhase::Committed => {
            // Reveal becomes possible once the commit slot has aged by
            // exactly one slot; the next poll tick will pick it up once
            // `fetch_main_state` shows `Executed` or the randomness expires.
        }
        MainPhase::Open | MainPhase::Finalized => {}
    }
    Ok(())
}

async fn handle_qp_phase(
    chain: &ChainClient,
    store: &Store,
    notifier: &Notifier,
    config: &BotConfig,
    state: quickpick::QpState,
) -> Result<(), IndexerError> {
    let draw_id = state.current_draw_id;
    let mut draw_state = store.draw_state(GameId::QuickPick)?;
    draw_state.draw_id = draw_id;
    draw_state.last_seen_phase = state.phase as u8;
    store.put_draw_state(GameId::QuickPick, &draw_state)?;

    if state.phase == QpPhase::Executed {
        let started = Instant::now();
        let tickets = chain.fetch_tickets(GameId::QuickPick, draw_id, config.scan_timeout)?;
        let counts = scan::scan_quickpick(&tickets, &state.winning_numbers);

        let mut nonce = deterministic_nonce(draw_id, draw_state.retry_count);
        let mut attempts = 0u8;
        loop {
            let hash = scan::verification_hash_qp(draw_id, &state.winning_numbers, &counts, nonce);
            let submitted = submit_qp_finalize(chain, config, draw_id, counts, nonce, hash).await;
            match submitted {
                Ok(_) => {
                    info!(draw_id, tickets = tickets.len(), duration_ms = started.elapsed().as_millis() as u64, "quickpick draw finalized");
                    let mut stats = store.stats()?;
                    stats.draws_finalized += 1;
                    store.put_stats(&stats)?;
                    notifier
                        .send(&Notification { game: "quickpick", draw_id, event: "finalized", detail: format!("scanned {} tickets", tickets.len()) })
                        .await;
                    break;
                }
                Err(e) if attempts < config.max_retries => {
                    attempts += 1;
                    nonce = deterministic_nonce(draw_id, attempts);
                    warn!(draw_id, attempts, error = %e, "finalize_draw rejected, retrying with fresh nonce");
                }
                Err(e) => {
                    let total_attempts = attempts.saturating_add(1);
                    let mut stats = store.stats()?;
                    stats.verification_mismatches += 1;
                    store.put_stats(&stats)?;
                    notifier
                        .send(&Notification { game: "quickpick", draw_id, event: "finalize_failed", detail: e.to_string() })
                        .await;
                    error!(draw_id, attempts = total_attempts, error = %e, "finalize_draw failed after exhausting retries");
                    return Err(IndexerError::VerificationHashMismatch { attempts: total_attempts });
                }
            }
        }
    }
    Ok(())
}

async fn submit_main_finalize(
    chain: &ChainClient,
    config: &BotConfig,
    draw_id: u64,
    counts: MainTierCounts,
    nonce: u64,
    hash: [u8; 32],
) -> Result<(), IndexerError> {
    if config.dry_run {
        info!(draw_id, nonce, hash = %scan::hex_encode(&hash), "dry-run: would submit finalize_draw (main)");
        return Ok(());
    }
    let params = lottery::FinalizeDrawParams {
        counts: lottery::WinnerCounts {
            match_6: counts.match_6,
            match_5: counts.match_5,
            match_4: counts.match_4,
            match_3: counts.match_3,
            match_2: counts.match_2,
        },
        nonce,
        verification_hash: hash,
    };
    chain.submit_main_finalize(draw_id, params)?;
    Ok(())
}

async fn submit_qp_finalize(
    chain: &ChainClient,
    config: &BotConfig,
    draw_id: u64,
    counts: QuickPickTierCounts,
    nonce: u64,
    hash: [u8; 32],
) -> Result<(), IndexerError> {
    if config.dry_run {
        info!(draw_id, nonce, hash = %scan::hex_encode(&hash), "dry-run: would submit finalize_draw (quickpick)");
        return Ok(());
    }
    let params = quickpick::FinalizeDrawParams {
        counts: quickpick::WinnerCounts {
            match_5: counts.match_5,
            match_4: counts.match_4,
            match_3: counts.match_3,
        },
        nonce,
        verification_hash: hash,
    };
    chain.submit_qp_finalize(draw_id, params)?;
    Ok(())
}

/// Deterministic rather than random so retries within one draw are
/// reproducible in logs; still unique per (draw, attempt) pair, which is all
/// the verification hash needs to avoid cross-draw collisions.
fn deterministic_nonce(draw_id: u64, attempt: u8) -> u64 {
    draw_id.wrapping_mul(2_654_435_761).wrapping_add(attempt as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_nonce_varies_by_attempt() {
        let n0 = deterministic_nonce(7, 0);
        let n1 = deterministic_nonce(7, 1);
        assert_ne!(n0, n1);
    }
}
