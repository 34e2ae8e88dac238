//! RPC and transaction-building layer. Wraps `anchor_client` for account
//! fetches and instruction building, and `solana_client` directly for the
//! raw `getProgramAccounts` ticket scan (anchor_client's account fetch APIs
//! don't expose memcmp filters on non-Anchor-typed calls).

use std::rc::Rc;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anchor_client::solana_client::rpc_config::RpcProgramAccountsConfig;
use anchor_client::solana_client::rpc_filter::{Memcmp, RpcFilterType};
use anchor_client::{Client, Cluster, Program};
use sha2::{Digest, Sha256};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};

use lottery::{DrawRecord as MainDrawRecord, LotteryState};
use quickpick::{DrawRecord as QpDrawRecord, QpState};

use crate::config::BotConfig;
use crate::error::IndexerError;
use crate::scan::{GameId, ScannedTicket};

fn anchor_account_discriminator(name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(format!("account:{name}").as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

pub struct ChainClient {
    main_program: Program<Rc<Keypair>>,
    qp_program: Program<Rc<Keypair>>,
    main_program_id: Pubkey,
    qp_program_id: Pubkey,
    rpc_url: String,
}

impl ChainClient {
    pub fn new(config: &BotConfig, authority: Rc<Keypair>) -> Result<Self, IndexerError> {
        let cluster = Cluster::from_str(&config.rpc_url)
            .unwrap_or_else(|_| Cluster::Custom(config.rpc_url.clone(), config.rpc_url.replace("https", "wss")));
        let client = Client::new_with_options(cluster, authority, CommitmentConfig::confirmed());
        let main_program = client
            .program(config.main_program_id)
            .map_err(IndexerError::SubmissionFailed)?;
        let qp_program = client
            .program(config.qp_program_id)
            .map_err(IndexerError::SubmissionFailed)?;
        Ok(Self {
            main_program,
            qp_program,
            main_program_id: config.main_program_id,
            qp_program_id: config.qp_program_id,
            rpc_url: config.rpc_url.clone(),
        })
    }

    pub fn lottery_state_pda(&self) -> Pubkey {
        Pubkey::find_program_address(&[lottery::LOTTERY_SEED], &self.main_program_id).0
    }

    pub fn qp_state_pda(&self) -> Pubkey {
        Pubkey::find_program_address(&[quickpick::QP_STATE_SEED], &self.qp_program_id).0
    }

    pub fn main_draw_record_pda(&self, draw_id: u64) -> Pubkey {
        Pubkey::find_program_address(
            &[lottery::DRAW_SEED, &draw_id.to_le_bytes()],
            &self.main_program_id,
        )
        .0
    }

    pub fn qp_draw_record_pda(&self, draw_id: u64) -> Pubkey {
        Pubkey::find_program_address(
            &[quickpick::QP_DRAW_SEED, &draw_id.to_le_bytes()],
            &self.qp_program_id,
        )
        .0
    }

    pub fn fetch_main_state(&self) -> Result<LotteryState, IndexerError> {
        self.main_program
            .account(self.lottery_state_pda())
            .map_err(IndexerError::SubmissionFailed)
    }

    pub fn fetch_qp_state(&self) -> Result<QpState, IndexerError> {
        self.qp_program
            .account(self.qp_state_pda())
            .map_err(IndexerError::SubmissionFailed)
    }

    pub fn fetch_main_draw_record(&self, draw_id: u64) -> Result<MainDrawRecord, IndexerError> {
        self.main_program
            .account(self.main_draw_record_pda(draw_id))
            .map_err(IndexerError::SubmissionFailed)
    }

    pub fn fetch_qp_draw_record(&self, draw_id: u64) -> Result<QpDrawRecord, IndexerError> {
        self.qp_program
            .account(self.qp_draw_record_pda(draw_id))
            .map_err(IndexerError::SubmissionFailed)
    }

    /// Fetches every `Ticket` and `BulkTicket` account sold against
    /// `draw_id` for one game via `getProgramAccounts`, filtered by account
    /// discriminator and the `draw_id` field (offset 40: 8-byte
    /// discriminator + 32-byte owner pubkey, identical layout in both
    /// account types).
    ///
    /// `timeout` bounds the whole scan: elapsed time is checked between each
    /// RPC round-trip and before decoding each account, so a scan that's
    /// already blown its budget fails fast with `IndexerError::Timeout`
    /// instead of continuing to decode accounts nobody will wait for.
    pub fn fetch_tickets(
        &self,
        game: GameId,
        draw_id: u64,
        timeout: Duration,
    ) -> Result<Vec<ScannedTicket>, IndexerError> {
        let (program, program_id, numbers_len, number_range): (&Program<Rc<Keypair>>, Pubkey, usize, u8) =
            match game {
                GameId::Main => (&self.main_program, self.main_program_id, 6, lottery::MAX_NUMBER),
                GameId::QuickPick => (&self.qp_program, self.qp_program_id, 5, quickpick::MAX_NUMBER),
            };

        let started = Instant::now();
        let timed_out = |elapsed: Duration| -> IndexerError {
            IndexerError::Timeout { draw_id, timeout_secs: elapsed.as_secs().max(timeout.as_secs()) }
        };

        let mut tickets = Vec::new();
        for account_name in ["Ticket", "BulkTicket"] {
            if started.elapsed() > timeout {
                return Err(timed_out(started.elapsed()));
            }

            let discriminator = anchor_account_discriminator(account_name);
            let draw_id_filter = Memcmp::new_raw_bytes(40, draw_id.to_le_bytes().to_vec());
            let disc_filter = Memcmp::new_raw_bytes(0, discriminator.to_vec());

            let config = RpcProgramAccountsConfig {
                filters: Some(vec![
                    RpcFilterType::Memcmp(disc_filter),
                    RpcFilterType::Memcmp(draw_id_filter),
                ]),
                account_config: Default::default(),
                with_context: Some(false),
                sort_results: Some(false),
            };

            let accounts = program
                .rpc()
                .get_program_accounts_with_config(&program_id, config)
                .map_err(|source| IndexerError::TicketFetchFailed { draw_id, source })?;

            for (pubkey, account) in accounts {
                if started.elapsed() > timeout {
                    return Err(timed_out(started.elapsed()));
                }
                if account_name == "Ticket" {
                    let numbers = decode_fixed_numbers(&account.data, numbers_len)
                        .ok_or(IndexerError::MalformedTicket(pubkey))?;
                    validate_number_range(&numbers, number_range)?;
                    tickets.push(ScannedTicket { numbers });
                } else {
                    let batch = decode_bulk_numbers(&account.data, numbers_len)
                        .ok_or(IndexerError::MalformedTicket(pubkey))?;
                    for numbers in &batch {
                        validate_number_range(numbers, number_range)?;
                    }
                    tickets.extend(batch.into_iter().map(|numbers| ScannedTicket { numbers }));
                }
            }
        }

        Ok(tickets)
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn submit_main_finalize(
        &self,
        draw_id: u64,
        params: lottery::FinalizeDrawParams,
    ) -> TxResult {
        let authority = self.main_program.payer();
        self.main_program
            .request()
            .accounts(lottery::accounts::FinalizeDraw {
                authority,
                lottery_state: self.lottery_state_pda(),
                draw_record: self.main_draw_record_pda(draw_id),
                system_program: anchor_client::solana_sdk::system_program::ID,
            })
            .args(lottery::instruction::FinalizeDraw { params })
            .send()
            .map_err(IndexerError::SubmissionFailed)
    }

    pub fn submit_qp_finalize(
        &self,
        draw_id: u64,
        params: quickpick::FinalizeDrawParams,
    ) -> TxResult {
        let authority = self.qp_program.payer();
        self.qp_program
            .request()
            .accounts(quickpick::accounts::FinalizeDraw {
                authority,
                qp_state: self.qp_state_pda(),
                draw_record: self.qp_draw_record_pda(draw_id),
                system_program: anchor_client::solana_sdk::system_program::ID,
            })
            .args(quickpick::instruction::FinalizeDraw { params })
            .send()
            .map_err(IndexerError::SubmissionFailed)
    }

    pub fn submit_main_abort(&self) -> TxResult {
        let authority = self.main_program.payer();
        self.main_program
            .request()
            .accounts(lottery::accounts::AbortDraw { authority, lottery_state: self.lottery_state_pda() })
            .args(lottery::instruction::AbortDraw {})
            .send()
            .map_err(IndexerError::SubmissionFailed)
    }

    pub fn submit_qp_abort(&self) -> TxResult {
        let authority = self.qp_program.payer();
        self.qp_program
            .request()
            .accounts(quickpick::accounts::AbortDraw { authority, qp_state: self.qp_state_pda() })
            .args(quickpick::instruction::AbortDraw {})
            .send()
            .map_err(IndexerError::SubmissionFailed)
    }
}

/// Single `Ticket.numbers: [u8; N]` sits right after discriminator(8) +
/// owner(32) + draw_id(8) = offset 48.
fn decode_fixed_numbers(data: &[u8], n: usize) -> Option<Vec<u8>> {
    let start = 48;
    data.get(start..start + n).map(|s| s.to_vec())
}

/// `BulkTicket.numbers: Vec<[u8; N]>` sits after discriminator(8) +
/// owner(32) + draw_id(8) + start_ticket_id(8) + ticket_count(2) = offset
/// 58, itself prefixed by a 4-byte borsh vec length.
fn decode_bulk_numbers(data: &[u8], n: usize) -> Option<Vec<Vec<u8>>> {
    let len_offset = 58;
    let len_bytes = data.get(len_offset..len_offset + 4)?;
    let count = u32::from_le_bytes(len_bytes.try_into().ok()?) as usize;
    let start = len_offset + 4;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let s = start + i * n;
        out.push(data.get(s..s + n)?.to_vec());
    }
    Some(out)
}

/// Every number stored on-chain was range-checked at purchase time, so this
/// only ever fires against account data that's been corrupted or decoded at
/// the wrong offset, not against ordinary gameplay.
fn validate_number_range(numbers: &[u8], max: u8) -> Result<(), IndexerError> {
    if numbers.iter().any(|&n| n == 0 || n > max) {
        return Err(IndexerError::RangeViolation);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_number_range_accepts_in_bounds_picks() {
        assert!(validate_number_range(&[1, 23, 46], 46).is_ok());
    }

    #[test]
    fn validate_number_range_rejects_zero_and_overflow() {
        assert!(validate_number_range(&[0, 10, 20], 46).is_err());
        assert!(validate_number_range(&[1, 10, 47], 46).is_err());
    }
}

pub type TxResult = Result<Signature, IndexerError>;
