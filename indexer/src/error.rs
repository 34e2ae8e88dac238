//! Off-chain error taxonomy. On-chain failures use Anchor's `#[error_code]`
//! (`LottoError`/`QuickPickError`); this crate never runs on-chain, so it
//! uses `thiserror` for its own errors and lets `main.rs` flatten everything
//! into `anyhow` at the process boundary, matching how `lottery`'s and
//! `quickpick`'s Anchor errors stay local to their own crates.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("failed to fetch ticket accounts for draw {draw_id}: {source}")]
    TicketFetchFailed {
        draw_id: u64,
        #[source]
        source: solana_client::client_error::ClientError,
    },

    #[error("account {0} did not deserialize as a Ticket or BulkTicket")]
    MalformedTicket(Pubkey),

    #[error("ticket numbers outside the configured range for this game")]
    RangeViolation,

    #[error("scan of draw {draw_id} exceeded the {timeout_secs}s budget")]
    Timeout { draw_id: u64, timeout_secs: u64 },

    #[error("recomputed verification hash did not match after {attempts} attempts")]
    VerificationHashMismatch { attempts: u8 },

    #[error("on-chain submission failed: {0}")]
    SubmissionFailed(#[source] anchor_client::ClientError),

    #[error("rpc error: {0}")]
    Rpc(#[source] solana_client::client_error::ClientError),

    #[error("persisted state store error: {0}")]
    Store(#[source] sled::Error),

    #[error("failed to (de)serialize persisted state: {0}")]
    Codec(#[source] Box<bincode::ErrorKind>),

    #[error("webhook notification failed: {0}")]
    Notify(#[source] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<Box<bincode::ErrorKind>> for IndexerError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        IndexerError::Codec(e)
    }
}

impl From<sled::Error> for IndexerError {
    fn from(e: sled::Error) -> Self {
        IndexerError::Store(e)
    }
}

impl From<reqwest::Error> for IndexerError {
    fn from(e: reqwest::Error) -> Self {
        IndexerError::Notify(e)
    }
}
