//! Account structures for the Main game (6-of-46, daily draw).

use anchor_lang::prelude::*;

use crate::constants::*;

// ============================================================================
// CORE STATE STRUCTURES
// ============================================================================

/// Phase a draw cycle is currently in. Advances strictly in order; there is
/// no path back to an earlier phase except `abort_draw`, which returns
/// `Committed` straight to `Open` without consuming a draw id.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Open,
    Committed,
    Executed,
    Finalized,
}

/// Global configuration and running balances for the Main game.
#[account]
#[derive(InitSpace, Default)]
pub struct LotteryState {
    /// Admin authority (multi-sig wallet recommended)
    pub authority: Pubkey,

    /// Switchboard queue for randomness requests
    pub switchboard_queue: Pubkey,

    /// Randomness account committed to for the in-flight draw
    pub current_randomness_account: Pubkey,

    /// Current draw identifier (increments only on a draw that completes)
    pub current_draw_id: u64,

    pub jackpot_balance: u64,
    pub reserve_balance: u64,
    pub insurance_balance: u64,

    pub ticket_price: u64,
    pub house_fee_bps: u16,

    pub seed_amount: u64,
    pub soft_cap: u64,
    pub hard_cap: u64,

    pub draw_interval: i64,
    pub next_draw_timestamp: i64,

    /// Slot the committed randomness was requested at; consumed at
    /// `commit_slot + 1`.
    pub commit_slot: u64,
    pub commit_timestamp: i64,

    pub phase: Phase,

    /// Set on `execute_draw`, cleared on cycling back to `Open`. Sorted
    /// ascending, `pick_count` distinct entries in `[1, number_range]`.
    pub winning_numbers: [u8; 6],
    /// The 32-byte seed revealed at `execute_draw`, kept around so
    /// `finalize_draw` can derive the rolldown Bernoulli draw from it.
    pub randomness_seed: [u8; 32],
    /// Timestamp of `execute_draw`, carried into the `DrawRecord` at
    /// `finalize_draw`.
    pub executed_timestamp: i64,
    /// Set at `finalize_draw` once the indexer's match_top_count and the
    /// cap thresholds are known; read by settlement in the same call.
    pub rolldown_active: bool,

    pub current_draw_tickets: u64,
    pub total_tickets_sold: u64,
    pub total_prizes_paid: u64,

    /// Set once by `fund_seed`; purchases and draws are gated on this so the
    /// pool accounts are never touched before they hold the seed amount.
    pub is_funded: bool,
    pub is_paused: bool,

    pub bump: u8,
}

impl LotteryState {
    pub fn is_ticket_sale_open(&self, now: i64) -> bool {
        self.phase == Phase::Open && now < self.next_draw_timestamp - TICKET_SALE_CUTOFF
    }

    pub fn refresh_house_fee(&mut self) {
        self.house_fee_bps = calculate_house_fee_bps(self.jackpot_balance);
    }
}

/// Outcome of a single draw, keyed by `draw_id`. Created write-once at
/// `finalize_draw` from the `LotteryState` fields accumulated through
/// `commit_draw`/`execute_draw`; immutable thereafter except `is_settled`
/// and the per-tier winner-count decrements applied during claims.
#[account]
#[derive(InitSpace, Default)]
pub struct DrawRecord {
    pub draw_id: u64,

    pub winning_numbers: [u8; 6],
    pub randomness_proof: [u8; 32],

    pub commit_slot: u64,
    pub executed_timestamp: i64,
    pub finalized_timestamp: i64,

    pub total_tickets: u64,

    /// The total amount this draw is authorized to pay out, fixed at
    /// settlement time. Claims never exceed this sum in aggregate.
    pub pool_allocated_to_draw: u64,

    pub match_6_winners: u32,
    pub match_5_winners: u32,
    pub match_4_winners: u32,
    pub match_3_winners: u32,
    pub match_2_winners: u32,

    pub match_6_prize_per_winner: u64,
    pub match_5_prize_per_winner: u64,
    pub match_4_prize_per_winner: u64,
    pub match_3_prize_per_winner: u64,

    pub was_rolldown: bool,

    /// Random per-draw value folded into the verification hash so identical
    /// winner-count tuples don't collide across draws.
    pub nonce: u64,
    /// SHA-256 binding of draw_id, winning_numbers, winner counts and nonce.
    /// The indexer must reproduce this exactly for `finalize_draw` to accept
    /// its submitted counts.
    pub verification_hash: [u8; 32],

    pub is_settled: bool,

    pub bump: u8,
}

impl DrawRecord {
    pub fn is_finalized(&self) -> bool {
        self.finalized_timestamp > 0
    }

    pub fn prize_for_matches(&self, tier: MatchTier) -> u64 {
        match tier {
            MatchTier::Match6 => self.match_6_prize_per_winner,
            MatchTier::Match5 => self.match_5_prize_per_winner,
            MatchTier::Match4 => self.match_4_prize_per_winner,
            MatchTier::Match3 => self.match_3_prize_per_winner,
            MatchTier::Match2 | MatchTier::NoMatch => 0,
        }
    }
}

/// A single ticket purchased against a specific draw.
#[account]
#[derive(InitSpace, Default)]
pub struct Ticket {
    pub owner: Pubkey,
    pub draw_id: u64,
    pub numbers: [u8; 6],
    pub purchase_timestamp: i64,
    pub is_claimed: bool,
    pub match_count: u8,
    pub prize_amount: u64,
    pub bump: u8,
}

/// A block of `ticket_count` tickets purchased in one `buy_bulk` call,
/// stored contiguously to avoid one account per ticket. Claimed status is
/// tracked with a bitmap rather than a bool per ticket.
#[account]
pub struct BulkTicket {
    pub owner: Pubkey,
    pub draw_id: u64,
    pub start_ticket_id: u64,
    pub ticket_count: u16,
    pub numbers: Vec<[u8; 6]>,
    pub purchase_timestamp: i64,
    pub claimed_bitmap: Vec<u8>,
    pub bump: u8,
}

impl BulkTicket {
    pub fn size_for_count(ticket_count: u16) -> usize {
        let n = ticket_count as usize;
        8 // discriminator
            + 32 // owner
            + 8 // draw_id
            + 8 // start_ticket_id
            + 2 // ticket_count
            + 4 + n * 6 // numbers Vec<[u8;6]>
            + 8 // purchase_timestamp
            + 4 + (n + 7) / 8 // claimed_bitmap Vec<u8>
            + 1 // bump
    }

    pub fn is_ticket_claimed(&self, index: usize) -> bool {
        let byte = index / 8;
        let bit = index % 8;
        self.claimed_bitmap
            .get(byte)
            .map(|b| b & (1 << bit) != 0)
            .unwrap_or(false)
    }

    pub fn mark_ticket_claimed(&mut self, index: usize) {
        let byte = index / 8;
        let bit = index % 8;
        if let Some(b) = self.claimed_bitmap.get_mut(byte) {
            *b |= 1 << bit;
        }
    }
}

impl Default for BulkTicket {
    fn default() -> Self {
        Self {
            owner: Pubkey::default(),
            draw_id: 0,
            start_ticket_id: 0,
            ticket_count: 0,
            numbers: Vec::new(),
            purchase_timestamp: 0,
            claimed_bitmap: Vec::new(),
            bump: 0,
        }
    }
}

/// Per-player running totals, keyed by `(wallet)`.
#[account]
#[derive(InitSpace, Default)]
pub struct UserStats {
    pub wallet: Pubkey,
    pub total_tickets: u64,
    pub total_spent: u64,
    pub total_won: u64,
    /// Match-2 credits earned but not yet redeemed via `redeem_free_ticket`.
    /// Never expires.
    pub match_2_credits: u32,
    pub bump: u8,
}

/// How many of a ticket's numbers matched the draw, used to index into the
/// per-tier prize tables.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchTier {
    NoMatch,
    Match2,
    Match3,
    Match4,
    Match5,
    Match6,
}

impl From<u8> for MatchTier {
    fn from(count: u8) -> Self {
        match count {
            6 => MatchTier::Match6,
            5 => MatchTier::Match5,
            4 => MatchTier::Match4,
            3 => MatchTier::Match3,
            2 => MatchTier::Match2,
            _ => MatchTier::NoMatch,
        }
    }
}

impl From<MatchTier> for u8 {
    fn from(tier: MatchTier) -> Self {
        match tier {
            MatchTier::Match6 => 6,
            MatchTier::Match5 => 5,
            MatchTier::Match4 => 4,
            MatchTier::Match3 => 3,
            MatchTier::Match2 => 2,
            MatchTier::NoMatch => 0,
        }
    }
}

/// Winner counts per tier, as submitted by the indexer and verified against
/// `DrawRecord::verification_hash` before being trusted.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default)]
pub struct WinnerCounts {
    pub match_6: u32,
    pub match_5: u32,
    pub match_4: u32,
    pub match_3: u32,
    pub match_2: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_tier_roundtrips() {
        for n in 0u8..=6 {
            let tier = MatchTier::from(n);
            let back: u8 = tier.into();
            if n < 2 {
                assert_eq!(back, 0);
            } else {
                assert_eq!(back, n);
            }
        }
    }

    #[test]
    fn bulk_ticket_bitmap_tracks_claims() {
        let mut bt = BulkTicket {
            ticket_count: 10,
            claimed_bitmap: vec![0u8; 2],
            ..Default::default()
        };
        assert!(!bt.is_ticket_claimed(3));
        bt.mark_ticket_claimed(3);
        assert!(bt.is_ticket_claimed(3));
        assert!(!bt.is_ticket_claimed(4));
        bt.mark_ticket_claimed(9);
        assert!(bt.is_ticket_claimed(9));
    }

    #[test]
    fn bulk_ticket_size_accounts_for_bitmap_rounding() {
        assert_eq!(BulkTicket::size_for_count(8) - BulkTicket::size_for_count(0), 8 * 6 + 1);
        assert!(BulkTicket::size_for_count(9) > BulkTicket::size_for_count(8));
    }
}
