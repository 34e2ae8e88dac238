//! Account structures for the QuickPick game (5-of-35, every-4-hours draw).

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

/// Global configuration and running balances for the QuickPick game.
#[account]
#[derive(InitSpace, Default)]
pub struct QpState {
    /// Admin authority. Set once at `initialize`; not a live pointer into
    /// the Main program's own authority, so a Main authority transfer has no
    /// effect here and must be mirrored explicitly if desired.
    pub authority: Pubkey,

    /// Program ID of the Main game, used to constrain ownership of the
    /// `MainUserStats` account read by the spend gate in `buy_ticket`/
    /// `buy_tickets_bulk`. Set once at `initialize`.
    pub main_lottery_program: Pubkey,

    pub switchboard_queue: Pubkey,
    pub current_randomness_account: Pubkey,

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

    pub commit_slot: u64,
    pub commit_timestamp: i64,

    pub phase: Phase,

    pub winning_numbers: [u8; 5],
    pub randomness_seed: [u8; 32],
    pub executed_timestamp: i64,
    pub rolldown_active: bool,

    pub current_draw_tickets: u64,
    pub total_tickets_sold: u64,
    pub total_prizes_paid: u64,

    pub is_funded: bool,
    pub is_paused: bool,

    pub bump: u8,
}

impl QpState {
    pub fn is_ticket_sale_open(&self, now: i64) -> bool {
        self.phase == Phase::Open && now < self.next_draw_timestamp - TICKET_SALE_CUTOFF
    }

    pub fn refresh_house_fee(&mut self) {
        self.house_fee_bps = calculate_house_fee_bps(self.jackpot_balance);
    }
}

/// Outcome of a single draw, keyed by `draw_id`.
#[account]
#[derive(InitSpace, Default)]
pub struct DrawRecord {
    pub draw_id: u64,

    pub winning_numbers: [u8; 5],
    pub randomness_proof: [u8; 32],

    pub commit_slot: u64,
    pub executed_timestamp: i64,
    pub finalized_timestamp: i64,

    pub total_tickets: u64,

    pub pool_allocated_to_draw: u64,

    pub match_5_winners: u32,
    pub match_4_winners: u32,
    pub match_3_winners: u32,

    pub match_5_prize_per_winner: u64,
    pub match_4_prize_per_winner: u64,
    pub match_3_prize_per_winner: u64,

    pub was_rolldown: bool,

    /// Random per-draw value folded into the verification hash so identical
    /// winner-count tuples don't collide across draws.
    pub nonce: u64,
    /// SHA-256 binding of draw_id, winning_numbers, winner counts and nonce.
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
            MatchTier::Match5 => self.match_5_prize_per_winner,
            MatchTier::Match4 => self.match_4_prize_per_winner,
            MatchTier::Match3 => self.match_3_prize_per_winner,
            MatchTier::NoMatch => 0,
        }
    }
}

/// A single ticket purchased against a specific draw.
#[account]
#[derive(InitSpace, Default)]
pub struct Ticket {
    pub owner: Pubkey,
    pub draw_id: u64,
    pub numbers: [u8; 5],
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
    pub numbers: Vec<[u8; 5]>,
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
            + 4 + n * 5 // numbers Vec<[u8;5]>
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

/// Per-player running totals for the QuickPick game, keyed by `(wallet)`.
/// Separate PDA from the Main game's own `UserStats` — this program never
/// writes to Main's account, it only reads it for the spend gate.
#[account]
#[derive(InitSpace, Default)]
pub struct UserStats {
    pub wallet: Pubkey,
    pub total_tickets: u64,
    pub total_spent: u64,
    pub total_won: u64,
    pub bump: u8,
}

/// Mirrors the Main game's `UserStats` layout field-for-field so this
/// program can deserialize the Main PDA it's handed as a read-only account
/// and check the spend gate, without taking a crate dependency on the Main
/// program. This is a read-only reference: the real account is owned and
/// written by the Main program.
#[account]
#[derive(Default)]
pub struct MainUserStats {
    pub wallet: Pubkey,
    pub total_tickets: u64,
    pub total_spent: u64,
    pub total_won: u64,
    pub match_2_credits: u32,
    pub bump: u8,
}

impl MainUserStats {
    pub fn meets_spend_gate(&self) -> bool {
        self.total_spent >= MIN_MAIN_SPEND_FOR_QP
    }
}

/// How many of a ticket's numbers matched the draw, used to index into the
/// per-tier prize tables. QuickPick scores only {3,4,5}; match-5 is the
/// jackpot tier, there is no match-2 credit analogue.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchTier {
    NoMatch,
    Match3,
    Match4,
    Match5,
}

impl From<u8> for MatchTier {
    fn from(count: u8) -> Self {
        match count {
            5 => MatchTier::Match5,
            4 => MatchTier::Match4,
            3 => MatchTier::Match3,
            _ => MatchTier::NoMatch,
        }
    }
}

impl From<MatchTier> for u8 {
    fn from(tier: MatchTier) -> Self {
        match tier {
            MatchTier::Match5 => 5,
            MatchTier::Match4 => 4,
            MatchTier::Match3 => 3,
            MatchTier::NoMatch => 0,
        }
    }
}

/// Winner counts per tier, as submitted by the indexer and verified against
/// `DrawRecord::verification_hash` before being trusted.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default)]
pub struct WinnerCounts {
    pub match_5: u32,
    pub match_4: u32,
    pub match_3: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_tier_roundtrips() {
        for n in 0u8..=5 {
            let tier = MatchTier::from(n);
            let back: u8 = tier.into();
            if n < 3 {
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
    fn main_user_stats_spend_gate() {
        let mut stats = MainUserStats::default();
        assert!(!stats.meets_spend_gate());
        stats.total_spent = MIN_MAIN_SPEND_FOR_QP;
        assert!(stats.meets_spend_gate());
    }
}
