//! Events emitted by the Main game program, for off-chain indexing and UI updates.

use anchor_lang::prelude::*;

// ============================================================================
// TICKET EVENTS
// ============================================================================

#[event]
pub struct TicketPurchased {
    pub ticket: Pubkey,
    pub player: Pubkey,
    pub draw_id: u64,
    pub numbers: [u8; 6],
    pub price: u64,
    pub timestamp: i64,
}

#[event]
pub struct BulkTicketsPurchased {
    pub bulk_ticket: Pubkey,
    pub player: Pubkey,
    pub draw_id: u64,
    pub ticket_count: u16,
    pub total_price: u64,
    pub timestamp: i64,
}

#[event]
pub struct FreeTicketRedeemed {
    pub ticket: Pubkey,
    pub player: Pubkey,
    pub draw_id: u64,
    pub numbers: [u8; 6],
    pub remaining_credits: u32,
    pub timestamp: i64,
}

// ============================================================================
// DRAW LIFECYCLE EVENTS
// ============================================================================

#[event]
pub struct DrawCommitted {
    pub draw_id: u64,
    pub commit_slot: u64,
    pub randomness_account: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct DrawExecuted {
    pub draw_id: u64,
    pub winning_numbers: [u8; 6],
    pub total_tickets: u64,
    pub timestamp: i64,
}

#[event]
pub struct DrawFinalized {
    pub draw_id: u64,
    pub match_6_winners: u32,
    pub match_5_winners: u32,
    pub match_4_winners: u32,
    pub match_3_winners: u32,
    pub match_2_winners: u32,
    pub was_rolldown: bool,
    pub total_distributed: u64,
    pub next_draw_timestamp: i64,
    pub timestamp: i64,
}

#[event]
pub struct DrawAborted {
    pub draw_id: u64,
    pub tickets_carried_forward: u64,
    pub timestamp: i64,
}

#[event]
pub struct JackpotWon {
    pub ticket: Pubkey,
    pub winner: Pubkey,
    pub draw_id: u64,
    pub winning_numbers: [u8; 6],
    pub jackpot_amount: u64,
    pub timestamp: i64,
}

// ============================================================================
// PRIZE EVENTS
// ============================================================================

#[event]
pub struct PrizeClaimed {
    pub ticket: Pubkey,
    pub player: Pubkey,
    pub draw_id: u64,
    pub match_count: u8,
    pub prize_amount: u64,
    pub timestamp: i64,
}

// ============================================================================
// ADMIN & FUND MANAGEMENT EVENTS
// ============================================================================

#[event]
pub struct LotteryInitialized {
    pub authority: Pubkey,
    pub ticket_price: u64,
    pub seed_amount: u64,
    pub soft_cap: u64,
    pub hard_cap: u64,
    pub timestamp: i64,
}

#[event]
pub struct SeedFunded {
    pub amount: u64,
    pub new_jackpot_balance: u64,
    pub timestamp: i64,
}

#[event]
pub struct ConfigUpdated {
    pub parameter: String,
    pub old_value: u64,
    pub new_value: u64,
    pub authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct EmergencyPause {
    pub authority: Pubkey,
    pub reason: String,
    pub timestamp: i64,
}

#[event]
pub struct EmergencyUnpause {
    pub authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct AuthorityTransferred {
    pub previous_authority: Pubkey,
    pub new_authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct HouseFeesWithdrawn {
    pub amount: u64,
    pub destination: Pubkey,
    pub authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct ReserveShortfallCovered {
    pub draw_id: u64,
    pub shortfall: u64,
    pub drawn_from_reserve: u64,
    pub drawn_from_insurance: u64,
    pub timestamp: i64,
}

#[event]
pub struct SolvencyCheckPerformed {
    pub prize_pool_balance: u64,
    pub jackpot_balance: u64,
    pub reserve_balance: u64,
    pub insurance_balance: u64,
    pub is_solvent: bool,
    pub timestamp: i64,
}
