//! SolanaLotto Protocol - Instructions Module
//!
//! This module aggregates all instruction handlers for the lottery protocol.

// Admin instructions
pub mod admin;

// Initialize lottery
pub mod initialize;

// Ticket purchase
pub mod buy_ticket;

// Bulk ticket purchase
pub mod buy_bulk;

// Bulk prize claiming
pub mod claim_bulk_prize;

// Match-2 credit redemption
pub mod redeem_free_ticket;

// Randomness commit (Switchboard integration)
pub mod commit_randomness;

// Draw execution (reveal and generate winning numbers)
pub mod execute_draw;

// Draw finalization (set winner counts and prizes)
pub mod finalize_draw;

// Stuck-draw cancellation
pub mod abort_draw;

// Prize claiming
pub mod claim_prize;

// Re-export account structs and params from admin
pub use admin::{
    CheckSolvency, Pause, TransferAuthority, Unpause, UpdateConfig, UpdateConfigParams,
    WithdrawHouseFees,
};

// Re-export account structs and params from initialize
pub use initialize::{FundSeed, Initialize, InitializeParams};

// Re-export account structs and params from ticket operations
pub use buy_bulk::{BuyBulk, BuyBulkParams};
pub use buy_ticket::{BuyTicket, BuyTicketParams};
pub use claim_bulk_prize::{ClaimBulkPrize, ClaimBulkPrizeParams};
pub use claim_prize::{ClaimPrize, ClaimPrizeParams};
pub use redeem_free_ticket::{RedeemFreeTicket, RedeemFreeTicketParams};

// Re-export account structs from randomness and draw operations
pub use abort_draw::AbortDraw;
pub use commit_randomness::CommitRandomness;
pub use execute_draw::ExecuteDraw;
pub use finalize_draw::{FinalizeDraw, FinalizeDrawParams};
