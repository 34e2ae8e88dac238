//! Quick Pick Express Instructions Module
//!
//! This module contains all instruction handlers for the Quick Pick Express mini-lottery.
//! Quick Pick Express is a high-frequency lottery running every 4 hours with a 5/35 matrix.
//!
//! Features:
//! - $50 main lottery spend gate requirement
//! - $1.50 ticket price
//! - Fixed prizes (Normal Mode): Match 4 = $50, Match 3 = $3
//! - Pari-mutuel prizes (Rolldown Mode): 60% to Match 4, 40% to Match 3
//! - Dynamic house fees: 28-40% based on jackpot level
//! - Soft cap: $150,000 (probabilistic rolldown)
//! - Hard cap: $200,000 (forced rolldown)

// Admin instructions
pub mod admin;

// Initialize Quick Pick Express
pub mod initialize;

// Buy Quick Pick ticket
pub mod buy_ticket;

// Bulk ticket purchase
pub mod buy_bulk;

// Bulk prize claiming
pub mod claim_bulk_prize;

// Commit randomness for Quick Pick draw
pub mod commit_randomness;

// Execute Quick Pick draw
pub mod execute_draw;

// Finalize Quick Pick draw with winner counts
pub mod finalize_draw;

// Stuck-draw cancellation
pub mod abort_draw;

// Claim Quick Pick prize
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

// Re-export account structs from randomness and draw operations
pub use abort_draw::AbortDraw;
pub use commit_randomness::CommitRandomness;
pub use execute_draw::ExecuteDraw;
pub use finalize_draw::{FinalizeDraw, FinalizeDrawParams};
