//! Quick Pick Express - High-Frequency 5/35 Lottery on Solana
//!
//! Quick Pick Express is a companion mini-lottery program built on Solana featuring:
//! - 5/35 matrix (pick 5 numbers from 1-35)
//! - 4-hour draw intervals
//! - Provably fair randomness via Switchboard's commit-reveal pattern
//! - Positive-EV rolldown mechanics when jackpot reaches caps
//! - Dynamic house fee based on jackpot level
//! - $50 main lottery spend gate requirement, checked against the Main
//!   game's `UserStats` PDA at purchase time
//!
//! # Key Features
//! - **Ticket Price**: $1.50
//! - **Jackpot Soft Cap ($150k)**: Probabilistic rolldown begins
//! - **Jackpot Hard Cap ($200k)**: Forced rolldown to lower tiers
//! - **Pari-mutuel Rolldown**: 60% to Match 4, 40% to Match 3
//! - **Fixed Prizes (Normal Mode)**: Match 4 = $50, Match 3 = $3
//! - **Dynamic Fees**: 28-40% based on jackpot level
//!
//! # Architecture
//! The program uses Anchor framework with the following key accounts:
//! - `QpState`: Global Quick Pick configuration and state
//! - `DrawRecord`: Results of each draw including winning numbers and prizes
//! - `Ticket` / `BulkTicket`: Individual or batched tickets with selected numbers
//! - `UserStats`: Player statistics local to this game
//! - `MainUserStats`: read-only mirror of the Main game's `UserStats` layout,
//!   used only to check the spend gate

use anchor_lang::prelude::*;

// Module declarations
pub mod constants;
pub mod errors;
pub mod events;
pub mod helpers;
pub mod instructions;
pub mod state;

// Re-export everything needed by the program and clients
pub use constants::*;
pub use errors::*;
pub use events::*;
pub use state::*;

// Re-export all instruction account structs at crate root (required by Anchor)
pub use instructions::abort_draw::*;
pub use instructions::admin::*;
pub use instructions::buy_bulk::*;
pub use instructions::buy_ticket::*;
pub use instructions::claim_bulk_prize::*;
pub use instructions::claim_prize::*;
pub use instructions::commit_randomness::*;
pub use instructions::execute_draw::*;
pub use instructions::finalize_draw::*;
pub use instructions::initialize::*;

// Program ID - Update this after deployment
declare_id!("QPickExpressProgram111111111111111111111111");

/// Quick Pick Express Program
#[program]
pub mod quickpick {
    use super::*;

    // =========================================================================
    // ADMIN INSTRUCTIONS
    // =========================================================================

    /// Initialize the Quick Pick Express lottery
    ///
    /// Creates the QpState account with game parameters. The game starts
    /// unfunded and must be funded via `fund_seed` before it accepts
    /// purchases.
    ///
    /// # Arguments
    /// * `ctx` - Initialize accounts context
    /// * `params` - Initial configuration parameters
    pub fn initialize(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Funds the jackpot with the configured seed amount.
    ///
    /// Must be called once before any ticket sale or draw can proceed.
    ///
    /// # Arguments
    /// * `ctx` - FundSeed accounts context
    pub fn fund_seed(ctx: Context<FundSeed>) -> Result<()> {
        instructions::initialize::handler_fund_seed(ctx)
    }

    /// Pause Quick Pick Express (emergency stop)
    ///
    /// Stops ticket sales and draw execution. Only the authority can pause.
    ///
    /// # Arguments
    /// * `ctx` - Pause accounts context
    /// * `reason` - Reason for pausing (logged)
    pub fn pause(ctx: Context<Pause>, reason: String) -> Result<()> {
        instructions::admin::handler_pause(ctx, reason)
    }

    /// Unpause Quick Pick Express
    ///
    /// Resumes ticket sales and draw execution. Only the authority can
    /// unpause.
    ///
    /// # Arguments
    /// * `ctx` - Unpause accounts context
    pub fn unpause(ctx: Context<Unpause>) -> Result<()> {
        instructions::admin::handler_unpause(ctx)
    }

    /// Update Quick Pick configuration
    ///
    /// Updates ticket price, caps, seed amount, and draw interval. Every
    /// provided field is re-validated against the full invariant set.
    ///
    /// # Arguments
    /// * `ctx` - UpdateConfig accounts context
    /// * `params` - New configuration parameters
    pub fn update_config(ctx: Context<UpdateConfig>, params: UpdateConfigParams) -> Result<()> {
        instructions::admin::handler_update_config(ctx, params)
    }

    /// Withdraw accumulated house fees
    ///
    /// Transfers house fees to a treasury or operator account. Only the
    /// authority can withdraw.
    ///
    /// # Arguments
    /// * `ctx` - WithdrawHouseFees accounts context
    /// * `amount` - Amount to withdraw in USDC micro-units
    pub fn withdraw_house_fees(ctx: Context<WithdrawHouseFees>, amount: u64) -> Result<()> {
        instructions::admin::handler_withdraw_house_fees(ctx, amount)
    }

    /// Transfer authority to a new address
    ///
    /// # Arguments
    /// * `ctx` - TransferAuthority accounts context
    pub fn transfer_authority(ctx: Context<TransferAuthority>) -> Result<()> {
        instructions::admin::handler_transfer_authority(ctx)
    }

    /// Re-verifies that prize pool token balances cover outstanding jackpot
    /// and reserve liabilities. Read-side; fails the transaction (and emits
    /// the check result either way) if the invariant doesn't hold.
    ///
    /// # Arguments
    /// * `ctx` - CheckSolvency accounts context
    pub fn check_solvency(ctx: Context<CheckSolvency>) -> Result<()> {
        instructions::admin::handler_check_solvency(ctx)
    }

    // =========================================================================
    // TICKET PURCHASE INSTRUCTIONS
    // =========================================================================

    /// Buy a Quick Pick Express ticket
    ///
    /// Purchases a ticket with 5 selected numbers from 1-35. Requires $50
    /// lifetime spend in the Main game, checked against its `UserStats` PDA.
    /// USDC is transferred from player to prize pool and house fee accounts.
    ///
    /// # Arguments
    /// * `ctx` - BuyTicket accounts context
    /// * `params` - Selected numbers (5 unique numbers from 1-35)
    pub fn buy_ticket(ctx: Context<BuyTicket>, params: BuyTicketParams) -> Result<()> {
        instructions::buy_ticket::handler(ctx, params)
    }

    /// Buy a batch of up to `MAX_BULK_TICKETS` tickets in one transaction.
    ///
    /// Subject to the same $50 spend gate as `buy_ticket`. All tickets are
    /// validated before any mutation; a single bad pick rejects the entire
    /// batch.
    ///
    /// # Arguments
    /// * `ctx` - BuyBulk accounts context
    /// * `params` - Selected numbers for each ticket in the batch
    pub fn buy_tickets_bulk(ctx: Context<BuyBulk>, params: BuyBulkParams) -> Result<()> {
        instructions::buy_bulk::handler(ctx, params)
    }

    // =========================================================================
    // DRAW EXECUTION INSTRUCTIONS
    // =========================================================================

    /// Commit to randomness for the upcoming Quick Pick draw
    ///
    /// This is the COMMIT phase of the commit-reveal pattern. Stores the
    /// randomness account reference for the reveal phase. Only the authority
    /// can commit.
    ///
    /// # Arguments
    /// * `ctx` - CommitRandomness accounts context
    pub fn commit_randomness(ctx: Context<CommitRandomness>) -> Result<()> {
        instructions::commit_randomness::handler(ctx)
    }

    /// Execute the Quick Pick draw by revealing randomness
    ///
    /// This is the REVEAL phase of the commit-reveal pattern. Retrieves
    /// randomness from Switchboard and generates 5 winning numbers.
    /// `seed_slot` must be exactly one slot old at reveal time. Only the
    /// authority can execute.
    ///
    /// # Arguments
    /// * `ctx` - ExecuteDraw accounts context
    pub fn execute_draw(ctx: Context<ExecuteDraw>) -> Result<()> {
        instructions::execute_draw::handler(ctx)
    }

    /// Finalize the Quick Pick draw with winner counts
    ///
    /// Called after off-chain indexing determines winner counts. Calculates
    /// prizes (fixed or pari-mutuel rolldown), updates jackpot balance, and
    /// prepares for next draw. Only the authority can finalize.
    ///
    /// # Arguments
    /// * `ctx` - FinalizeDraw accounts context
    /// * `params` - Winner counts by tier, the indexer's nonce, and the verification hash
    pub fn finalize_draw(ctx: Context<FinalizeDraw>, params: FinalizeDrawParams) -> Result<()> {
        instructions::finalize_draw::handler(ctx, params)
    }

    /// Aborts a draw stuck in `Committed` or `Executed` (e.g. expired
    /// randomness), reverting to `Open` without consuming a draw id.
    ///
    /// # Arguments
    /// * `ctx` - AbortDraw accounts context
    pub fn abort_draw(ctx: Context<AbortDraw>) -> Result<()> {
        instructions::abort_draw::handler(ctx)
    }

    // =========================================================================
    // PRIZE CLAIM INSTRUCTIONS
    // =========================================================================

    /// Claim prize for a winning single-purchase ticket
    ///
    /// Recomputes match count against the finalized draw record and
    /// transfers the appropriate prize from the prize pool, reserve, or
    /// insurance pool depending on tier.
    ///
    /// # Prize Tiers (Normal Mode)
    /// - Match 5 (Jackpot): variable, split among winners
    /// - Match 4: $50
    /// - Match 3: $3
    ///
    /// # Prize Tiers (Rolldown Mode)
    /// - Match 4: 60% of jackpot (pari-mutuel)
    /// - Match 3: 40% of jackpot (pari-mutuel)
    ///
    /// # Arguments
    /// * `ctx` - ClaimPrize accounts context
    /// * `params` - The ticket's index (seed component)
    pub fn claim_prize(ctx: Context<ClaimPrize>, params: ClaimPrizeParams) -> Result<()> {
        instructions::claim_prize::handler(ctx, params)
    }

    /// Claim prize for one ticket inside a bulk-purchase batch.
    ///
    /// # Arguments
    /// * `ctx` - ClaimBulkPrize accounts context
    /// * `params` - Index of the ticket within the batch
    pub fn claim_bulk_prize(
        ctx: Context<ClaimBulkPrize>,
        params: ClaimBulkPrizeParams,
    ) -> Result<()> {
        instructions::claim_bulk_prize::handler(ctx, params)
    }
}
