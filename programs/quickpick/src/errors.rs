//! Error definitions for the QuickPick game program.
//!
//! Categories mirror the Main game's error set, minus the tiers and
//! mechanics QuickPick doesn't have (no Match-2 credit, no syndicates).

use anchor_lang::prelude::*;

#[error_code]
pub enum QuickPickError {
    // ========================================================================
    // Authorization & Permissions
    // ========================================================================
    #[msg("Unauthorized access attempt.")]
    Unauthorized,

    #[msg("QuickPick is currently paused.")]
    Paused,

    // ========================================================================
    // Draw Lifecycle & Phase
    // ========================================================================
    #[msg("Draw is not in the required phase for this operation.")]
    WrongPhase,

    #[msg("Draw has not reached its scheduled time yet.")]
    DrawNotReady,

    #[msg("QuickPick configuration is invalid or inconsistent.")]
    InvalidConfig,

    // ========================================================================
    // Ticket Purchase & Validation
    // ========================================================================
    #[msg("Ticket numbers fail basic validation.")]
    InvalidNumbers,

    #[msg("Duplicate numbers detected.")]
    DuplicateNumbers,

    #[msg("Numbers are outside the valid range.")]
    NumbersOutOfRange,

    #[msg("Bulk purchase count must be between 1 and the configured maximum.")]
    BulkPurchaseLimitExceeded,

    #[msg("Ticket sale has ended for this draw.")]
    TicketSaleClosed,

    #[msg("Ticket has already been claimed.")]
    AlreadyClaimed,

    #[msg("Ticket does not belong to this draw.")]
    TicketDrawMismatch,

    #[msg("Ticket does not belong to the caller.")]
    NotTicketOwner,

    #[msg("Player's USDC account does not hold enough to cover this purchase.")]
    InsufficientFunds,

    /// QuickPick purchases require the wallet's lifetime Main-game spend to
    /// meet `MIN_MAIN_SPEND_FOR_QP`, verified against the Main program's
    /// `UserStats` account passed in as a read-only reference.
    #[msg("Wallet has not met the minimum Main-game spend required to buy QuickPick tickets.")]
    SpendGateNotMet,

    #[msg("Main-game UserStats account does not belong to the signing wallet.")]
    MainUserStatsOwnerMismatch,

    // ========================================================================
    // Draw Execution & Randomness
    // ========================================================================
    #[msg("Randomness account does not match the one committed to this draw.")]
    RandomnessAccountMismatch,

    #[msg("Randomness result is not yet available from the oracle.")]
    RandomnessNotResolved,

    #[msg("Randomness is not fresh (seed slot must be exactly one slot old).")]
    RandomnessNotFresh,

    #[msg("Switchboard queue is not configured.")]
    SwitchboardQueueNotSet,

    #[msg("Failed to parse the Switchboard randomness account.")]
    RandomnessParseError,

    #[msg("Randomness has expired before it could be consumed.")]
    RandomnessExpired,

    #[msg("Randomness has already been revealed; cannot commit to it again.")]
    RandomnessAlreadyRevealed,

    // ========================================================================
    // Prize Distribution & Claims
    // ========================================================================
    #[msg("No prize to claim for this ticket.")]
    NoPrizeToClaim,

    #[msg("Winner counts failed verification hash check.")]
    VerificationHashMismatch,

    #[msg("Submitted winner counts fail the plausibility bound check.")]
    PlausibilityCheckFailed,

    #[msg("Prize pool insufficient for distribution.")]
    InsufficientPrizePool,

    #[msg("Ticket index is out of range for this bulk ticket block.")]
    TicketIndexOutOfRange,

    // ========================================================================
    // Financial & Token Operations
    // ========================================================================
    #[msg("Provided USDC mint doesn't match the expected mint.")]
    InvalidUsdcMint,

    #[msg("Account balances do not reconcile with recorded state.")]
    SolvencyCheckFailed,

    #[msg("Reserve and insurance pools are both insufficient to cover the shortfall.")]
    ReserveShortfall,

    // ========================================================================
    // Mathematical & Parameter Validation
    // ========================================================================
    #[msg("House fee percentage is outside valid bounds.")]
    InvalidHouseFee,

    #[msg("Soft cap must be strictly below hard cap.")]
    InvalidCapConfig,

    #[msg("Updated parameters would break an invariant the game relies on.")]
    ParameterInvariantBroken,

    #[msg("Arithmetic overflow or underflow.")]
    ArithmeticOverflow,

    // ========================================================================
    // Generic & Catch-All
    // ========================================================================
    #[msg("General validation check failed.")]
    ValidationFailed,
}
