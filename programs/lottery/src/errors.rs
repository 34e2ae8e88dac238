//! Error definitions for the Main game program.
//!
//! Categories:
//! 1. Authorization & Permissions
//! 2. Draw Lifecycle & Phase
//! 3. Ticket Purchase & Validation
//! 4. Draw Execution & Randomness
//! 5. Prize Distribution & Claims
//! 6. Financial & Token Operations
//! 7. Mathematical & Parameter Validation
//! 8. Generic & Catch-All

use anchor_lang::prelude::*;

#[error_code]
pub enum LottoError {
    // ========================================================================
    // Authorization & Permissions
    // ========================================================================
    #[msg("Unauthorized access attempt.")]
    Unauthorized,

    #[msg("Lottery is currently paused.")]
    Paused,

    // ========================================================================
    // Draw Lifecycle & Phase
    // ========================================================================
    /// The instruction requires a different draw phase than the one the
    /// state account is currently in.
    #[msg("Draw is not in the required phase for this operation.")]
    WrongPhase,

    #[msg("Draw has not reached its scheduled time yet.")]
    DrawNotReady,

    #[msg("Draw has already been finalized.")]
    DrawAlreadyFinalized,

    #[msg("Lottery configuration is invalid or inconsistent.")]
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

    #[msg("No match-2 credits available to redeem.")]
    NoCreditsAvailable,

    #[msg("Player's USDC account does not hold enough to cover this purchase.")]
    InsufficientFunds,

    // ========================================================================
    // Draw Execution & Randomness
    // ========================================================================
    #[msg("Randomness account does not match the one committed to this draw.")]
    RandomnessAccountMismatch,

    #[msg("Randomness result is not yet available from the oracle.")]
    RandomnessNotResolved,

    /// The randomness adapter's freshness predicate failed: the seed slot
    /// must equal exactly `current_slot - 1`.
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

    #[msg("A draw is already committed or executed; finish or abort it first.")]
    DrawInProgress,

    // ========================================================================
    // Prize Distribution & Claims
    // ========================================================================
    #[msg("No prize to claim for this ticket.")]
    NoPrizeToClaim,

    /// The indexer's submitted winner counts don't hash to the draw's
    /// on-chain `verification_hash`.
    #[msg("Winner counts failed verification hash check.")]
    VerificationHashMismatch,

    /// Raised by `helpers::plausibility_guard` before the verification hash
    /// is even checked, on counts that are cheaply provable as wrong.
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

    /// Both the reserve and insurance pools were exhausted while covering a
    /// prize-pool shortfall at settlement.
    #[msg("Reserve and insurance pools are both insufficient to cover the shortfall.")]
    ReserveShortfall,

    // ========================================================================
    // Mathematical & Parameter Validation
    // ========================================================================
    #[msg("House fee percentage is outside valid bounds.")]
    InvalidHouseFee,

    #[msg("Seed amount must be below the soft cap.")]
    InvalidSeedAmount,

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
