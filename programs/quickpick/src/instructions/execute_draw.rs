//! Reveal phase of the commit-reveal draw: pulls the resolved randomness
//! value from the committed Switchboard account and derives the 5 winning
//! numbers from it. Freshness is strict, matching the Main game: `seed_slot`
//! must equal exactly `current_slot - 1`.

use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::*;
use crate::errors::QuickPickError;
use crate::events::DrawExecuted;
use crate::helpers::derive_winning_numbers;
use crate::state::{Phase, QpState};

#[derive(Accounts)]
pub struct ExecuteDraw<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = qp_state.authority == authority.key() @ QuickPickError::Unauthorized,
        constraint = qp_state.phase == Phase::Committed @ QuickPickError::WrongPhase,
        constraint = randomness_account_data.key() == qp_state.current_randomness_account
            @ QuickPickError::RandomnessAccountMismatch
    )]
    pub qp_state: Account<'info, QpState>,

    /// CHECK: parsed manually via `RandomnessAccountData::parse`.
    pub randomness_account_data: AccountInfo<'info>,
}

pub fn handler(ctx: Context<ExecuteDraw>) -> Result<()> {
    let clock = Clock::get()?;

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| QuickPickError::RandomnessParseError)?;

    require!(
        clock.slot > randomness_data.seed_slot,
        QuickPickError::RandomnessNotResolved
    );
    require!(
        clock.slot - randomness_data.seed_slot <= RANDOMNESS_REQUIRED_SLOT_DELTA,
        QuickPickError::RandomnessExpired
    );

    let seed = randomness_data
        .get_value(clock.slot)
        .map_err(|_| QuickPickError::RandomnessNotResolved)?;

    let winning = derive_winning_numbers(&seed, NUMBERS_PER_TICKET, MAX_NUMBER);
    let mut winning_numbers = [0u8; NUMBERS_PER_TICKET];
    winning_numbers.copy_from_slice(&winning);

    let draw_id = ctx.accounts.qp_state.current_draw_id;
    let total_tickets = ctx.accounts.qp_state.current_draw_tickets;

    let state = &mut ctx.accounts.qp_state;
    state.winning_numbers = winning_numbers;
    state.randomness_seed = seed;
    state.executed_timestamp = clock.unix_timestamp;
    state.phase = Phase::Executed;

    emit!(DrawExecuted {
        draw_id,
        winning_numbers,
        total_tickets,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "quickpick draw executed: draw={} winning_numbers={:?}",
        draw_id,
        winning_numbers
    );

    Ok(())
}
