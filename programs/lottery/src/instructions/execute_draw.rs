//! Reveal phase of the commit-reveal draw: pulls the resolved randomness
//! value from the committed Switchboard account and derives the winning
//! numbers from it. Freshness is strict — `seed_slot` must equal exactly
//! `current_slot - 1` — so the caller cannot see the outcome before
//! deciding whether to call this instruction at all. Too early and too
//! late are distinct failures: the former just means try again next slot,
//! the latter means the committed randomness is unusable and the draw
//! needs `abort_draw`.

use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::*;
use crate::errors::LottoError;
use crate::events::DrawExecuted;
use crate::helpers::derive_winning_numbers;
use crate::state::{LotteryState, Phase};

#[derive(Accounts)]
pub struct ExecuteDraw<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery_state.bump,
        constraint = lottery_state.authority == authority.key() @ LottoError::Unauthorized,
        constraint = lottery_state.phase == Phase::Committed @ LottoError::WrongPhase,
        constraint = randomness_account_data.key() == lottery_state.current_randomness_account
            @ LottoError::RandomnessAccountMismatch
    )]
    pub lottery_state: Account<'info, LotteryState>,

    /// CHECK: parsed manually via `RandomnessAccountData::parse`.
    pub randomness_account_data: AccountInfo<'info>,
}

pub fn handler(ctx: Context<ExecuteDraw>) -> Result<()> {
    let clock = Clock::get()?;

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| LottoError::RandomnessParseError)?;

    // Strict freshness: the seed must have been committed to in exactly the
    // slot before this one. Too early and too late are reported separately
    // so the caller (and `abort_draw`) can tell which one happened.
    require!(
        clock.slot > randomness_data.seed_slot,
        LottoError::RandomnessNotResolved
    );
    require!(
        clock.slot - randomness_data.seed_slot <= RANDOMNESS_REQUIRED_SLOT_DELTA,
        LottoError::RandomnessExpired
    );

    let seed = randomness_data
        .get_value(clock.slot)
        .map_err(|_| LottoError::RandomnessNotResolved)?;

    let winning = derive_winning_numbers(&seed, NUMBERS_PER_TICKET, MAX_NUMBER);
    let mut winning_numbers = [0u8; NUMBERS_PER_TICKET];
    winning_numbers.copy_from_slice(&winning);

    let draw_id = ctx.accounts.lottery_state.current_draw_id;
    let total_tickets = ctx.accounts.lottery_state.current_draw_tickets;

    let state = &mut ctx.accounts.lottery_state;
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
        "draw executed: draw={} winning_numbers={:?}",
        draw_id,
        winning_numbers
    );

    Ok(())
}
