//! Cancellation path for a draw stuck in `Committed` or `Executed` because
//! the randomness adapter reported expiry. Reverts to `Open` without
//! consuming a draw id and pushes `next_draw_timestamp` back by one
//! `draw_interval`, matching the retry the scheduler bot performs.

use anchor_lang::prelude::*;

use crate::constants::LOTTERY_SEED;
use crate::errors::LottoError;
use crate::events::DrawAborted;
use crate::state::{LotteryState, Phase};

#[derive(Accounts)]
pub struct AbortDraw<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery_state.bump,
        constraint = lottery_state.authority == authority.key() @ LottoError::Unauthorized,
        constraint = lottery_state.phase != Phase::Open @ LottoError::WrongPhase
    )]
    pub lottery_state: Account<'info, LotteryState>,
}

pub fn handler(ctx: Context<AbortDraw>) -> Result<()> {
    let clock = Clock::get()?;
    let state = &mut ctx.accounts.lottery_state;

    let draw_id = state.current_draw_id;
    let tickets_carried_forward = state.current_draw_tickets;

    state.phase = Phase::Open;
    state.commit_slot = 0;
    state.commit_timestamp = 0;
    state.current_randomness_account = Pubkey::default();
    state.winning_numbers = [0u8; 6];
    state.randomness_seed = [0u8; 32];
    state.executed_timestamp = 0;
    state.next_draw_timestamp = state
        .next_draw_timestamp
        .checked_add(state.draw_interval)
        .ok_or(LottoError::ArithmeticOverflow)?;

    emit!(DrawAborted {
        draw_id,
        tickets_carried_forward,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "draw aborted: draw={} next_draw_timestamp={}",
        draw_id,
        state.next_draw_timestamp
    );
    Ok(())
}
