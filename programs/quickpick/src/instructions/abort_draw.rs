//! Cancellation path for a QuickPick draw stuck in `Committed` or `Executed`
//! because the randomness adapter reported expiry. Reverts to `Open` without
//! consuming a draw id and pushes `next_draw_timestamp` back by one
//! `draw_interval`.

use anchor_lang::prelude::*;

use crate::constants::QP_STATE_SEED;
use crate::errors::QuickPickError;
use crate::events::DrawAborted;
use crate::state::{Phase, QpState};

#[derive(Accounts)]
pub struct AbortDraw<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = qp_state.authority == authority.key() @ QuickPickError::Unauthorized,
        constraint = qp_state.phase != Phase::Open @ QuickPickError::WrongPhase
    )]
    pub qp_state: Account<'info, QpState>,
}

pub fn handler(ctx: Context<AbortDraw>) -> Result<()> {
    let clock = Clock::get()?;
    let state = &mut ctx.accounts.qp_state;

    let draw_id = state.current_draw_id;
    let tickets_carried_forward = state.current_draw_tickets;

    state.phase = Phase::Open;
    state.commit_slot = 0;
    state.commit_timestamp = 0;
    state.current_randomness_account = Pubkey::default();
    state.winning_numbers = [0u8; 5];
    state.randomness_seed = [0u8; 32];
    state.executed_timestamp = 0;
    state.next_draw_timestamp = state
        .next_draw_timestamp
        .checked_add(state.draw_interval)
        .ok_or(QuickPickError::ArithmeticOverflow)?;

    emit!(DrawAborted {
        draw_id,
        tickets_carried_forward,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "quickpick draw aborted: draw={} next_draw_timestamp={}",
        draw_id,
        state.next_draw_timestamp
    );
    Ok(())
}
