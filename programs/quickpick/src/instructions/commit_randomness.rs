//! Commit phase of the commit-reveal draw: records which Switchboard
//! randomness account this draw will reveal from, and the slot it was
//! requested at.

use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::*;
use crate::errors::QuickPickError;
use crate::events::DrawCommitted;
use crate::state::{Phase, QpState};

#[derive(Accounts)]
pub struct CommitRandomness<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = qp_state.authority == authority.key() @ QuickPickError::Unauthorized,
        constraint = !qp_state.is_paused @ QuickPickError::Paused,
        constraint = qp_state.is_funded @ QuickPickError::InvalidConfig,
        constraint = qp_state.phase == Phase::Open @ QuickPickError::WrongPhase
    )]
    pub qp_state: Account<'info, QpState>,

    /// CHECK: parsed manually via `RandomnessAccountData::parse`.
    pub randomness_account_data: AccountInfo<'info>,

    /// CHECK: compared against the queue stored in `qp_state`.
    #[account(
        constraint = switchboard_queue.key() == qp_state.switchboard_queue
            @ QuickPickError::SwitchboardQueueNotSet
    )]
    pub switchboard_queue: AccountInfo<'info>,
}

pub fn handler(ctx: Context<CommitRandomness>) -> Result<()> {
    let clock = Clock::get()?;

    require!(
        clock.unix_timestamp >= ctx.accounts.qp_state.next_draw_timestamp - TICKET_SALE_CUTOFF,
        QuickPickError::DrawNotReady
    );
    require!(
        ctx.accounts.qp_state.current_draw_tickets > 0,
        QuickPickError::DrawNotReady
    );

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| QuickPickError::RandomnessParseError)?;

    if randomness_data.get_value(clock.slot).is_ok() {
        return Err(QuickPickError::RandomnessAlreadyRevealed.into());
    }

    let draw_id = ctx.accounts.qp_state.current_draw_id;
    let randomness_account = ctx.accounts.randomness_account_data.key();

    let state = &mut ctx.accounts.qp_state;
    state.commit_slot = clock.slot;
    state.commit_timestamp = clock.unix_timestamp;
    state.current_randomness_account = randomness_account;
    state.phase = Phase::Committed;

    emit!(DrawCommitted {
        draw_id,
        commit_slot: clock.slot,
        randomness_account,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "quickpick draw committed: draw={} commit_slot={} randomness={}",
        draw_id,
        clock.slot,
        randomness_account
    );

    Ok(())
}
