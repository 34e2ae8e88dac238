//! Commit phase of the commit-reveal draw: records which Switchboard
//! randomness account this draw will reveal from, and the slot it was
//! requested at. `execute_draw` later enforces that the revealed `seed_slot`
//! is exactly one slot past the current slot at reveal time; nothing about
//! freshness is checked here beyond "not already revealed".

use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::*;
use crate::errors::LottoError;
use crate::events::DrawCommitted;
use crate::state::{LotteryState, Phase};

#[derive(Accounts)]
pub struct CommitRandomness<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery_state.bump,
        constraint = lottery_state.authority == authority.key() @ LottoError::Unauthorized,
        constraint = !lottery_state.is_paused @ LottoError::Paused,
        constraint = lottery_state.is_funded @ LottoError::InvalidConfig,
        constraint = lottery_state.phase == Phase::Open @ LottoError::WrongPhase
    )]
    pub lottery_state: Account<'info, LotteryState>,

    /// CHECK: parsed manually via `RandomnessAccountData::parse`.
    pub randomness_account_data: AccountInfo<'info>,

    /// CHECK: compared against the queue stored in `lottery_state`.
    #[account(
        constraint = switchboard_queue.key() == lottery_state.switchboard_queue
            @ LottoError::SwitchboardQueueNotSet
    )]
    pub switchboard_queue: AccountInfo<'info>,
}

pub fn handler(ctx: Context<CommitRandomness>) -> Result<()> {
    let clock = Clock::get()?;

    require!(
        clock.unix_timestamp >= ctx.accounts.lottery_state.next_draw_timestamp - TICKET_SALE_CUTOFF,
        LottoError::DrawNotReady
    );
    require!(
        ctx.accounts.lottery_state.current_draw_tickets > 0,
        LottoError::DrawNotReady
    );

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| LottoError::RandomnessParseError)?;

    // Already-revealed randomness cannot be committed to: that would let the
    // caller choose an outcome they've already seen.
    if randomness_data.get_value(clock.slot).is_ok() {
        return Err(LottoError::RandomnessAlreadyRevealed.into());
    }

    let draw_id = ctx.accounts.lottery_state.current_draw_id;
    let randomness_account = ctx.accounts.randomness_account_data.key();

    let state = &mut ctx.accounts.lottery_state;
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
        "draw committed: draw={} commit_slot={} randomness={}",
        draw_id,
        clock.slot,
        randomness_account
    );

    Ok(())
}
