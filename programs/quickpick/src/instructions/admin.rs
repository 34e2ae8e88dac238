//! Authority-gated operations that don't belong to the draw lifecycle:
//! parameter updates, house-fee withdrawal, authority transfer, and an
//! on-demand solvency check. Pause/unpause and seed funding live in
//! `initialize.rs` alongside the account they bootstrap; this module
//! mirrors the Main game's `admin` module for everything else.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::QuickPickError;
use crate::events::{
    AuthorityTransferred, ConfigUpdated, EmergencyPause, EmergencyUnpause, HouseFeesWithdrawn,
    SolvencyCheckPerformed,
};
use crate::state::QpState;

// ============================================================================
// PAUSE / UNPAUSE
// ============================================================================

#[derive(Accounts)]
pub struct Pause<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = qp_state.authority == authority.key() @ QuickPickError::Unauthorized
    )]
    pub qp_state: Account<'info, QpState>,
}

pub fn handler_pause(ctx: Context<Pause>, reason: String) -> Result<()> {
    ctx.accounts.qp_state.is_paused = true;

    emit!(EmergencyPause {
        authority: ctx.accounts.authority.key(),
        reason,
        timestamp: Clock::get()?.unix_timestamp,
    });
    msg!("quickpick paused");
    Ok(())
}

#[derive(Accounts)]
pub struct Unpause<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = qp_state.authority == authority.key() @ QuickPickError::Unauthorized
    )]
    pub qp_state: Account<'info, QpState>,
}

pub fn handler_unpause(ctx: Context<Unpause>) -> Result<()> {
    ctx.accounts.qp_state.is_paused = false;

    emit!(EmergencyUnpause {
        authority: ctx.accounts.authority.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });
    msg!("quickpick unpaused");
    Ok(())
}

// ============================================================================
// UPDATE PARAMETERS
// ============================================================================

/// Fields an authority may adjust post-launch. `None` leaves a field
/// unchanged; every provided field is validated together against the full
/// invariant set before anything is written (§3, cross-cutting invariants).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Default)]
pub struct UpdateConfigParams {
    pub ticket_price: Option<u64>,
    pub soft_cap: Option<u64>,
    pub hard_cap: Option<u64>,
    pub seed_amount: Option<u64>,
    pub draw_interval: Option<i64>,
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = qp_state.authority == authority.key() @ QuickPickError::Unauthorized
    )]
    pub qp_state: Account<'info, QpState>,
}

pub fn handler_update_config(ctx: Context<UpdateConfig>, params: UpdateConfigParams) -> Result<()> {
    let state = &mut ctx.accounts.qp_state;

    let ticket_price = params.ticket_price.unwrap_or(state.ticket_price);
    let soft_cap = params.soft_cap.unwrap_or(state.soft_cap);
    let hard_cap = params.hard_cap.unwrap_or(state.hard_cap);
    let seed_amount = params.seed_amount.unwrap_or(state.seed_amount);
    let draw_interval = params.draw_interval.unwrap_or(state.draw_interval);

    require!(ticket_price > 0, QuickPickError::ValidationFailed);
    require!(draw_interval > 0, QuickPickError::InvalidConfig);
    require!(
        seed_amount <= soft_cap && soft_cap < hard_cap,
        QuickPickError::InvalidCapConfig
    );
    // A cap change must not retroactively strand the jackpot above the new
    // hard cap; the invariant is re-checked against the *current* balance,
    // not just the new parameters in isolation.
    require!(
        state.jackpot_balance <= hard_cap,
        QuickPickError::ParameterInvariantBroken
    );

    macro_rules! log_change {
        ($name:literal, $old:expr, $new:expr) => {
            if $old != $new {
                emit!(ConfigUpdated {
                    parameter: $name.to_string(),
                    old_value: $old as u64,
                    new_value: $new as u64,
                    authority: ctx.accounts.authority.key(),
                    timestamp: Clock::get()?.unix_timestamp,
                });
            }
        };
    }
    log_change!("ticket_price", state.ticket_price, ticket_price);
    log_change!("soft_cap", state.soft_cap, soft_cap);
    log_change!("hard_cap", state.hard_cap, hard_cap);
    log_change!("seed_amount", state.seed_amount, seed_amount);
    log_change!("draw_interval", state.draw_interval, draw_interval as u64);

    state.ticket_price = ticket_price;
    state.soft_cap = soft_cap;
    state.hard_cap = hard_cap;
    state.seed_amount = seed_amount;
    state.draw_interval = draw_interval;

    msg!(
        "quickpick config updated: ticket_price={} soft_cap={} hard_cap={}",
        ticket_price,
        soft_cap,
        hard_cap
    );
    Ok(())
}

// ============================================================================
// HOUSE FEE WITHDRAWAL
// ============================================================================

#[derive(Accounts)]
pub struct WithdrawHouseFees<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = qp_state.authority == authority.key() @ QuickPickError::Unauthorized
    )]
    pub qp_state: Account<'info, QpState>,

    #[account(mut, seeds = [QP_HOUSE_FEE_USDC_SEED], bump)]
    pub house_fee_usdc: Account<'info, TokenAccount>,

    #[account(mut)]
    pub destination_usdc: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_withdraw_house_fees(ctx: Context<WithdrawHouseFees>, amount: u64) -> Result<()> {
    require!(
        ctx.accounts.house_fee_usdc.amount >= amount,
        QuickPickError::InsufficientPrizePool
    );

    let bump = ctx.accounts.qp_state.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[QP_STATE_SEED, &[bump]]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.house_fee_usdc.to_account_info(),
                to: ctx.accounts.destination_usdc.to_account_info(),
                authority: ctx.accounts.qp_state.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
    )?;

    emit!(HouseFeesWithdrawn {
        amount,
        destination: ctx.accounts.destination_usdc.key(),
        authority: ctx.accounts.authority.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });
    msg!("quickpick house fees withdrawn: {}", amount);
    Ok(())
}

// ============================================================================
// AUTHORITY TRANSFER
// ============================================================================

#[derive(Accounts)]
pub struct TransferAuthority<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = qp_state.authority == authority.key() @ QuickPickError::Unauthorized
    )]
    pub qp_state: Account<'info, QpState>,
    /// CHECK: becomes the new authority; no further validation needed for a
    /// plain pubkey handoff.
    pub new_authority: AccountInfo<'info>,
}

pub fn handler_transfer_authority(ctx: Context<TransferAuthority>) -> Result<()> {
    let previous_authority = ctx.accounts.qp_state.authority;
    let new_authority = ctx.accounts.new_authority.key();
    ctx.accounts.qp_state.authority = new_authority;

    emit!(AuthorityTransferred {
        previous_authority,
        new_authority,
        timestamp: Clock::get()?.unix_timestamp,
    });
    msg!("quickpick authority transferred: {} -> {}", previous_authority, new_authority);
    Ok(())
}

// ============================================================================
// SOLVENCY CHECK (read-side, no state mutation)
// ============================================================================

#[derive(Accounts)]
pub struct CheckSolvency<'info> {
    #[account(seeds = [QP_STATE_SEED], bump = qp_state.bump)]
    pub qp_state: Account<'info, QpState>,

    #[account(seeds = [QP_PRIZE_POOL_USDC_SEED], bump)]
    pub prize_pool_usdc: Account<'info, TokenAccount>,
}

pub fn handler_check_solvency(ctx: Context<CheckSolvency>) -> Result<()> {
    let state = &ctx.accounts.qp_state;
    let pool_balance = ctx.accounts.prize_pool_usdc.amount;
    let liability = state
        .jackpot_balance
        .checked_add(state.reserve_balance)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    let is_solvent = pool_balance >= liability;

    emit!(SolvencyCheckPerformed {
        prize_pool_balance: pool_balance,
        jackpot_balance: state.jackpot_balance,
        reserve_balance: state.reserve_balance,
        insurance_balance: state.insurance_balance,
        is_solvent,
        timestamp: Clock::get()?.unix_timestamp,
    });

    require!(is_solvent, QuickPickError::SolvencyCheckFailed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_config_params_default_is_no_op_marker() {
        let params = UpdateConfigParams::default();
        assert!(params.ticket_price.is_none());
        assert!(params.soft_cap.is_none());
    }
}
