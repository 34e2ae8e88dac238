//! One-shot setup for the Main game: creates the `LotteryState` PDA and its
//! three pool token accounts, and a separate `fund_seed` step that moves the
//! configured seed amount in before the game accepts purchases.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LottoError;
use crate::events::{LotteryInitialized, SeedFunded};
use crate::state::LotteryState;

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct InitializeParams {
    pub ticket_price: u64,
    pub seed_amount: u64,
    pub soft_cap: u64,
    pub hard_cap: u64,
    pub draw_interval: i64,
    pub switchboard_queue: Pubkey,
}

impl InitializeParams {
    fn validate(&self) -> Result<()> {
        require!(self.ticket_price > 0, LottoError::ValidationFailed);
        require!(
            self.seed_amount <= self.soft_cap && self.soft_cap < self.hard_cap,
            LottoError::InvalidCapConfig
        );
        require!(self.draw_interval > 0, LottoError::InvalidConfig);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + LotteryState::INIT_SPACE,
        seeds = [LOTTERY_SEED],
        bump
    )]
    pub lottery_state: Account<'info, LotteryState>,

    pub usdc_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = authority,
        seeds = [PRIZE_POOL_USDC_SEED],
        bump,
        token::mint = usdc_mint,
        token::authority = lottery_state
    )]
    pub prize_pool_usdc: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        seeds = [HOUSE_FEE_USDC_SEED],
        bump,
        token::mint = usdc_mint,
        token::authority = lottery_state
    )]
    pub house_fee_usdc: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        seeds = [INSURANCE_POOL_USDC_SEED],
        bump,
        token::mint = usdc_mint,
        token::authority = lottery_state
    )]
    pub insurance_usdc: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        seeds = [RESERVE_USDC_SEED],
        bump,
        token::mint = usdc_mint,
        token::authority = lottery_state
    )]
    pub reserve_usdc: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<Initialize>, params: InitializeParams) -> Result<()> {
    params.validate()?;

    let clock = Clock::get()?;
    let state = &mut ctx.accounts.lottery_state;

    state.authority = ctx.accounts.authority.key();
    state.switchboard_queue = params.switchboard_queue;
    state.current_draw_id = 1;
    state.jackpot_balance = 0;
    state.reserve_balance = 0;
    state.insurance_balance = 0;
    state.ticket_price = params.ticket_price;
    state.house_fee_bps = calculate_house_fee_bps(0);
    state.seed_amount = params.seed_amount;
    state.soft_cap = params.soft_cap;
    state.hard_cap = params.hard_cap;
    state.draw_interval = params.draw_interval;
    state.next_draw_timestamp = clock.unix_timestamp + params.draw_interval;
    state.phase = crate::state::Phase::Open;
    state.is_funded = false;
    state.is_paused = false;
    state.bump = ctx.bumps.lottery_state;

    emit!(LotteryInitialized {
        authority: state.authority,
        ticket_price: state.ticket_price,
        seed_amount: state.seed_amount,
        soft_cap: state.soft_cap,
        hard_cap: state.hard_cap,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "lottery initialized: ticket_price={} soft_cap={} hard_cap={}",
        state.ticket_price,
        state.soft_cap,
        state.hard_cap
    );

    Ok(())
}

#[derive(Accounts)]
pub struct FundSeed<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery_state.bump,
        constraint = lottery_state.authority == authority.key() @ LottoError::Unauthorized,
        constraint = !lottery_state.is_funded @ LottoError::InvalidConfig
    )]
    pub lottery_state: Account<'info, LotteryState>,

    #[account(mut, constraint = authority_usdc.owner == authority.key() @ LottoError::Unauthorized)]
    pub authority_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [PRIZE_POOL_USDC_SEED], bump)]
    pub prize_pool_usdc: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Funds the jackpot with `seed_amount` and flips `is_funded`, the gate
/// every purchase and draw transition checks before touching the pools.
pub fn handler_fund_seed(ctx: Context<FundSeed>) -> Result<()> {
    let amount = ctx.accounts.lottery_state.seed_amount;

    let cpi_accounts = Transfer {
        from: ctx.accounts.authority_usdc.to_account_info(),
        to: ctx.accounts.prize_pool_usdc.to_account_info(),
        authority: ctx.accounts.authority.to_account_info(),
    };
    token::transfer(
        CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts),
        amount,
    )?;

    let state = &mut ctx.accounts.lottery_state;
    state.jackpot_balance = amount;
    state.is_funded = true;

    emit!(SeedFunded {
        amount,
        new_jackpot_balance: state.jackpot_balance,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("seed funded: {} into jackpot", amount);
    Ok(())
}
