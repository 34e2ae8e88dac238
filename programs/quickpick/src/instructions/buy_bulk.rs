//! Bulk ticket purchase: atomically applies the single-ticket economics `N`
//! times (`1 <= N <= MAX_BULK_TICKETS`) and stores the batch in one
//! `BulkTicket` account rather than `N` separate `Ticket` accounts. Subject
//! to the same $50 Main-game spend gate as `buy_ticket`.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::QuickPickError;
use crate::events::BulkTicketsPurchased;
use crate::instructions::buy_ticket::sorted_valid_numbers;
use crate::state::{BulkTicket, MainUserStats, Phase, QpState, UserStats};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct BuyBulkParams {
    pub numbers: Vec<[u8; NUMBERS_PER_TICKET]>,
}

#[derive(Accounts)]
#[instruction(params: BuyBulkParams)]
pub struct BuyBulk<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(
        mut,
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = !qp_state.is_paused @ QuickPickError::Paused,
        constraint = qp_state.is_funded @ QuickPickError::InvalidConfig,
        constraint = qp_state.phase == Phase::Open @ QuickPickError::WrongPhase
    )]
    pub qp_state: Account<'info, QpState>,

    /// CHECK: see `BuyTicket::main_user_stats`.
    #[account(
        owner = qp_state.main_lottery_program @ QuickPickError::MainUserStatsOwnerMismatch,
        seeds = [MAIN_USER_SEED, player.key().as_ref()],
        bump,
        seeds::program = qp_state.main_lottery_program
    )]
    pub main_user_stats: UncheckedAccount<'info>,

    #[account(
        init,
        payer = player,
        space = BulkTicket::size_for_count(params.numbers.len() as u16),
        seeds = [
            QP_BULK_TICKET_SEED,
            &qp_state.current_draw_id.to_le_bytes(),
            &qp_state.current_draw_tickets.to_le_bytes()
        ],
        bump
    )]
    pub bulk_ticket: Account<'info, BulkTicket>,

    #[account(
        init_if_needed,
        payer = player,
        space = 8 + UserStats::INIT_SPACE,
        seeds = [QP_USER_SEED, player.key().as_ref()],
        bump
    )]
    pub user_stats: Account<'info, UserStats>,

    #[account(mut, constraint = player_usdc.owner == player.key() @ QuickPickError::Unauthorized)]
    pub player_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [QP_PRIZE_POOL_USDC_SEED], bump)]
    pub prize_pool_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [QP_HOUSE_FEE_USDC_SEED], bump)]
    pub house_fee_usdc: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

fn check_spend_gate(account: &UncheckedAccount) -> Result<()> {
    let data = account.try_borrow_data()?;
    require!(data.len() > 8, QuickPickError::MainUserStatsOwnerMismatch);
    let main_stats = MainUserStats::try_from_slice(&data[8..])
        .map_err(|_| QuickPickError::MainUserStatsOwnerMismatch)?;
    require!(
        main_stats.meets_spend_gate(),
        QuickPickError::SpendGateNotMet
    );
    Ok(())
}

pub fn handler(ctx: Context<BuyBulk>, params: BuyBulkParams) -> Result<()> {
    let n = params.numbers.len();
    require!(
        n >= 1 && n <= MAX_BULK_TICKETS as usize,
        QuickPickError::BulkPurchaseLimitExceeded
    );

    check_spend_gate(&ctx.accounts.main_user_stats)?;

    // All-or-nothing: validate every ticket before any state mutation or
    // token transfer so a single bad pick rejects the whole batch.
    let mut sorted_all = Vec::with_capacity(n);
    for numbers in params.numbers.iter() {
        sorted_all.push(sorted_valid_numbers(numbers)?);
    }

    let clock = Clock::get()?;
    require!(
        ctx.accounts.qp_state.is_ticket_sale_open(clock.unix_timestamp),
        QuickPickError::TicketSaleClosed
    );

    let price = ctx.accounts.qp_state.ticket_price;
    let house_fee_bps = ctx.accounts.qp_state.house_fee_bps;
    let total_price = price
        .checked_mul(n as u64)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    require!(
        ctx.accounts.player_usdc.amount >= total_price,
        QuickPickError::InsufficientFunds
    );

    let (house_fee_each, insurance_each, reserve_each, jackpot_each) =
        split_ticket_price(price, house_fee_bps)?;
    require!(jackpot_each > 0, QuickPickError::ValidationFailed);

    let total_house_fee = house_fee_each
        .checked_mul(n as u64)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    let total_prize_pool = total_price
        .checked_sub(total_house_fee)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    let total_insurance = insurance_each
        .checked_mul(n as u64)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    let total_reserve = reserve_each
        .checked_mul(n as u64)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    let mut total_jackpot = jackpot_each
        .checked_mul(n as u64)
        .ok_or(QuickPickError::ArithmeticOverflow)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.player_usdc.to_account_info(),
                to: ctx.accounts.prize_pool_usdc.to_account_info(),
                authority: ctx.accounts.player.to_account_info(),
            },
        ),
        total_prize_pool,
    )?;
    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.player_usdc.to_account_info(),
                to: ctx.accounts.house_fee_usdc.to_account_info(),
                authority: ctx.accounts.player.to_account_info(),
            },
        ),
        total_house_fee,
    )?;

    let state = &mut ctx.accounts.qp_state;
    let room = state.hard_cap.saturating_sub(state.jackpot_balance);
    let mut insurance_total = total_insurance;
    if total_jackpot > room {
        let overflow = total_jackpot - room;
        total_jackpot = room;
        insurance_total = insurance_total
            .checked_add(overflow)
            .ok_or(QuickPickError::ArithmeticOverflow)?;
    }

    state.jackpot_balance = state
        .jackpot_balance
        .checked_add(total_jackpot)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.insurance_balance = state
        .insurance_balance
        .checked_add(insurance_total)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.reserve_balance = state
        .reserve_balance
        .checked_add(total_reserve)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.current_draw_tickets = state
        .current_draw_tickets
        .checked_add(n as u64)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.total_tickets_sold = state
        .total_tickets_sold
        .checked_add(n as u64)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.refresh_house_fee();

    let draw_id = state.current_draw_id;
    let start_ticket_id = state.current_draw_tickets - n as u64;

    let bulk_ticket = &mut ctx.accounts.bulk_ticket;
    bulk_ticket.owner = ctx.accounts.player.key();
    bulk_ticket.draw_id = draw_id;
    bulk_ticket.start_ticket_id = start_ticket_id;
    bulk_ticket.ticket_count = n as u16;
    bulk_ticket.numbers = sorted_all;
    bulk_ticket.purchase_timestamp = clock.unix_timestamp;
    bulk_ticket.claimed_bitmap = vec![0u8; n.div_ceil(8)];
    bulk_ticket.bump = ctx.bumps.bulk_ticket;

    let user_stats = &mut ctx.accounts.user_stats;
    if user_stats.wallet == Pubkey::default() {
        user_stats.wallet = ctx.accounts.player.key();
        user_stats.bump = ctx.bumps.user_stats;
    }
    user_stats.total_tickets = user_stats
        .total_tickets
        .checked_add(n as u64)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    user_stats.total_spent = user_stats
        .total_spent
        .checked_add(total_price)
        .ok_or(QuickPickError::ArithmeticOverflow)?;

    emit!(BulkTicketsPurchased {
        bulk_ticket: ctx.accounts.bulk_ticket.key(),
        player: ctx.accounts.player.key(),
        draw_id,
        ticket_count: n as u16,
        total_price,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "quickpick bulk purchase: draw={} count={} total={}",
        draw_id,
        n,
        total_price
    );

    Ok(())
}
