//! Bulk ticket purchase: atomically applies the single-ticket economics `N`
//! times (`1 <= N <= MAX_BULK_TICKETS`) and stores the batch in one
//! `BulkTicket` account rather than `N` separate `Ticket` accounts.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LottoError;
use crate::events::BulkTicketsPurchased;
use crate::instructions::buy_ticket::sorted_valid_numbers;
use crate::state::{BulkTicket, LotteryState, Phase, UserStats};

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
        seeds = [LOTTERY_SEED],
        bump = lottery_state.bump,
        constraint = !lottery_state.is_paused @ LottoError::Paused,
        constraint = lottery_state.is_funded @ LottoError::InvalidConfig,
        constraint = lottery_state.phase == Phase::Open @ LottoError::WrongPhase
    )]
    pub lottery_state: Account<'info, LotteryState>,

    #[account(
        init,
        payer = player,
        space = BulkTicket::size_for_count(params.numbers.len() as u16),
        seeds = [
            BULK_TICKET_SEED,
            &lottery_state.current_draw_id.to_le_bytes(),
            &lottery_state.current_draw_tickets.to_le_bytes()
        ],
        bump
    )]
    pub bulk_ticket: Account<'info, BulkTicket>,

    #[account(
        init_if_needed,
        payer = player,
        space = 8 + UserStats::INIT_SPACE,
        seeds = [USER_SEED, player.key().as_ref()],
        bump
    )]
    pub user_stats: Account<'info, UserStats>,

    #[account(mut, constraint = player_usdc.owner == player.key() @ LottoError::Unauthorized)]
    pub player_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [PRIZE_POOL_USDC_SEED], bump)]
    pub prize_pool_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [HOUSE_FEE_USDC_SEED], bump)]
    pub house_fee_usdc: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<BuyBulk>, params: BuyBulkParams) -> Result<()> {
    let n = params.numbers.len();
    require!(
        n >= 1 && n <= MAX_BULK_TICKETS as usize,
        LottoError::BulkPurchaseLimitExceeded
    );

    // All-or-nothing: validate every ticket before any state mutation or
    // token transfer so a single bad pick rejects the whole batch.
    let mut sorted_all = Vec::with_capacity(n);
    for numbers in params.numbers.iter() {
        sorted_all.push(sorted_valid_numbers(numbers)?);
    }

    let clock = Clock::get()?;
    require!(
        ctx.accounts
            .lottery_state
            .is_ticket_sale_open(clock.unix_timestamp),
        LottoError::TicketSaleClosed
    );

    let price = ctx.accounts.lottery_state.ticket_price;
    let house_fee_bps = ctx.accounts.lottery_state.house_fee_bps;
    let total_price = price
        .checked_mul(n as u64)
        .ok_or(LottoError::ArithmeticOverflow)?;
    require!(
        ctx.accounts.player_usdc.amount >= total_price,
        LottoError::InsufficientFunds
    );

    let (house_fee_each, insurance_each, reserve_each, jackpot_each) =
        split_ticket_price(price, house_fee_bps)?;
    require!(jackpot_each > 0, LottoError::ValidationFailed);

    let total_house_fee = house_fee_each
        .checked_mul(n as u64)
        .ok_or(LottoError::ArithmeticOverflow)?;
    let total_prize_pool = total_price
        .checked_sub(total_house_fee)
        .ok_or(LottoError::ArithmeticOverflow)?;
    let total_insurance = insurance_each
        .checked_mul(n as u64)
        .ok_or(LottoError::ArithmeticOverflow)?;
    let total_reserve = reserve_each
        .checked_mul(n as u64)
        .ok_or(LottoError::ArithmeticOverflow)?;
    let mut total_jackpot = jackpot_each
        .checked_mul(n as u64)
        .ok_or(LottoError::ArithmeticOverflow)?;

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

    let state = &mut ctx.accounts.lottery_state;
    let room = state.hard_cap.saturating_sub(state.jackpot_balance);
    let mut insurance_total = total_insurance;
    if total_jackpot > room {
        let overflow = total_jackpot - room;
        total_jackpot = room;
        insurance_total = insurance_total
            .checked_add(overflow)
            .ok_or(LottoError::ArithmeticOverflow)?;
    }

    state.jackpot_balance = state
        .jackpot_balance
        .checked_add(total_jackpot)
        .ok_or(LottoError::ArithmeticOverflow)?;
    state.insurance_balance = state
        .insurance_balance
        .checked_add(insurance_total)
        .ok_or(LottoError::ArithmeticOverflow)?;
    state.reserve_balance = state
        .reserve_balance
        .checked_add(total_reserve)
        .ok_or(LottoError::ArithmeticOverflow)?;
    state.current_draw_tickets = state
        .current_draw_tickets
        .checked_add(n as u64)
        .ok_or(LottoError::ArithmeticOverflow)?;
    state.total_tickets_sold = state
        .total_tickets_sold
        .checked_add(n as u64)
        .ok_or(LottoError::ArithmeticOverflow)?;
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
        .ok_or(LottoError::ArithmeticOverflow)?;
    user_stats.total_spent = user_stats
        .total_spent
        .checked_add(total_price)
        .ok_or(LottoError::ArithmeticOverflow)?;

    emit!(BulkTicketsPurchased {
        bulk_ticket: ctx.accounts.bulk_ticket.key(),
        player: ctx.accounts.player.key(),
        draw_id,
        ticket_count: n as u16,
        total_price,
        timestamp: clock.unix_timestamp,
    });

    msg!("bulk purchase: draw={} count={} total={}", draw_id, n, total_price);

    Ok(())
}
