//! Redeems one Match-2 credit for a free Main ticket. A sibling to
//! `buy_ticket`, not a branch inside it: no tokens move, `house_fee_bps`
//! and pool balances are untouched, only `UserStats::match_2_credits` and
//! the minted `Ticket` change. QuickPick has no Match-2 tier and therefore
//! no credits to redeem.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LottoError;
use crate::events::FreeTicketRedeemed;
use crate::instructions::buy_ticket::sorted_valid_numbers;
use crate::state::{LotteryState, Phase, Ticket, UserStats};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct RedeemFreeTicketParams {
    pub numbers: [u8; NUMBERS_PER_TICKET],
}

#[derive(Accounts)]
pub struct RedeemFreeTicket<'info> {
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
        space = 8 + Ticket::INIT_SPACE,
        seeds = [
            TICKET_SEED,
            &lottery_state.current_draw_id.to_le_bytes(),
            &lottery_state.current_draw_tickets.to_le_bytes()
        ],
        bump
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [USER_SEED, player.key().as_ref()],
        bump = user_stats.bump,
        constraint = user_stats.match_2_credits > 0 @ LottoError::NoCreditsAvailable
    )]
    pub user_stats: Account<'info, UserStats>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<RedeemFreeTicket>, params: RedeemFreeTicketParams) -> Result<()> {
    let sorted_numbers = sorted_valid_numbers(&params.numbers)?;
    let clock = Clock::get()?;

    require!(
        ctx.accounts
            .lottery_state
            .is_ticket_sale_open(clock.unix_timestamp),
        LottoError::TicketSaleClosed
    );

    let state = &mut ctx.accounts.lottery_state;
    let draw_id = state.current_draw_id;
    state.current_draw_tickets = state
        .current_draw_tickets
        .checked_add(1)
        .ok_or(LottoError::ArithmeticOverflow)?;
    state.total_tickets_sold = state
        .total_tickets_sold
        .checked_add(1)
        .ok_or(LottoError::ArithmeticOverflow)?;

    let ticket = &mut ctx.accounts.ticket;
    ticket.owner = ctx.accounts.player.key();
    ticket.draw_id = draw_id;
    ticket.numbers = sorted_numbers;
    ticket.purchase_timestamp = clock.unix_timestamp;
    ticket.is_claimed = false;
    ticket.match_count = 0;
    ticket.prize_amount = 0;
    ticket.bump = ctx.bumps.ticket;

    let user_stats = &mut ctx.accounts.user_stats;
    user_stats.match_2_credits -= 1;
    user_stats.total_tickets = user_stats
        .total_tickets
        .checked_add(1)
        .ok_or(LottoError::ArithmeticOverflow)?;

    emit!(FreeTicketRedeemed {
        ticket: ctx.accounts.ticket.key(),
        player: ctx.accounts.player.key(),
        draw_id,
        numbers: sorted_numbers,
        remaining_credits: user_stats.match_2_credits,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "free ticket redeemed: draw={} remaining_credits={}",
        draw_id,
        user_stats.match_2_credits
    );
    Ok(())
}
