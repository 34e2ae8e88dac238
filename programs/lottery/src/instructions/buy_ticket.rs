//! Single-ticket purchase: validates the pick, applies the dynamic fee
//! split, and mints a `Ticket` PDA.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LottoError;
use crate::events::TicketPurchased;
use crate::state::{LotteryState, Phase, Ticket, UserStats};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct BuyTicketParams {
    pub numbers: [u8; NUMBERS_PER_TICKET],
}

#[derive(Accounts)]
pub struct BuyTicket<'info> {
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

/// Validates the picks and returns the sorted, deduplicated form that is
/// stored on the ticket. Ascending-sorted unsorted input is accepted; the
/// stored representation is always sorted.
pub fn sorted_valid_numbers(
    numbers: &[u8; NUMBERS_PER_TICKET],
) -> Result<[u8; NUMBERS_PER_TICKET]> {
    let mut sorted = *numbers;
    sorted.sort_unstable();
    for w in sorted.windows(2) {
        require!(w[0] != w[1], LottoError::DuplicateNumbers);
    }
    for &n in sorted.iter() {
        require!(
            n >= MIN_NUMBER && n <= MAX_NUMBER,
            LottoError::NumbersOutOfRange
        );
    }
    Ok(sorted)
}

pub fn handler(ctx: Context<BuyTicket>, params: BuyTicketParams) -> Result<()> {
    let sorted_numbers = sorted_valid_numbers(&params.numbers)?;
    let clock = Clock::get()?;

    require!(
        ctx.accounts
            .lottery_state
            .is_ticket_sale_open(clock.unix_timestamp),
        LottoError::TicketSaleClosed
    );
    require!(
        ctx.accounts.player_usdc.amount >= ctx.accounts.lottery_state.ticket_price,
        LottoError::InsufficientFunds
    );

    let price = ctx.accounts.lottery_state.ticket_price;
    let house_fee_bps = ctx.accounts.lottery_state.house_fee_bps;
    let (house_fee, insurance_cut, reserve_cut, mut to_jackpot) =
        split_ticket_price(price, house_fee_bps)?;
    require!(to_jackpot > 0, LottoError::ValidationFailed);

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.player_usdc.to_account_info(),
                to: ctx.accounts.prize_pool_usdc.to_account_info(),
                authority: ctx.accounts.player.to_account_info(),
            },
        ),
        price.checked_sub(house_fee).ok_or(LottoError::ArithmeticOverflow)?,
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
        house_fee,
    )?;

    let state = &mut ctx.accounts.lottery_state;
    // Hard-cap clamp: anything that would push the jackpot over hard_cap
    // redirects to insurance instead of being lost or erroring.
    let room = state.hard_cap.saturating_sub(state.jackpot_balance);
    let mut insurance_total = insurance_cut;
    if to_jackpot > room {
        let overflow = to_jackpot - room;
        to_jackpot = room;
        insurance_total = insurance_total
            .checked_add(overflow)
            .ok_or(LottoError::ArithmeticOverflow)?;
    }

    state.jackpot_balance = state
        .jackpot_balance
        .checked_add(to_jackpot)
        .ok_or(LottoError::ArithmeticOverflow)?;
    state.insurance_balance = state
        .insurance_balance
        .checked_add(insurance_total)
        .ok_or(LottoError::ArithmeticOverflow)?;
    state.reserve_balance = state
        .reserve_balance
        .checked_add(reserve_cut)
        .ok_or(LottoError::ArithmeticOverflow)?;
    state.current_draw_tickets = state
        .current_draw_tickets
        .checked_add(1)
        .ok_or(LottoError::ArithmeticOverflow)?;
    state.total_tickets_sold = state
        .total_tickets_sold
        .checked_add(1)
        .ok_or(LottoError::ArithmeticOverflow)?;
    state.refresh_house_fee();

    let draw_id = state.current_draw_id;

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
    if user_stats.wallet == Pubkey::default() {
        user_stats.wallet = ctx.accounts.player.key();
        user_stats.bump = ctx.bumps.user_stats;
    }
    user_stats.total_tickets = user_stats
        .total_tickets
        .checked_add(1)
        .ok_or(LottoError::ArithmeticOverflow)?;
    user_stats.total_spent = user_stats
        .total_spent
        .checked_add(price)
        .ok_or(LottoError::ArithmeticOverflow)?;

    emit!(TicketPurchased {
        ticket: ctx.accounts.ticket.key(),
        player: ctx.accounts.player.key(),
        draw_id,
        numbers: sorted_numbers,
        price,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "ticket purchased: draw={} price={} jackpot={}",
        draw_id,
        price,
        ctx.accounts.lottery_state.jackpot_balance
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_accepts_unsorted_valid_picks() {
        let picks = [46, 1, 30, 10, 40, 20];
        let sorted = sorted_valid_numbers(&picks).unwrap();
        assert_eq!(sorted, [1, 10, 20, 30, 40, 46]);
    }

    #[test]
    fn rejects_duplicates() {
        assert!(sorted_valid_numbers(&[1, 1, 3, 4, 5, 6]).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(sorted_valid_numbers(&[0, 2, 3, 4, 5, 6]).is_err());
        assert!(sorted_valid_numbers(&[1, 2, 3, 4, 5, 47]).is_err());
    }
}
