//! Single-ticket purchase: validates the pick, checks the $50 Main-game
//! spend gate, applies the dynamic fee split, and mints a `Ticket` PDA.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::QuickPickError;
use crate::events::TicketPurchased;
use crate::state::{MainUserStats, Phase, QpState, Ticket, UserStats};

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
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = !qp_state.is_paused @ QuickPickError::Paused,
        constraint = qp_state.is_funded @ QuickPickError::InvalidConfig,
        constraint = qp_state.phase == Phase::Open @ QuickPickError::WrongPhase
    )]
    pub qp_state: Account<'info, QpState>,

    /// CHECK: the Main game's `UserStats` PDA for this player, read only to
    /// check the spend gate. Deserialized manually past its 8-byte
    /// discriminator since it was written by a different program's
    /// `#[account]` macro and carries that program's discriminator, not
    /// this crate's.
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
        space = 8 + Ticket::INIT_SPACE,
        seeds = [
            QP_TICKET_SEED,
            &qp_state.current_draw_id.to_le_bytes(),
            &qp_state.current_draw_tickets.to_le_bytes()
        ],
        bump
    )]
    pub ticket: Account<'info, Ticket>,

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

/// Validates the picks and returns the sorted, deduplicated form that is
/// stored on the ticket.
pub fn sorted_valid_numbers(
    numbers: &[u8; NUMBERS_PER_TICKET],
) -> Result<[u8; NUMBERS_PER_TICKET]> {
    let mut sorted = *numbers;
    sorted.sort_unstable();
    for w in sorted.windows(2) {
        require!(w[0] != w[1], QuickPickError::DuplicateNumbers);
    }
    for &n in sorted.iter() {
        require!(
            n >= MIN_NUMBER && n <= MAX_NUMBER,
            QuickPickError::NumbersOutOfRange
        );
    }
    Ok(sorted)
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

pub fn handler(ctx: Context<BuyTicket>, params: BuyTicketParams) -> Result<()> {
    let sorted_numbers = sorted_valid_numbers(&params.numbers)?;
    check_spend_gate(&ctx.accounts.main_user_stats)?;

    let clock = Clock::get()?;

    require!(
        ctx.accounts.qp_state.is_ticket_sale_open(clock.unix_timestamp),
        QuickPickError::TicketSaleClosed
    );
    require!(
        ctx.accounts.player_usdc.amount >= ctx.accounts.qp_state.ticket_price,
        QuickPickError::InsufficientFunds
    );

    let price = ctx.accounts.qp_state.ticket_price;
    let house_fee_bps = ctx.accounts.qp_state.house_fee_bps;
    let (house_fee, insurance_cut, reserve_cut, mut to_jackpot) =
        split_ticket_price(price, house_fee_bps)?;
    require!(to_jackpot > 0, QuickPickError::ValidationFailed);

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.player_usdc.to_account_info(),
                to: ctx.accounts.prize_pool_usdc.to_account_info(),
                authority: ctx.accounts.player.to_account_info(),
            },
        ),
        price
            .checked_sub(house_fee)
            .ok_or(QuickPickError::ArithmeticOverflow)?,
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

    let state = &mut ctx.accounts.qp_state;
    let room = state.hard_cap.saturating_sub(state.jackpot_balance);
    let mut insurance_total = insurance_cut;
    if to_jackpot > room {
        let overflow = to_jackpot - room;
        to_jackpot = room;
        insurance_total = insurance_total
            .checked_add(overflow)
            .ok_or(QuickPickError::ArithmeticOverflow)?;
    }

    state.jackpot_balance = state
        .jackpot_balance
        .checked_add(to_jackpot)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.insurance_balance = state
        .insurance_balance
        .checked_add(insurance_total)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.reserve_balance = state
        .reserve_balance
        .checked_add(reserve_cut)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.current_draw_tickets = state
        .current_draw_tickets
        .checked_add(1)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.total_tickets_sold = state
        .total_tickets_sold
        .checked_add(1)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
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
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    user_stats.total_spent = user_stats
        .total_spent
        .checked_add(price)
        .ok_or(QuickPickError::ArithmeticOverflow)?;

    emit!(TicketPurchased {
        ticket: ctx.accounts.ticket.key(),
        player: ctx.accounts.player.key(),
        draw_id,
        numbers: sorted_numbers,
        price,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "quickpick ticket purchased: draw={} price={} jackpot={}",
        draw_id,
        price,
        ctx.accounts.qp_state.jackpot_balance
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_accepts_unsorted_valid_picks() {
        let picks = [35, 1, 20, 10, 30];
        let sorted = sorted_valid_numbers(&picks).unwrap();
        assert_eq!(sorted, [1, 10, 20, 30, 35]);
    }

    #[test]
    fn rejects_duplicates() {
        assert!(sorted_valid_numbers(&[1, 1, 3, 4, 5]).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(sorted_valid_numbers(&[0, 2, 3, 4, 5]).is_err());
        assert!(sorted_valid_numbers(&[1, 2, 3, 4, 36]).is_err());
    }
}
