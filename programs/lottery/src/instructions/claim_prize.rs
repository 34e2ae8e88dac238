//! Claim-on-demand prize payout for a single `Ticket`. Recomputes the
//! ticket's match count against the finalized `DrawRecord` rather than
//! trusting anything stored at purchase time, so the draw outcome is the
//! sole source of truth for who gets paid.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::LottoError;
use crate::events::PrizeClaimed;
use crate::helpers::count_matches;
use crate::state::{DrawRecord, LotteryState, MatchTier, Ticket, UserStats};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct ClaimPrizeParams {
    pub ticket_index: u64,
}

#[derive(Accounts)]
#[instruction(params: ClaimPrizeParams)]
pub struct ClaimPrize<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(seeds = [LOTTERY_SEED], bump = lottery_state.bump)]
    pub lottery_state: Account<'info, LotteryState>,

    #[account(
        mut,
        seeds = [DRAW_SEED, &ticket.draw_id.to_le_bytes()],
        bump = draw_record.bump
    )]
    pub draw_record: Account<'info, DrawRecord>,

    #[account(
        mut,
        seeds = [TICKET_SEED, &ticket.draw_id.to_le_bytes(), &params.ticket_index.to_le_bytes()],
        bump = ticket.bump,
        constraint = ticket.owner == player.key() @ LottoError::NotTicketOwner,
        constraint = !ticket.is_claimed @ LottoError::AlreadyClaimed
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [USER_SEED, player.key().as_ref()],
        bump = user_stats.bump
    )]
    pub user_stats: Account<'info, UserStats>,

    #[account(mut, constraint = player_usdc.owner == player.key() @ LottoError::Unauthorized)]
    pub player_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [PRIZE_POOL_USDC_SEED], bump)]
    pub prize_pool_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [RESERVE_USDC_SEED], bump)]
    pub reserve_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [INSURANCE_POOL_USDC_SEED], bump)]
    pub insurance_usdc: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Splits `amount` across reserve (up to what it holds) then insurance.
fn split_over_pools(amount: u64, reserve_available: u64) -> (u64, u64) {
    let from_reserve = amount.min(reserve_available);
    (from_reserve, amount - from_reserve)
}

pub fn handler(ctx: Context<ClaimPrize>, _params: ClaimPrizeParams) -> Result<()> {
    require!(
        ctx.accounts.draw_record.is_finalized(),
        LottoError::WrongPhase
    );
    require!(
        ctx.accounts.ticket.draw_id == ctx.accounts.draw_record.draw_id,
        LottoError::TicketDrawMismatch
    );

    let match_count = count_matches(
        &ctx.accounts.ticket.numbers,
        &ctx.accounts.draw_record.winning_numbers,
    );
    let tier = MatchTier::from(match_count);
    require!(tier != MatchTier::NoMatch, LottoError::NoPrizeToClaim);

    let draw_id = ctx.accounts.ticket.draw_id;
    let bump = ctx.accounts.lottery_state.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[LOTTERY_SEED, &[bump]]];

    let mut prize_amount = 0u64;

    if tier == MatchTier::Match2 {
        require!(
            ctx.accounts.draw_record.match_2_winners > 0,
            LottoError::InsufficientPrizePool
        );
        ctx.accounts.draw_record.match_2_winners -= 1;
        ctx.accounts.user_stats.match_2_credits = ctx
            .accounts
            .user_stats
            .match_2_credits
            .checked_add(1)
            .ok_or(LottoError::ArithmeticOverflow)?;
    } else {
        prize_amount = ctx.accounts.draw_record.prize_for_matches(tier);

        let counter = match tier {
            MatchTier::Match6 => &mut ctx.accounts.draw_record.match_6_winners,
            MatchTier::Match5 => &mut ctx.accounts.draw_record.match_5_winners,
            MatchTier::Match4 => &mut ctx.accounts.draw_record.match_4_winners,
            MatchTier::Match3 => &mut ctx.accounts.draw_record.match_3_winners,
            MatchTier::Match2 | MatchTier::NoMatch => unreachable!(),
        };
        require!(*counter > 0, LottoError::InsufficientPrizePool);
        *counter -= 1;

        if prize_amount > 0 {
            if tier == MatchTier::Match6 {
                require!(
                    ctx.accounts.prize_pool_usdc.amount >= prize_amount,
                    LottoError::InsufficientPrizePool
                );
                token::transfer(
                    CpiContext::new_with_signer(
                        ctx.accounts.token_program.to_account_info(),
                        Transfer {
                            from: ctx.accounts.prize_pool_usdc.to_account_info(),
                            to: ctx.accounts.player_usdc.to_account_info(),
                            authority: ctx.accounts.lottery_state.to_account_info(),
                        },
                        signer_seeds,
                    ),
                    prize_amount,
                )?;
            } else {
                let (from_reserve, from_insurance) =
                    split_over_pools(prize_amount, ctx.accounts.reserve_usdc.amount);
                require!(
                    from_insurance <= ctx.accounts.insurance_usdc.amount,
                    LottoError::InsufficientPrizePool
                );
                if from_reserve > 0 {
                    token::transfer(
                        CpiContext::new_with_signer(
                            ctx.accounts.token_program.to_account_info(),
                            Transfer {
                                from: ctx.accounts.reserve_usdc.to_account_info(),
                                to: ctx.accounts.player_usdc.to_account_info(),
                                authority: ctx.accounts.lottery_state.to_account_info(),
                            },
                            signer_seeds,
                        ),
                        from_reserve,
                    )?;
                }
                if from_insurance > 0 {
                    token::transfer(
                        CpiContext::new_with_signer(
                            ctx.accounts.token_program.to_account_info(),
                            Transfer {
                                from: ctx.accounts.insurance_usdc.to_account_info(),
                                to: ctx.accounts.player_usdc.to_account_info(),
                                authority: ctx.accounts.lottery_state.to_account_info(),
                            },
                            signer_seeds,
                        ),
                        from_insurance,
                    )?;
                }
            }
        }
    }

    let ticket = &mut ctx.accounts.ticket;
    ticket.is_claimed = true;
    ticket.match_count = match_count;
    ticket.prize_amount = prize_amount;

    ctx.accounts.user_stats.total_won = ctx
        .accounts
        .user_stats
        .total_won
        .checked_add(prize_amount)
        .ok_or(LottoError::ArithmeticOverflow)?;

    emit!(PrizeClaimed {
        ticket: ctx.accounts.ticket.key(),
        player: ctx.accounts.player.key(),
        draw_id,
        match_count,
        prize_amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!(
        "prize claimed: draw={} match={} amount={}",
        draw_id,
        match_count,
        prize_amount
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_over_pools_prefers_reserve() {
        assert_eq!(split_over_pools(100, 150), (100, 0));
        assert_eq!(split_over_pools(100, 40), (40, 60));
        assert_eq!(split_over_pools(100, 0), (0, 100));
    }
}
