//! Claim-on-demand prize payout for a single QuickPick `Ticket`. Recomputes
//! the ticket's match count against the finalized `DrawRecord` rather than
//! trusting anything stored at purchase time.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::errors::QuickPickError;
use crate::events::PrizeClaimed;
use crate::helpers::count_matches;
use crate::state::{DrawRecord, MatchTier, QpState, Ticket, UserStats};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct ClaimPrizeParams {
    pub ticket_index: u64,
}

#[derive(Accounts)]
#[instruction(params: ClaimPrizeParams)]
pub struct ClaimPrize<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(seeds = [QP_STATE_SEED], bump = qp_state.bump)]
    pub qp_state: Account<'info, QpState>,

    #[account(
        mut,
        seeds = [QP_DRAW_SEED, &ticket.draw_id.to_le_bytes()],
        bump = draw_record.bump
    )]
    pub draw_record: Account<'info, DrawRecord>,

    #[account(
        mut,
        seeds = [QP_TICKET_SEED, &ticket.draw_id.to_le_bytes(), &params.ticket_index.to_le_bytes()],
        bump = ticket.bump,
        constraint = ticket.owner == player.key() @ QuickPickError::NotTicketOwner,
        constraint = !ticket.is_claimed @ QuickPickError::AlreadyClaimed
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [QP_USER_SEED, player.key().as_ref()],
        bump = user_stats.bump
    )]
    pub user_stats: Account<'info, UserStats>,

    #[account(mut, constraint = player_usdc.owner == player.key() @ QuickPickError::Unauthorized)]
    pub player_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [QP_PRIZE_POOL_USDC_SEED], bump)]
    pub prize_pool_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [QP_RESERVE_USDC_SEED], bump)]
    pub reserve_usdc: Account<'info, TokenAccount>,

    #[account(mut, seeds = [QP_INSURANCE_POOL_USDC_SEED], bump)]
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
        QuickPickError::WrongPhase
    );
    require!(
        ctx.accounts.ticket.draw_id == ctx.accounts.draw_record.draw_id,
        QuickPickError::TicketDrawMismatch
    );

    let match_count = count_matches(
        &ctx.accounts.ticket.numbers,
        &ctx.accounts.draw_record.winning_numbers,
    );
    let tier = MatchTier::from(match_count);
    require!(tier != MatchTier::NoMatch, QuickPickError::NoPrizeToClaim);

    let draw_id = ctx.accounts.ticket.draw_id;
    let bump = ctx.accounts.qp_state.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[QP_STATE_SEED, &[bump]]];

    let prize_amount = ctx.accounts.draw_record.prize_for_matches(tier);

    let counter = match tier {
        MatchTier::Match5 => &mut ctx.accounts.draw_record.match_5_winners,
        MatchTier::Match4 => &mut ctx.accounts.draw_record.match_4_winners,
        MatchTier::Match3 => &mut ctx.accounts.draw_record.match_3_winners,
        MatchTier::NoMatch => unreachable!(),
    };
    require!(*counter > 0, QuickPickError::InsufficientPrizePool);
    *counter -= 1;

    if prize_amount > 0 {
        if tier == MatchTier::Match5 {
            require!(
                ctx.accounts.prize_pool_usdc.amount >= prize_amount,
                QuickPickError::InsufficientPrizePool
            );
            token::transfer(
                CpiContext::new_with_signer(
                    ctx.accounts.token_program.to_account_info(),
                    Transfer {
                        from: ctx.accounts.prize_pool_usdc.to_account_info(),
                        to: ctx.accounts.player_usdc.to_account_info(),
                        authority: ctx.accounts.qp_state.to_account_info(),
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
                QuickPickError::InsufficientPrizePool
            );
            if from_reserve > 0 {
                token::transfer(
                    CpiContext::new_with_signer(
                        ctx.accounts.token_program.to_account_info(),
                        Transfer {
                            from: ctx.accounts.reserve_usdc.to_account_info(),
                            to: ctx.accounts.player_usdc.to_account_info(),
                            authority: ctx.accounts.qp_state.to_account_info(),
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
                            authority: ctx.accounts.qp_state.to_account_info(),
                        },
                        signer_seeds,
                    ),
                    from_insurance,
                )?;
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
        .ok_or(QuickPickError::ArithmeticOverflow)?;

    emit!(PrizeClaimed {
        ticket: ctx.accounts.ticket.key(),
        player: ctx.accounts.player.key(),
        draw_id,
        match_count,
        prize_amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!(
        "quickpick prize claimed: draw={} match={} amount={}",
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
