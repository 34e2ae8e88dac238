//! Closes out a QuickPick draw: accepts the off-chain indexer's winner
//! counts, accepts them only if they hash to the `DrawRecord`'s verification
//! hash, evaluates the rolldown trigger, settles the payout envelope into
//! ledger balances, and cycles the game back to `Open` for the next draw.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::QuickPickError;
use crate::events::{DrawFinalized, JackpotWon, ReserveShortfallCovered};
use crate::helpers::{plausibility_guard, verification_hash_qp};
use crate::state::{DrawRecord, Phase, QpState, WinnerCounts};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct FinalizeDrawParams {
    pub counts: WinnerCounts,
    pub nonce: u64,
    pub verification_hash: [u8; 32],
}

#[derive(Accounts)]
pub struct FinalizeDraw<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [QP_STATE_SEED],
        bump = qp_state.bump,
        constraint = qp_state.authority == authority.key() @ QuickPickError::Unauthorized,
        constraint = qp_state.phase == Phase::Executed @ QuickPickError::WrongPhase
    )]
    pub qp_state: Account<'info, QpState>,

    #[account(
        init,
        payer = authority,
        space = 8 + DrawRecord::INIT_SPACE,
        seeds = [QP_DRAW_SEED, &qp_state.current_draw_id.to_le_bytes()],
        bump
    )]
    pub draw_record: Account<'info, DrawRecord>,

    pub system_program: Program<'info, System>,
}

/// Settlement outcome computed before any account field is mutated, so the
/// handler applies everything in one pass.
struct Settlement {
    match_5_prize_per_winner: u64,
    match_4_prize_per_winner: u64,
    match_3_prize_per_winner: u64,
    pool_allocated_to_draw: u64,
    new_jackpot_balance: u64,
    reserve_delta: i64,
    insurance_delta: i64,
    was_rolldown: bool,
    shortfall: u64,
}

fn settle(
    counts: &WinnerCounts,
    rolldown_active: bool,
    jackpot_balance: u64,
    reserve_balance: u64,
    insurance_balance: u64,
    seed_amount: u64,
) -> Settlement {
    let mut reserve_delta: i64 = 0;
    let mut insurance_delta: i64 = 0;
    let mut shortfall = 0u64;

    if counts.match_5 == 0 && rolldown_active {
        // Rolldown: the entire jackpot is redistributed pari-mutuel across
        // M4/M3 by the fixed split, remainders and empty tiers sweeping to
        // insurance.
        let pool_4 = jackpot_balance * ROLLDOWN_MATCH_4_BPS / BPS_DENOMINATOR;
        let pool_3 = jackpot_balance * ROLLDOWN_MATCH_3_BPS / BPS_DENOMINATOR;
        let allocated = pool_4 + pool_3;
        insurance_delta += (jackpot_balance - allocated) as i64;

        let (per_4, sweep_4) = tier_share(pool_4, counts.match_4);
        let (per_3, sweep_3) = tier_share(pool_3, counts.match_3);
        insurance_delta += (sweep_4 + sweep_3) as i64;

        let pool_allocated_to_draw =
            per_4 * counts.match_4 as u64 + per_3 * counts.match_3 as u64;

        let (new_jackpot_balance, r_delta, i_delta) =
            replenish_jackpot(seed_amount, reserve_balance, insurance_balance);
        reserve_delta -= r_delta as i64;
        insurance_delta -= i_delta as i64;

        Settlement {
            match_5_prize_per_winner: 0,
            match_4_prize_per_winner: per_4,
            match_3_prize_per_winner: per_3,
            pool_allocated_to_draw,
            new_jackpot_balance,
            reserve_delta,
            insurance_delta,
            was_rolldown: true,
            shortfall,
        }
    } else {
        // Normal mode: fixed tier table paid from reserve with insurance
        // fallback; jackpot goes to the match-5 winners (if any) and resets.
        let fixed_owed =
            counts.match_4 as u64 * MATCH_4_PRIZE + counts.match_3 as u64 * MATCH_3_PRIZE;
        let available = reserve_balance + insurance_balance;

        let (per_4, per_3) = if available >= fixed_owed || fixed_owed == 0 {
            (MATCH_4_PRIZE, MATCH_3_PRIZE)
        } else {
            // ReserveShortfall: scale every fixed tier down proportionally to
            // what's actually available rather than paying some tiers in
            // full and others nothing.
            shortfall = fixed_owed - available;
            let scale = |amount: u64| -> u64 {
                ((amount as u128 * available as u128) / fixed_owed.max(1) as u128) as u64
            };
            (scale(MATCH_4_PRIZE), scale(MATCH_3_PRIZE))
        };

        let fixed_paid = per_4 * counts.match_4 as u64 + per_3 * counts.match_3 as u64;
        let from_reserve = fixed_paid.min(reserve_balance);
        let from_insurance = fixed_paid - from_reserve;
        reserve_delta -= from_reserve as i64;
        insurance_delta -= from_insurance as i64;

        let (match_5_prize_per_winner, new_jackpot_balance) = if counts.match_5 > 0 {
            let per_winner = jackpot_balance / counts.match_5 as u64;
            let paid = per_winner * counts.match_5 as u64;
            insurance_delta += (jackpot_balance - paid) as i64;
            let (replenished, r_delta, i_delta) =
                replenish_jackpot(seed_amount, reserve_balance, insurance_balance);
            reserve_delta -= r_delta as i64;
            insurance_delta -= i_delta as i64;
            (per_winner, replenished)
        } else {
            (0, jackpot_balance)
        };

        let pool_allocated_to_draw = fixed_paid + match_5_prize_per_winner * counts.match_5 as u64;

        Settlement {
            match_5_prize_per_winner,
            match_4_prize_per_winner: per_4,
            match_3_prize_per_winner: per_3,
            pool_allocated_to_draw,
            new_jackpot_balance,
            reserve_delta,
            insurance_delta,
            was_rolldown: false,
            shortfall,
        }
    }
}

/// Splits `pool` evenly across `winner_count` winners; returns
/// `(per_winner, remainder_to_sweep)`. A zero-winner tier sweeps its entire
/// pool.
fn tier_share(pool: u64, winner_count: u32) -> (u64, u64) {
    if winner_count == 0 {
        return (0, pool);
    }
    let per_winner = pool / winner_count as u64;
    (per_winner, pool - per_winner * winner_count as u64)
}

/// Tries to top the jackpot back up to `seed_amount`, drawing first from
/// reserve then insurance. Returns `(new_jackpot, drawn_from_reserve,
/// drawn_from_insurance)`; if neither pool can fully cover it, the jackpot is
/// left at 0 rather than partially funded.
fn replenish_jackpot(seed_amount: u64, reserve_balance: u64, insurance_balance: u64) -> (u64, u64, u64) {
    let from_reserve = seed_amount.min(reserve_balance);
    let remaining = seed_amount - from_reserve;
    let from_insurance = remaining.min(insurance_balance);
    if from_reserve + from_insurance == seed_amount {
        (seed_amount, from_reserve, from_insurance)
    } else {
        (0, 0, 0)
    }
}

pub fn handler(ctx: Context<FinalizeDraw>, params: FinalizeDrawParams) -> Result<()> {
    let clock = Clock::get()?;
    let state = &ctx.accounts.qp_state;

    let counts = params.counts;
    let recomputed = verification_hash_qp(
        state.current_draw_id,
        &state.winning_numbers,
        counts.match_5,
        counts.match_4,
        counts.match_3,
        params.nonce,
    );
    require!(
        recomputed == params.verification_hash,
        QuickPickError::VerificationHashMismatch
    );

    plausibility_guard(
        &[counts.match_5, counts.match_4, counts.match_3],
        &[
            PLAUSIBILITY_BPS_MATCH_5,
            PLAUSIBILITY_BPS_MATCH_4,
            PLAUSIBILITY_BPS_MATCH_3,
        ],
        state.current_draw_tickets,
    )?;

    // Rolldown trigger: a jackpot winner always wins fixed-jackpot mode
    // regardless of cap state; otherwise forced at hard cap, a fair
    // Bernoulli draw between soft and hard cap, and never below soft cap.
    let rolldown_active = if counts.match_5 > 0 {
        false
    } else if state.jackpot_balance >= state.hard_cap {
        true
    } else if state.jackpot_balance >= state.soft_cap {
        let p_bps = rolldown_probability_bps(state.jackpot_balance, state.soft_cap, state.hard_cap);
        rolldown_draw_bps(&state.randomness_seed) < p_bps
    } else {
        false
    };

    let settlement = settle(
        &counts,
        rolldown_active,
        state.jackpot_balance,
        state.reserve_balance,
        state.insurance_balance,
        state.seed_amount,
    );

    let draw_id = state.current_draw_id;
    let winning_numbers = state.winning_numbers;
    let randomness_seed = state.randomness_seed;
    let commit_slot = state.commit_slot;
    let executed_timestamp = state.executed_timestamp;
    let total_tickets = state.current_draw_tickets;
    let next_interval = state.draw_interval;
    let shortfall = settlement.shortfall;

    let draw_record = &mut ctx.accounts.draw_record;
    draw_record.draw_id = draw_id;
    draw_record.winning_numbers = winning_numbers;
    draw_record.randomness_proof = randomness_seed;
    draw_record.commit_slot = commit_slot;
    draw_record.executed_timestamp = executed_timestamp;
    draw_record.finalized_timestamp = clock.unix_timestamp;
    draw_record.total_tickets = total_tickets;
    draw_record.pool_allocated_to_draw = settlement.pool_allocated_to_draw;
    draw_record.match_5_winners = counts.match_5;
    draw_record.match_4_winners = counts.match_4;
    draw_record.match_3_winners = counts.match_3;
    draw_record.match_5_prize_per_winner = settlement.match_5_prize_per_winner;
    draw_record.match_4_prize_per_winner = settlement.match_4_prize_per_winner;
    draw_record.match_3_prize_per_winner = settlement.match_3_prize_per_winner;
    draw_record.was_rolldown = settlement.was_rolldown;
    draw_record.nonce = params.nonce;
    draw_record.verification_hash = params.verification_hash;
    draw_record.is_settled = false;
    draw_record.bump = ctx.bumps.draw_record;

    let state = &mut ctx.accounts.qp_state;
    state.jackpot_balance = settlement.new_jackpot_balance;
    state.reserve_balance = (state.reserve_balance as i64 + settlement.reserve_delta).max(0) as u64;
    state.insurance_balance = (state.insurance_balance as i64 + settlement.insurance_delta).max(0) as u64;
    state.total_prizes_paid = state
        .total_prizes_paid
        .checked_add(settlement.pool_allocated_to_draw)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.current_draw_id = state
        .current_draw_id
        .checked_add(1)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.current_draw_tickets = 0;
    state.next_draw_timestamp = state
        .next_draw_timestamp
        .checked_add(next_interval)
        .ok_or(QuickPickError::ArithmeticOverflow)?;
    state.rolldown_active = settlement.was_rolldown;
    state.phase = Phase::Open;
    state.refresh_house_fee();

    if shortfall > 0 {
        emit!(ReserveShortfallCovered {
            draw_id,
            shortfall,
            drawn_from_reserve: settlement.reserve_delta.unsigned_abs(),
            drawn_from_insurance: settlement.insurance_delta.unsigned_abs(),
            timestamp: clock.unix_timestamp,
        });
    }

    if counts.match_5 > 0 {
        emit!(JackpotWon {
            ticket: Pubkey::default(),
            winner: Pubkey::default(),
            draw_id,
            winning_numbers,
            jackpot_amount: settlement.match_5_prize_per_winner,
            timestamp: clock.unix_timestamp,
        });
    }

    emit!(DrawFinalized {
        draw_id,
        match_5_winners: counts.match_5,
        match_4_winners: counts.match_4,
        match_3_winners: counts.match_3,
        was_rolldown: settlement.was_rolldown,
        total_distributed: settlement.pool_allocated_to_draw,
        next_draw_timestamp: state.next_draw_timestamp,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "quickpick draw finalized: draw={} rolldown={} distributed={}",
        draw_id,
        settlement.was_rolldown,
        settlement.pool_allocated_to_draw
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_share_sweeps_remainder_and_empty_tiers() {
        assert_eq!(tier_share(100, 0), (0, 100));
        assert_eq!(tier_share(100, 3), (33, 1));
        assert_eq!(tier_share(100, 10), (10, 0));
    }

    #[test]
    fn replenish_jackpot_falls_to_zero_when_uncoverable() {
        assert_eq!(replenish_jackpot(1_000, 400, 400), (0, 0, 0));
        assert_eq!(replenish_jackpot(1_000, 600, 400), (1_000, 600, 400));
    }

    #[test]
    fn settle_normal_mode_pays_fixed_tiers() {
        let counts = WinnerCounts { match_5: 0, match_4: 2, match_3: 10 };
        let s = settle(&counts, false, 50_000_000_000, 10_000_000_000, 1_000_000_000, 50_000_000_000);
        assert!(!s.was_rolldown);
        assert_eq!(s.match_4_prize_per_winner, MATCH_4_PRIZE);
        assert_eq!(s.match_3_prize_per_winner, MATCH_3_PRIZE);
        assert_eq!(s.new_jackpot_balance, 50_000_000_000);
    }

    #[test]
    fn settle_rolldown_mode_splits_jackpot() {
        let counts = WinnerCounts { match_5: 0, match_4: 210, match_3: 3_100 };
        let jackpot = 200_000_000_000u64;
        let s = settle(&counts, true, jackpot, 10_000_000_000, 1_000_000_000, 50_000_000_000);
        assert!(s.was_rolldown);
        assert_eq!(s.match_5_prize_per_winner, 0);
        assert_eq!(s.match_4_prize_per_winner, jackpot * ROLLDOWN_MATCH_4_BPS / BPS_DENOMINATOR / 210);
    }
}
