use anchor_lang::prelude::*;

// ---------------------------------------------------------------------------
// PDA seeds
// ---------------------------------------------------------------------------

pub const QP_STATE_SEED: &[u8] = b"qp_state";
pub const QP_TICKET_SEED: &[u8] = b"qp_ticket";
pub const QP_BULK_TICKET_SEED: &[u8] = b"qp_bulk_ticket";
pub const QP_DRAW_SEED: &[u8] = b"qp_draw";
pub const QP_USER_SEED: &[u8] = b"qp_user";
pub const QP_PRIZE_POOL_USDC_SEED: &[u8] = b"qp_prize_pool_usdc";
pub const QP_HOUSE_FEE_USDC_SEED: &[u8] = b"qp_house_fee_usdc";
pub const QP_INSURANCE_POOL_USDC_SEED: &[u8] = b"qp_insurance_pool_usdc";
pub const QP_RESERVE_USDC_SEED: &[u8] = b"qp_reserve_usdc";

/// Seed literal for the Main game's own `UserStats` PDA (`b"user"`), mirrored
/// here so `buy_ticket`/`buy_tickets_bulk` can derive and check the address
/// of the cross-program account they read for the spend gate without taking
/// a crate dependency on the Main program.
pub const MAIN_USER_SEED: &[u8] = b"user";

// ---------------------------------------------------------------------------
// Game identity (QuickPick: 5-of-35, every-4-hours draw)
// ---------------------------------------------------------------------------

pub const TICKET_PRICE: u64 = 1_500_000; // $1.50 in 6-decimal micro-units
pub const NUMBERS_PER_TICKET: usize = 5;
pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 35;
pub const DRAW_INTERVAL: i64 = 14_400; // 4h, seconds
pub const TICKET_SALE_CUTOFF: i64 = 120; // sales close 2 minutes before draw

pub const MAX_BULK_TICKETS: u16 = 20;
pub const MAX_TICKETS_PER_DRAW: u64 = 1_000_000;

/// Minimum wallet lifetime spend on the Main game required to buy a
/// QuickPick ticket at all, read from the Main program's `UserStats` PDA.
pub const MIN_MAIN_SPEND_FOR_QP: u64 = 50_000_000; // $50

// Suggested defaults for `initialize`; scaled down from Main's to match a
// game that draws six times as often and sells a correspondingly smaller
// jackpot per cycle. Exercised by this program's own tests.
pub const DEFAULT_SEED_AMOUNT: u64 = 50_000_000_000; // $50,000
pub const DEFAULT_SOFT_CAP: u64 = 150_000_000_000; // $150,000
pub const DEFAULT_HARD_CAP: u64 = 200_000_000_000; // $200,000

// ---------------------------------------------------------------------------
// Dynamic house fee (basis points), keyed off trailing jackpot size
// ---------------------------------------------------------------------------

pub const FEE_TIER_1_THRESHOLD: u64 = 50_000_000_000; // $50,000
pub const FEE_TIER_2_THRESHOLD: u64 = 100_000_000_000; // $100,000
pub const FEE_TIER_3_THRESHOLD: u64 = 150_000_000_000; // $150,000

pub const FEE_TIER_1_BPS: u16 = 2_800; // jackpot < tier 1
pub const FEE_TIER_2_BPS: u16 = 3_200; // tier 1 <= jackpot < tier 2
pub const FEE_TIER_3_BPS: u16 = 3_600; // tier 2 <= jackpot < tier 3
pub const FEE_TIER_4_BPS: u16 = 4_000; // jackpot >= tier 3

pub const MAX_HOUSE_FEE_BPS: u16 = 5_000;

// ---------------------------------------------------------------------------
// Per-purchase fee split (house_fee_bps is dynamic, the rest are fixed)
// ---------------------------------------------------------------------------

pub const INSURANCE_CUT_BPS: u16 = 200; // 2%
pub const RESERVE_CUT_BPS: u16 = 300; // 3%
pub const BPS_DENOMINATOR: u64 = 10_000;

// ---------------------------------------------------------------------------
// Fixed-prize tier (non-rolldown draws). QuickPick has no Match-2 analogue:
// only match ∈ {5,4,3} are scored, and match-5 is always the jackpot.
// ---------------------------------------------------------------------------

pub const MATCH_4_PRIZE: u64 = 50_000_000; // $50
pub const MATCH_3_PRIZE: u64 = 3_000_000; // $3

// ---------------------------------------------------------------------------
// Rolldown split (soft/hard cap triggered), basis points of the rolldown pool
// ---------------------------------------------------------------------------

pub const ROLLDOWN_MATCH_4_BPS: u64 = 6_000; // 60%
pub const ROLLDOWN_MATCH_3_BPS: u64 = 4_000; // 40%

// ---------------------------------------------------------------------------
// Randomness freshness
// ---------------------------------------------------------------------------

pub const RANDOMNESS_REQUIRED_SLOT_DELTA: u64 = 1;

/// Basis-point bound used by the rejection-sampling RNG to discard values
/// that would otherwise bias the modulo toward the low end of the range.
pub fn rejection_sampling_bound(number_range: u32) -> u32 {
    u32::MAX - (u32::MAX % number_range)
}

// ---------------------------------------------------------------------------
// Pure helpers shared by every instruction handler that touches fee or prize
// math.
// ---------------------------------------------------------------------------

pub fn calculate_house_fee_bps(jackpot_balance: u64) -> u16 {
    if jackpot_balance >= FEE_TIER_3_THRESHOLD {
        FEE_TIER_4_BPS
    } else if jackpot_balance >= FEE_TIER_2_THRESHOLD {
        FEE_TIER_3_BPS
    } else if jackpot_balance >= FEE_TIER_1_THRESHOLD {
        FEE_TIER_2_BPS
    } else {
        FEE_TIER_1_BPS
    }
}

/// Splits one ticket sale into (house_fee, insurance_cut, reserve_cut,
/// jackpot_remainder), same accounting as the Main game's split.
pub fn split_ticket_price(price: u64, house_fee_bps: u16) -> Result<(u64, u64, u64, u64)> {
    let house_fee = price
        .checked_mul(house_fee_bps as u64)
        .and_then(|v| v.checked_div(BPS_DENOMINATOR))
        .ok_or(crate::errors::QuickPickError::ArithmeticOverflow)?;
    let insurance_cut = price
        .checked_mul(INSURANCE_CUT_BPS as u64)
        .and_then(|v| v.checked_div(BPS_DENOMINATOR))
        .ok_or(crate::errors::QuickPickError::ArithmeticOverflow)?;
    let reserve_cut = price
        .checked_mul(RESERVE_CUT_BPS as u64)
        .and_then(|v| v.checked_div(BPS_DENOMINATOR))
        .ok_or(crate::errors::QuickPickError::ArithmeticOverflow)?;
    let spent = house_fee
        .checked_add(insurance_cut)
        .and_then(|v| v.checked_add(reserve_cut))
        .ok_or(crate::errors::QuickPickError::ArithmeticOverflow)?;
    let jackpot_remainder = price
        .checked_sub(spent)
        .ok_or(crate::errors::QuickPickError::ArithmeticOverflow)?;
    Ok((house_fee, insurance_cut, reserve_cut, jackpot_remainder))
}

/// Linear-interpolation Bernoulli draw deciding whether a draw rolls down,
/// identical formula to Main, evaluated against QP's own caps.
pub fn rolldown_probability_bps(jackpot_balance: u64, soft_cap: u64, hard_cap: u64) -> u64 {
    if jackpot_balance >= hard_cap {
        return BPS_DENOMINATOR;
    }
    if jackpot_balance < soft_cap {
        return 0;
    }
    let span = hard_cap.saturating_sub(soft_cap).max(1);
    let progress = jackpot_balance.saturating_sub(soft_cap);
    progress
        .saturating_mul(BPS_DENOMINATOR)
        .saturating_div(span)
}

pub fn rolldown_draw_bps(randomness: &[u8; 32]) -> u64 {
    let bytes: [u8; 4] = randomness[24..28].try_into().unwrap();
    u32::from_le_bytes(bytes) as u64 % BPS_DENOMINATOR
}

// ---------------------------------------------------------------------------
// Plausibility-guard bounds (basis points), highest tier first: m5, m4, m3.
// Generous relative to the true hypergeometric per-ticket match probability
// for 5-of-35 — this only needs to catch grossly wrong submissions.
// ---------------------------------------------------------------------------

pub const PLAUSIBILITY_BPS_MATCH_5: u64 = 1;
pub const PLAUSIBILITY_BPS_MATCH_4: u64 = 20;
pub const PLAUSIBILITY_BPS_MATCH_3: u64 = 300;

pub fn validate_numbers(numbers: &[u8], number_range: u8) -> bool {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != numbers.len() {
        return false;
    }
    numbers.iter().all(|&n| n >= MIN_NUMBER && n <= number_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_tiers_match_thresholds() {
        assert_eq!(calculate_house_fee_bps(0), FEE_TIER_1_BPS);
        assert_eq!(calculate_house_fee_bps(FEE_TIER_1_THRESHOLD), FEE_TIER_2_BPS);
        assert_eq!(calculate_house_fee_bps(FEE_TIER_2_THRESHOLD), FEE_TIER_3_BPS);
        assert_eq!(calculate_house_fee_bps(FEE_TIER_3_THRESHOLD), FEE_TIER_4_BPS);
        assert_eq!(calculate_house_fee_bps(u64::MAX), FEE_TIER_4_BPS);
    }

    #[test]
    fn ticket_price_split_reconciles() {
        let (house, insurance, reserve, jackpot) =
            split_ticket_price(TICKET_PRICE, FEE_TIER_1_BPS).unwrap();
        assert_eq!(house + insurance + reserve + jackpot, TICKET_PRICE);
    }

    #[test]
    fn rolldown_probability_bounds() {
        assert_eq!(rolldown_probability_bps(0, DEFAULT_SOFT_CAP, DEFAULT_HARD_CAP), 0);
        assert_eq!(
            rolldown_probability_bps(DEFAULT_HARD_CAP, DEFAULT_SOFT_CAP, DEFAULT_HARD_CAP),
            BPS_DENOMINATOR
        );
    }

    #[test]
    fn validate_numbers_rejects_duplicates_and_out_of_range() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5], MAX_NUMBER));
        assert!(!validate_numbers(&[1, 1, 3, 4, 5], MAX_NUMBER));
        assert!(!validate_numbers(&[0, 2, 3, 4, 5], MAX_NUMBER));
        assert!(!validate_numbers(&[1, 2, 3, 4, 36], MAX_NUMBER));
    }
}
