use anchor_lang::prelude::*;

// ---------------------------------------------------------------------------
// PDA seeds
// ---------------------------------------------------------------------------

pub const LOTTERY_SEED: &[u8] = b"lottery";
pub const TICKET_SEED: &[u8] = b"ticket";
pub const BULK_TICKET_SEED: &[u8] = b"bulk_ticket";
pub const DRAW_SEED: &[u8] = b"draw";
pub const USER_SEED: &[u8] = b"user";
pub const PRIZE_POOL_USDC_SEED: &[u8] = b"prize_pool_usdc";
pub const HOUSE_FEE_USDC_SEED: &[u8] = b"house_fee_usdc";
pub const INSURANCE_POOL_USDC_SEED: &[u8] = b"insurance_pool_usdc";
pub const RESERVE_USDC_SEED: &[u8] = b"reserve_usdc";
pub const SWITCHBOARD_QUEUE_SEED: &[u8] = b"switchboard_queue";
pub const RANDOMNESS_ACCOUNT_SEED: &[u8] = b"randomness_account";

// ---------------------------------------------------------------------------
// Game identity (Main: 6-of-46 daily draw)
// ---------------------------------------------------------------------------

pub const TICKET_PRICE: u64 = 2_500_000; // $2.50 in 6-decimal micro-units
pub const NUMBERS_PER_TICKET: usize = 6;
pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 46;
pub const DRAW_INTERVAL: i64 = 86_400; // 24h, seconds
pub const TICKET_SALE_CUTOFF: i64 = 300; // sales close 5 minutes before draw

pub const MAX_BULK_TICKETS: u16 = 20;
pub const MIN_TICKET_PURCHASE: u16 = 1;
pub const MAX_TICKETS_PER_DRAW: u64 = 1_000_000;

// Suggested defaults for `initialize`; an operator can choose any values that
// satisfy the invariants checked in `InitializeParams::validate`. These
// particular figures are the ones exercised by this program's own tests.
pub const DEFAULT_SEED_AMOUNT: u64 = 500_000_000_000; // $500,000
pub const DEFAULT_SOFT_CAP: u64 = 1_750_000_000_000; // $1,750,000
pub const DEFAULT_HARD_CAP: u64 = 2_250_000_000_000; // $2,250,000

// ---------------------------------------------------------------------------
// Dynamic house fee (basis points), keyed off trailing jackpot size
// ---------------------------------------------------------------------------

pub const FEE_TIER_1_THRESHOLD: u64 = 500_000_000_000; // $500,000
pub const FEE_TIER_2_THRESHOLD: u64 = 1_000_000_000_000; // $1,000,000
pub const FEE_TIER_3_THRESHOLD: u64 = 1_500_000_000_000; // $1,500,000

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
// Fixed-prize tier (non-rolldown draws)
// ---------------------------------------------------------------------------

pub const MATCH_5_PRIZE: u64 = 10_000_000_000; // $10,000
pub const MATCH_4_PRIZE: u64 = 100_000_000; // $100
pub const MATCH_3_PRIZE: u64 = 4_000_000; // $4
// Match-2 has no fixed cash prize; it is redeemed as a free-ticket credit
// worth `ticket_price`, via `redeem_free_ticket`.

// ---------------------------------------------------------------------------
// Rolldown split (soft/hard cap triggered), basis points of the rolldown pool
// ---------------------------------------------------------------------------

pub const ROLLDOWN_MATCH_5_BPS: u64 = 2_000; // 20%
pub const ROLLDOWN_MATCH_4_BPS: u64 = 4_000; // 40%
pub const ROLLDOWN_MATCH_3_BPS: u64 = 4_000; // 40%

// ---------------------------------------------------------------------------
// Randomness freshness
// ---------------------------------------------------------------------------

// The committed randomness must be exactly one slot old when it is consumed:
// `seed_slot == current_slot - 1`, no slack either direction.
pub const RANDOMNESS_REQUIRED_SLOT_DELTA: u64 = 1;
pub const RANDOMNESS_MAX_RETRIES: u8 = 3;

/// Basis-point bound used by the rejection-sampling RNG to discard values
/// that would otherwise bias the modulo toward the low end of the range.
pub fn rejection_sampling_bound(number_range: u32) -> u32 {
    u32::MAX - (u32::MAX % number_range)
}

// ---------------------------------------------------------------------------
// Pure helpers shared by every instruction handler that touches fee or prize
// math. Kept here rather than duplicated at each call site, matching how the
// original constants module centralized its own bps arithmetic.
// ---------------------------------------------------------------------------

/// Dynamic house fee in bps, keyed off the jackpot balance the draw is
/// currently carrying.
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
/// jackpot_remainder). All four legs are computed from `price` so the split
/// always reconciles to the full amount; the jackpot takes whatever is left
/// after the other three bps-based cuts.
pub fn split_ticket_price(price: u64, house_fee_bps: u16) -> Result<(u64, u64, u64, u64)> {
    let house_fee = price
        .checked_mul(house_fee_bps as u64)
        .and_then(|v| v.checked_div(BPS_DENOMINATOR))
        .ok_or(crate::errors::LottoError::ArithmeticOverflow)?;
    let insurance_cut = price
        .checked_mul(INSURANCE_CUT_BPS as u64)
        .and_then(|v| v.checked_div(BPS_DENOMINATOR))
        .ok_or(crate::errors::LottoError::ArithmeticOverflow)?;
    let reserve_cut = price
        .checked_mul(RESERVE_CUT_BPS as u64)
        .and_then(|v| v.checked_div(BPS_DENOMINATOR))
        .ok_or(crate::errors::LottoError::ArithmeticOverflow)?;
    let spent = house_fee
        .checked_add(insurance_cut)
        .and_then(|v| v.checked_add(reserve_cut))
        .ok_or(crate::errors::LottoError::ArithmeticOverflow)?;
    let jackpot_remainder = price
        .checked_sub(spent)
        .ok_or(crate::errors::LottoError::ArithmeticOverflow)?;
    Ok((house_fee, insurance_cut, reserve_cut, jackpot_remainder))
}

/// Linear-interpolation Bernoulli draw deciding whether a draw rolls down,
/// once `jackpot_balance` is between the soft and hard cap. Below soft_cap
/// the probability is 0; at or above hard_cap it is certain.
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

/// Draws a bps value in `[0, 10_000)` from four bytes of revealed
/// randomness, for comparison against `rolldown_probability_bps`.
pub fn rolldown_draw_bps(randomness: &[u8; 32]) -> u64 {
    let bytes: [u8; 4] = randomness[24..28].try_into().unwrap();
    u32::from_le_bytes(bytes) as u64 % BPS_DENOMINATOR
}

// ---------------------------------------------------------------------------
// Plausibility-guard bounds (basis points), highest tier first: m6, m5, m4,
// m3, m2. Deliberately generous relative to the true hypergeometric
// per-ticket match probability for 6-of-46 — this check only needs to catch
// grossly wrong submissions (e.g. a transposed digit), not police exact
// statistics.
// ---------------------------------------------------------------------------

pub const PLAUSIBILITY_BPS_MATCH_6: u64 = 1;
pub const PLAUSIBILITY_BPS_MATCH_5: u64 = 10;
pub const PLAUSIBILITY_BPS_MATCH_4: u64 = 100;
pub const PLAUSIBILITY_BPS_MATCH_3: u64 = 1_000;
pub const PLAUSIBILITY_BPS_MATCH_2: u64 = 3_000;

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
        assert_eq!(insurance, TICKET_PRICE * INSURANCE_CUT_BPS as u64 / BPS_DENOMINATOR);
        assert_eq!(reserve, TICKET_PRICE * RESERVE_CUT_BPS as u64 / BPS_DENOMINATOR);
    }

    #[test]
    fn rolldown_probability_bounds() {
        assert_eq!(rolldown_probability_bps(0, DEFAULT_SOFT_CAP, DEFAULT_HARD_CAP), 0);
        assert_eq!(
            rolldown_probability_bps(DEFAULT_HARD_CAP, DEFAULT_SOFT_CAP, DEFAULT_HARD_CAP),
            BPS_DENOMINATOR
        );
        let mid = DEFAULT_SOFT_CAP + (DEFAULT_HARD_CAP - DEFAULT_SOFT_CAP) / 2;
        let prob = rolldown_probability_bps(mid, DEFAULT_SOFT_CAP, DEFAULT_HARD_CAP);
        assert!(prob > 4_000 && prob < 6_000);
    }

    #[test]
    fn validate_numbers_rejects_duplicates_and_out_of_range() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 6], MAX_NUMBER));
        assert!(!validate_numbers(&[1, 1, 3, 4, 5, 6], MAX_NUMBER));
        assert!(!validate_numbers(&[0, 2, 3, 4, 5, 6], MAX_NUMBER));
        assert!(!validate_numbers(&[1, 2, 3, 4, 5, 47], MAX_NUMBER));
    }
}
