//! Pure ticket-scanning and verification-hash functions, mirroring the
//! on-chain `helpers` module in both `lottery` and `quickpick` byte-for-byte.
//! This is the off-chain half of the commitment scheme described in
//! DESIGN.md: the on-chain program never trusts anything from here except
//! the `(per_tier_counts, nonce)` pair it can independently re-hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Which game a scan is being run for. Determines tier count and hash
/// preimage layout; the two games are otherwise scanned identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameId {
    Main,
    QuickPick,
}

/// One ticket's numbers as read off-chain, tagged by where it came from so a
/// malformed account can be named in a diagnostic without re-deriving its
/// pubkey.
#[derive(Debug, Clone)]
pub struct ScannedTicket {
    pub numbers: Vec<u8>,
}

/// Per-tier winner counts for the Main game (match ∈ {6,5,4,3,2}).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MainTierCounts {
    pub match_6: u32,
    pub match_5: u32,
    pub match_4: u32,
    pub match_3: u32,
    pub match_2: u32,
}

/// Per-tier winner counts for QuickPick (match ∈ {5,4,3}).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct QuickPickTierCounts {
    pub match_5: u32,
    pub match_4: u32,
    pub match_3: u32,
}

/// The indexer's full output for one draw, per §6's external interface:
/// `(per_tier_counts, nonce, verification_hash_hex, total_tickets_scanned, duration_ms)`.
#[derive(Debug, Clone)]
pub struct ScanResult<T> {
    pub counts: T,
    pub nonce: u64,
    pub verification_hash: [u8; 32],
    pub total_tickets_scanned: u64,
    pub duration_ms: u64,
}

/// Counts how many of `ticket` appear in sorted `winning`, both assumed
/// sorted ascending, via a two-pointer merge in O(len). Identical to the
/// on-chain `count_matches` in both programs' `helpers` modules.
pub fn count_matches(ticket: &[u8], winning: &[u8]) -> u8 {
    let mut i = 0;
    let mut j = 0;
    let mut matches = 0u8;
    while i < ticket.len() && j < winning.len() {
        match ticket[i].cmp(&winning[j]) {
            std::cmp::Ordering::Equal => {
                matches += 1;
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
        }
    }
    matches
}

/// `SHA-256(draw_id_le_8 || winning_numbers_6 || m6_le_4 || m5_le_4 ||
/// m4_le_4 || m3_le_4 || m2_le_4 || nonce_le_8)`, 42 bytes of preimage.
/// Must stay byte-identical to `lottery::helpers::verification_hash_main`.
pub fn verification_hash_main(
    draw_id: u64,
    winning_numbers: &[u8; 6],
    counts: &MainTierCounts,
    nonce: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(draw_id.to_le_bytes());
    hasher.update(winning_numbers);
    hasher.update(counts.match_6.to_le_bytes());
    hasher.update(counts.match_5.to_le_bytes());
    hasher.update(counts.match_4.to_le_bytes());
    hasher.update(counts.match_3.to_le_bytes());
    hasher.update(counts.match_2.to_le_bytes());
    hasher.update(nonce.to_le_bytes());
    hasher.finalize().into()
}

/// `SHA-256(draw_id_le_8 || winning_numbers_5 || m5_le_4 || m4_le_4 ||
/// m3_le_4 || nonce_le_8)`, 33 bytes of preimage. Must stay byte-identical to
/// `quickpick::helpers::verification_hash_qp`.
pub fn verification_hash_qp(
    draw_id: u64,
    winning_numbers: &[u8; 5],
    counts: &QuickPickTierCounts,
    nonce: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(draw_id.to_le_bytes());
    hasher.update(winning_numbers);
    hasher.update(counts.match_5.to_le_bytes());
    hasher.update(counts.match_4.to_le_bytes());
    hasher.update(counts.match_3.to_le_bytes());
    hasher.update(nonce.to_le_bytes());
    hasher.finalize().into()
}

/// Scans every ticket for a Main draw, counting matches per tier. Skips
/// (rather than aborts on) malformed tickets — the caller is expected to
/// have already filtered those out and logged a `MalformedTicket` warning
/// per §7, so this function only ever sees well-formed 6-number tickets.
pub fn scan_main(tickets: &[ScannedTicket], winning_numbers: &[u8; 6]) -> MainTierCounts {
    let mut counts = MainTierCounts::default();
    for ticket in tickets {
        match count_matches(&ticket.numbers, winning_numbers) {
            6 => counts.match_6 += 1,
            5 => counts.match_5 += 1,
            4 => counts.match_4 += 1,
            3 => counts.match_3 += 1,
            2 => counts.match_2 += 1,
            _ => {}
        }
    }
    counts
}

/// Scans every ticket for a QuickPick draw, counting matches per tier.
pub fn scan_quickpick(tickets: &[ScannedTicket], winning_numbers: &[u8; 5]) -> QuickPickTierCounts {
    let mut counts = QuickPickTierCounts::default();
    for ticket in tickets {
        match count_matches(&ticket.numbers, winning_numbers) {
            5 => counts.match_5 += 1,
            4 => counts.match_4 += 1,
            3 => counts.match_3 += 1,
            _ => {}
        }
    }
    counts
}

pub fn hex_encode(hash: &[u8; 32]) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(numbers: &[u8]) -> ScannedTicket {
        ScannedTicket { numbers: numbers.to_vec() }
    }

    #[test]
    fn scan_main_tallies_every_tier() {
        let winning = [3u8, 12, 18, 27, 33, 41];
        let tickets = vec![
            ticket(&[3, 12, 18, 27, 33, 41]),
            ticket(&[3, 12, 18, 27, 33, 40]),
            ticket(&[1, 2, 4, 5, 6, 7]),
        ];
        let counts = scan_main(&tickets, &winning);
        assert_eq!(counts.match_6, 1);
        assert_eq!(counts.match_5, 1);
        assert_eq!(counts.match_4, 0);
    }

    #[test]
    fn verification_hash_main_is_sensitive_to_every_field() {
        let winning = [1u8, 2, 3, 4, 5, 6];
        let counts = MainTierCounts { match_6: 0, match_5: 1, match_4: 2, match_3: 3, match_2: 4 };
        let h1 = verification_hash_main(1, &winning, &counts, 999);
        let h2 = verification_hash_main(1, &winning, &counts, 1000);
        let h3 = verification_hash_main(2, &winning, &counts, 999);
        assert_ne!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn hex_encode_round_trips_length() {
        let hash = [0xabu8; 32];
        let hex = hex_encode(&hash);
        assert_eq!(hex.len(), 64);
        assert!(hex.starts_with("abab"));
    }
}
