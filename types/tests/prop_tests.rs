use proptest::prelude::*;

use truth_types::{TruthAmount, TxHash, Timestamp, Verdict, TRUTH_UNIT};

proptest! {
    /// TruthAmount: from_truth and whole_truth are inverses for whole units.
    #[test]
    fn truth_amount_unit_roundtrip(units in 0u128..1_000_000_000) {
        let amount = TruthAmount::from_truth(units);
        prop_assert_eq!(amount.whole_truth(), units);
    }

    /// TruthAmount: checked_sub returns None when b > a.
    #[test]
    fn truth_amount_checked_sub_underflow(a in 0u128..1_000_000, b in 0u128..1_000_000) {
        let result = TruthAmount::new(a).checked_sub(TruthAmount::new(b));
        if b > a {
            prop_assert!(result.is_none());
        } else {
            prop_assert_eq!(result, Some(TruthAmount::new(a - b)));
        }
    }

    /// mul_bps never exceeds the original amount for rates up to 100%.
    #[test]
    fn mul_bps_fraction_bounded(raw in 0u128..u64::MAX as u128, bps in 0u32..=10_000) {
        let amount = TruthAmount::new(raw);
        prop_assert!(amount.mul_bps(bps) <= amount);
    }

    /// mul_bps is monotonic in the rate.
    #[test]
    fn mul_bps_monotonic(raw in 0u128..u64::MAX as u128, a in 0u32..40_000, b in 0u32..40_000) {
        let amount = TruthAmount::new(raw);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(amount.mul_bps(lo) <= amount.mul_bps(hi));
    }

    /// floor_to_unit yields a whole number of tokens not above the input.
    #[test]
    fn floor_to_unit_is_whole(raw in 0u128..u64::MAX as u128) {
        let floored = TruthAmount::new(raw).floor_to_unit();
        prop_assert!(floored.raw() <= raw);
        prop_assert_eq!(floored.raw() % TRUTH_UNIT, 0);
        prop_assert!(raw - floored.raw() < TRUTH_UNIT);
    }

    /// Display then parse returns the same amount.
    #[test]
    fn display_parse_roundtrip(raw in 0u128..u64::MAX as u128) {
        let amount = TruthAmount::new(raw);
        let parsed: TruthAmount = amount.to_string().parse().unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// Verified requires strictly more verify stake.
    #[test]
    fn verdict_requires_strict_majority(v in 0u128..1_000_000, d in 0u128..1_000_000) {
        let verdict = Verdict::from_stakes(TruthAmount::new(v), TruthAmount::new(d));
        prop_assert_eq!(verdict == Verdict::Verified, v > d);
    }

    /// TxHash bincode serialization roundtrip.
    #[test]
    fn tx_hash_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = TxHash::new(bytes);
        let encoded = bincode::serialize(&hash).unwrap();
        let decoded: TxHash = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded.as_bytes(), hash.as_bytes());
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
        prop_assert_eq!(now.elapsed_since(t), 0);
    }
}
