//! Base-26 alphabetic encoding of creation timestamps

/// Numerals for digits 0..26
const NUMERALS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BASE: u64 = 26;

/// Encode a `YYYYMMDDHHMMSS` value as a sortable alphabetic stem.
///
/// The value is written in base 26 (`A` = 0, most significant numeral
/// first, no leading zeros) and the leading numeral is dropped. Existing
/// archives were named this way, so the drop must stay. A value with a
/// single numeral, including 0, is returned as that numeral.
pub fn encode(value: u64) -> String {
    let mut digits = Vec::new();
    let mut rest = value;
    loop {
        digits.push(NUMERALS[(rest % BASE) as usize]);
        rest /= BASE;
        if rest == 0 {
            break;
        }
    }
    digits.reverse();

    let stem = if digits.len() > 1 { &digits[1..] } else { &digits[..] };
    // NUMERALS is ASCII
    stem.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(20210501120000), "SUHZPXTXW");
        assert_eq!(encode(20210501120001), "SUHZPXTXX");
        assert_eq!(encode(20000101000000), "RUCXFPOWE");
        assert_eq!(encode(20991231235959), "WNNIAQMYX");
    }

    #[test]
    fn test_encode_zero_is_single_numeral() {
        assert_eq!(encode(0), "A");
    }

    #[test]
    fn test_encode_small_values() {
        assert_eq!(encode(7), "H");
        // 26 is "BA" in full, leading numeral dropped
        assert_eq!(encode(26), "A");
        assert_eq!(encode(27), "B");
    }

    #[test]
    fn test_encode_is_deterministic() {
        assert_eq!(encode(20150704093012), encode(20150704093012));
    }

    #[test]
    fn test_encode_preserves_order_within_century() {
        let stamps = [
            20000101000000u64,
            20000101000001,
            20091231235959,
            20100101000000,
            20150704093012,
            20210501120000,
            20210501120001,
            20991231235959,
        ];
        for pair in stamps.windows(2) {
            let (a, b) = (encode(pair[0]), encode(pair[1]));
            assert_eq!(a.len(), b.len());
            assert!(a < b, "{} ({}) should sort before {} ({})", pair[0], a, pair[1], b);
        }
    }
}
