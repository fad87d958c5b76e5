//! Closeness metric shared by every strategy

use crate::constants::ADDRESS_BYTES;
use crate::Address;

/// Number of leading hex digits shared by `a` and `b`, in `0..=40`
///
/// Counting stops at the first differing digit; later coincidences do not
/// count.
#[inline]
pub fn match_length(a: &Address, b: &Address) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    for i in 0..ADDRESS_BYTES {
        let diff = a[i] ^ b[i];
        if diff != 0 {
            return 2 * i + usize::from(diff & 0xf0 == 0);
        }
    }
    2 * ADDRESS_BYTES
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn text_prefix(a: &str, b: &str) -> usize {
        a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
    }

    #[test]
    fn test_identical() {
        let a = addr("dd36d7b54d489f4c2c0a7ad57fc7180badd60072");
        assert_eq!(match_length(&a, &a), 40);
    }

    #[test]
    fn test_first_digit_differs() {
        let a = addr("1000000000000000000000000000000000000000");
        let b = addr("2000000000000000000000000000000000000000");
        assert_eq!(match_length(&a, &b), 0);
    }

    #[test]
    fn test_odd_and_even_boundaries() {
        let base = addr("abcdef0123456789abcdef0123456789abcdef01");
        let low_nibble = addr("abcdef0123456789abcdef0123456789abcdef00");
        let high_nibble = addr("abcdef0123456789abcde00123456789abcdef01");
        assert_eq!(match_length(&base, &low_nibble), 39);
        assert_eq!(match_length(&base, &high_nibble), 21);
    }

    #[test]
    fn test_stops_at_first_mismatch() {
        // every digit but the third matches
        let a = addr("abcdef0123456789abcdef0123456789abcdef01");
        let b = addr("ab0def0123456789abcdef0123456789abcdef01");
        assert_eq!(match_length(&a, &b), 2);
    }

    #[test]
    fn test_agrees_with_text_comparison() {
        let samples = [
            "0000000000000000000000000000000000000000",
            "00000000006c3852cbef3e08e8df289169ede581",
            "a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
            "a0b86991c6218b36c1d19d4a2e9eb0ce3606eb49",
            "a0b8000000000000000000000000000000000000",
            "c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "ffffffffffffffffffffffffffffffffffffffff",
        ];
        for x in samples {
            for y in samples {
                assert_eq!(match_length(&addr(x), &addr(y)), text_prefix(x, y), "{} vs {}", x, y);
            }
        }
    }
}
