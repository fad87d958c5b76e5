//! 160-bit address value type

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{ADDRESS_BYTES, ADDRESS_HEX_LEN};
use crate::{Error, Result};

/// 20-byte Ethereum address, read as a big-endian 160-bit unsigned integer
///
/// Byte order equals numeric order, so the derived `Ord` is the numeric one.
/// The canonical text form is 40 lowercase hex digits without a prefix.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_BYTES]);
    pub const MAX: Address = Address([0xffu8; ADDRESS_BYTES]);

    pub const fn from_bytes(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    /// Address from a 40-digit hex literal, `0x` prefix optional, usable in
    /// `const` items
    ///
    /// Panics on a wrong length or a non-hex digit, so a bad constant fails
    /// the build.
    pub const fn from_hex_literal(literal: &str) -> Self {
        let text = literal.as_bytes();
        let offset = if text.len() == ADDRESS_HEX_LEN + 2 && text[0] == b'0' && (text[1] == b'x' || text[1] == b'X') {
            2
        } else {
            0
        };
        if text.len() != ADDRESS_HEX_LEN + offset {
            panic!("address literal needs 40 hex digits");
        }

        let mut bytes = [0u8; ADDRESS_BYTES];
        let mut position = 0;
        while position < ADDRESS_HEX_LEN {
            let digit = match text[offset + position] {
                c @ b'0'..=b'9' => c - b'0',
                c @ b'a'..=b'f' => c - b'a' + 10,
                c @ b'A'..=b'F' => c - b'A' + 10,
                _ => panic!("address literal has a non-hex digit"),
            };
            if position % 2 == 0 {
                bytes[position / 2] = digit << 4;
            } else {
                bytes[position / 2] |= digit;
            }
            position += 1;
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Hex digit at `position` (0 is the most significant), as a value in `0..16`
    ///
    /// Panics if `position >= 40`.
    #[inline]
    pub fn nibble(&self, position: usize) -> u8 {
        let byte = self.0[position / 2];
        if position % 2 == 0 {
            byte >> 4
        } else {
            byte & 0x0f
        }
    }

    /// Canonical 40-digit lowercase hex form
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Absolute numeric difference `|self - other|` as big-endian bytes
    pub(crate) fn distance(&self, other: &Address) -> [u8; ADDRESS_BYTES] {
        let (high, low) = if self >= other { (self, other) } else { (other, self) };
        let mut out = [0u8; ADDRESS_BYTES];
        let mut borrow = false;
        for i in (0..ADDRESS_BYTES).rev() {
            let (digit, under_a) = high.0[i].overflowing_sub(low.0[i]);
            let (digit, under_b) = digit.overflowing_sub(borrow as u8);
            out[i] = digit;
            borrow = under_a || under_b;
        }
        out
    }
}

impl FromStr for Address {
    type Err = Error;

    /// Parse and normalize an address
    ///
    /// Accepts surrounding whitespace, an optional `0x`/`0X` prefix, mixed case
    /// and 1 to 40 digits (shorter input is left-padded with zeros).
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty()
            || digits.len() > ADDRESS_HEX_LEN
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(Error::MalformedAddress(s.to_string()));
        }

        let mut padded = [b'0'; ADDRESS_HEX_LEN];
        padded[ADDRESS_HEX_LEN - digits.len()..].copy_from_slice(digits.as_bytes());

        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(padded, &mut bytes)
            .map_err(|_| Error::MalformedAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    fn from(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<u128> for Address {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes[ADDRESS_BYTES - 16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; ADDRESS_HEX_LEN];
        hex::encode_to_slice(self.0, &mut buf).map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", self)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", self))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDC: &str = "a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";

    #[test]
    fn test_parse_canonical() {
        let addr: Address = USDC.parse().unwrap();
        assert_eq!(addr.as_bytes()[0], 0xa0);
        assert_eq!(addr.as_bytes()[19], 0x48);
        assert_eq!(addr.to_string(), USDC);
        assert_eq!(addr.to_hex(), USDC);
    }

    #[test]
    fn test_hex_literal_matches_parser() {
        const PREFIXED: Address = Address::from_hex_literal("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        const BARE: Address = Address::from_hex_literal(USDC);

        assert_eq!(PREFIXED, USDC.parse::<Address>().unwrap());
        assert_eq!(BARE, PREFIXED);
        assert_eq!(Address::from_hex_literal(&"f".repeat(40)), Address::MAX);
    }

    #[test]
    #[should_panic(expected = "non-hex digit")]
    fn test_hex_literal_rejects_bad_digit() {
        Address::from_hex_literal("0xg0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
    }

    #[test]
    #[should_panic(expected = "40 hex digits")]
    fn test_hex_literal_rejects_short_input() {
        Address::from_hex_literal("0x10");
    }

    #[test]
    fn test_parse_normalizes_case_and_prefix() {
        let mixed: Address = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".parse().unwrap();
        let upper: Address = "0XA0B86991C6218B36C1D19D4A2E9EB0CE3606EB48".parse().unwrap();
        let padded: Address = "  a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48\n".parse().unwrap();
        let canonical: Address = USDC.parse().unwrap();

        assert_eq!(mixed, canonical);
        assert_eq!(upper, canonical);
        assert_eq!(padded, canonical);
        assert_eq!(mixed.to_string(), USDC);
    }

    #[test]
    fn test_parse_left_pads_short_input() {
        let addr: Address = "0x10".parse().unwrap();
        assert_eq!(addr, Address::from(0x10u128));
        assert_eq!(addr.to_string(), format!("{}10", "0".repeat(38)));
        assert_eq!(addr.to_string().len(), ADDRESS_HEX_LEN);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "0x", "xyz", "g0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", &"a".repeat(41)] {
            let err = bad.parse::<Address>().unwrap_err();
            assert!(matches!(err, Error::MalformedAddress(_)), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_ordering_is_numeric() {
        let low = Address::from(0x0fu128);
        let high = Address::from(0x10u128);
        let top: Address = "f000000000000000000000000000000000000000".parse().unwrap();
        assert!(low < high);
        assert!(high < top);
        assert!(Address::ZERO < low);
        assert!(top < Address::MAX);
    }

    #[test]
    fn test_nibbles() {
        let addr: Address = USDC.parse().unwrap();
        let digits: String = (0..ADDRESS_HEX_LEN)
            .map(|i| char::from_digit(addr.nibble(i) as u32, 16).unwrap())
            .collect();
        assert_eq!(digits, USDC);
    }

    #[test]
    fn test_distance() {
        let a = Address::from(0x29u128);
        let b = Address::from(0x10u128);
        assert_eq!(Address::from(a.distance(&b)), Address::from(0x19u128));
        assert_eq!(a.distance(&b), b.distance(&a));
        assert_eq!(a.distance(&a), [0u8; ADDRESS_BYTES]);

        // borrow across byte boundaries
        let c = Address::from(0x1_0000u128);
        let d = Address::from(0x1u128);
        assert_eq!(Address::from(c.distance(&d)), Address::from(0xffffu128));

        assert_eq!(Address::MAX.distance(&Address::ZERO), [0xffu8; ADDRESS_BYTES]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let addr: Address = USDC.parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", USDC));

        let parsed: Address = serde_json::from_str("\"0xA0B86991C6218B36C1D19D4A2E9EB0CE3606EB48\"").unwrap();
        assert_eq!(parsed, addr);

        assert!(serde_json::from_str::<Address>("\"0xnothex\"").is_err());
    }
}
