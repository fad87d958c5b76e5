//! Per-query match result

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ADDRESS_HEX_LEN;
use crate::{match_length, Address};

/// Outcome of one `find_closest_match` call
///
/// Ordered by `(match_length, query)`; `nearest` only breaks the remaining
/// ties so that ordering stays consistent with equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchResult {
    /// Leading hex digits shared with the nearest target, `0..=40`
    pub match_length: usize,
    /// The address that was looked up
    pub query: Address,
    /// Target the score was computed against, when the strategy reports one
    pub nearest: Option<Address>,
}

impl MatchResult {
    /// Score `query` against a concrete target
    #[inline]
    pub fn scored(query: Address, nearest: Address) -> Self {
        Self {
            match_length: match_length(&query, &nearest),
            query,
            nearest: Some(nearest),
        }
    }

    /// Result carrying a prefix length but no target
    #[inline]
    pub fn prefix_only(query: Address, match_length: usize) -> Self {
        Self {
            match_length,
            query,
            nearest: None,
        }
    }

    /// Result for an index with no targets
    #[inline]
    pub fn unmatched(query: Address) -> Self {
        Self::prefix_only(query, 0)
    }

    /// Returns true if every digit matched
    pub fn is_exact(&self) -> bool {
        self.match_length == ADDRESS_HEX_LEN
    }

    /// Share of the 40 digits that matched, in percent
    pub fn strength_percent(&self) -> f64 {
        100.0 * self.match_length as f64 / ADDRESS_HEX_LEN as f64
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} digits ({:3.2}%)",
            self.match_length,
            ADDRESS_HEX_LEN,
            self.strength_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_by_length_then_query() {
        let low_query = Address::from(1u128);
        let high_query = Address::from(2u128);

        let short = MatchResult::prefix_only(high_query, 3);
        let long = MatchResult::prefix_only(low_query, 4);
        assert!(short < long);

        let a = MatchResult::prefix_only(low_query, 4);
        let b = MatchResult::prefix_only(high_query, 4);
        assert!(a < b);
    }

    #[test]
    fn test_scored_uses_prefix_rule() {
        let query: Address = "abcd000000000000000000000000000000000000".parse().unwrap();
        let target: Address = "abce000000000000000000000000000000000000".parse().unwrap();
        let result = MatchResult::scored(query, target);
        assert_eq!(result.match_length, 3);
        assert_eq!(result.nearest, Some(target));
        assert!(!result.is_exact());
        assert!(MatchResult::scored(query, query).is_exact());
    }

    #[test]
    fn test_display() {
        let result = MatchResult::prefix_only(Address::ZERO, 10);
        assert_eq!(result.to_string(), "10 of 40 digits (25.00%)");
    }
}
