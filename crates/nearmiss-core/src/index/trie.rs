//! Prefix trie over hex digits
//!
//! Each node is one digit of some target's prefix. For the targets
//! `[abcde, abbcd, abcdf, acdef]` the trie looks like:
//!
//! ```text
//! a -> b -> b -> c -> d
//!       \-> c -> d -> e
//!                 \-> f
//!   \-> c -> d -> e -> f
//! ```
//!
//! A query walks down as far as its digits allow. The depth reached is the
//! longest prefix it shares with any target. The walk does not continue to a
//! leaf, so no nearest target is reported: this strategy trades that for the
//! smallest footprint on targets with shared prefixes and the cheapest build.

use std::num::NonZeroU32;

use crate::constants::ADDRESS_HEX_LEN;
use crate::index::AddressIndex;
use crate::{Address, Error, MatchResult, Result, Strategy};

const FANOUT: usize = 16;

/// Child links by digit; `None` means no target continues with that digit
type Node = [Option<NonZeroU32>; FANOUT];

const EMPTY_NODE: Node = [None; FANOUT];

/// Arena-backed 16-ary trie. `nodes[0]` is the root.
#[derive(Debug, Clone)]
pub struct PrefixTrieIndex {
    nodes: Vec<Node>,
    targets: usize,
}

impl PrefixTrieIndex {
    /// Create an empty trie
    pub fn new() -> Self {
        Self {
            nodes: vec![EMPTY_NODE],
            targets: 0,
        }
    }

    /// Build a trie holding every target
    pub fn build(targets: impl IntoIterator<Item = Address>) -> Result<Self> {
        let mut index = Self::new();
        for target in targets {
            index.insert(&target)?;
        }
        Ok(index)
    }

    /// Insert one target. Returns false if it was already present.
    pub fn insert(&mut self, target: &Address) -> Result<bool> {
        // a fresh target needs at most one node per digit
        if self.nodes.len() + ADDRESS_HEX_LEN > u32::MAX as usize {
            return Err(Error::TrieCapacityExceeded {
                nodes: self.nodes.len(),
            });
        }

        let mut node = 0usize;
        let mut created = false;
        for position in 0..ADDRESS_HEX_LEN {
            let digit = usize::from(target.nibble(position));
            node = match self.nodes[node][digit] {
                Some(child) => child.get() as usize,
                None => {
                    let child = self.push_node()?;
                    self.nodes[node][digit] = Some(child);
                    created = true;
                    child.get() as usize
                }
            };
        }

        if created {
            self.targets += 1;
        }
        Ok(created)
    }

    fn push_node(&mut self) -> Result<NonZeroU32> {
        let id = u32::try_from(self.nodes.len())
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(Error::TrieCapacityExceeded {
                nodes: self.nodes.len(),
            })?;
        self.nodes.push(EMPTY_NODE);
        Ok(id)
    }

    /// Number of allocated nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Length of the longest prefix `query` shares with any target
    #[inline]
    pub fn longest_prefix(&self, query: &Address) -> usize {
        let mut node = 0usize;
        for position in 0..ADDRESS_HEX_LEN {
            match self.nodes[node][usize::from(query.nibble(position))] {
                Some(child) => node = child.get() as usize,
                None => return position,
            }
        }
        ADDRESS_HEX_LEN
    }
}

impl Default for PrefixTrieIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressIndex for PrefixTrieIndex {
    fn strategy(&self) -> Strategy {
        Strategy::Trie
    }

    fn extend(&mut self, targets: &[Address]) -> Result<()> {
        for target in targets {
            self.insert(target)?;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.targets
    }

    fn memory_footprint(&self) -> usize {
        std::mem::size_of::<Self>() + self.nodes.capacity() * std::mem::size_of::<Node>()
    }

    #[inline]
    fn find_closest_match(&self, query: &Address) -> MatchResult {
        MatchResult::prefix_only(*query, self.longest_prefix(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pad a short hex prefix with zeros on the right to a full address
    fn addr(prefix: &str) -> Address {
        format!("{:0<40}", prefix).parse().unwrap()
    }

    fn sample_trie() -> PrefixTrieIndex {
        PrefixTrieIndex::build([addr("abcde"), addr("abbcd"), addr("acdef")]).unwrap()
    }

    #[test]
    fn test_exact_match_is_full_length() {
        let trie = sample_trie();
        let result = trie.find_closest_match(&addr("abbcd"));
        assert_eq!(result.match_length, 40);
        assert!(result.is_exact());
        assert_eq!(result.nearest, None);
    }

    #[test]
    fn test_two_digit_prefix() {
        let trie = sample_trie();
        assert_eq!(trie.find_closest_match(&addr("ab0")).match_length, 2);
        assert_eq!(trie.find_closest_match(&addr("ac1")).match_length, 2);
        assert_eq!(trie.find_closest_match(&addr("abcd1")).match_length, 4);
    }

    #[test]
    fn test_no_overlap() {
        let trie = sample_trie();
        let result = trie.find_closest_match(&addr("f"));
        assert_eq!(result.match_length, 0);
        assert_eq!(result.nearest, None);
    }

    #[test]
    fn test_empty_trie() {
        let trie = PrefixTrieIndex::new();
        assert!(trie.is_empty());
        let result = trie.find_closest_match(&Address::ZERO);
        assert_eq!(result.match_length, 0);
        assert_eq!(result.nearest, None);
    }

    #[test]
    fn test_duplicates_not_counted() {
        let upper: Address = "ABCDE00000000000000000000000000000000000".parse().unwrap();
        let trie = PrefixTrieIndex::build([addr("abcde"), upper, addr("abcde")]).unwrap();
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.node_count(), 41);
    }

    #[test]
    fn test_shared_prefixes_share_nodes() {
        let trie = sample_trie();
        // root, shared "a", shared "ab", two 38-node tails below "ab", 39 nodes below "a" for acdef
        assert_eq!(trie.node_count(), 1 + 1 + 1 + 38 + 38 + 39);
        assert!(trie.memory_footprint() >= trie.node_count() * std::mem::size_of::<Node>());
    }

    #[test]
    fn test_extend_keeps_previous_matches() {
        let mut trie = sample_trie();
        let before = trie.len();
        let query = addr("acdef");
        assert_eq!(trie.find_closest_match(&query).match_length, 40);

        trie.extend(&[addr("acdef"), addr("f00d")]).unwrap();
        assert_eq!(trie.len(), before + 1);
        assert_eq!(trie.find_closest_match(&query).match_length, 40);
        assert_eq!(trie.find_closest_match(&addr("f00d")).match_length, 40);
        assert_eq!(trie.find_closest_match(&addr("f0")).match_length, 3);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut state = 0x9e37_79b9_7f4a_7c15u64;
        let mut next = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let mut bytes = [0u8; 20];
            for chunk in bytes.chunks_mut(8) {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let word = state.to_be_bytes();
                chunk.copy_from_slice(&word[..chunk.len()]);
            }
            // bias the leading digits so prefixes collide
            bytes[0] &= 0x1f;
            Address::from(bytes)
        };

        let targets: Vec<Address> = (0..200).map(|_| next()).collect();
        let trie = PrefixTrieIndex::build(targets.iter().copied()).unwrap();

        for _ in 0..500 {
            let query = next();
            let expected = targets
                .iter()
                .map(|t| crate::match_length(&query, t))
                .max()
                .unwrap();
            assert_eq!(trie.find_closest_match(&query).match_length, expected);
        }
    }
}
