//! Target indexes: three strategies behind one trait

mod nearest;
mod sorted;
mod trie;

pub use nearest::NearestKeyIndex;
pub use sorted::SortedArrayIndex;
pub use trie::PrefixTrieIndex;

use crate::{Address, MatchResult, Result, Strategy};

/// Lookup structure over a set of distinct target addresses
///
/// Implementations never mutate during `find_closest_match`, so a built
/// index can be queried from many threads at once.
pub trait AddressIndex: Send + Sync {
    /// Which strategy backs this index
    fn strategy(&self) -> Strategy;

    /// Add targets after construction; duplicates are ignored
    fn extend(&mut self, targets: &[Address]) -> Result<()>;

    /// Number of distinct targets stored
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Approximate resident size in bytes
    fn memory_footprint(&self) -> usize;

    /// Score `query` against the closest target this strategy can find
    fn find_closest_match(&self, query: &Address) -> MatchResult;
}

/// The closed set of strategies, dispatched without a vtable
#[derive(Debug, Clone)]
pub enum TargetIndex {
    Trie(PrefixTrieIndex),
    Nearest(NearestKeyIndex),
    Bisect(SortedArrayIndex),
}

impl AddressIndex for TargetIndex {
    fn strategy(&self) -> Strategy {
        match self {
            TargetIndex::Trie(index) => index.strategy(),
            TargetIndex::Nearest(index) => index.strategy(),
            TargetIndex::Bisect(index) => index.strategy(),
        }
    }

    fn extend(&mut self, targets: &[Address]) -> Result<()> {
        match self {
            TargetIndex::Trie(index) => index.extend(targets),
            TargetIndex::Nearest(index) => index.extend(targets),
            TargetIndex::Bisect(index) => index.extend(targets),
        }
    }

    fn len(&self) -> usize {
        match self {
            TargetIndex::Trie(index) => index.len(),
            TargetIndex::Nearest(index) => index.len(),
            TargetIndex::Bisect(index) => index.len(),
        }
    }

    fn memory_footprint(&self) -> usize {
        match self {
            TargetIndex::Trie(index) => index.memory_footprint(),
            TargetIndex::Nearest(index) => index.memory_footprint(),
            TargetIndex::Bisect(index) => index.memory_footprint(),
        }
    }

    #[inline]
    fn find_closest_match(&self, query: &Address) -> MatchResult {
        match self {
            TargetIndex::Trie(index) => index.find_closest_match(query),
            TargetIndex::Nearest(index) => index.find_closest_match(query),
            TargetIndex::Bisect(index) => index.find_closest_match(query),
        }
    }
}

impl From<PrefixTrieIndex> for TargetIndex {
    fn from(index: PrefixTrieIndex) -> Self {
        TargetIndex::Trie(index)
    }
}

impl From<NearestKeyIndex> for TargetIndex {
    fn from(index: NearestKeyIndex) -> Self {
        TargetIndex::Nearest(index)
    }
}

impl From<SortedArrayIndex> for TargetIndex {
    fn from(index: SortedArrayIndex) -> Self {
        TargetIndex::Bisect(index)
    }
}
