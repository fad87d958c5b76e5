//! Static sorted-array index with predecessor lookup

use crate::index::AddressIndex;
use crate::{Address, Error, MatchResult, Result, Strategy};

/// Immutable sorted array of targets
///
/// A query is scored against its predecessor, the largest target `<=` the
/// query, even when the next target up is numerically closer. That keeps the
/// lookup to a single binary search.
///
/// Below the smallest target there is no predecessor. [`predecessor`] reports
/// that as [`Error::NoPredecessor`]; [`find_closest_match`] treats the targets
/// as a ring and wraps to the largest one.
///
/// The array cannot grow: [`extend`] fails with [`Error::UnsupportedExtend`].
///
/// [`predecessor`]: SortedArrayIndex::predecessor
/// [`find_closest_match`]: AddressIndex::find_closest_match
/// [`extend`]: AddressIndex::extend
#[derive(Debug, Clone)]
pub struct SortedArrayIndex {
    values: Box<[Address]>,
}

impl SortedArrayIndex {
    pub fn build(targets: impl IntoIterator<Item = Address>) -> Self {
        let mut values: Vec<Address> = targets.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self {
            values: values.into_boxed_slice(),
        }
    }

    /// Largest stored target `<=` `query`
    pub fn predecessor(&self, query: &Address) -> Result<Address> {
        if self.values.is_empty() {
            return Err(Error::EmptyTargetSet);
        }
        match self.values.partition_point(|value| value <= query) {
            0 => Err(Error::NoPredecessor),
            idx => Ok(self.values[idx - 1]),
        }
    }

    /// Targets in ascending order
    pub fn as_slice(&self) -> &[Address] {
        &self.values
    }
}

impl AddressIndex for SortedArrayIndex {
    fn strategy(&self) -> Strategy {
        Strategy::Bisect
    }

    fn extend(&mut self, _targets: &[Address]) -> Result<()> {
        Err(Error::UnsupportedExtend {
            strategy: Strategy::Bisect,
        })
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn memory_footprint(&self) -> usize {
        std::mem::size_of::<Self>() + std::mem::size_of_val(&*self.values)
    }

    #[inline]
    fn find_closest_match(&self, query: &Address) -> MatchResult {
        match self.predecessor(query) {
            Ok(found) => MatchResult::scored(*query, found),
            Err(Error::NoPredecessor) => match self.values.last() {
                Some(last) => MatchResult::scored(*query, *last),
                None => MatchResult::unmatched(*query),
            },
            Err(_) => MatchResult::unmatched(*query),
        }
    }
}
