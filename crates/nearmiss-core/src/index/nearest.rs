//! Nearest-key index over a sorted set

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

use crate::index::AddressIndex;
use crate::{Address, Error, MatchResult, Result, Strategy};

/// Rough per-entry cost of a `BTreeSet` slot beyond the key itself
const BTREE_SLOT_OVERHEAD: usize = std::mem::size_of::<usize>();

/// Finds the target with the smallest absolute numeric distance to a query
///
/// When the closest keys below and above are equally far away, the lower one
/// wins. Numeric distance only picks the candidate; the reported score is the
/// shared hex prefix with that candidate.
#[derive(Debug, Clone, Default)]
pub struct NearestKeyIndex {
    keys: BTreeSet<Address>,
}

impl NearestKeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(targets: impl IntoIterator<Item = Address>) -> Self {
        Self {
            keys: targets.into_iter().collect(),
        }
    }

    /// Stored key closest to `query`, ties resolved toward the lower key
    pub fn nearest_key(&self, query: &Address) -> Result<Address> {
        let below = self.keys.range(..=*query).next_back();
        let above = self.keys.range((Excluded(*query), Unbounded)).next();

        match (below, above) {
            (Some(low), Some(high)) => {
                if high.distance(query) < low.distance(query) {
                    Ok(*high)
                } else {
                    Ok(*low)
                }
            }
            (Some(low), None) => Ok(*low),
            (None, Some(high)) => Ok(*high),
            (None, None) => Err(Error::EmptyTargetSet),
        }
    }

    /// Returns true if `target` is stored
    pub fn contains(&self, target: &Address) -> bool {
        self.keys.contains(target)
    }
}

impl AddressIndex for NearestKeyIndex {
    fn strategy(&self) -> Strategy {
        Strategy::Nearest
    }

    fn extend(&mut self, targets: &[Address]) -> Result<()> {
        self.keys.extend(targets.iter().copied());
        Ok(())
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn memory_footprint(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.keys.len() * (std::mem::size_of::<Address>() + BTREE_SLOT_OVERHEAD)
    }

    #[inline]
    fn find_closest_match(&self, query: &Address) -> MatchResult {
        match self.nearest_key(query) {
            Ok(nearest) => MatchResult::scored(*query, nearest),
            Err(_) => MatchResult::unmatched(*query),
        }
    }
}
