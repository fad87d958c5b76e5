//! Strategy selection: picks one of the index implementations by name

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Address, Error, NearestKeyIndex, PrefixTrieIndex, Result, SortedArrayIndex, TargetIndex};

/// Lookup strategy
///
/// - Trie: smallest footprint, fastest build, reports prefix length only
/// - Nearest: numerically nearest target, `O(log n)` per query
/// - Bisect: predecessor by binary search over a frozen array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Trie,
    Nearest,
    Bisect,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Trie, Strategy::Nearest, Strategy::Bisect];

    /// Build an index of this kind over `targets`
    pub fn build(self, targets: impl IntoIterator<Item = Address>) -> Result<TargetIndex> {
        let index = match self {
            Strategy::Trie => TargetIndex::Trie(PrefixTrieIndex::build(targets)?),
            Strategy::Nearest => TargetIndex::Nearest(NearestKeyIndex::build(targets)),
            Strategy::Bisect => TargetIndex::Bisect(SortedArrayIndex::build(targets)),
        };
        Ok(index)
    }

    /// Name of the backing structure, for display
    pub fn structure_name(&self) -> &'static str {
        match self {
            Strategy::Trie => "PrefixTrieIndex",
            Strategy::Nearest => "NearestKeyIndex",
            Strategy::Bisect => "SortedArrayIndex",
        }
    }

    /// Returns true if the index accepts targets after construction
    pub fn is_extendable(&self) -> bool {
        !matches!(self, Strategy::Bisect)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Trie => write!(f, "trie"),
            Strategy::Nearest => write!(f, "nearest"),
            Strategy::Bisect => write!(f, "bisect"),
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Nearest
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trie" | "prefix-trie" => Ok(Strategy::Trie),
            "nearest" | "nearest-key" => Ok(Strategy::Nearest),
            "bisect" | "sorted-array" => Ok(Strategy::Bisect),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

/// Build an index for the strategy named `name`
pub fn build_index(name: &str, targets: impl IntoIterator<Item = Address>) -> Result<TargetIndex> {
    let strategy: Strategy = name.parse()?;
    let index = strategy.build(targets)?;
    tracing::debug!(strategy = %strategy, "index built");
    Ok(index)
}
