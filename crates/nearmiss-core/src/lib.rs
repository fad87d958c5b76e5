//! nearmiss-core: nearest-target lookup over a static set of Ethereum addresses
//!
//! Given a set of 160-bit target addresses loaded once at startup, answer
//! "how close is this freshly generated address to the nearest target?" as
//! fast as candidates can be produced.
//!
//! Three interchangeable strategies share the [`AddressIndex`] trait:
//!
//! | Strategy | Structure | `nearest` reported | Extendable |
//! |----------|-----------|--------------------|------------|
//! | [`Strategy::Trie`] | 16-ary digit trie | never | yes |
//! | [`Strategy::Nearest`] | `BTreeSet` of keys | numerically nearest | yes |
//! | [`Strategy::Bisect`] | sorted boxed slice | predecessor | no |
//!
//! Closeness is always reported as the number of leading hex digits shared
//! with the chosen target (see [`match_length`]).
//!
//! ## Concurrency
//!
//! Queries take `&self` and never mutate, so a built index can be shared by
//! reference across worker threads. `extend` takes `&mut self`.

mod address;
mod error;
mod index;
mod result;
mod score;
mod strategy;
mod targets;

pub use address::Address;
pub use error::Error;
pub use index::{AddressIndex, NearestKeyIndex, PrefixTrieIndex, SortedArrayIndex, TargetIndex};
pub use result::MatchResult;
pub use score::match_length;
pub use strategy::{build_index, Strategy};
pub use targets::{known_name, KnownTarget, TargetList, KNOWN_TARGETS};

pub type Result<T> = std::result::Result<T, Error>;

/// Address constants
pub mod constants {
    /// Address width in bytes
    pub const ADDRESS_BYTES: usize = 20;

    /// Address width in hex digits
    pub const ADDRESS_HEX_LEN: usize = 40;
}
