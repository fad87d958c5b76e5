//! nearmiss-guesser: random keypair search scored against a target index
//!
//! Workers generate secp256k1 keypairs, derive their Ethereum addresses and
//! ask a [`nearmiss_core::AddressIndex`] how many leading hex digits each one
//! shares with the closest target. The strongest guess is kept in a lock-free
//! [`BestScore`] and reported on the console and through Prometheus.
//!
//! ## Example
//!
//! ```no_run
//! use nearmiss_core::{Strategy, TargetList};
//! use nearmiss_guesser::{KeypairSource, SearchConfig, Searcher};
//!
//! let config = SearchConfig::default().with_max_guesses(10_000).without_metrics();
//! let index = Strategy::Nearest.build(TargetList::known())?;
//! let summary = Searcher::new(&index, &config).run(|_| KeypairSource::from_entropy());
//! println!("{} guesses", summary.attempts);
//! # Ok::<(), nearmiss_core::Error>(())
//! ```

pub mod best;
pub mod config;
pub mod error;
pub mod keygen;
pub mod metrics;
pub mod report;
pub mod runner;

pub use best::{BestGuess, BestScore};
pub use config::SearchConfig;
pub use error::{GuesserError, Result};
pub use keygen::{address_from_private_hex, address_of, Guess, IdentifierSource, KeypairSource};
pub use report::Console;
pub use runner::{SearchContext, SearchSummary, Searcher};
