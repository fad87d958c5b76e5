//! Best score so far, shared by all workers

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use nearmiss_core::MatchResult;

use crate::keygen::Guess;

/// The strongest guess seen during a run
#[derive(Debug, Clone, PartialEq)]
pub struct BestGuess {
    pub result: MatchResult,
    pub private_key: String,
    /// 1-based attempt number that produced it
    pub attempt: u64,
}

/// Lock-free cell holding the best guess under the `MatchResult` ordering
///
/// A candidate replaces the current best when it compares greater or equal,
/// so among equally strong guesses the latest wins.
#[derive(Debug, Default)]
pub struct BestScore {
    best: ArcSwapOption<BestGuess>,
}

impl BestScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `result` would currently be accepted
    #[inline]
    pub fn admits(&self, result: &MatchResult) -> bool {
        match &*self.best.load() {
            Some(held) => *result >= held.result,
            None => true,
        }
    }

    /// Offer a scored guess; returns true if it became the new best
    pub fn offer(&self, result: &MatchResult, guess: &Guess, attempt: u64) -> bool {
        if !self.admits(result) {
            return false;
        }

        let fresh = Arc::new(BestGuess {
            result: *result,
            private_key: guess.private_key_hex(),
            attempt,
        });

        let previous = self.best.rcu(|current| match current {
            Some(held) if fresh.result < held.result => Some(Arc::clone(held)),
            _ => Some(Arc::clone(&fresh)),
        });

        previous.map_or(true, |held| fresh.result >= held.result)
    }

    /// Snapshot of the current best
    pub fn current(&self) -> Option<Arc<BestGuess>> {
        self.best.load_full()
    }

    /// Match length of the current best, 0 before any guess
    pub fn match_length(&self) -> usize {
        match &*self.best.load() {
            Some(held) => held.result.match_length,
            None => 0,
        }
    }
}
