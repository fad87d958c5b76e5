//! Multi-threaded guess loop
//!
//! Workers share one read-only index and one [`SearchContext`]. Each worker
//! owns its identifier source, so the only cross-thread traffic per guess is
//! the attempt counter and, rarely, a best-score swap.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use nearmiss_core::{AddressIndex, Strategy};

use crate::best::{BestGuess, BestScore};
use crate::config::SearchConfig;
use crate::keygen::IdentifierSource;
use crate::metrics;
use crate::report::Console;

/// Guesses between metric flushes per worker
const METRICS_BATCH: u64 = 1024;

/// Shared run state, owned by the caller and passed to every worker
///
/// The clock starts with the first run that uses the context, not when the
/// context is created.
#[derive(Debug)]
pub struct SearchContext {
    best: BestScore,
    attempts: AtomicU64,
    stop: AtomicBool,
    started: OnceLock<Instant>,
}

impl SearchContext {
    pub fn new() -> Self {
        Self {
            best: BestScore::new(),
            attempts: AtomicU64::new(0),
            stop: AtomicBool::new(false),
            started: OnceLock::new(),
        }
    }

    pub fn best(&self) -> &BestScore {
        &self.best
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Time since the first run started, zero before that
    pub fn elapsed(&self) -> Duration {
        self.started.get().map_or(Duration::ZERO, Instant::elapsed)
    }

    fn start_clock(&self) {
        self.started.get_or_init(Instant::now);
    }

    /// Ask every worker to finish after its current guess
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Reserve the next attempt number (1-based), or `None` once `limit` is used up
    fn claim_attempt(&self, limit: Option<u64>) -> Option<u64> {
        match limit {
            Some(max) => self
                .attempts
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| (n < max).then_some(n + 1))
                .ok()
                .map(|n| n + 1),
            None => Some(self.attempts.fetch_add(1, Ordering::Relaxed) + 1),
        }
    }
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a finished run
#[derive(Debug, Clone)]
pub struct SearchSummary {
    pub strategy: Strategy,
    pub attempts: u64,
    pub elapsed: Duration,
    pub targets: usize,
    pub best: Option<Arc<BestGuess>>,
}

impl SearchSummary {
    pub fn guess_rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.attempts as f64 / secs
        } else {
            0.0
        }
    }

    /// Returns true if a guess matched a target in full
    pub fn found_exact(&self) -> bool {
        self.best.as_ref().is_some_and(|b| b.result.is_exact())
    }
}

/// Runs the guess loop until a limit is hit or a guess matches a target exactly
pub struct Searcher<'a, I> {
    index: &'a I,
    config: &'a SearchConfig,
    console: Console,
}

impl<'a, I: AddressIndex> Searcher<'a, I> {
    pub fn new(index: &'a I, config: &'a SearchConfig) -> Self {
        Self {
            index,
            config,
            console: Console::new(config.quiet),
        }
    }

    /// Run with a fresh context
    pub fn run<S, F>(&self, make_source: F) -> SearchSummary
    where
        S: IdentifierSource,
        F: Fn(usize) -> S + Sync,
    {
        self.run_with(&SearchContext::new(), make_source)
    }

    /// Run against a caller-provided context
    ///
    /// `make_source` is called once per worker, on that worker's thread. The
    /// timeout counts from the first run on `ctx`; a later run on the same
    /// context continues its clock and attempt count.
    pub fn run_with<S, F>(&self, ctx: &SearchContext, make_source: F) -> SearchSummary
    where
        S: IdentifierSource,
        F: Fn(usize) -> S + Sync,
    {
        let workers = self.config.worker_count();
        metrics::set_index_stats(self.index.strategy(), self.index.len(), self.index.memory_footprint());
        ctx.start_clock();
        tracing::info!(
            workers,
            strategy = %self.index.strategy(),
            targets = self.index.len(),
            "search started"
        );

        self.console.header();

        std::thread::scope(|scope| {
            for worker_id in 0..workers {
                let make_source = &make_source;
                scope.spawn(move || {
                    let source = make_source(worker_id);
                    self.worker(worker_id, ctx, source);
                });
            }
        });

        let summary = SearchSummary {
            strategy: self.index.strategy(),
            attempts: ctx.attempts(),
            elapsed: ctx.elapsed(),
            targets: self.index.len(),
            best: ctx.best().current(),
        };
        metrics::set_guess_rate(summary.guess_rate());

        tracing::info!(
            attempts = summary.attempts,
            best = ctx.best().match_length(),
            "search finished"
        );
        summary
    }

    fn worker<S: IdentifierSource>(&self, worker_id: usize, ctx: &SearchContext, mut source: S) {
        let timeout = self.config.timeout();
        let limit = self.config.guess_limit();
        let frame = self.config.frame_interval();
        let mut last_frame: Option<Duration> = None;
        let mut local = 0u64;

        while !ctx.is_stopped() {
            let elapsed = ctx.elapsed();
            if timeout.is_some_and(|t| elapsed >= t) {
                ctx.stop();
                break;
            }
            let Some(attempt) = ctx.claim_attempt(limit) else {
                ctx.stop();
                break;
            };

            let guess = source.next_guess();
            let result = self.index.find_closest_match(&guess.address);

            if ctx.best().offer(&result, &guess, attempt) {
                self.console.improvement(elapsed, attempt, &guess, &result);
                metrics::set_best_match_length(result.match_length);
                tracing::debug!(worker_id, attempt, length = result.match_length, "new best guess");
                if result.is_exact() {
                    tracing::info!(address = %guess.address, "exact match found");
                    ctx.stop();
                }
            } else if worker_id == 0 && !self.console.is_quiet() {
                let due = match (frame, last_frame) {
                    (Some(interval), Some(last)) => elapsed >= last + interval,
                    _ => true,
                };
                if due {
                    self.console.progress(elapsed, attempt, &guess, &result);
                    last_frame = Some(elapsed);
                }
            }

            local += 1;
            if local % METRICS_BATCH == 0 {
                metrics::record_guesses(METRICS_BATCH);
                metrics::set_guess_rate(ctx.attempts() as f64 / ctx.elapsed().as_secs_f64().max(f64::EPSILON));
            }
        }

        metrics::record_guesses(local % METRICS_BATCH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::{Guess, KeypairSource};
    use nearmiss_core::{Address, Strategy, TargetList};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Replays a fixed address sequence, cycling at the end
    struct ReplaySource {
        addresses: Vec<Address>,
        next: usize,
    }

    impl IdentifierSource for ReplaySource {
        fn next_guess(&mut self) -> Guess {
            let address = self.addresses[self.next % self.addresses.len()];
            self.next += 1;
            Guess {
                secret: [1u8; 32],
                address,
            }
        }
    }

    fn quiet_config() -> SearchConfig {
        SearchConfig::default().with_quiet(true).without_metrics()
    }

    #[test]
    fn test_claim_attempt_respects_limit() {
        let ctx = SearchContext::new();
        assert_eq!(ctx.claim_attempt(Some(2)), Some(1));
        assert_eq!(ctx.claim_attempt(Some(2)), Some(2));
        assert_eq!(ctx.claim_attempt(Some(2)), None);
        assert_eq!(ctx.attempts(), 2);
        assert_eq!(ctx.claim_attempt(None), Some(3));
    }

    #[test]
    fn test_stops_at_max_guesses() {
        let index = Strategy::Nearest.build(TargetList::known()).unwrap();
        let config = quiet_config().with_threads(4).with_max_guesses(200);

        let summary = Searcher::new(&index, &config)
            .run(|worker| KeypairSource::new(StdRng::seed_from_u64(worker as u64)));

        assert_eq!(summary.attempts, 200);
        assert_eq!(summary.targets, TargetList::known().len());
        let best = summary.best.expect("at least one guess");
        assert!(best.attempt >= 1 && best.attempt <= 200);
        assert_eq!(best.private_key.len(), 64);
    }

    #[test]
    fn test_stops_on_exact_match() {
        let target: Address = "00000000219ab540356cbb839cbe05303d7705fa".parse().unwrap();
        let index = Strategy::Trie.build([target]).unwrap();
        let config = quiet_config().with_threads(1).with_max_guesses(1000);

        let decoy: Address = "00000000219ab540356cbb839cbe05303d770000".parse().unwrap();
        let summary = Searcher::new(&index, &config).run(|_| ReplaySource {
            addresses: vec![Address::MAX, decoy, target, Address::ZERO],
            next: 0,
        });

        assert_eq!(summary.attempts, 3);
        assert!(summary.found_exact());
        assert_eq!(summary.best.unwrap().attempt, 3);
    }

    #[test]
    fn test_best_tracks_strongest_guess() {
        let targets = [Address::from(0x1000u128), Address::from(0x2000u128)];
        let index = Strategy::Bisect.build(targets).unwrap();
        let config = quiet_config().with_threads(1).with_max_guesses(3);

        let summary = Searcher::new(&index, &config).run(|_| ReplaySource {
            addresses: vec![Address::from(0x1fffu128), Address::from(0x1001u128), Address::from(0x1fffu128)],
            next: 0,
        });

        let best = summary.best.as_ref().unwrap();
        assert_eq!(best.result.match_length, 39);
        assert_eq!(best.result.query, Address::from(0x1001u128));
        assert!(!summary.found_exact());
    }

    #[test]
    fn test_timeout_stops_search() {
        let index = Strategy::Nearest.build(TargetList::known()).unwrap();
        let config = quiet_config().with_threads(2).with_timeout(1);
        let ctx = SearchContext::new();

        let summary = Searcher::new(&index, &config).run_with(&ctx, |_| ReplaySource {
            addresses: vec![Address::from(7u128)],
            next: 0,
        });

        assert!(ctx.is_stopped());
        assert!(summary.elapsed >= Duration::from_secs(1));
        assert!(summary.attempts > 0);
    }

    #[test]
    fn test_timeout_counts_from_run_start() {
        let index = Strategy::Nearest.build(TargetList::known()).unwrap();
        let config = quiet_config().with_threads(1).with_timeout(1).with_max_guesses(10);
        let ctx = SearchContext::new();

        // setup time before the run must not eat into the timeout
        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(ctx.elapsed(), Duration::ZERO);

        let summary = Searcher::new(&index, &config).run_with(&ctx, |_| ReplaySource {
            addresses: vec![Address::from(7u128)],
            next: 0,
        });
        assert_eq!(summary.attempts, 10);
        assert!(summary.elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_run_publishes_index_stats() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let index = Strategy::Bisect.build([Address::from(0x10u128), Address::from(0x30u128)]).unwrap();
        let config = quiet_config().with_threads(1).with_max_guesses(1);
        ::metrics::with_local_recorder(&recorder, || {
            Searcher::new(&index, &config).run(|_| ReplaySource {
                addresses: vec![Address::from(0x11u128)],
                next: 0,
            })
        });

        let rendered = handle.render();
        assert!(rendered.contains(r#"nearmiss_targets{strategy="bisect"} 2"#), "{}", rendered);
        assert!(rendered.contains(r#"nearmiss_index_bytes{strategy="bisect"}"#), "{}", rendered);
    }

    #[test]
    fn test_preset_stop_runs_nothing() {
        let index = Strategy::Nearest.build(TargetList::known()).unwrap();
        let config = quiet_config().with_threads(2);
        let ctx = SearchContext::new();
        ctx.stop();

        let summary = Searcher::new(&index, &config).run_with(&ctx, |_| ReplaySource {
            addresses: vec![Address::ZERO],
            next: 0,
        });
        assert_eq!(summary.attempts, 0);
        assert!(summary.best.is_none());
        assert_eq!(summary.guess_rate(), 0.0);
    }
}
