//! Console output: header, progress lines and the final summary

use std::fmt::Write as _;
use std::io::Write;
use std::time::Duration;

use nearmiss_core::{known_name, Address, MatchResult};

use crate::keygen::Guess;
use crate::runner::SearchSummary;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Prints to stdout; progress output is skipped when quiet
#[derive(Debug, Clone, Copy)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn header(&self) {
        if !self.quiet {
            println!("{}", format_header());
        }
    }

    /// Overwrite the current line with the latest guess
    pub fn progress(&self, elapsed: Duration, attempts: u64, guess: &Guess, result: &MatchResult) {
        self.emit(&format_line(elapsed, attempts, guess, result), false);
    }

    /// Print a guess that became the new best and keep it on screen
    pub fn improvement(&self, elapsed: Duration, attempts: u64, guess: &Guess, result: &MatchResult) {
        self.emit(&format_line(elapsed, attempts, guess, result), true);
    }

    pub fn summary(&self, summary: &SearchSummary) {
        println!();
        print!("{}", format_summary(summary));
    }

    fn emit(&self, line: &str, newline: bool) {
        if self.quiet {
            return;
        }
        let mut out = std::io::stdout().lock();
        let _ = if newline {
            writeln!(out, "{}", line)
        } else {
            write!(out, "{}", line)
        };
        let _ = out.flush();
    }
}

pub fn format_header() -> String {
    format!(
        "{:<12} {:<8} {:<64} {:<3} {:<40} {:<40}",
        "duration", "attempts", "private-key", "str", "address", "closest"
    )
}

/// One console row; the matched prefix of the address is printed bold
pub fn format_line(elapsed: Duration, attempts: u64, guess: &Guess, result: &MatchResult) -> String {
    let address = guess.address.to_string();
    let (matched, rest) = address.split_at(result.match_length.min(address.len()));
    let closest = result
        .nearest
        .map(|nearest| nearest.to_string())
        .unwrap_or_default();

    format!(
        "\r{:012.6} {:08x} {} {:3} {}{}{}{} {}",
        elapsed.as_secs_f64(),
        attempts,
        guess.private_key_hex(),
        result.match_length,
        BOLD,
        matched,
        RESET,
        rest,
        closest
    )
}

/// Block explorer link for an address
pub fn etherscan_link(address: &Address) -> String {
    format!("https://etherscan.io/address/0x{}", address)
}

pub fn format_summary(summary: &SearchSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "-------");
    let _ = writeln!(out, "{:<20}: {}", "Strategy", summary.strategy);
    let _ = writeln!(out, "{:<20}: {}", "Total guesses", summary.attempts);
    let _ = writeln!(out, "{:<20}: {:.3}", "Seconds", summary.elapsed.as_secs_f64());
    let _ = writeln!(out, "{:<20}: {:.1}", "Guess / sec", summary.guess_rate());
    let _ = writeln!(out, "{:<20}: {}", "Num targets", summary.targets);
    let _ = writeln!(out);
    let _ = writeln!(out, "Best Guess");
    let _ = writeln!(out, "----------");

    match &summary.best {
        Some(best) => {
            let _ = writeln!(out, "{:<20}: {}", "address", best.result.query);
            let _ = writeln!(out, "{:<20}: {}", "attempt", best.attempt);
            if let Some(closest) = best.result.nearest {
                let link = etherscan_link(&closest);
                match known_name(&closest) {
                    Some(name) => {
                        let _ = writeln!(out, "{:<20}: {} ({})", "closest", link, name);
                    }
                    None => {
                        let _ = writeln!(out, "{:<20}: {}", "closest", link);
                    }
                }
            }
            let _ = writeln!(out, "{:<20}: {}", "private-key", best.private_key);
            let _ = writeln!(out, "{:<20}: {}", "Strength", best.result);
        }
        None => {
            let _ = writeln!(out, "{:<20}: none", "Strength");
        }
    }
    out
}
