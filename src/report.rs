use std::fmt::Write as _;

use colored::Colorize;
use time::{macros::format_description, OffsetDateTime};

use crate::store::StatusStore;
use crate::types::{Snapshot, Verdict};

/// Prints the per-cycle status block to stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    use_colors: bool,
}

impl ConsoleReporter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Render the store under a shared read lock and print it.
    pub async fn report(&self, store: &StatusStore) {
        let text = {
            let snapshot = store.read().await;
            render_snapshot(&snapshot, &clock_now(), self.use_colors)
        };
        print!("{text}");
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

/// One `Port <name>: <verdict>` line per entry, then the clock and a separator.
pub fn render_snapshot(snapshot: &Snapshot, clock: &str, use_colors: bool) -> String {
    let mut out = String::new();
    for (name, verdict) in snapshot {
        let shown = if use_colors {
            match verdict {
                Verdict::Open => verdict.as_str().green().to_string(),
                Verdict::Closed => verdict.as_str().red().to_string(),
            }
        } else {
            verdict.as_str().to_string()
        };
        let _ = writeln!(out, "Port {name}: {shown}");
    }
    let _ = writeln!(out, "Clock:  {clock}");
    out.push_str("----\n");
    out
}

/// Local wall clock as `HH:MM:SS`; UTC when the local offset is unknown.
pub fn clock_now() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_clock(now)
}

fn format_clock(t: OffsetDateTime) -> String {
    t.format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_else(|_| String::from("00:00:00"))
}
