//! Per-rule statistics tracking for -c mode
//!
//! Sprint 2: summary mode implementation

use std::collections::HashMap;
use std::io::Write;

/// Percentage of `x / (x + y)`, truncated to two decimals.
///
/// Returns 0.0 when `x` is zero, including the 0/0 case.
pub fn percent(x: u64, y: u64) -> f64 {
    if x == 0 {
        return 0.0;
    }
    let ratio = x as f64 / (x + y) as f64;
    (10_000.0 * ratio).trunc() / 100.0
}

/// Aggregated count for one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCount {
    pub rule_id: String,
    pub rule_name: String,
    pub count: u64,
}

/// Tracks how often every rule fired during a session.
#[derive(Debug, Default)]
pub struct StatsTracker {
    counts: HashMap<(String, String), u64>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one diagnostic for the given rule.
    pub fn record(&mut self, rule_id: &str, rule_name: &str) {
        *self
            .counts
            .entry((rule_id.to_string(), rule_name.to_string()))
            .or_default() += 1;
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Counts sorted by frequency, then by rule id for stable output.
    pub fn sorted_counts(&self) -> Vec<RuleCount> {
        let mut counts: Vec<RuleCount> = self
            .counts
            .iter()
            .map(|((rule_id, rule_name), &count)| RuleCount {
                rule_id: rule_id.clone(),
                rule_name: rule_name.clone(),
                count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.rule_id.cmp(&b.rule_id)));
        counts
    }

    /// Render the strace-style summary table.
    pub fn write_summary(&self, out: &mut dyn Write) -> std::io::Result<()> {
        let total = self.total();
        writeln!(out, "% total     count  rule")?;
        writeln!(out, "------ --------- ----------------------------------------")?;
        for entry in self.sorted_counts() {
            writeln!(
                out,
                "{:>6.2} {:>9}  {} ({})",
                percent(entry.count, total - entry.count),
                entry.count,
                entry.rule_name,
                entry.rule_id
            )?;
        }
        writeln!(out, "------ --------- ----------------------------------------")?;
        writeln!(out, "{:>6.2} {:>9}  total", 100.0, total)?;
        Ok(())
    }
}
