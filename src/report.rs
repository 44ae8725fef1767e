//! Filtered, ordered sender report

use crate::tally::TallyMap;
use serde::Serialize;
use std::fmt;

/// A sender and how many messages it sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub address: String,
    pub count: u64,
}

impl fmt::Display for ResultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address : {} Count : {}", self.address, self.count)
    }
}

/// What happened to the collected messages during a run.
///
/// `collected == tallied + no_sender + failed` once a run completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub collected: usize,
    pub tallied: usize,
    pub no_sender: usize,
    pub failed: usize,
    /// Tallied under the raw header text because no address matched.
    pub fallback: usize,
}

/// Final output of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub threshold: u64,
    /// Senders above the threshold, ascending by count, then address.
    pub entries: Vec<ResultEntry>,
    pub summary: Summary,
}

impl Report {
    /// Keep senders with strictly more than `threshold` messages and
    /// order them ascending by count, ties broken by address.
    #[must_use]
    pub fn from_tally(tally: TallyMap, threshold: u64, summary: Summary) -> Self {
        let mut entries: Vec<ResultEntry> = tally
            .into_iter()
            .filter(|&(_, count)| count > threshold)
            .map(|(address, count)| ResultEntry { address, count })
            .collect();
        entries.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.address.cmp(&b.address)));

        Self {
            threshold,
            entries,
            summary,
        }
    }

    /// One `Address : <address> Count : <count>` line per entry.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}
