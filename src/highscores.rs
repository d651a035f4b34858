//! High score leaderboard
//!
//! Session-only (in memory), keeps the top 5 scores.

use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final round score
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Ties with the lowest entry lose (earlier entry keeps its place)
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished round. Zero scores are ignored.
    /// Returns the rank achieved (1-indexed) or None if it fell off the table.
    pub fn record_if_positive(&mut self, score: u64, timestamp: f64) -> Option<usize> {
        if score == 0 {
            return None;
        }

        // Insert after every entry with an equal or higher score, so ties
        // keep insertion order
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, HighScoreEntry { score, timestamp });
        self.entries.truncate(MAX_HIGH_SCORES);

        if pos < MAX_HIGH_SCORES {
            log::info!("High score #{}: {}", pos + 1, score);
            Some(pos + 1)
        } else {
            log::debug!("Score {} didn't make the table", score);
            None
        }
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Scores only, best first
    pub fn scores(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.score).collect()
    }
}

/// Format a timestamp as a relative date string.
/// Both arguments are Unix milliseconds.
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_secs = (now - timestamp) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            match DateTime::from_timestamp_millis(timestamp as i64) {
                Some(date) => format!(
                    "{}/{}/{:02}",
                    date.month(),
                    date.day(),
                    date.year().rem_euclid(100)
                ),
                None => "N/A".to_string(),
            }
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
