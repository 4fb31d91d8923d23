//! Local leaderboard
//!
//! Persisted to LocalStorage as a JSON array of `{name, score, time}`.
//! Entries are only ever appended; queries rank the ones that fall inside a
//! time window. Whatever is in storage is untrusted: entries with the wrong
//! shape are dropped on load instead of failing the whole board.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::persistence::StorageError;
use crate::platform::KeyValueStore;

/// Storage key for the entry list
pub const LEADERBOARD_KEY: &str = "leaderboardEntries";
/// Names are cut to this many characters
pub const MAX_NAME_LEN: usize = 20;
/// Name used when the player leaves the field blank
pub const DEFAULT_NAME: &str = "Unknown";
/// Largest score accepted from a submission link
pub const MAX_SUBMITTED_SCORE: u64 = 999_999;

pub const HOUR_MS: f64 = 60.0 * 60.0 * 1000.0;
pub const DAY_MS: f64 = 24.0 * HOUR_MS;
pub const HOUR_LIMIT: usize = 10;
pub const DAY_LIMIT: usize = 40;

/// Leaderboard page, relative to the game page
pub const LEADERBOARD_PAGE: &str = "leaderboard.html";
/// Post composer; the share text goes in the `text` parameter
pub const SHARE_INTENT_URL: &str = "https://x.com/intent/tweet?text=";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    /// Unix timestamp (ms) when submitted
    pub time: f64,
}

impl LeaderboardEntry {
    /// Validate one stored value
    ///
    /// Requires a string name, a non-negative integral score and a finite
    /// numeric time.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let name = obj.get("name")?.as_str()?;
        let score = obj.get("score").and_then(score_from_value)?;
        let time = obj.get("time")?.as_f64().filter(|t| t.is_finite())?;
        Some(Self {
            name: name.to_string(),
            score,
            time,
        })
    }
}

fn score_from_value(value: &Value) -> Option<u64> {
    if let Some(score) = value.as_u64() {
        return Some(score);
    }
    // Integral floats such as 12.0 are fine; 12.5 and negatives are not
    let f = value.as_f64()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// Leaderboard contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

/// The two tables shown on the leaderboard page
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardViews {
    pub last_hour: Vec<LeaderboardEntry>,
    pub last_day: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored JSON array, keeping only well-formed entries
    pub fn from_json(json: &str) -> Self {
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to parse leaderboard entries: {}", e);
                return Self::new();
            }
        };

        let Some(items) = value.as_array() else {
            log::warn!("Leaderboard storage is not a list, starting fresh");
            return Self::new();
        };

        let entries: Vec<_> = items.iter().filter_map(LeaderboardEntry::from_value).collect();
        if entries.len() != items.len() {
            log::warn!(
                "Dropped {} malformed leaderboard entries",
                items.len() - entries.len()
            );
        }
        Self { entries }
    }

    /// Load from storage; missing or corrupt data gives an empty board
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(LEADERBOARD_KEY) {
            Some(json) => {
                let board = Self::from_json(&json);
                log::info!("Loaded {} leaderboard entries", board.entries.len());
                board
            }
            None => Self::new(),
        }
    }

    /// Write the whole board back to storage
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.entries)?;
        store.set(LEADERBOARD_KEY, &json)
    }

    /// Add an entry in memory; the name is sanitized
    pub fn push(&mut self, name: &str, score: u64, now_ms: f64) -> LeaderboardEntry {
        let entry = LeaderboardEntry {
            name: sanitize_name(name),
            score,
            time: now_ms,
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Add an entry and persist the board
    ///
    /// On a storage error the entry is still kept in memory for this page.
    pub fn append(
        &mut self,
        store: &mut dyn KeyValueStore,
        name: &str,
        score: u64,
        now_ms: f64,
    ) -> Result<LeaderboardEntry, StorageError> {
        let entry = self.push(name, score, now_ms);
        self.save(store)?;
        log::info!("Leaderboard entry saved: {} ({})", entry.name, entry.score);
        Ok(entry)
    }

    /// Highest scores submitted within `window_ms` of `now_ms`
    ///
    /// Ties keep submission order. Negative or NaN windows match nothing
    /// older than `now_ms`.
    pub fn top_by_window(&self, now_ms: f64, window_ms: f64, limit: usize) -> Vec<LeaderboardEntry> {
        let window = if window_ms.is_nan() { 0.0 } else { window_ms.max(0.0) };
        let mut recent: Vec<_> = self
            .entries
            .iter()
            .filter(|e| now_ms - e.time <= window)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.score.cmp(&a.score));
        recent.truncate(limit);
        recent
    }

    /// Last-hour top 10 and last-day top 40
    pub fn standard_views(&self, now_ms: f64) -> LeaderboardViews {
        LeaderboardViews {
            last_hour: self.top_by_window(now_ms, HOUR_MS, HOUR_LIMIT),
            last_day: self.top_by_window(now_ms, DAY_MS, DAY_LIMIT),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trim, default blank names, and cut to [`MAX_NAME_LEN`] characters
pub fn sanitize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let name = if trimmed.is_empty() { DEFAULT_NAME } else { trimmed };
    name.chars().take(MAX_NAME_LEN).collect()
}

/// Parse the `newScore` query parameter
///
/// Leading digits are read like `parseInt`; anything negative, missing or
/// above [`MAX_SUBMITTED_SCORE`] is rejected.
pub fn parse_submitted_score(raw: &str) -> Option<u64> {
    let digits: String = raw
        .trim_start()
        .strip_prefix('+')
        .unwrap_or(raw.trim_start())
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let score = digits.parse::<u64>().ok()?;
    (score <= MAX_SUBMITTED_SCORE).then_some(score)
}

/// Leaderboard link that offers `score` for submission
pub fn submission_link(score: Option<u64>) -> String {
    match score {
        Some(score) => format!("{}?newScore={}", LEADERBOARD_PAGE, score),
        None => LEADERBOARD_PAGE.to_string(),
    }
}

/// Unencoded text for sharing a final score
pub fn share_text(score: u64) -> String {
    format!("I scored {} points on Lane Rush!", score)
}

/// Escape a string for insertion into HTML
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    fn entry(name: &str, score: u64, time: f64) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
            time,
        }
    }

    #[test]
    fn test_malformed_entries_filtered() {
        let board = Leaderboard::from_json(
            r#"[{"name":"A","score":5,"time":1000},{"name":7,"score":"x","time":null}]"#,
        );
        assert_eq!(board.entries, vec![entry("A", 5, 1000.0)]);
    }

    #[test]
    fn test_shape_rules() {
        let board = Leaderboard::from_json(
            r#"[
                {"name":"neg","score":-1,"time":1},
                {"name":"frac","score":2.5,"time":1},
                {"name":"whole","score":3.0,"time":1},
                {"name":"notime","score":3},
                null,
                "junk",
                {"name":"ok","score":0,"time":-5}
            ]"#,
        );
        let names: Vec<_> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["whole", "ok"]);
    }

    #[test]
    fn test_corrupt_storage_is_empty() {
        for raw in ["{not json", "{\"name\":\"A\"}", "42"] {
            let store = MemoryStore::new().with_item(LEADERBOARD_KEY, raw);
            assert!(Leaderboard::load(&store).is_empty(), "raw {:?}", raw);
        }
        assert!(Leaderboard::load(&MemoryStore::new()).is_empty());
    }

    #[test]
    fn test_append_persists() {
        let mut store = MemoryStore::new();
        let mut board = Leaderboard::load(&store);
        let saved = board
            .append(&mut store, "  An extremely long racer name  ", 17, 5000.0)
            .unwrap();
        assert_eq!(saved.name, "An extremely long ra");
        assert_eq!(saved.name.chars().count(), MAX_NAME_LEN);

        let reloaded = Leaderboard::load(&store);
        assert_eq!(reloaded.entries, vec![saved]);
    }

    #[test]
    fn test_append_failure_keeps_entry_in_memory() {
        let mut store = MemoryStore::read_only();
        let mut board = Leaderboard::new();
        assert!(board.append(&mut store, "", 3, 1.0).is_err());
        assert_eq!(board.entries, vec![entry(DEFAULT_NAME, 3, 1.0)]);
    }

    #[test]
    fn test_top_by_window() {
        let now = 10.0 * DAY_MS;
        let board = Leaderboard {
            entries: vec![
                entry("old", 100, now - DAY_MS - 1.0),
                entry("a", 5, now - 10.0),
                entry("b", 9, now - HOUR_MS),
                entry("c", 9, now - 2.0 * HOUR_MS),
                entry("d", 1, now),
            ],
        };

        let hour = board.top_by_window(now, HOUR_MS, 10);
        let names: Vec<_> = hour.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "d"]);

        let day = board.top_by_window(now, DAY_MS, 2);
        let names: Vec<_> = day.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);

        assert!(board.top_by_window(now, -5.0, 10).iter().all(|e| e.time >= now));
    }

    #[test]
    fn test_standard_views_limits() {
        let now = 1_000_000_000.0;
        let mut board = Leaderboard::new();
        for i in 0..50 {
            board.push("p", i, now - i as f64);
        }
        let views = board.standard_views(now);
        assert_eq!(views.last_hour.len(), HOUR_LIMIT);
        assert_eq!(views.last_day.len(), DAY_LIMIT);
        assert_eq!(views.last_hour[0].score, 49);
    }

    #[test]
    fn test_parse_submitted_score() {
        assert_eq!(parse_submitted_score("42"), Some(42));
        assert_eq!(parse_submitted_score("42abc"), Some(42));
        assert_eq!(parse_submitted_score("0"), Some(0));
        assert_eq!(parse_submitted_score("999999"), Some(999_999));
        assert_eq!(parse_submitted_score("1000000"), None);
        assert_eq!(parse_submitted_score("-3"), None);
        assert_eq!(parse_submitted_score("abc"), None);
        assert_eq!(parse_submitted_score(""), None);
    }

    #[test]
    fn test_submission_link_round_trips_score() {
        let link = submission_link(Some(321));
        assert_eq!(link, "leaderboard.html?newScore=321");
        let raw = link.split("newScore=").nth(1).unwrap();
        assert_eq!(parse_submitted_score(raw), Some(321));
        assert_eq!(submission_link(None), LEADERBOARD_PAGE);
    }

    #[test]
    fn test_share_text_names_score() {
        assert!(share_text(48).contains("48 points"));
        assert!(SHARE_INTENT_URL.ends_with("?text="));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }
}
