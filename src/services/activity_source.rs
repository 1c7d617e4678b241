//! Activity data sources
//!
//! The heatmap consumes a trailing window of `ActivityDay` records, either
//! from the quiz backend or from a JSON export on disk.

use crate::services::cache::ActivityCacheService;
use crate::types::{ActivityDay, RadquizError, Result};
use chrono::{Duration, NaiveDate};
use std::fs;
use std::path::PathBuf;

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Inclusive range of calendar days to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayWindow {
    /// `days` calendar days ending at `today` inclusive (at least one).
    /// Windows reaching past the calendar start at `NaiveDate::MIN`.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let days = days.max(1);
        let start = today
            .checked_sub_signed(Duration::days(days as i64 - 1))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    pub fn num_days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1).max(0) as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Trait for activity providers
pub trait ActivitySource: Send + Sync {
    /// Source name, also the cache key (e.g., "api")
    fn name(&self) -> &str;

    /// Fetch activity days inside `window`
    fn fetch(&self, window: DayWindow) -> Result<Vec<ActivityDay>>;
}

/// Parse a JSON array of activity days, keeping those inside `window`
fn parse_days(content: &str, window: DayWindow) -> Result<Vec<ActivityDay>> {
    let days: Vec<ActivityDay> =
        serde_json::from_str(content).map_err(|e| RadquizError::Parse(e.to_string()))?;
    Ok(days.into_iter().filter(|d| window.contains(d.date)).collect())
}

/// Reads an exported JSON array (`[{"date": ..., "solvedCount": ...}]`)
pub struct FileActivitySource {
    path: PathBuf,
}

impl FileActivitySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ActivitySource for FileActivitySource {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&self, window: DayWindow) -> Result<Vec<ActivityDay>> {
        let content = fs::read_to_string(&self.path)?;
        parse_days(&content, window)
    }
}

/// Quiz backend: `GET {base_url}/activity?days=N`
pub struct HttpActivitySource {
    base_url: String,
}

impl HttpActivitySource {
    /// Source name and cache key
    pub const NAME: &'static str = "api";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn endpoint_url(&self, window: DayWindow) -> String {
        format!(
            "{}/activity?days={}",
            self.base_url.trim_end_matches('/'),
            window.num_days()
        )
    }
}

impl ActivitySource for HttpActivitySource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch(&self, window: DayWindow) -> Result<Vec<ActivityDay>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| RadquizError::Fetch(format!("HTTP client error: {}", e)))?;

        let response = client
            .get(self.endpoint_url(window))
            .send()
            .map_err(|e| RadquizError::Fetch(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RadquizError::Fetch(format!("backend returned {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| RadquizError::Fetch(format!("Failed to read body: {}", e)))?;
        parse_days(&body, window)
    }
}

/// Fetch from `source`, keeping the cache current. When the fetch fails,
/// fall back to cached days inside the window if there are any.
pub fn load_activity(
    source: &dyn ActivitySource,
    cache: Option<&ActivityCacheService>,
    window: DayWindow,
) -> Result<Vec<ActivityDay>> {
    let err = match source.fetch(window) {
        Ok(days) => {
            if let Some(cache) = cache {
                if let Err(e) = cache.save(source.name(), &days) {
                    eprintln!("[radquiz] Warning: Failed to update cache: {}", e);
                }
            }
            return Ok(days);
        }
        Err(e) => e,
    };

    let Some(cache) = cache else {
        return Err(err);
    };

    let (cached, warning) = cache.load(source.name());
    if let Some(warning) = warning {
        eprintln!("[radquiz] Warning: {}", warning);
    }

    let cached: Vec<ActivityDay> = cached
        .into_iter()
        .filter(|d| window.contains(d.date))
        .collect();
    if cached.is_empty() {
        return Err(err);
    }

    eprintln!(
        "[radquiz] Warning: {} failed: {} (showing cached activity)",
        source.name(),
        err
    );
    Ok(cached)
}
