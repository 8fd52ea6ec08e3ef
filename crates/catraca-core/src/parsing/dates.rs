use std::collections::HashMap;

use chrono::NaiveDate;

use super::RowError;
use crate::rules::DATE_CACHE_CAPACITY;

/// Per-import cache of raw date cell -> ISO date. Feeds repeat the same
/// date literal across millions of rows, so one parse per literal is
/// enough. Bounded: once full, new dates are parsed but not cached.
#[derive(Debug)]
pub struct DateCache {
    entries: HashMap<String, String>,
    capacity: usize,
}

impl Default for DateCache {
    fn default() -> Self {
        DateCache::with_capacity(DATE_CACHE_CAPACITY)
    }
}

impl DateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        DateCache {
            entries: HashMap::new(),
            capacity,
        }
    }

    /// Resolve a raw date cell to ISO YYYY-MM-DD.
    pub fn resolve(&mut self, raw: &str) -> Result<String, RowError> {
        if let Some(iso) = self.entries.get(raw) {
            return Ok(iso.clone());
        }
        let iso = parse_feed_date(raw)?;
        if self.entries.len() < self.capacity {
            self.entries.insert(raw.to_string(), iso.clone());
        }
        Ok(iso)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse one date cell. A cell containing '/' is DD/MM/YYYY with an
/// optional time-of-day suffix; anything else is taken as ISO-leading
/// (the first ten characters).
fn parse_feed_date(raw: &str) -> Result<String, RowError> {
    let bad = || RowError::BadDate {
        raw: raw.to_string(),
    };

    if raw.contains('/') {
        let day_part = raw.split(' ').next().unwrap_or(raw);
        NaiveDate::parse_from_str(day_part, "%d/%m/%Y")
            .map(|date| date.format("%Y-%m-%d").to_string())
            .map_err(|_| bad())
    } else {
        let head: String = raw.chars().take(10).collect();
        NaiveDate::parse_from_str(&head, "%Y-%m-%d")
            .map(|date| date.format("%Y-%m-%d").to_string())
            .map_err(|_| bad())
    }
}
