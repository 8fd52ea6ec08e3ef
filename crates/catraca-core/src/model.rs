use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decode::FeedEncoding;
use crate::rules::{self, HeaderProfile};

/// Which of the two independently-updated measures an import populates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureKind {
    Predicted,
    Realized,
}

impl MeasureKind {
    /// Encoding flavor of this feed's extracts. Predicted feeds are
    /// spreadsheet exports (BOM-prefixed), realized feeds come from a
    /// database tool writing single-byte Western text.
    pub fn encoding(self) -> FeedEncoding {
        match self {
            MeasureKind::Predicted => FeedEncoding::Utf8Bom,
            MeasureKind::Realized => FeedEncoding::Windows1252,
        }
    }

    /// Header keyword profile used to resolve this feed's columns.
    pub fn header_profile(self) -> &'static HeaderProfile {
        match self {
            MeasureKind::Predicted => &rules::PREDICTED_PROFILE,
            MeasureKind::Realized => &rules::REALIZED_PROFILE,
        }
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureKind::Predicted => write!(f, "predicted"),
            MeasureKind::Realized => write!(f, "realized"),
        }
    }
}

/// The canonical unit of the record store: one line, one company, one
/// service day. The two measures are written by their respective import
/// paths and never clobber each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLineCompanyRecord {
    pub date: String,
    pub line_code: String,
    pub line_name: String,
    pub company: String,
    pub predicted_passengers: Decimal,
    pub realized_passengers: Decimal,
}

/// Grouping key of the in-memory accumulation map. Transient: lives for
/// one import pass only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregationKey {
    pub date: String,
    pub line_code: String,
    pub company: String,
}

/// Accumulated value for one aggregation key during one import.
#[derive(Debug, Clone)]
pub struct AggregationBucket {
    pub passengers: Decimal,
    /// Most recent non-empty line name seen for this key.
    pub line_name: String,
}

/// One row handed to the persistence sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureUpdate {
    pub date: String,
    pub line_code: String,
    pub line_name: String,
    pub company: String,
    pub value: Decimal,
}

/// What one import run did, with skip reasons kept apart so "excluded
/// by rule" and "skipped due to error" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub kind: MeasureKind,
    pub rows_read: u64,
    /// Rows dropped by a domain exclusion rule.
    pub rows_excluded: u64,
    /// Rows skipped because of a row-level error.
    pub rows_failed: u64,
    pub unique_keys: usize,
    /// Declared totals replaced by a larger component sum (predicted only).
    pub audit_adjustments: u64,
    pub records_written: usize,
}

impl ImportSummary {
    pub fn rows_skipped(&self) -> u64 {
        self.rows_excluded + self.rows_failed
    }
}
