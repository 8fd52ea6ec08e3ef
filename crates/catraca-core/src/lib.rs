//! Reconciliation engine for daily bus-line ridership feeds.
//!
//! Two upstream tools produce locale-specific delimited extracts: a
//! "predicted" feed (spreadsheet export) and a "realized" feed
//! (database-tool extract). Neither honors a fixed schema contract:
//! delimiters, encodings, header names and number formats all drift.
//! This crate decodes each feed, infers column roles from the header,
//! normalizes every row into canonical (date, line, company) shares,
//! aggregates them in memory, and upserts the result into the record
//! store in one transaction, so repeated or overlapping imports
//! converge instead of double-counting.

pub mod aggregate;
pub mod audit;
pub mod decode;
pub mod error;
pub mod model;
pub mod parsing;
pub mod rules;
pub mod store;

use std::io::{BufRead, Read};

use tracing::{debug, info, warn};

use aggregate::Aggregation;
use decode::{decoded_lines, sniff_delimiter};
use error::ImportError;
use model::{AggregationKey, ImportSummary, MeasureKind};
use parsing::dates::DateCache;
use parsing::header::resolve_columns;
use parsing::{normalize_row, RowOutcome};
use store::MeasureStore;

pub use model::{DailyLineCompanyRecord, MeasureUpdate};
pub use store::SqliteStore;

/// Audit adjustments logged individually before the log goes quiet.
const AUDIT_WARN_LIMIT: u64 = 100;

/// Import one realized-ridership feed (single-byte Western extract).
pub fn import_realized<R: Read>(
    reader: R,
    byte_length: u64,
    store: &mut dyn MeasureStore,
) -> Result<ImportSummary, ImportError> {
    import_feed(reader, byte_length, MeasureKind::Realized, store)
}

/// Import one predicted-ridership feed (BOM-prefixed spreadsheet
/// export). Runs the component-sum audit on every row.
pub fn import_predicted<R: Read>(
    reader: R,
    byte_length: u64,
    store: &mut dyn MeasureStore,
) -> Result<ImportSummary, ImportError> {
    import_feed(reader, byte_length, MeasureKind::Predicted, store)
}

/// Run the full ingestion pipeline for one feed: decode, resolve the
/// header once, normalize and aggregate every data row, then hand the
/// batch to the store as a single transactional upsert.
///
/// Row-level problems are tallied and skipped; only stream-level
/// problems (empty input, unresolvable mandatory columns) and storage
/// failures surface as errors.
pub fn import_feed<R: Read>(
    reader: R,
    byte_length: u64,
    kind: MeasureKind,
    store: &mut dyn MeasureStore,
) -> Result<ImportSummary, ImportError> {
    let mut lines = decoded_lines(reader, byte_length, kind.encoding());

    let mut header_line = String::new();
    lines.read_line(&mut header_line)?;
    if header_line.trim().is_empty() {
        return Err(ImportError::EmptyInput);
    }

    let delimiter = sniff_delimiter(&header_line);
    let headers = split_header(&header_line, delimiter)?;
    let columns = resolve_columns(&headers, kind.header_profile())?;
    debug!(
        kind = %kind,
        delimiter = %(delimiter as char),
        ?columns,
        "header resolved"
    );

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(lines);

    let mut aggregation = Aggregation::new();
    let mut cache = DateCache::new();
    let audit_components = kind == MeasureKind::Predicted;

    let mut rows_read = 0u64;
    let mut rows_excluded = 0u64;
    let mut rows_failed = 0u64;
    let mut audit_adjustments = 0u64;

    let mut record = csv::StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {}
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                debug!(error = %err, "unreadable row skipped");
                rows_failed += 1;
                continue;
            }
        }
        rows_read += 1;

        match normalize_row(&record, &columns, &mut cache, audit_components) {
            RowOutcome::Record(row) => {
                if row.audit_adjusted {
                    audit_adjustments += 1;
                    if audit_adjustments <= AUDIT_WARN_LIMIT {
                        warn!(
                            line = %row.line_code,
                            date = %row.date,
                            "declared total below component sum, components used"
                        );
                    }
                }
                for company in &row.companies {
                    aggregation.add(
                        AggregationKey {
                            date: row.date.clone(),
                            line_code: row.line_code.clone(),
                            company: company.clone(),
                        },
                        row.share,
                        &row.line_name,
                    );
                }
            }
            RowOutcome::Excluded { line_code } => {
                debug!(line = %line_code, "row excluded by domain rule");
                rows_excluded += 1;
            }
            RowOutcome::Failed(err) => {
                debug!(error = %err, "row skipped");
                rows_failed += 1;
            }
        }
    }

    let unique_keys = aggregation.len();
    info!(
        kind = %kind,
        rows = rows_read,
        keys = unique_keys,
        excluded = rows_excluded,
        failed = rows_failed,
        "aggregation finished"
    );

    let updates = aggregation.into_updates();
    let records_written = store.upsert_measures(kind, &updates)?;

    Ok(ImportSummary {
        kind,
        rows_read,
        rows_excluded,
        rows_failed,
        unique_keys,
        audit_adjustments,
        records_written,
    })
}

/// Split the raw header line into tokens using the sniffed delimiter.
fn split_header(header_line: &str, delimiter: u8) -> Result<Vec<String>, ImportError> {
    let trimmed = header_line.trim_end_matches(&['\r', '\n'][..]);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_reader(trimmed.as_bytes());
    let mut record = csv::StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record.iter().map(|token| token.to_string()).collect())
}
