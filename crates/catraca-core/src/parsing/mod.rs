pub mod dates;
pub mod header;
pub mod normalize;
pub mod values;

use csv::StringRecord;
use rust_decimal::Decimal;

use crate::audit;
use crate::rules;
use dates::DateCache;
use header::ColumnRoleMap;
use normalize::{canonicalize_text, normalize_line_code};
use values::parse_quantity;

/// A fully normalized data row, ready for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    /// ISO date (YYYY-MM-DD).
    pub date: String,
    pub line_code: String,
    pub line_name: String,
    /// Canonicalized operating companies; never empty.
    pub companies: Vec<String>,
    /// Per-company share: the row value divided evenly across companies.
    pub share: Decimal,
    /// True when the audit replaced the declared total with the
    /// component sum.
    pub audit_adjusted: bool,
}

/// Why a single row was set aside. Row-level problems never abort the
/// import; they are tallied in the summary and the stream continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("row is missing mandatory column {column}")]
    ShortRow { column: usize },

    #[error("unparseable date cell '{raw}'")]
    BadDate { raw: String },
}

/// Tagged outcome of normalizing one data row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Record(NormalizedRow),
    /// Dropped by a domain exclusion rule; counted apart from errors.
    Excluded { line_code: String },
    Failed(RowError),
}

/// Normalize one data row against the resolved column map.
///
/// `audit_components` enables the predicted-feed reconciliation of the
/// declared total against the positional component columns.
pub fn normalize_row(
    record: &StringRecord,
    columns: &ColumnRoleMap,
    cache: &mut DateCache,
    audit_components: bool,
) -> RowOutcome {
    let raw_date = match record.get(columns.date) {
        Some(cell) => cell.trim(),
        None => return RowOutcome::Failed(RowError::ShortRow { column: columns.date }),
    };
    let raw_line = match record.get(columns.line) {
        Some(cell) => cell.trim(),
        None => return RowOutcome::Failed(RowError::ShortRow { column: columns.line }),
    };

    let line_code = normalize_line_code(raw_line);
    if rules::is_excluded_line(&line_code) {
        return RowOutcome::Excluded { line_code };
    }

    let date = match cache.resolve(raw_date) {
        Ok(iso) => iso,
        Err(err) => return RowOutcome::Failed(err),
    };

    // Row value: the resolved total column, or occurrence counting when
    // the feed has no usable quantity column.
    let mut value = match columns.total {
        Some(idx) => match record.get(idx) {
            Some(cell) => parse_quantity(cell),
            None => return RowOutcome::Failed(RowError::ShortRow { column: idx }),
        },
        None => Decimal::ONE,
    };

    let mut audit_adjusted = false;
    if audit_components {
        let (reconciled, adjusted) = audit::reconcile_total(record, value);
        value = reconciled;
        audit_adjusted = adjusted;
    }

    let line_name = match columns.name.and_then(|idx| record.get(idx)) {
        Some(cell) => cell.trim().to_string(),
        None => line_code.clone(),
    };

    let raw_company = match columns.company {
        Some(idx) => match record.get(idx) {
            Some(cell) => cell,
            None => return RowOutcome::Failed(RowError::ShortRow { column: idx }),
        },
        None => "",
    };
    let companies = split_companies(raw_company);
    let share = value / Decimal::from(companies.len() as u64);

    RowOutcome::Record(NormalizedRow {
        date,
        line_code,
        line_name,
        companies,
        share,
        audit_adjusted,
    })
}

/// Split a multi-operator company cell on '/' and canonicalize each
/// fragment. Always yields at least one company (the placeholder).
fn split_companies(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return vec![rules::NOT_INFORMED_COMPANY.to_string()];
    }
    let companies: Vec<String> = trimmed
        .split('/')
        .filter(|fragment| !fragment.trim().is_empty())
        .map(canonicalize_text)
        .collect();
    if companies.is_empty() {
        vec![rules::NOT_INFORMED_COMPANY.to_string()]
    } else {
        companies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(cells: &[&str]) -> StringRecord {
        StringRecord::from(cells.to_vec())
    }

    fn columns() -> ColumnRoleMap {
        ColumnRoleMap {
            date: 0,
            line: 1,
            name: None,
            total: Some(2),
            company: Some(3),
        }
    }

    fn must_record(outcome: RowOutcome) -> NormalizedRow {
        match outcome {
            RowOutcome::Record(row) => row,
            other => panic!("expected a record, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_row_normalizes() {
        let mut cache = DateCache::new();
        let row = must_record(normalize_row(
            &record(&["15/01/2024", "A501.2", "1.234,5", "São Pedro"]),
            &columns(),
            &mut cache,
            false,
        ));
        assert_eq!(row.date, "2024-01-15");
        assert_eq!(row.line_code, "501");
        assert_eq!(row.companies, vec!["SAO PEDRO"]);
        assert_eq!(row.share, dec!(1234.5));
        assert_eq!(row.line_name, "501");
    }

    #[test]
    fn test_multi_operator_share_split() {
        let mut cache = DateCache::new();
        let row = must_record(normalize_row(
            &record(&["15/01/2024", "200", "100", "ABC / DEF"]),
            &columns(),
            &mut cache,
            false,
        ));
        assert_eq!(row.companies, vec!["ABC", "DEF"]);
        assert_eq!(row.share, dec!(50));
    }

    #[test]
    fn test_excluded_line_dropped() {
        let mut cache = DateCache::new();
        let outcome = normalize_row(
            &record(&["15/01/2024", "900", "10", "ABC"]),
            &columns(),
            &mut cache,
            false,
        );
        assert_eq!(
            outcome,
            RowOutcome::Excluded {
                line_code: "900".to_string()
            }
        );
    }

    #[test]
    fn test_bad_date_fails_row() {
        let mut cache = DateCache::new();
        let outcome = normalize_row(
            &record(&["99/99/2024", "501", "10", "ABC"]),
            &columns(),
            &mut cache,
            false,
        );
        assert!(matches!(outcome, RowOutcome::Failed(RowError::BadDate { .. })));
    }

    #[test]
    fn test_short_row_fails() {
        let mut cache = DateCache::new();
        let outcome = normalize_row(&record(&["15/01/2024"]), &columns(), &mut cache, false);
        assert!(matches!(
            outcome,
            RowOutcome::Failed(RowError::ShortRow { column: 1 })
        ));
    }

    #[test]
    fn test_no_total_column_counts_occurrences() {
        let mut cache = DateCache::new();
        let cols = ColumnRoleMap {
            date: 0,
            line: 1,
            name: None,
            total: None,
            company: None,
        };
        let row = must_record(normalize_row(
            &record(&["15/01/2024", "501"]),
            &cols,
            &mut cache,
            false,
        ));
        assert_eq!(row.share, Decimal::ONE);
        assert_eq!(row.companies, vec![rules::NOT_INFORMED_COMPANY]);
    }

    #[test]
    fn test_name_column_used_when_present() {
        let mut cache = DateCache::new();
        let cols = ColumnRoleMap {
            date: 0,
            line: 1,
            name: Some(4),
            total: Some(2),
            company: Some(3),
        };
        let row = must_record(normalize_row(
            &record(&["15/01/2024", "501", "10", "ABC", " Lapa - Terminal "]),
            &cols,
            &mut cache,
            false,
        ));
        assert_eq!(row.line_name, "Lapa - Terminal");
    }

    #[test]
    fn test_blank_company_fragments_fall_back_to_placeholder() {
        let mut cache = DateCache::new();
        let row = must_record(normalize_row(
            &record(&["15/01/2024", "501", "10", " / / "]),
            &columns(),
            &mut cache,
            false,
        ));
        assert_eq!(row.companies, vec![rules::NOT_INFORMED_COMPANY]);
        assert_eq!(row.share, dec!(10));
    }

    #[test]
    fn test_audit_replaces_low_declared_total() {
        let mut cache = DateCache::new();
        // Columns 4..=15 hold components; declared total is too low.
        let mut cells = vec!["15/01/2024", "501", "50", "ABC"];
        cells.extend(["10"; 8]);
        let row = must_record(normalize_row(&record(&cells), &columns(), &mut cache, true));
        assert!(row.audit_adjusted);
        assert_eq!(row.share, dec!(80));
    }

    #[test]
    fn test_audit_keeps_consistent_declared_total() {
        let mut cache = DateCache::new();
        let mut cells = vec!["15/01/2024", "501", "100", "ABC"];
        cells.extend(["5"; 8]);
        let row = must_record(normalize_row(&record(&cells), &columns(), &mut cache, true));
        assert!(!row.audit_adjusted);
        assert_eq!(row.share, dec!(100));
    }
}
