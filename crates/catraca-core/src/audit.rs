//! Internal-consistency audit for the predicted feed: the declared row
//! total is cross-checked against a sum of itemized component columns,
//! and the larger value wins. The component range is positional, by
//! upstream convention, regardless of what the header says.

use csv::StringRecord;
use rust_decimal::Decimal;

use crate::parsing::values::parse_quantity;
use crate::rules::AUDIT_COMPONENT_COLUMNS;

/// Sum the itemized component columns of one row. Columns beyond the
/// row's length contribute nothing.
pub fn component_sum(record: &StringRecord) -> Decimal {
    AUDIT_COMPONENT_COLUMNS
        .filter_map(|idx| record.get(idx))
        .map(parse_quantity)
        .sum()
}

/// Reconcile a declared total against its component sum. Returns the
/// reconciled value and whether an adjustment was applied. The declared
/// value is never reduced; a component sum below it is taken as rounding
/// noise in the itemized columns, not as evidence against the total.
pub fn reconcile_total(record: &StringRecord, declared: Decimal) -> (Decimal, bool) {
    let components = component_sum(record);
    if components > declared {
        (components, true)
    } else {
        (declared, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row_with_components(components: &[&str]) -> StringRecord {
        let mut cells = vec!["2024-01-15", "501", "0", "ABC"];
        cells.extend_from_slice(components);
        StringRecord::from(cells)
    }

    #[test]
    fn test_component_sum_over_fixed_range() {
        let record = row_with_components(&["10", "20", "30"]);
        assert_eq!(component_sum(&record), dec!(60));
    }

    #[test]
    fn test_component_sum_ignores_columns_past_range() {
        let mut components = vec!["1"; 12];
        components.push("999");
        let record = row_with_components(&components);
        assert_eq!(component_sum(&record), dec!(12));
    }

    #[test]
    fn test_short_rows_sum_what_exists() {
        assert_eq!(component_sum(&row_with_components(&[])), Decimal::ZERO);
    }

    #[test]
    fn test_locale_formatting_inside_components() {
        let record = row_with_components(&["1.234,5", "0,5"]);
        assert_eq!(component_sum(&record), dec!(1235));
    }

    #[test]
    fn test_higher_component_sum_wins() {
        let record = row_with_components(&["50", "30"]);
        let (value, adjusted) = reconcile_total(&record, dec!(50));
        assert_eq!(value, dec!(80));
        assert!(adjusted);
    }

    #[test]
    fn test_declared_total_never_reduced() {
        let record = row_with_components(&["10", "10"]);
        let (value, adjusted) = reconcile_total(&record, dec!(100));
        assert_eq!(value, dec!(100));
        assert!(!adjusted);
    }

    #[test]
    fn test_equal_sums_keep_declared() {
        let record = row_with_components(&["40", "60"]);
        let (value, adjusted) = reconcile_total(&record, dec!(100));
        assert_eq!(value, dec!(100));
        assert!(!adjusted);
    }
}
