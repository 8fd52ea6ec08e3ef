use catraca_core::model::{ImportSummary, MeasureKind};

/// Plain-text summary block for one import run.
pub fn print(summary: &ImportSummary) {
    println!("=== {} import ===\n", summary.kind);
    println!("  rows read:         {}", summary.rows_read);
    println!(
        "  rows skipped:      {} ({} excluded, {} errors)",
        summary.rows_skipped(),
        summary.rows_excluded,
        summary.rows_failed
    );
    println!("  aggregation keys:  {}", summary.unique_keys);
    if summary.kind == MeasureKind::Predicted {
        println!("  audit adjustments: {}", summary.audit_adjustments);
    }
    println!("  records written:   {}", summary.records_written);
}
