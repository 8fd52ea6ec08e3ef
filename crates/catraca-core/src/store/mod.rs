pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::ImportError;
use crate::model::{MeasureKind, MeasureUpdate};

/// Storage collaborator of the import pipeline.
///
/// One call per import: apply every update for `kind` as a single
/// all-or-nothing batch. For each key, either a new record is created
/// with the populated measure set and the other measure zeroed, or the
/// existing record has only the populated measure replaced; an import
/// of one feed never resets the other feed's value. On error, nothing
/// from the batch may remain visible.
pub trait MeasureStore {
    fn upsert_measures(
        &mut self,
        kind: MeasureKind,
        updates: &[MeasureUpdate],
    ) -> Result<usize, ImportError>;
}
