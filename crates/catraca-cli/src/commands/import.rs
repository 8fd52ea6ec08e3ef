use std::path::PathBuf;

use catraca_core::error::ImportError;
use catraca_core::model::MeasureKind;
use catraca_core::{import_feed, SqliteStore};

use crate::output;

pub fn run(
    input_file: PathBuf,
    kind: MeasureKind,
    db: PathBuf,
    output_format: &str,
) -> Result<(), ImportError> {
    let file = std::fs::File::open(&input_file)?;
    let byte_length = file.metadata()?.len();

    let mut store = SqliteStore::open(&db)?;
    let summary = import_feed(file, byte_length, kind, &mut store)?;

    match output_format {
        "json" => output::json::print(&summary)?,
        _ => output::table::print(&summary),
    }
    Ok(())
}
