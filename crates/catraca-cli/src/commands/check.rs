use std::path::PathBuf;

use catraca_core::error::ImportError;
use catraca_core::model::MeasureKind;
use catraca_core::{import_feed, SqliteStore};

use crate::output;

/// Full pipeline against an in-memory store: the feed is decoded,
/// normalized and aggregated exactly as a real import, but nothing
/// survives the run.
pub fn run(input_file: PathBuf, kind: MeasureKind, output_format: &str) -> Result<(), ImportError> {
    let file = std::fs::File::open(&input_file)?;
    let byte_length = file.metadata()?.len();

    let mut store = SqliteStore::open_in_memory()?;
    let summary = import_feed(file, byte_length, kind, &mut store)?;

    match output_format {
        "json" => output::json::print(&summary)?,
        _ => output::table::print(&summary),
    }
    eprintln!("check only: nothing was written");
    Ok(())
}
