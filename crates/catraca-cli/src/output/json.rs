use catraca_core::error::ImportError;
use catraca_core::model::ImportSummary;

pub fn print(summary: &ImportSummary) -> Result<(), ImportError> {
    let json = serde_json::to_string_pretty(summary)?;
    println!("{json}");
    Ok(())
}
