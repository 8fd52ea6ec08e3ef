#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("empty feed: no header line to read")]
    EmptyInput,

    #[error("essential columns (date/line) not found in header: {found:?}")]
    MissingColumns { found: Vec<String> },

    #[error("unreadable delimited stream: {0}")]
    Csv(#[from] csv::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
