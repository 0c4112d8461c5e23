use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Malformed sheet '{sheet}': {details}")]
    MalformedSheet { sheet: String, details: String },

    #[error("Malformed workbook: {0}")]
    MalformedWorkbook(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid roster configuration: {0}")]
    InvalidRoster(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "xlsx")]
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
