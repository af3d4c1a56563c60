use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconError {
    /// A roster row has no given or family name, so no canonical name can be derived.
    #[error("roster row {row}: missing field '{field}'")]
    MissingField { row: usize, field: String },
    /// Required column absent from an input file's header row.
    #[error("{input}: missing column '{column}'")]
    MissingColumn { input: String, column: String },
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (threshold out of range, empty column name, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Malformed CSV (unterminated quote, invalid UTF-8, writer failure).
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for ReconError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReconError>;
