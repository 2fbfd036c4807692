use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed table: expected {expected}, found {found}")]
    MalformedTable { expected: String, found: String },

    #[error("Missing required column '{0}' in Notion table")]
    MissingColumn(String),

    #[error("Row {row}: {reason}")]
    RowDefect { row: usize, reason: String },

    #[error("Unterminated code fence (odd number of ``` markers)")]
    UnterminatedFence,

    #[error("Invalid CSS selector: {0}")]
    Selector(String),

    #[error("Serialized HTML was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
