use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrsError {
    #[error("Invalid filter specification: {0}")]
    InvalidFilterSpec(String),

    #[error("Filter design failed: {0}")]
    FilterDesign(String),

    #[error("Signal too short: need at least {needed} samples, have {available}")]
    SignalTooShort { needed: usize, available: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, QrsError>;
