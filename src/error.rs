/// Centralized error types for the series pipeline
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    // File I/O Errors
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    // Input Errors
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unparseable period end date: {0}")]
    DateParseError(String),
}

pub type Result<T> = std::result::Result<T, TransformError>;
