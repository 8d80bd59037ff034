//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading, joining and validating the dataset.
///
/// All of these are fatal at startup: the service never runs on a partially
/// loaded or inconsistent dataset.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A CSV row couldn't be parsed into its record type
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// A transaction field had an invalid value
    #[error("Invalid value for {field} in transaction {row}: {value:?}")]
    InvalidValue {
        field: String,
        value: String,
        /// Zero-based position of the transaction in dataset order
        row: usize,
    },

    /// The same company or customer id appears on more than one row
    #[error("Duplicate {entity} id {id}")]
    DuplicateId { entity: String, id: u32 },

    /// A transaction references a company or customer that does not exist
    #[error("Integrity error: transaction {row} references unknown {entity} id {id}")]
    IntegrityError {
        entity: String,
        id: u32,
        /// Zero-based position of the transaction in dataset order
        row: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
