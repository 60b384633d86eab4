//! Error types for the canvas and the printer directory

use thiserror::Error;

/// Printing error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Unknown paper-size, orientation, or duplex key
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Native spooler or GDI call failure
    #[error("Printer device error: {0}")]
    Device(String),

    /// Printer name missing from the directory cache
    #[error("Printer not found: {0}")]
    NotFound(String),
}

/// Result type for printing operations
pub type PrintResult<T> = Result<T, PrintError>;
