//! Error types for the printer transports

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Printer is offline or unreachable
    #[error("Printer offline: {0}")]
    Offline(String),

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// No printer with that name is known to the transport
    #[error("Unknown printer: {0}")]
    UnknownPrinter(String),

    /// Spooler command (lp / lpstat) exited with an error
    #[error("Print command failed: {0}")]
    Command(String),

    /// Transport accepted fewer bytes than requested
    #[error("Incomplete write: {written}/{expected} bytes")]
    IncompleteWrite { written: usize, expected: usize },

    /// Windows-specific printing error
    #[cfg(windows)]
    #[error("Windows printer error: {0}")]
    WindowsPrinter(String),
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
