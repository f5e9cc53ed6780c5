use escpos_kit::PrintError;
use thiserror::Error;

/// Startup and serve-loop failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("Printer backend configuration: {0}")]
    Backend(#[from] PrintError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
