//! Utilities
//!
//! - [`AppError`] - HTTP error type
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;

pub use error::{AppError, AppResult};
