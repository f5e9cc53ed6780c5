//! Core - configuration, state, errors and the server loop
//!
//! - [`Config`] - environment configuration
//! - [`ServerState`] - shared handler state
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{BackendKind, Config};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
