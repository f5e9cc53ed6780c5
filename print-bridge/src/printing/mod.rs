//! Print pipeline
//!
//! - [`registry`] - cached printer list with fallback resolution
//! - [`store`] - in-memory job history
//! - [`service`] - submission and background execution

pub mod registry;
pub mod service;
pub mod store;
mod types;

pub use registry::{PrinterRegistry, Resolution, ResolveError};
pub use service::{PrintService, SubmitError};
pub use store::JobStore;
pub use types::{JobStatus, PrintJob, PrintRequest, Submission};
