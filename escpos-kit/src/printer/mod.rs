//! Printer transports
//!
//! A backend knows how to list the printers it can reach and how to push raw
//! bytes at one of them. Which backend runs is decided once at startup:
//! - CUPS `lp` (Linux / macOS)
//! - Windows spooler (`WritePrinter`, RAW datatype)
//! - Raw TCP printers on port 9100, configured by address

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PrintResult;

mod network;
mod status;

#[cfg(not(windows))]
mod cups;

#[cfg(windows)]
mod spooler;

pub use network::{NetworkBackend, NetworkPrinter};
pub use status::{cups_status_text, is_unavailable, spooler_status_text};

#[cfg(not(windows))]
pub use cups::CupsBackend;

#[cfg(windows)]
pub use spooler::WindowsSpoolerBackend;

/// A printer as reported by the OS (or network config)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInfo {
    /// Display name, also the lookup key
    pub name: String,
    /// Platform-unique identifier
    pub unique_id: String,
    /// Secondary platform handle (port name, queue name, address)
    #[serde(rename = "windowsId")]
    pub port_name: String,
    /// Free-text status: "Ready", "Offline", "Paper Jam", ...
    pub status: String,
}

/// Printer transport capability
#[async_trait]
pub trait PrinterBackend: Send + Sync {
    /// Enumerate printers, in the platform's preferred order
    async fn enumerate(&self) -> PrintResult<Vec<PrinterInfo>>;

    /// Send raw ESC/POS data to the named printer
    async fn write_raw(&self, printer: &str, data: &[u8]) -> PrintResult<()>;
}
