//! CUPS transport (Linux / macOS)
//!
//! Shells out to `lpstat` for discovery and `lp -o raw` for printing.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use super::status::cups_status_text;
use super::{PrinterBackend, PrinterInfo};
use crate::error::{PrintError, PrintResult};

/// Printers known to the local CUPS server
#[derive(Debug, Clone, Default)]
pub struct CupsBackend;

impl CupsBackend {
    pub fn new() -> Self {
        Self
    }

    async fn status_of(name: &str) -> String {
        match Command::new("lpstat").arg("-p").arg(name).output().await {
            Ok(out) => cups_status_text(&String::from_utf8_lossy(&out.stdout)).to_string(),
            Err(e) => {
                debug!(printer = %name, error = %e, "lpstat -p failed");
                "Unknown".to_string()
            }
        }
    }
}

#[async_trait]
impl PrinterBackend for CupsBackend {
    #[instrument(skip(self))]
    async fn enumerate(&self) -> PrintResult<Vec<PrinterInfo>> {
        // No CUPS, or no destinations: an empty list, not an error
        let output = match Command::new("lpstat").arg("-e").output().await {
            Ok(out) if out.status.success() => out,
            Ok(out) => {
                warn!(code = ?out.status.code(), "lpstat -e returned an error");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(error = %e, "lpstat not available");
                return Ok(Vec::new());
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut printers = Vec::new();
        for name in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
            printers.push(PrinterInfo {
                name: name.to_string(),
                unique_id: name.to_string(),
                port_name: name.to_string(),
                status: Self::status_of(name).await,
            });
        }
        Ok(printers)
    }

    #[instrument(skip(self, data), fields(data_len = data.len()))]
    async fn write_raw(&self, printer: &str, data: &[u8]) -> PrintResult<()> {
        info!(printer = %printer, "Sending job via lp");

        let mut child = Command::new("lp")
            .args(["-d", printer, "-o", "raw"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(data).await?;
            // Dropping stdin closes the pipe so lp sees EOF
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let mut msg = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if msg.is_empty() {
                msg = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(PrintError::Command(format!(
                "lp exited with {}: {}",
                output.status, msg
            )));
        }

        info!(
            printer = %printer,
            output = %String::from_utf8_lossy(&output.stdout).trim(),
            "Job accepted by CUPS"
        );
        Ok(())
    }
}
