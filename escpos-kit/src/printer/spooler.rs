//! Windows spooler transport
//!
//! Uses the Win32 printing API: `EnumPrintersW` level 2 for discovery and
//! `WritePrinter` with the RAW datatype so ESC/POS bytes bypass the driver.

use async_trait::async_trait;
use tracing::{info, instrument};

use super::status::spooler_status_text;
use super::{PrinterBackend, PrinterInfo};
use crate::error::{PrintError, PrintResult};

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Installed local and connected printers
#[derive(Debug, Clone, Default)]
pub struct WindowsSpoolerBackend;

impl WindowsSpoolerBackend {
    pub fn new() -> Self {
        Self
    }

    fn list() -> PrintResult<Vec<PrinterInfo>> {
        use windows::Win32::Graphics::Printing::{
            EnumPrintersW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_INFO_2W,
        };

        unsafe {
            let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
            let mut needed: u32 = 0;
            let mut returned: u32 = 0;

            let _ = EnumPrintersW(flags, None, 2, None, &mut needed, &mut returned);

            if needed == 0 {
                return Ok(Vec::new());
            }

            let mut buf: Vec<u8> = vec![0; needed as usize];
            EnumPrintersW(
                flags,
                None,
                2,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
            .map_err(|e| PrintError::WindowsPrinter(format!("EnumPrintersW failed: {}", e)))?;

            let ptr = buf.as_ptr() as *const PRINTER_INFO_2W;
            let slice = std::slice::from_raw_parts(ptr, returned as usize);

            let mut result = Vec::with_capacity(slice.len());
            for info in slice {
                if info.pPrinterName.is_null() {
                    continue;
                }
                let name = info.pPrinterName.to_string().unwrap_or_default();
                let port = if info.pPortName.is_null() {
                    String::new()
                } else {
                    info.pPortName.to_string().unwrap_or_default()
                };
                result.push(PrinterInfo {
                    unique_id: name.clone(),
                    name,
                    port_name: port,
                    status: spooler_status_text(info.Status),
                });
            }
            Ok(result)
        }
    }

    fn write_sync(name: &str, data: &[u8]) -> PrintResult<()> {
        use core::ffi::c_void;
        use windows::Win32::Graphics::Printing::{
            ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, OpenPrinterW, PRINTER_HANDLE,
            StartDocPrinterW, StartPagePrinter, WritePrinter,
        };
        use windows::core::{PCWSTR, PWSTR};

        unsafe {
            let mut handle = PRINTER_HANDLE::default();
            let name_w = to_wide(name);

            OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None).map_err(|e| {
                PrintError::WindowsPrinter(format!("OpenPrinterW failed for '{}': {}", name, e))
            })?;

            let doc_name_w = to_wide("RAW Print Job");
            let datatype_w = to_wide("RAW");
            let doc_info = DOC_INFO_1W {
                pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
                pOutputFile: PWSTR::null(),
                pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
            };

            if StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) == 0 {
                let _ = ClosePrinter(handle);
                return Err(PrintError::WindowsPrinter(
                    "StartDocPrinter failed".to_string(),
                ));
            }

            if !StartPagePrinter(handle).as_bool() {
                let _ = EndDocPrinter(handle);
                let _ = ClosePrinter(handle);
                return Err(PrintError::WindowsPrinter(
                    "StartPagePrinter failed".to_string(),
                ));
            }

            let mut written: u32 = 0;
            let ok = WritePrinter(
                handle,
                data.as_ptr() as *const c_void,
                data.len() as u32,
                &mut written,
            );

            let _ = EndPagePrinter(handle);
            let _ = EndDocPrinter(handle);
            let _ = ClosePrinter(handle);

            if !ok.as_bool() {
                return Err(PrintError::WindowsPrinter("WritePrinter failed".to_string()));
            }

            if written as usize != data.len() {
                return Err(PrintError::IncompleteWrite {
                    written: written as usize,
                    expected: data.len(),
                });
            }

            Ok(())
        }
    }
}

#[async_trait]
impl PrinterBackend for WindowsSpoolerBackend {
    async fn enumerate(&self) -> PrintResult<Vec<PrinterInfo>> {
        tokio::task::spawn_blocking(Self::list)
            .await
            .map_err(|e| PrintError::WindowsPrinter(format!("Task join failed: {}", e)))?
    }

    #[instrument(skip(self, data), fields(data_len = data.len()))]
    async fn write_raw(&self, printer: &str, data: &[u8]) -> PrintResult<()> {
        let name = printer.to_string();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || Self::write_sync(&name, &data))
            .await
            .map_err(|e| PrintError::WindowsPrinter(format!("Task join failed: {}", e)))??;

        info!(printer = %printer, "WritePrinter completed");
        Ok(())
    }
}
