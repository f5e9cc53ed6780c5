//! Raw TCP printers (port 9100)
//!
//! Most thermal printers accept raw ESC/POS on TCP 9100. Since there is no
//! discovery, the printers are listed in configuration as `name=host:port`.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

use super::{PrinterBackend, PrinterInfo};
use crate::error::{PrintError, PrintResult};

const DEFAULT_PORT: u16 = 9100;

/// A single network printer
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    name: String,
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(name: &str, host: &str, port: u16) -> PrintResult<Self> {
        Self::from_addr(name, &format!("{}:{}", host, port))
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100").
    /// Port 9100 is assumed when missing.
    pub fn from_addr(name: &str, addr: &str) -> PrintResult<Self> {
        let addr_str = if addr.contains(':') {
            addr.to_string()
        } else {
            format!("{}:{}", addr, DEFAULT_PORT)
        };
        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr_str)))?;

        Ok(Self {
            name: name.to_string(),
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    #[instrument(skip(self, data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        let write = async {
            stream.write_all(data).await?;
            stream.flush().await
        };
        tokio::time::timeout(self.timeout, write)
            .await
            .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", self.addr)))??;

        info!("Print data sent");
        Ok(())
    }

    async fn is_online(&self) -> bool {
        let check_timeout = Duration::from_millis(500);

        match tokio::time::timeout(check_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(addr = %self.addr, error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!(addr = %self.addr, "Printer check timeout");
                false
            }
        }
    }
}

/// Backend over a fixed list of network printers
#[derive(Debug, Clone, Default)]
pub struct NetworkBackend {
    printers: Vec<NetworkPrinter>,
}

impl NetworkBackend {
    pub fn new(printers: Vec<NetworkPrinter>) -> Self {
        Self { printers }
    }

    /// Parse `Kitchen=192.168.1.50:9100,Bar=192.168.1.51`
    pub fn from_list(list: &str) -> PrintResult<Self> {
        let mut printers = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, addr) = entry.split_once('=').ok_or_else(|| {
                PrintError::InvalidConfig(format!("Expected name=host:port, got: {}", entry))
            })?;
            printers.push(NetworkPrinter::from_addr(name.trim(), addr.trim())?);
        }
        Ok(Self { printers })
    }

    pub fn printers(&self) -> &[NetworkPrinter] {
        &self.printers
    }
}

#[async_trait]
impl PrinterBackend for NetworkBackend {
    async fn enumerate(&self) -> PrintResult<Vec<PrinterInfo>> {
        let checks = self.printers.iter().map(|p| async move {
            let status = if p.is_online().await { "Ready" } else { "Offline" };
            PrinterInfo {
                name: p.name.clone(),
                unique_id: p.name.clone(),
                port_name: p.addr.to_string(),
                status: status.to_string(),
            }
        });
        Ok(futures::future::join_all(checks).await)
    }

    async fn write_raw(&self, printer: &str, data: &[u8]) -> PrintResult<()> {
        let target = self
            .printers
            .iter()
            .find(|p| p.name == printer)
            .ok_or_else(|| PrintError::UnknownPrinter(printer.to_string()))?;
        target.print(data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_network_printer_new() {
        let printer = NetworkPrinter::new("Kitchen", "192.168.1.100", 9100).unwrap();
        assert_eq!(printer.addr().port(), 9100);
        assert_eq!(printer.name(), "Kitchen");
    }

    #[test]
    fn test_default_port() {
        let printer = NetworkPrinter::from_addr("Bar", "10.0.0.5").unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_invalid_addr() {
        assert!(NetworkPrinter::from_addr("x", "invalid:port").is_err());
    }

    #[test]
    fn test_from_list() {
        let backend =
            NetworkBackend::from_list("Kitchen=192.168.1.50:9100, Bar = 192.168.1.51").unwrap();
        assert_eq!(backend.printers().len(), 2);
        assert_eq!(backend.printers()[1].name(), "Bar");

        assert!(NetworkBackend::from_list("no-equals-sign").is_err());
        assert!(NetworkBackend::from_list("").unwrap().printers().is_empty());
    }

    #[tokio::test]
    async fn test_write_raw_delivers_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            sock.read_to_end(&mut buf).await.unwrap();
            buf
        });

        let backend =
            NetworkBackend::new(vec![NetworkPrinter::from_addr("Local", &addr.to_string()).unwrap()]);
        backend.write_raw("Local", b"\x1b@hello").await.unwrap();
        drop(backend);

        assert_eq!(server.await.unwrap(), b"\x1b@hello");
    }

    #[tokio::test]
    async fn test_write_raw_unknown_printer() {
        let backend = NetworkBackend::default();
        let err = backend.write_raw("Nope", b"x").await.unwrap_err();
        assert!(matches!(err, PrintError::UnknownPrinter(_)));
    }
}
