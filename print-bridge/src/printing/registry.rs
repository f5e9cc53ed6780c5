//! Printer registry
//!
//! Caches the last enumeration from the transport. A refresh builds a new
//! snapshot and swaps it in whole, so readers see either the old list or the
//! new one, never a mix.

use std::collections::HashMap;
use std::sync::Arc;

use escpos_kit::{PrintError, PrinterBackend, PrinterInfo};
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Printer '{0}' not found and no default printer available.")]
    NotFound(String),

    #[error("Failed to enumerate printers: {0}")]
    Enumerate(#[from] PrintError),
}

/// Outcome of a fallback resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub printer: PrinterInfo,
    /// True when the requested name was not found and the default was used
    pub fell_back: bool,
}

#[derive(Debug, Default)]
struct Snapshot {
    ordered: Vec<PrinterInfo>,
    by_name: HashMap<String, usize>,
}

impl Snapshot {
    fn new(ordered: Vec<PrinterInfo>) -> Self {
        let mut by_name = HashMap::with_capacity(ordered.len());
        for (idx, p) in ordered.iter().enumerate() {
            // First entry wins on duplicate names
            by_name.entry(p.name.clone()).or_insert(idx);
        }
        Self { ordered, by_name }
    }

    fn get(&self, name: &str) -> Option<&PrinterInfo> {
        self.by_name.get(name).map(|&idx| &self.ordered[idx])
    }

    fn default_printer(&self) -> Option<&PrinterInfo> {
        self.ordered.first()
    }
}

/// Cached printer list with a first-entry default
pub struct PrinterRegistry {
    backend: Arc<dyn PrinterBackend>,
    snapshot: RwLock<Arc<Snapshot>>,
    /// Held across enumerate and swap so a slow refresh cannot overwrite a newer one
    refresh_lock: AsyncMutex<()>,
}

impl PrinterRegistry {
    pub fn new(backend: Arc<dyn PrinterBackend>) -> Self {
        Self {
            backend,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            refresh_lock: AsyncMutex::new(()),
        }
    }

    pub fn backend(&self) -> &Arc<dyn PrinterBackend> {
        &self.backend
    }

    fn current(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Re-enumerate and replace the cache. On error the old cache stays.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Vec<PrinterInfo>, ResolveError> {
        let _guard = self.refresh_lock.lock().await;
        let printers = self.backend.enumerate().await?;
        let snapshot = Arc::new(Snapshot::new(printers.clone()));
        *self.snapshot.write() = snapshot;

        info!(
            count = printers.len(),
            default = printers.first().map(|p| p.name.as_str()).unwrap_or(""),
            "Printers refreshed"
        );
        Ok(printers)
    }

    /// Exact cache lookup, no I/O
    pub fn resolve(&self, name: &str) -> Option<PrinterInfo> {
        self.current().get(name).cloned()
    }

    /// Cache hit → refresh and retry → default printer → not found
    #[instrument(skip(self))]
    pub async fn resolve_with_fallback(&self, name: &str) -> Result<Resolution, ResolveError> {
        if let Some(printer) = self.resolve(name) {
            return Ok(Resolution {
                printer,
                fell_back: false,
            });
        }

        info!(printer = %name, "Printer not in cache, refreshing printer list");
        if let Err(e) = self.refresh().await {
            // A failed refresh still leaves the old cache usable for the default
            warn!(error = %e, "Printer refresh failed");
        }

        let snapshot = self.current();
        if let Some(printer) = snapshot.get(name) {
            return Ok(Resolution {
                printer: printer.clone(),
                fell_back: false,
            });
        }

        match snapshot.default_printer() {
            Some(default) => {
                warn!(
                    requested = %name,
                    default = %default.name,
                    "Printer still not found, falling back to default"
                );
                Ok(Resolution {
                    printer: default.clone(),
                    fell_back: true,
                })
            }
            None => Err(ResolveError::NotFound(name.to_string())),
        }
    }

    /// Printers in enumeration order
    pub fn list(&self) -> Vec<PrinterInfo> {
        self.current().ordered.clone()
    }

    /// First printer of the last successful refresh
    pub fn default_printer(&self) -> Option<PrinterInfo> {
        self.current().default_printer().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use escpos_kit::PrintResult;
    use parking_lot::Mutex;
    use std::time::Duration;

    /// Returns each scripted enumeration in turn, repeating the last one
    struct Scripted {
        rounds: Mutex<Vec<PrintResult<Vec<PrinterInfo>>>>,
        calls: Mutex<usize>,
    }

    impl Scripted {
        fn new(rounds: Vec<PrintResult<Vec<PrinterInfo>>>) -> Arc<Self> {
            Arc::new(Self {
                rounds: Mutex::new(rounds),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl PrinterBackend for Scripted {
        async fn enumerate(&self) -> PrintResult<Vec<PrinterInfo>> {
            *self.calls.lock() += 1;
            let mut rounds = self.rounds.lock();
            if rounds.len() > 1 {
                rounds.remove(0)
            } else {
                match rounds.first() {
                    Some(Ok(list)) => Ok(list.clone()),
                    Some(Err(_)) => Err(PrintError::Command("lpstat failed".into())),
                    None => Ok(Vec::new()),
                }
            }
        }

        async fn write_raw(&self, _printer: &str, _data: &[u8]) -> PrintResult<()> {
            Ok(())
        }
    }

    fn printer(name: &str) -> PrinterInfo {
        PrinterInfo {
            name: name.to_string(),
            unique_id: name.to_string(),
            port_name: "USB001".to_string(),
            status: "Ready".to_string(),
        }
    }

    #[tokio::test]
    async fn test_cache_hit_skips_refresh() {
        let backend = Scripted::new(vec![Ok(vec![printer("HP-1")])]);
        let registry = PrinterRegistry::new(backend.clone());
        registry.refresh().await.unwrap();

        let r = registry.resolve_with_fallback("HP-1").await.unwrap();
        assert_eq!(r.printer.name, "HP-1");
        assert!(!r.fell_back);
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_miss_then_refresh_finds_exact() {
        let backend = Scripted::new(vec![
            Ok(vec![printer("Other")]),
            Ok(vec![printer("Other"), printer("HP-1")]),
        ]);
        let registry = PrinterRegistry::new(backend.clone());
        registry.refresh().await.unwrap();

        let r = registry.resolve_with_fallback("HP-1").await.unwrap();
        assert_eq!(r.printer.name, "HP-1");
        assert!(!r.fell_back);
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_miss_after_refresh_uses_first_entry() {
        let backend = Scripted::new(vec![Ok(vec![printer("Kitchen"), printer("Bar")])]);
        let registry = PrinterRegistry::new(backend);

        let r = registry.resolve_with_fallback("HP-1").await.unwrap();
        assert_eq!(r.printer.name, "Kitchen");
        assert!(r.fell_back);
        assert_eq!(registry.default_printer().unwrap().name, "Kitchen");
    }

    #[tokio::test]
    async fn test_empty_registry_fails() {
        let backend = Scripted::new(vec![Ok(Vec::new())]);
        let registry = PrinterRegistry::new(backend);
        let err = registry.resolve_with_fallback("HP-1").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(ref n) if n == "HP-1"));
        assert!(registry.default_printer().is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_old_snapshot() {
        let backend = Scripted::new(vec![
            Ok(vec![printer("Kitchen")]),
            Err(PrintError::Command("lpstat failed".into())),
        ]);
        let registry = PrinterRegistry::new(backend);
        registry.refresh().await.unwrap();
        assert!(registry.refresh().await.is_err());

        assert_eq!(registry.list(), vec![printer("Kitchen")]);
        let r = registry.resolve_with_fallback("HP-1").await.unwrap();
        assert_eq!(r.printer.name, "Kitchen");
        assert!(r.fell_back);
    }

    #[tokio::test]
    async fn test_refresh_replaces_whole_list() {
        let backend = Scripted::new(vec![
            Ok(vec![printer("A"), printer("B")]),
            Ok(vec![printer("C")]),
        ]);
        let registry = PrinterRegistry::new(backend);
        registry.refresh().await.unwrap();
        assert!(registry.resolve("A").is_some());

        registry.refresh().await.unwrap();
        assert!(registry.resolve("A").is_none());
        assert_eq!(registry.list(), vec![printer("C")]);
    }

    /// First enumeration is slow, later ones answer at once
    struct SlowFirst {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl PrinterBackend for SlowFirst {
        async fn enumerate(&self) -> PrintResult<Vec<PrinterInfo>> {
            let call = {
                let mut calls = self.calls.lock();
                *calls += 1;
                *calls
            };
            if call == 1 {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(vec![printer("Old")])
            } else {
                Ok(vec![printer("New")])
            }
        }

        async fn write_raw(&self, _printer: &str, _data: &[u8]) -> PrintResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_concurrent_refresh_keeps_latest_enumeration() {
        let backend = Arc::new(SlowFirst {
            calls: Mutex::new(0),
        });
        let registry = PrinterRegistry::new(backend);

        let (first, second) = tokio::join!(registry.refresh(), registry.refresh());
        assert_eq!(first.unwrap(), vec![printer("Old")]);
        assert_eq!(second.unwrap(), vec![printer("New")]);

        assert_eq!(registry.default_printer().unwrap().name, "New");
        assert_eq!(registry.list(), vec![printer("New")]);
    }
}
