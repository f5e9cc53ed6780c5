//! Shared server state
//!
//! Everything the handlers need, built once at startup and cloned into each
//! request. All members are cheap `Arc` clones.

use std::sync::Arc;

use escpos_kit::{ImageCache, NetworkBackend, PrinterBackend};
use tracing::{info, warn};

use super::config::{BackendKind, Config};
use super::error::Result;
use crate::printing::{JobStore, PrintService, PrinterRegistry};
use crate::services::{EventHub, HubNotifier, Identity, Notifier};

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub print: PrintService,
    pub hub: EventHub,
}

impl ServerState {
    /// Assemble state from explicit parts
    pub fn new(
        config: Config,
        backend: Arc<dyn PrinterBackend>,
        identity: Identity,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        let hub = EventHub::new();
        let notifier: Arc<dyn Notifier> = match notifier {
            Some(n) => n,
            None => Arc::new(HubNotifier::new(hub.clone())),
        };
        let print = PrintService::new(
            Arc::new(PrinterRegistry::new(backend)),
            Arc::new(JobStore::new()),
            Arc::new(identity),
            notifier,
            hub.clone(),
        )
        .with_code_page(config.code_page)
        .with_image_source(Arc::new(ImageCache::new(config.image_cache_dir.clone())));

        Self { config, print, hub }
    }

    /// Build the configured backend, detect identity and load the printer list
    pub async fn initialize(config: &Config) -> Result<Self> {
        if let Err(e) = std::fs::create_dir_all(&config.work_dir) {
            warn!(dir = %config.work_dir.display(), error = %e, "Failed to create work dir");
        }

        let backend = build_backend(config)?;
        let identity = Identity::detect(config.machine_id.as_deref()).await;
        let state = Self::new(config.clone(), backend, identity, None);

        match state.print.registry().refresh().await {
            Ok(printers) => {
                for p in &printers {
                    info!(name = %p.name, status = %p.status, "Printer available");
                }
            }
            Err(e) => warn!(error = %e, "Initial printer enumeration failed"),
        }

        Ok(state)
    }
}

fn build_backend(config: &Config) -> Result<Arc<dyn PrinterBackend>> {
    let backend: Arc<dyn PrinterBackend> = match config.printer_backend {
        BackendKind::Network => {
            let list = config.network_printers.as_deref().unwrap_or_default();
            let backend = NetworkBackend::from_list(list)?;
            info!(count = backend.printers().len(), "Using network printer backend");
            Arc::new(backend)
        }
        BackendKind::System => system_backend(),
    };
    Ok(backend)
}

#[cfg(not(windows))]
fn system_backend() -> Arc<dyn PrinterBackend> {
    info!("Using CUPS printer backend");
    Arc::new(escpos_kit::CupsBackend::new())
}

#[cfg(windows)]
fn system_backend() -> Arc<dyn PrinterBackend> {
    info!("Using Windows spooler backend");
    Arc::new(escpos_kit::WindowsSpoolerBackend::new())
}
