//! Print job orchestration
//!
//! `submit` answers as soon as the job is recorded. Rendering and the
//! transport write run on a detached task whose only output is the job
//! record (and the notifications it raises on failure).

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use escpos_kit::{CodePage, EscPosBuilder, ImageSource, PrintError, PrinterInfo, is_unavailable};
use futures::FutureExt;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::registry::PrinterRegistry;
use super::store::JobStore;
use super::types::{JobStatus, PrintJob, PrintRequest, Submission};
use crate::receipt::{self, OrderData, PaperWidth, ReceiptType, sample_order};
use crate::services::{EventHub, HubEvent, Identity, Notification, Notifier};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Machine ID mismatch")]
    Unauthorized,
}

/// Why a running job failed. The text ends up on the job record.
#[derive(Debug, Error)]
enum JobError {
    #[error("Render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Transport(#[from] PrintError),

    #[error("Print task panicked")]
    Panicked,
}

/// Accepts print requests and runs them in the background
#[derive(Clone)]
pub struct PrintService {
    registry: Arc<PrinterRegistry>,
    store: Arc<JobStore>,
    identity: Arc<Identity>,
    notifier: Arc<dyn Notifier>,
    hub: EventHub,
    images: Option<Arc<dyn ImageSource>>,
    code_page: CodePage,
}

impl PrintService {
    pub fn new(
        registry: Arc<PrinterRegistry>,
        store: Arc<JobStore>,
        identity: Arc<Identity>,
        notifier: Arc<dyn Notifier>,
        hub: EventHub,
    ) -> Self {
        Self {
            registry,
            store,
            identity,
            notifier,
            hub,
            images: None,
            code_page: CodePage::default(),
        }
    }

    /// Source for logo downloads
    pub fn with_image_source(mut self, images: Arc<dyn ImageSource>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_code_page(mut self, code_page: CodePage) -> Self {
        self.code_page = code_page;
        self
    }

    pub fn registry(&self) -> &Arc<PrinterRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Check the caller, resolve the printer and schedule the job
    #[instrument(skip_all, fields(printer = %req.printer_name, invoice = %req.order_data.invoice_no))]
    pub async fn submit(&self, req: PrintRequest) -> Result<Submission, SubmitError> {
        if !self.identity.verify(&req.machine_id) {
            warn!(machine_id = %req.machine_id, "Rejected print request: machine id mismatch");
            self.hub.log("[Security] Print request rejected: machine ID mismatch");
            self.notifier.notify(Notification::new(
                "Validation Failed",
                "Machine ID mismatch. Print request rejected.",
            ));
            return Err(SubmitError::Unauthorized);
        }

        Ok(self
            .enqueue(
                req.order_data,
                &req.printer_name,
                req.printer_size,
                req.receipt_type,
            )
            .await)
    }

    /// Print the demo order as an 80mm bill
    #[instrument(skip(self))]
    pub async fn test_print(&self, printer_name: &str) -> Submission {
        self.enqueue(sample_order(), printer_name, PaperWidth::Mm80, ReceiptType::Bill)
            .await
    }

    async fn enqueue(
        &self,
        data: OrderData,
        requested: &str,
        width: PaperWidth,
        kind: ReceiptType,
    ) -> Submission {
        self.hub.log(format!(
            "[Print] Received {} job for invoice {} on '{}'",
            kind, data.invoice_no, requested
        ));

        let resolution = match self.registry.resolve_with_fallback(requested).await {
            Ok(resolution) => resolution,
            Err(e) => {
                let message = e.to_string();
                error!(printer = %requested, "{}", message);
                let job = PrintJob::new(&data.invoice_no, requested, kind).failed(&message);
                let submission = Submission {
                    job_id: job.id.clone(),
                    status: job.status,
                    printer_name: requested.to_string(),
                    error: Some(message.clone()),
                };
                self.record(job);
                self.notifier
                    .notify(Notification::new("Printer Not Found", message).with_sound());
                return submission;
            }
        };

        let printer = resolution.printer;
        if resolution.fell_back {
            self.hub.log(format!(
                "[Print] Printer '{}' not found, using default '{}'",
                requested, printer.name
            ));
        }

        let job = PrintJob::new(&data.invoice_no, &printer.name, kind);
        let submission = Submission {
            job_id: job.id.clone(),
            status: JobStatus::Processing,
            printer_name: printer.name.clone(),
            error: None,
        };
        self.record(job.clone());

        let service = self.clone();
        tokio::spawn(async move {
            let outcome = AssertUnwindSafe(service.execute(&printer, kind, data, width))
                .catch_unwind()
                .await
                .unwrap_or(Err(JobError::Panicked));
            service.finish(job, &printer, outcome);
        });

        submission
    }

    async fn execute(
        &self,
        printer: &PrinterInfo,
        kind: ReceiptType,
        data: OrderData,
        width: PaperWidth,
    ) -> Result<usize, JobError> {
        if is_unavailable(&printer.status) {
            warn!(printer = %printer.name, status = %printer.status, "Printer reports unavailable, sending anyway");
            self.hub.log(format!(
                "[Print] Warning: printer '{}' status is '{}'",
                printer.name, printer.status
            ));
        }

        let code_page = self.code_page;
        let images = self.images.clone();
        let bytes = tokio::task::spawn_blocking(move || {
            let mut builder = EscPosBuilder::new().with_code_page(code_page);
            if let Some(images) = images {
                builder = builder.with_image_source(images);
            }
            receipt::render(&mut builder, kind, &data, width);
            builder.into_bytes()
        })
        .await
        .map_err(|e| JobError::Render(e.to_string()))?;

        self.registry
            .backend()
            .write_raw(&printer.name, &bytes)
            .await?;
        Ok(bytes.len())
    }

    fn finish(&self, job: PrintJob, printer: &PrinterInfo, outcome: Result<usize, JobError>) {
        let job = match outcome {
            Ok(len) => {
                info!(job_id = %job.id, printer = %printer.name, bytes = len, "Print job completed");
                self.hub
                    .log(format!("[Print] Job {} sent to '{}'", job.id, printer.name));
                job.succeeded()
            }
            Err(e) => {
                error!(job_id = %job.id, printer = %printer.name, error = %e, "Print job failed");
                self.hub.log(format!(
                    "[Print] Job {} failed on '{}': {}",
                    job.id, printer.name, e
                ));
                self.notifier.notify(
                    Notification::new(
                        "Print Failed",
                        format!("Failed to print on {}: {}", printer.name, e),
                    )
                    .with_sound(),
                );
                job.failed(e.to_string())
            }
        };
        self.record(job);
    }

    fn record(&self, job: PrintJob) {
        self.store.upsert(job.clone());
        self.hub.publish(HubEvent::JobUpdate { job });
    }
}
