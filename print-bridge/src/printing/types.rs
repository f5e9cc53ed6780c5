//! Print job types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::receipt::{OrderData, PaperWidth, ReceiptType};

/// Job lifecycle. Success and Failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Success,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Processing)
    }
}

/// History record for one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    pub id: String,
    pub invoice_no: String,
    pub printer_name: String,
    pub receipt_type: ReceiptType,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "timestamp")]
    pub submitted_at: DateTime<Utc>,
}

impl PrintJob {
    /// New job in `Processing` with a fresh id
    pub fn new(invoice_no: &str, printer_name: &str, receipt_type: ReceiptType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            invoice_no: invoice_no.to_string(),
            printer_name: printer_name.to_string(),
            receipt_type,
            status: JobStatus::Processing,
            error: None,
            submitted_at: Utc::now(),
        }
    }

    pub fn succeeded(mut self) -> Self {
        self.status = JobStatus::Success;
        self.error = None;
        self
    }

    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self
    }
}

/// Inbound print request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintRequest {
    pub machine_id: String,
    pub printer_name: String,
    pub order_data: OrderData,
    pub printer_size: PaperWidth,
    pub receipt_type: ReceiptType,
}

/// Result of a submission, returned before the job runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub job_id: String,
    pub status: JobStatus,
    /// Printer that will receive the job (after fallback)
    pub printer_name: String,
    /// Error text when the job failed during submission
    pub error: Option<String>,
}
