//! In-memory job history

use parking_lot::RwLock;

use super::types::PrintJob;

/// Thread-safe job history, lost on restart
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<Vec<PrintJob>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the job with the same id in place, or append
    pub fn upsert(&self, job: PrintJob) {
        let mut jobs = self.jobs.write();
        match jobs.iter_mut().find(|j| j.id == job.id) {
            Some(slot) => *slot = job,
            None => jobs.push(job),
        }
    }

    /// All jobs, newest submission first. Equal timestamps keep the
    /// later-inserted job first.
    pub fn all(&self) -> Vec<PrintJob> {
        let mut jobs: Vec<PrintJob> = self.jobs.read().iter().rev().cloned().collect();
        jobs.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        jobs
    }

    pub fn get(&self, id: &str) -> Option<PrintJob> {
        self.jobs.read().iter().find(|j| j.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    pub fn clear(&self) {
        self.jobs.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printing::types::JobStatus;
    use crate::receipt::ReceiptType;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn job_at(id: &str, secs: i64) -> PrintJob {
        let mut job = PrintJob::new("INV", "HP-1", ReceiptType::Bill);
        job.id = id.to_string();
        job.submitted_at = Utc::now() - Duration::seconds(100) + Duration::seconds(secs);
        job
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let store = JobStore::new();
        let job = job_at("a", 0);
        store.upsert(job.clone());
        store.upsert(job.clone().failed("boom"));
        store.upsert(job.clone().succeeded());

        assert_eq!(store.len(), 1);
        let stored = store.get("a").unwrap();
        assert_eq!(stored.status, JobStatus::Success);
        assert_eq!(stored.error, None);
    }

    #[test]
    fn test_all_newest_first_regardless_of_update_order() {
        let store = JobStore::new();
        store.upsert(job_at("old", 1));
        store.upsert(job_at("new", 3));
        store.upsert(job_at("mid", 2));
        // Completing an old job must not move it to the front
        store.upsert(job_at("old", 1).succeeded());

        let ids: Vec<_> = store.all().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_equal_timestamps_later_insert_first() {
        let store = JobStore::new();
        let a = job_at("a", 5);
        let mut b = job_at("b", 5);
        b.submitted_at = a.submitted_at;
        store.upsert(a);
        store.upsert(b);
        let ids: Vec<_> = store.all().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_clear_and_missing() {
        let store = JobStore::new();
        store.upsert(job_at("a", 0));
        assert!(store.get("zzz").is_none());
        store.clear();
        assert!(store.is_empty());
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_concurrent_upserts() {
        let store = Arc::new(JobStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let id = format!("job-{}", i % 10);
                        let mut job = job_at(&id, i);
                        if t % 2 == 0 {
                            job = job.succeeded();
                        }
                        store.upsert(job);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 10);
    }
}
