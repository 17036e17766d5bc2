//! Storage seam for finished reports.
//!
//! A hosted backend implements [`AnalysisStore`] outside this crate.
//! [`MemoryStore`] stands in when none is configured.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::report::AnalysisReport;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub report: AnalysisReport,
}

/// Persistence backend for finished reports.
///
/// Implementations must be `Send + Sync`; calls are awaited from
/// concurrently running requests.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Persist a report and return its id.
    async fn store(&self, report: &AnalysisReport) -> Result<String>;

    /// Reports for `region`, newest first, at most `limit`.
    async fn history(&self, region: &str, limit: usize) -> Result<Vec<StoredAnalysis>>;
}

/// Process-local store. Ids look like `mock_<unix millis>_<sequence>`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredAnalysis>>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Storage("memory store lock poisoned".to_string())
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn store(&self, report: &AnalysisReport) -> Result<String> {
        let created_at = Utc::now();
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        let id = format!("mock_{}_{n}", created_at.timestamp_millis());

        let mut report = report.clone();
        report.id = Some(id.clone());
        self.rows
            .lock()
            .map_err(poisoned)?
            .push(StoredAnalysis { id: id.clone(), created_at, report });
        Ok(id)
    }

    async fn history(&self, region: &str, limit: usize) -> Result<Vec<StoredAnalysis>> {
        let rows = self.rows.lock().map_err(poisoned)?;
        // Insertion order is creation order.
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.report.region == region)
            .take(limit)
            .cloned()
            .collect())
    }
}
