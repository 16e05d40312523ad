//! Store configuration
//!
//! Built once at process start and handed to [`crate::MetricStore::new`];
//! nothing here is reconfigurable at runtime.

use crate::error::{Result, StoreError};

/// Path the ingestion endpoint serves imports on
pub const IMPORT_PATH: &str = "/api/v1/import";

/// Instance/job labels assigned to one producer's metrics
///
/// Labels are injected per producer kind rather than hard-coded in the
/// normalizer, so a deployment that can attribute records to individual
/// instances can do so without touching the transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceLabels {
    pub instance: String,
    pub job: String,
}

impl InstanceLabels {
    pub fn new(instance: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            job: job.into(),
        }
    }
}

/// Configuration for [`crate::MetricStore`]
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Listen address of the ingestion endpoint, either `HOST:PORT` or
    /// the port-only form `:PORT`
    pub http_addr: String,

    /// Labels for SQL-execution-layer records
    pub tidb_labels: InstanceLabels,

    /// Labels for storage-node records
    pub tikv_labels: InstanceLabels,
}

impl StoreConfig {
    /// Configuration with the default per-producer labels
    pub fn new(http_addr: impl Into<String>) -> Self {
        Self {
            http_addr: http_addr.into(),
            tidb_labels: InstanceLabels::new("TiDB", "TiDB"),
            tikv_labels: InstanceLabels::new("TiKV", "TiKV"),
        }
    }

    /// Derive the import URL from the listen address
    ///
    /// A port-only address targets `0.0.0.0`. An empty address is a
    /// startup error; the process cannot continue without a sink.
    pub fn import_url(&self) -> Result<String> {
        if self.http_addr.is_empty() {
            return Err(StoreError::EmptyListenAddr);
        }

        if self.http_addr.starts_with(':') {
            Ok(format!("http://0.0.0.0{}{}", self.http_addr, IMPORT_PATH))
        } else {
            Ok(format!("http://{}{}", self.http_addr, IMPORT_PATH))
        }
    }
}
