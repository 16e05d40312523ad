//! The ingestion store
//!
//! [`MetricStore`] is the context object every ingestion call goes
//! through: the embedded database handle, the HTTP forwarder, the
//! per-producer labels, and the object pools, all built once at startup
//! and immutable afterwards. Calls are synchronous per batch, with no
//! internal queue and no background workers, so callers own concurrency;
//! every entry point acquires and releases its own pooled resources and
//! is safe to invoke from any number of tasks.

use tracing::info;
use turso::{Database, Value};

use topsql_proto::{tidb, tikv};

use crate::config::{InstanceLabels, StoreConfig};
use crate::encode::encode_metrics;
use crate::error::Result;
use crate::forward::Forwarder;
use crate::metric::Metric;
use crate::normalize::{fill_resource_metering_records, fill_top_sql_records};
use crate::pool::Pools;
use crate::upsert::upsert_rows;

const CREATE_TABLE_STMTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS sql_digest (digest TEXT PRIMARY KEY, sql_text TEXT, is_internal INTEGER)",
    "CREATE TABLE IF NOT EXISTS plan_digest (digest TEXT PRIMARY KEY, plan_text TEXT)",
    "CREATE TABLE IF NOT EXISTS instance (instance TEXT PRIMARY KEY, job TEXT)",
];

/// Ingestion tail of the TopSQL pipeline
///
/// Normalizes producer batches into one metric shape, persists
/// deduplicated lookup metadata locally, and forwards metric payloads
/// to the remote ingestion endpoint.
pub struct MetricStore {
    db: Database,
    config: StoreConfig,
    forwarder: Forwarder,
    pools: Pools,
}

impl MetricStore {
    /// Create the store: derive the import URL and create the metadata
    /// tables
    ///
    /// Both failure modes here are fatal at startup: an empty listen
    /// address or a schema-creation error leaves the process with no
    /// working pipeline, and the caller is expected to log and exit.
    pub async fn new(config: StoreConfig, db: Database) -> Result<Self> {
        let import_url = config.import_url()?;

        let conn = db.connect()?;
        for stmt in CREATE_TABLE_STMTS {
            conn.execute(stmt, ()).await?;
        }

        info!(url = %import_url, "metric store initialized");

        Ok(Self {
            db,
            config,
            forwarder: Forwarder::new(import_url),
            pools: Pools::new(),
        })
    }

    /// The URL metric batches are exported to
    pub fn import_url(&self) -> &str {
        self.forwarder.import_url()
    }

    /// Ingest a batch of SQL-execution-layer CPU-time records
    pub async fn top_sql_records(&self, records: &[tidb::CpuTimeRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let labels = &self.config.tidb_labels;
        self.upsert_instance(labels).await?;

        let mut metrics = self.pools.metrics.get();
        fill_top_sql_records(records, labels, &mut metrics);
        let result = self.write_timeseries(&metrics).await;
        self.pools.metrics.put(metrics);
        result
    }

    /// Ingest a batch of storage-node CPU-time records
    ///
    /// Each record's resource group tag is decoded to recover the
    /// digests; any decode failure aborts the whole batch before
    /// anything is forwarded.
    pub async fn resource_metering_records(
        &self,
        records: &[tikv::CpuTimeRecord],
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let labels = &self.config.tikv_labels;
        self.upsert_instance(labels).await?;

        let mut metrics = self.pools.metrics.get();
        let result = match fill_resource_metering_records(records, labels, &mut metrics) {
            Ok(()) => self.write_timeseries(&metrics).await,
            Err(e) => Err(e),
        };
        self.pools.metrics.put(metrics);
        result
    }

    /// Persist a batch of SQL digest metadata, keyed by digest
    ///
    /// Insert-or-ignore: re-sending a known digest is a no-op.
    pub async fn sql_metas(&self, metas: &[tidb::SqlMeta]) -> Result<()> {
        if metas.is_empty() {
            return Ok(());
        }

        upsert_rows(
            &self.db,
            &self.pools,
            "INSERT INTO sql_digest(digest, sql_text, is_internal) VALUES ",
            "(?, ?, ?)",
            metas.len(),
            " ON CONFLICT DO NOTHING",
            |params| {
                for meta in metas {
                    params.push(Value::Text(hex::encode(&meta.sql_digest)));
                    params.push(Value::Text(meta.normalized_sql.clone()));
                    params.push(Value::Integer(meta.is_internal_sql as i64));
                }
            },
        )
        .await
    }

    /// Persist a batch of plan digest metadata, keyed by digest
    pub async fn plan_metas(&self, metas: &[tidb::PlanMeta]) -> Result<()> {
        if metas.is_empty() {
            return Ok(());
        }

        upsert_rows(
            &self.db,
            &self.pools,
            "INSERT INTO plan_digest(digest, plan_text) VALUES ",
            "(?, ?)",
            metas.len(),
            " ON CONFLICT DO NOTHING",
            |params| {
                for meta in metas {
                    params.push(Value::Text(hex::encode(&meta.plan_digest)));
                    params.push(Value::Text(meta.normalized_plan.clone()));
                }
            },
        )
        .await
    }

    async fn upsert_instance(&self, labels: &InstanceLabels) -> Result<()> {
        upsert_rows(
            &self.db,
            &self.pools,
            "INSERT INTO instance(instance, job) VALUES ",
            "(?, ?)",
            1,
            " ON CONFLICT DO NOTHING",
            |params| {
                params.push(Value::Text(labels.instance.clone()));
                params.push(Value::Text(labels.job.clone()));
            },
        )
        .await
    }

    /// Encode the normalized batch into a pooled buffer and export it
    async fn write_timeseries(&self, metrics: &[Metric]) -> Result<()> {
        let mut buf = self.pools.bytes.get();
        let result = match encode_metrics(&mut buf, metrics) {
            // Splitting hands the filled region to the request body
            // without copying; the pool replaces the lost storage on
            // the next miss.
            Ok(()) => self.forwarder.export(buf.split().freeze()).await,
            Err(e) => Err(e),
        };
        self.pools.bytes.put(buf);
        result
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
