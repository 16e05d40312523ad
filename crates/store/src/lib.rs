//! TopSQL CPU-time ingestion store
//!
//! The ingestion tail of a resource-usage telemetry pipeline: batches
//! of CPU-time records from the SQL execution layer (TiDB) and the
//! storage nodes (TiKV) are normalized into one metric shape, lookup
//! metadata (SQL/plan digests, instance identities) is deduplicated
//! into a local embedded store, and the metric payloads are forwarded
//! as newline-delimited JSON to a remote `/api/v1/import` endpoint.
//!
//! # Usage
//!
//! ```ignore
//! use topsql_store::{MetricStore, StoreConfig};
//! use turso::Builder;
//!
//! let db = Builder::new_local("data/topsql.db").build().await?;
//! let store = MetricStore::new(StoreConfig::new(":8428"), db).await?;
//!
//! store.sql_metas(&sql_metas).await?;
//! store.top_sql_records(&records).await?;
//! ```
//!
//! # Error model
//!
//! Startup failures (empty listen address, schema creation) are fatal;
//! everything after that is recoverable per batch. A failed batch
//! persists and forwards nothing, and the caller decides whether to
//! resubmit it whole.

mod config;
mod encode;
mod error;
mod forward;
mod metric;
mod normalize;
mod pool;
mod store;
mod upsert;

pub use config::{InstanceLabels, StoreConfig, IMPORT_PATH};
pub use error::{Result, StoreError};
pub use metric::{Metric, MetricLabels, METRIC_NAME_CPU_TIME};
pub use pool::{Pool, PoolMetrics, PoolSnapshot, Pools, Reusable};
pub use store::MetricStore;
