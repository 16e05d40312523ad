//! Canonical metric representation
//!
//! One `Metric` is one time-series segment in the shape the remote
//! endpoint's `/api/v1/import` expects: a label set plus parallel
//! timestamp/value arrays. Serialized as one self-contained JSON object
//! per line, not a wrapping array.

use serde::Serialize;

/// Series name for all metrics produced by this pipeline
pub const METRIC_NAME_CPU_TIME: &str = "cpu_time";

/// Label set identifying one series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricLabels {
    /// Series name, always [`METRIC_NAME_CPU_TIME`] here
    #[serde(rename = "__name__")]
    pub name: String,

    /// Originating instance
    pub instance: String,

    /// Originating process class
    pub job: String,

    /// Hex digest of the normalized SQL text, empty if absent
    pub sql_digest: String,

    /// Hex digest of the normalized plan text, empty if absent
    pub plan_digest: String,
}

/// One time-series segment
///
/// `timestamps` and `values` are parallel arrays of equal length:
/// `values[i]` is the CPU-time sample taken at `timestamps[i]`
/// (millisecond epoch). Instances are constructed fresh per input
/// record inside a pooled slice and discarded after serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metric {
    #[serde(rename = "metric")]
    pub labels: MetricLabels,

    /// Millisecond epoch timestamps, input order preserved
    pub timestamps: Vec<u64>,

    /// CPU-time samples in milliseconds, aligned with `timestamps`
    pub values: Vec<u32>,
}
