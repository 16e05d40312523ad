//! Producer record normalization
//!
//! Transforms each producer's native record shape into [`Metric`]s,
//! appended into a caller-supplied pooled slice. Timestamps arrive as
//! whole seconds and leave as millisecond epochs; input order and the
//! timestamp/value alignment are preserved.

use prost::Message;
use topsql_proto::{tidb, tikv};

use crate::config::InstanceLabels;
use crate::error::Result;
use crate::metric::{Metric, MetricLabels, METRIC_NAME_CPU_TIME};

/// Normalize SQL-execution-layer records
///
/// Digests are present on the record as raw bytes and hex-encode
/// directly.
pub(crate) fn fill_top_sql_records(
    records: &[tidb::CpuTimeRecord],
    labels: &InstanceLabels,
    target: &mut Vec<Metric>,
) {
    for record in records {
        let mut metric = new_metric(labels, record.record_list_cpu_time_ms.len());
        metric.labels.sql_digest = hex::encode(&record.sql_digest);
        metric.labels.plan_digest = hex::encode(&record.plan_digest);

        fill_samples(
            &record.record_list_timestamp_sec,
            &record.record_list_cpu_time_ms,
            &mut metric,
        );
        target.push(metric);
    }
}

/// Normalize storage-node records
///
/// Digests sit inside the serialized resource group tag and have to be
/// decoded per record first. A decode failure aborts the whole batch;
/// no partial result is returned.
pub(crate) fn fill_resource_metering_records(
    records: &[tikv::CpuTimeRecord],
    labels: &InstanceLabels,
    target: &mut Vec<Metric>,
) -> Result<()> {
    for record in records {
        let tag = tidb::ResourceGroupTag::decode(record.resource_group_tag.as_slice())?;

        let mut metric = new_metric(labels, record.record_list_cpu_time_ms.len());
        metric.labels.sql_digest = hex::encode(tag.sql_digest.unwrap_or_default());
        metric.labels.plan_digest = hex::encode(tag.plan_digest.unwrap_or_default());

        fill_samples(
            &record.record_list_timestamp_sec,
            &record.record_list_cpu_time_ms,
            &mut metric,
        );
        target.push(metric);
    }

    Ok(())
}

fn new_metric(labels: &InstanceLabels, samples: usize) -> Metric {
    Metric {
        labels: MetricLabels {
            name: METRIC_NAME_CPU_TIME.to_owned(),
            instance: labels.instance.clone(),
            job: labels.job.clone(),
            sql_digest: String::new(),
            plan_digest: String::new(),
        },
        timestamps: Vec::with_capacity(samples),
        values: Vec::with_capacity(samples),
    }
}

fn fill_samples(timestamps_sec: &[u64], cpu_time_ms: &[u32], metric: &mut Metric) {
    for (i, &cpu_time) in cpu_time_ms.iter().enumerate() {
        metric.timestamps.push(timestamps_sec[i] * 1000);
        metric.values.push(cpu_time);
    }
}
