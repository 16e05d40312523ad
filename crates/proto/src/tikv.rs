//! Records published by the storage node (`resource_usage_agent`).

/// One CPU-time series segment for a resource group tag.
///
/// Unlike the SQL layer's record, digests are not carried directly: they
/// sit inside the serialized [`crate::tidb::ResourceGroupTag`] payload.
/// Timestamp and CPU lists are parallel arrays, as on the TiDB side.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CpuTimeRecord {
    #[prost(bytes = "vec", tag = "1")]
    pub resource_group_tag: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, repeated, tag = "2")]
    pub record_list_timestamp_sec: ::prost::alloc::vec::Vec<u64>,
    #[prost(uint32, repeated, tag = "3")]
    pub record_list_cpu_time_ms: ::prost::alloc::vec::Vec<u32>,
}
