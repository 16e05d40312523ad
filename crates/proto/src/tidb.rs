//! Records published by the SQL execution layer (`tipb`).

/// One CPU-time series segment for a (sql, plan) pair.
///
/// `record_list_timestamp_sec` and `record_list_cpu_time_ms` are parallel
/// arrays: index `i` of the CPU list is the sample taken at second `i` of
/// the timestamp list.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CpuTimeRecord {
    #[prost(bytes = "vec", tag = "1")]
    pub sql_digest: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub plan_digest: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, repeated, tag = "3")]
    pub record_list_timestamp_sec: ::prost::alloc::vec::Vec<u64>,
    #[prost(uint32, repeated, tag = "4")]
    pub record_list_cpu_time_ms: ::prost::alloc::vec::Vec<u32>,
}

/// Normalized SQL text keyed by its digest.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SqlMeta {
    #[prost(bytes = "vec", tag = "1")]
    pub sql_digest: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag = "2")]
    pub normalized_sql: ::prost::alloc::string::String,
    #[prost(bool, tag = "3")]
    pub is_internal_sql: bool,
}

/// Normalized plan text keyed by its digest.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PlanMeta {
    #[prost(bytes = "vec", tag = "1")]
    pub plan_digest: ::prost::alloc::vec::Vec<u8>,
    #[prost(string, tag = "2")]
    pub normalized_plan: ::prost::alloc::string::String,
}

/// Opaque tag the SQL layer attaches to storage requests.
///
/// Storage-node records carry this serialized; it has to be decoded before
/// the digests can be recovered. Digests may be absent for background work.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResourceGroupTag {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub sql_digest: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
    #[prost(bytes = "vec", optional, tag = "2")]
    pub plan_digest: ::core::option::Option<::prost::alloc::vec::Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_resource_group_tag_round_trip() {
        let tag = ResourceGroupTag {
            sql_digest: Some(vec![0xab, 0x12]),
            plan_digest: Some(vec![0xcd, 0x34]),
        };

        let bytes = tag.encode_to_vec();
        let decoded = ResourceGroupTag::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, tag);
    }

    #[test]
    fn test_resource_group_tag_absent_digests() {
        let decoded = ResourceGroupTag::decode(&b""[..]).unwrap();
        assert!(decoded.sql_digest.is_none());
        assert!(decoded.plan_digest.is_none());
    }

    #[test]
    fn test_truncated_tag_fails_to_decode() {
        // Field 1, length-delimited, claims 4 bytes but carries none.
        let bytes = [0x0a, 0x04];
        assert!(ResourceGroupTag::decode(&bytes[..]).is_err());
    }
}
