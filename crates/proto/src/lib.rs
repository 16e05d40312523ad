//! Wire-format record types for the two TopSQL producers.
//!
//! These mirror the protobuf messages the agents emit: the SQL execution
//! layer (TiDB, `tipb`) and the storage node (TiKV, `resource_usage_agent`).
//! The messages are written out by hand rather than generated at build time,
//! so the crate carries no protoc requirement; field numbers and types match
//! the upstream definitions and remain wire compatible.

pub mod tidb;
pub mod tikv;

pub use tidb::{CpuTimeRecord, PlanMeta, ResourceGroupTag, SqlMeta};
pub use tikv::CpuTimeRecord as ResourceCpuTimeRecord;
