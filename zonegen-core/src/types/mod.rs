//! 类型定义模块

mod artifact;
mod record;
mod zone;

pub use artifact::{DelegationSetBlock, GeneratedArtifact, RecordsBlock, ZoneBlock};
pub use record::{
    FailoverRole, Record, RecordBody, RecordType, RoutingPolicy, UnsupportedRecordType,
};
pub use zone::Zone;

// Re-export provider 库的公共类型
pub use zonegen_provider::{AliasTarget, GeoLocation, Tags, Visibility};
