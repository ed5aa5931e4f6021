// ==========================================
// 仓库库位结构配置器 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod bin;
pub mod location;
pub mod plan;
pub mod structure;
pub mod types;

// 重导出核心类型
pub use bin::Bin;
pub use location::{leaf_names, total_nodes, Location, LocationNode};
pub use plan::{ApplyResult, ReconfigurationPlan};
pub use structure::{AisleConfig, BinAddress, CodePattern, ZoneStructure};
pub use types::{BinDirection, BinLabeling, CodeSeparator, LocationType, OccupiedBinsPolicy};
