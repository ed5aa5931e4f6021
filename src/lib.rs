// ==========================================
// 仓库库位结构配置器 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 组成: 命名模式展开 / 库位编码 / 分层批量创建 / 结构重配置对账
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 纯计算与编排
pub mod engine;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// SQL 性能观测
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BinDirection, BinLabeling, CodeSeparator, LocationType, OccupiedBinsPolicy};

// 领域实体
pub use domain::{
    AisleConfig, ApplyResult, Bin, BinAddress, CodePattern, Location, LocationNode,
    ReconfigurationPlan, ZoneStructure,
};

// 引擎
pub use engine::{
    AddressCodec, BatchCreatorConfig, BatchResult, EngineError, HierarchyCreator,
    PatternExpander, StructureOrchestrator, StructurePreview, StructureReconciler,
};

// API
pub use api::{ApiError, LocationApi, ZoneStructureApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓库库位结构配置器";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
