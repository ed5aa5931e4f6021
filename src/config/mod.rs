// ==========================================
// 仓库库位结构配置器 - 配置层
// ==========================================
// 职责: 批量创建节流/重试、预览样例数等系统配置
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod location_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_PREVIEW_SAMPLE_SIZE};
pub use location_config_trait::{ConfigError, LocationConfigReader};
