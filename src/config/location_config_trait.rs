// ==========================================
// 仓库库位结构配置器 - 库位配置读取 Trait
// ==========================================
// 职责: 定义 API 层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::BatchCreatorConfig;
use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误
pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// LocationConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait LocationConfigReader: Send + Sync {
    /// 获取批量创建节流/重试配置
    ///
    /// # 默认值
    /// - batch_size=3, item_delay_ms=150, batch_delay_ms=600
    /// - max_attempts=3, retry_delay_ms=300
    async fn get_batch_creator_config(&self) -> Result<BatchCreatorConfig, ConfigError>;

    /// 预览中展示的样例条数
    ///
    /// # 默认值
    /// - 10
    async fn get_preview_sample_size(&self) -> Result<usize, ConfigError>;
}
