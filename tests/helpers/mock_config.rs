// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use std::time::Duration;
use warehouse_location_config::config::{ConfigError, LocationConfigReader};
use warehouse_location_config::engine::BatchCreatorConfig;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub batch_creator: BatchCreatorConfig,
    pub preview_sample_size: usize,
}

impl Default for MockConfig {
    /// 无等待、每批 3 个、预览 5 条
    fn default() -> Self {
        Self {
            batch_creator: BatchCreatorConfig::default().without_delays(),
            preview_sample_size: 5,
        }
    }
}

impl MockConfig {
    /// 指定批大小
    pub fn with_batch_size(batch_size: usize) -> Self {
        let mut config = Self::default();
        config.batch_creator.batch_size = batch_size;
        config
    }

    /// 保留真实的批间等待（用于节流相关测试）
    pub fn with_batch_delay(delay: Duration) -> Self {
        let mut config = Self::default();
        config.batch_creator.batch_delay = delay;
        config
    }
}

#[async_trait]
impl LocationConfigReader for MockConfig {
    async fn get_batch_creator_config(&self) -> Result<BatchCreatorConfig, ConfigError> {
        Ok(self.batch_creator)
    }

    async fn get_preview_sample_size(&self) -> Result<usize, ConfigError> {
        Ok(self.preview_sample_size)
    }
}
