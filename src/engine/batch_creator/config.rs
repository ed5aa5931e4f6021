use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认每批调用数
pub const DEFAULT_BATCH_SIZE: usize = 3;
/// 默认批内相邻调用间隔（毫秒）
pub const DEFAULT_ITEM_DELAY_MS: u64 = 150;
/// 默认批间间隔（毫秒）
pub const DEFAULT_BATCH_DELAY_MS: u64 = 600;
/// 默认单次调用最大尝试次数（含首次）
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// 默认重试退避基数（毫秒），第 n 次重试等待 n × 基数
pub const DEFAULT_RETRY_DELAY_MS: u64 = 300;
/// 各项等待的上限
pub const MAX_DELAY: Duration = Duration::from_secs(60);

// ==========================================
// BatchCreatorConfig - 批量创建节流/重试配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreatorConfig {
    /// 每批并发调用数
    pub batch_size: usize,
    /// 批内相邻调用的错峰间隔
    pub item_delay: Duration,
    /// 批与批之间的等待
    pub batch_delay: Duration,
    /// 单次调用最大尝试次数（含首次）
    pub max_attempts: u32,
    /// 重试退避基数
    pub retry_delay: Duration,
}

impl Default for BatchCreatorConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            item_delay: Duration::from_millis(DEFAULT_ITEM_DELAY_MS),
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl BatchCreatorConfig {
    /// 无等待配置（测试 / 本地后端）
    pub fn without_delays(self) -> Self {
        Self {
            item_delay: Duration::ZERO,
            batch_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
            ..self
        }
    }

    /// 修正非法值: 批大小与尝试次数至少为 1，等待不超过 MAX_DELAY
    pub fn normalized(self) -> Self {
        Self {
            batch_size: self.batch_size.max(1),
            item_delay: self.item_delay.min(MAX_DELAY),
            batch_delay: self.batch_delay.min(MAX_DELAY),
            max_attempts: self.max_attempts.max(1),
            retry_delay: self.retry_delay.min(MAX_DELAY),
        }
    }
}
