// ==========================================
// 仓库库位结构配置器 - 分层批量创建
// ==========================================
// 职责: 将命名模式展开树逐层写入存储后端
// 节流: 小批量并发 + 批内错峰 + 批间等待 + 有界重试
// 失败: 单项失败累计进结果，不中断整体
// ==========================================

mod config;
mod core;
mod result;


pub use self::config::{
    BatchCreatorConfig, DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE, DEFAULT_ITEM_DELAY_MS,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS, MAX_DELAY,
};
pub use self::core::HierarchyCreator;
pub use self::result::{BatchResult, CreatedLocation, CreationFailure, FailureReason};
