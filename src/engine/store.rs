// ==========================================
// 仓库库位结构配置器 - 存储后端接口
// ==========================================
// 职责: 定义引擎依赖的存储后端 trait，实现依赖倒置
// 说明: Engine 层定义 trait，Repository 层提供 SQLite 实现
// ==========================================

use crate::domain::{ApplyResult, Bin, LocationType, OccupiedBinsPolicy, ReconfigurationPlan};
use async_trait::async_trait;
use thiserror::Error;

// ==========================================
// BackendError - 后端调用错误
// ==========================================
/// 后端调用失败
///
/// `transient` 为 true 时批量创建器会按配置重试
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
    pub transient: bool,
}

impl BackendError {
    /// 可重试错误（锁竞争、连接抖动等）
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: true,
        }
    }

    /// 不可重试错误（约束违反、参数错误等）
    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: false,
        }
    }
}

// ==========================================
// LocationCreator - 库位创建
// ==========================================
#[async_trait]
pub trait LocationCreator: Send + Sync {
    /// 创建库位，返回后端分配的ID
    async fn create_location(
        &self,
        name: &str,
        location_type: LocationType,
        parent_id: Option<&str>,
    ) -> Result<String, BackendError>;
}

// ==========================================
// BinStore - 库位读取与结构落地
// ==========================================
#[async_trait]
pub trait BinStore: Send + Sync {
    /// 查询库区下所有库位（含占用量）
    async fn list_bins(&self, zone_id: &str) -> Result<Vec<Bin>, BackendError>;

    /// 落地重配置方案
    ///
    /// 调用前引擎已完成策略校验：REJECT 策略下 `plan.to_block` 必为空
    async fn apply_zone_structure(
        &self,
        zone_id: &str,
        plan: &ReconfigurationPlan,
        policy: OccupiedBinsPolicy,
    ) -> Result<ApplyResult, BackendError>;
}
