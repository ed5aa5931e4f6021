use crate::domain::LocationType;
use serde::{Deserialize, Serialize};

// ==========================================
// BatchResult - 批量创建结果
// ==========================================
// 部分成功是预期结果: 调用方展示成功/失败计数，而非要求全部成功

/// 成功创建的库位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLocation {
    pub name: String,
    /// 从根到该节点的名称路径，例如 "201 / 201-A"
    pub path: String,
    pub location_id: String,
    pub location_type: LocationType,
    pub parent_id: Option<String>,
    pub depth: usize,
    /// 实际尝试次数（1 表示首次成功）
    pub attempts: u32,
}

/// 失败原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// 后端调用在重试耗尽后仍失败
    Backend { message: String, attempts: u32 },
    /// 上级节点创建失败，本节点未尝试
    ParentFailed { parent_path: String },
}

/// 单项创建失败
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationFailure {
    pub name: String,
    pub path: String,
    pub location_type: LocationType,
    pub depth: usize,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// 展开树节点总数
    pub total: usize,
    pub created: Vec<CreatedLocation>,
    pub failures: Vec<CreationFailure>,
    /// 因取消而未开始的节点路径
    pub cancelled: Vec<String>,
    pub was_cancelled: bool,
}

impl BatchResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn success_count(&self) -> usize {
        self.created.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty() && self.cancelled.is_empty() && self.created.len() == self.total
    }

    /// 按路径查找已创建库位的ID
    pub fn location_id_of(&self, path: &str) -> Option<&str> {
        self.created
            .iter()
            .find(|c| c.path == path)
            .map(|c| c.location_id.as_str())
    }
}
