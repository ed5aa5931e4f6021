// ==========================================
// 仓库库位结构配置器 - 重配置方案
// ==========================================
// ReconfigurationPlan: 当前库位 vs 目标结构 的差异（纯计算，不落库）
// ApplyResult:         方案落地后的统计
// ==========================================

use crate::domain::bin::Bin;
use crate::domain::structure::BinAddress;
use crate::domain::types::OccupiedBinsPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ReconfigurationPlan - 重配置方案
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconfigurationPlan {
    /// 目标中有、当前没有（按目标生成顺序）
    pub to_create: Vec<BinAddress>,

    /// 两边都有，原样保留
    pub to_preserve: Vec<Bin>,

    /// 当前有、目标没有，且有库存
    pub to_block: Vec<Bin>,

    /// 当前有、目标没有，且无库存
    pub to_remove: Vec<Bin>,

    /// 当前库区为空（首次配置）
    pub is_first_configuration: bool,
}

impl ReconfigurationPlan {
    pub fn has_conflicts(&self) -> bool {
        !self.to_block.is_empty()
    }

    /// 方案是否不产生任何变更
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_block.is_empty() && self.to_remove.is_empty()
    }

    /// 将被冻结库位上的库存合计
    pub fn blocked_occupancy(&self) -> f64 {
        self.to_block.iter().map(|b| b.current_occupancy).sum()
    }
}

// ==========================================
// ApplyResult - 方案执行结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResult {
    pub zone_id: String,
    pub policy: OccupiedBinsPolicy,
    pub created: usize,
    pub preserved: usize,
    /// BLOCK 策略下被冻结的占用库位
    pub blocked: usize,
    /// 无库存库位删除数
    pub removed: usize,
    /// FORCE 策略下被强制删除的占用库位
    pub force_removed: usize,
    /// 重新回到目标结构而解除冻结的库位
    pub unblocked: usize,
    pub applied_at: DateTime<Utc>,
}
