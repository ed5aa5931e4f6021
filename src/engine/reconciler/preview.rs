use crate::domain::{BinAddress, ReconfigurationPlan};
use serde::{Deserialize, Serialize};

// ==========================================
// StructurePreview - 重配置预览
// ==========================================
// 供界面展示的汇总，每次预览请求重新计算，不落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructurePreview {
    pub total_target_bins: usize,
    pub create_count: usize,
    pub preserve_count: usize,
    pub block_count: usize,
    pub remove_count: usize,
    pub is_first_configuration: bool,

    /// 目标结构第一个 / 最后一个编码
    pub first_address: Option<String>,
    pub last_address: Option<String>,

    /// 前 N 个目标编码
    pub sample_addresses: Vec<String>,

    /// 将失效库位上的库存合计
    pub blocked_occupancy: f64,
    pub blocked_addresses: Vec<String>,

    /// 为 true 时需要用户确认占用库位处理策略
    pub requires_confirmation: bool,
}

impl StructurePreview {
    pub fn build(target: &[BinAddress], plan: &ReconfigurationPlan, sample_size: usize) -> Self {
        Self {
            total_target_bins: target.len(),
            create_count: plan.to_create.len(),
            preserve_count: plan.to_preserve.len(),
            block_count: plan.to_block.len(),
            remove_count: plan.to_remove.len(),
            is_first_configuration: plan.is_first_configuration,
            first_address: target.first().map(|a| a.address.clone()),
            last_address: target.last().map(|a| a.address.clone()),
            sample_addresses: target
                .iter()
                .take(sample_size)
                .map(|a| a.address.clone())
                .collect(),
            blocked_occupancy: plan.blocked_occupancy(),
            blocked_addresses: plan.to_block.iter().map(|b| b.address.clone()).collect(),
            requires_confirmation: plan.has_conflicts(),
        }
    }
}
