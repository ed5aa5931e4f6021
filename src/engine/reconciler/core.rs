// ==========================================
// 仓库库位结构配置器 - 结构重配置对账引擎
// ==========================================
// 职责: 比较库区当前库位（含占用）与目标结构的库位集合
// 输入: 当前库位快照 + 目标 ZoneStructure
// 输出: ReconfigurationPlan（新建 / 保留 / 冻结 / 删除）
// ==========================================
// 分类规则:
//   新建 = 目标 − 当前
//   保留 = 目标 ∩ 当前（编码相同即物理含义相同，保留ID与库存，落地时解除冻结）
//   当前 − 目标: 有库存 → 冻结候选；无库存 → 删除
//   首次配置 = 当前为空
// 红线: 对账本身是纯集合计算，不做策略取舍
// ==========================================

use crate::domain::{Bin, BinAddress, OccupiedBinsPolicy, ReconfigurationPlan, ZoneStructure};
use crate::engine::address::AddressCodec;
use crate::engine::error::{EngineError, EngineResult};
use std::collections::HashSet;
use tracing::{debug, info, warn};

// ==========================================
// StructureReconciler - 结构对账器
// ==========================================
// 无状态，所有输入通过参数传入
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureReconciler {
    codec: AddressCodec,
}

impl StructureReconciler {
    pub fn new() -> Self {
        Self {
            codec: AddressCodec::new(),
        }
    }

    /// 对账当前库位与目标结构
    ///
    /// 唯一的错误来源是目标结构本身无法编码（容量超限 / 结构非法），
    /// 集合计算部分不会失败
    pub fn reconcile(
        &self,
        current: &[Bin],
        target: &ZoneStructure,
    ) -> EngineResult<ReconfigurationPlan> {
        let target_addresses = self.codec.addresses_for_zone(target)?;
        Ok(self.reconcile_addresses(current, &target_addresses))
    }

    /// 对账当前库位与已计算好的目标编码
    pub fn reconcile_addresses(
        &self,
        current: &[Bin],
        target: &[BinAddress],
    ) -> ReconfigurationPlan {
        let target_set: HashSet<&str> = target.iter().map(|a| a.address.as_str()).collect();
        let current_set: HashSet<&str> = current.iter().map(|b| b.address.as_str()).collect();

        let to_create: Vec<BinAddress> = target
            .iter()
            .filter(|a| !current_set.contains(a.address.as_str()))
            .cloned()
            .collect();

        let mut to_preserve = Vec::new();
        let mut to_block = Vec::new();
        let mut to_remove = Vec::new();

        for bin in current {
            if target_set.contains(bin.address.as_str()) {
                to_preserve.push(bin.clone());
            } else if bin.is_occupied() {
                to_block.push(bin.clone());
            } else {
                to_remove.push(bin.clone());
            }
        }

        to_block.sort_by(|a, b| a.address.cmp(&b.address));
        to_remove.sort_by(|a, b| a.address.cmp(&b.address));

        let plan = ReconfigurationPlan {
            to_create,
            to_preserve,
            to_block,
            to_remove,
            is_first_configuration: current.is_empty(),
        };

        debug!(
            current = current.len(),
            target = target.len(),
            create = plan.to_create.len(),
            preserve = plan.to_preserve.len(),
            block = plan.to_block.len(),
            remove = plan.to_remove.len(),
            first = plan.is_first_configuration,
            "结构对账完成"
        );
        plan
    }

    /// 执行前的占用库位策略校验
    ///
    /// REJECT（未显式选择）且存在冻结候选时返回 OccupiedBinConflict，
    /// 由调用方决定改用 BLOCK / FORCE 或先迁出库存
    pub fn check_policy(
        &self,
        zone_id: &str,
        plan: &ReconfigurationPlan,
        policy: OccupiedBinsPolicy,
    ) -> EngineResult<()> {
        if !plan.has_conflicts() {
            return Ok(());
        }

        match policy {
            OccupiedBinsPolicy::Reject => {
                warn!(
                    zone_id,
                    occupied_bins = plan.to_block.len(),
                    occupancy = plan.blocked_occupancy(),
                    "新结构将使有库存的库位失效，需显式选择处理策略"
                );
                Err(EngineError::OccupiedBinConflict {
                    zone_id: zone_id.to_string(),
                    occupied_addresses: plan.to_block.iter().map(|b| b.address.clone()).collect(),
                })
            }
            OccupiedBinsPolicy::Block => {
                info!(zone_id, occupied_bins = plan.to_block.len(), "占用库位将被冻结");
                Ok(())
            }
            OccupiedBinsPolicy::Force => {
                warn!(
                    zone_id,
                    occupied_bins = plan.to_block.len(),
                    occupancy = plan.blocked_occupancy(),
                    "强制模式: 占用库位将被删除，库存失去库位关联"
                );
                Ok(())
            }
        }
    }
}
