// ==========================================
// 仓库库位结构配置器 - 库位实体
// ==========================================
// address 由 (仓库, 库区, 巷道, 层, 位置, 编码规则) 唯一决定
// current_occupancy 由库存移动维护（外部）
// is_blocked 由结构重配置在库位失效但仍有库存时置位
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bin {
    /// 库位ID（后端分配）
    pub id: String,

    /// 所属库区ID
    pub zone_id: String,

    /// 库位编码（仓库内唯一）
    pub address: String,

    pub aisle: u32,
    pub shelf: u32,
    pub position: String,

    /// 容量（可选）
    pub capacity: Option<f64>,

    /// 当前占用量 (>= 0)
    pub current_occupancy: f64,

    /// 是否冻结
    pub is_blocked: bool,
}

impl Bin {
    pub fn is_occupied(&self) -> bool {
        self.current_occupancy > 0.0
    }
}
