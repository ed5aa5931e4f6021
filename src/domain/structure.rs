// ==========================================
// 仓库库位结构配置器 - 库区结构定义
// ==========================================
// 巷道 × 货架层 × 库位 的声明式目标形态 + 编码规则
// 每个巷道可独立配置层数与每层库位数
// ==========================================

use crate::domain::types::{BinDirection, BinLabeling, CodeSeparator};
use serde::{Deserialize, Serialize};

// ==========================================
// AisleConfig - 巷道形态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AisleConfig {
    /// 巷道号（库区内唯一，增删后保持 1..N 连续）
    pub aisle_number: u32,

    /// 货架层数
    pub shelves_count: u32,

    /// 每层库位数
    pub bins_per_shelf: u32,
}

impl AisleConfig {
    pub fn new(aisle_number: u32, shelves_count: u32, bins_per_shelf: u32) -> Self {
        Self {
            aisle_number,
            shelves_count,
            bins_per_shelf,
        }
    }

    pub fn bin_count(&self) -> u64 {
        u64::from(self.shelves_count) * u64::from(self.bins_per_shelf)
    }
}

// ==========================================
// CodePattern - 库位编码规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodePattern {
    /// 分隔符: "-" / "." / ""
    pub separator: CodeSeparator,

    /// 巷道号位数 (1 或 2，左补零)
    pub aisle_digits: u8,

    /// 层号位数 (2 或 3，左补零)
    pub shelf_digits: u8,

    /// 库位标签方式
    pub bin_labeling: BinLabeling,

    /// 库位方向
    pub bin_direction: BinDirection,
}

impl Default for CodePattern {
    fn default() -> Self {
        Self {
            separator: CodeSeparator::Dash,
            aisle_digits: 2,
            shelf_digits: 2,
            bin_labeling: BinLabeling::Letters,
            bin_direction: BinDirection::BottomUp,
        }
    }
}

// ==========================================
// ZoneStructure - 库区目标结构
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStructure {
    pub warehouse_code: String,
    pub zone_code: String,
    pub aisles: Vec<AisleConfig>,
    pub code_pattern: CodePattern,
}

impl ZoneStructure {
    pub fn new(
        warehouse_code: impl Into<String>,
        zone_code: impl Into<String>,
        aisles: Vec<AisleConfig>,
        code_pattern: CodePattern,
    ) -> Self {
        Self {
            warehouse_code: warehouse_code.into(),
            zone_code: zone_code.into(),
            aisles,
            code_pattern,
        }
    }

    /// 按统一形态生成 aisle_count 个巷道（编号 1..N）
    pub fn uniform(
        warehouse_code: impl Into<String>,
        zone_code: impl Into<String>,
        aisle_count: u32,
        shelves_count: u32,
        bins_per_shelf: u32,
        code_pattern: CodePattern,
    ) -> Self {
        let aisles = (1..=aisle_count)
            .map(|n| AisleConfig::new(n, shelves_count, bins_per_shelf))
            .collect();
        Self::new(warehouse_code, zone_code, aisles, code_pattern)
    }

    /// 库位总数 = Σ(层数 × 每层库位数)
    pub fn total_bins(&self) -> u64 {
        self.aisles.iter().map(|a| a.bin_count()).sum()
    }

    /// 追加巷道，编号取 N+1，返回新巷道号
    pub fn add_aisle(&mut self, shelves_count: u32, bins_per_shelf: u32) -> u32 {
        let number = self.aisles.len() as u32 + 1;
        self.renumber_aisles();
        self.aisles
            .push(AisleConfig::new(number, shelves_count, bins_per_shelf));
        number
    }

    /// 删除指定巷道并重新编号，返回被删除的巷道
    pub fn remove_aisle(&mut self, aisle_number: u32) -> Option<AisleConfig> {
        let idx = self
            .aisles
            .iter()
            .position(|a| a.aisle_number == aisle_number)?;
        let removed = self.aisles.remove(idx);
        self.renumber_aisles();
        Some(removed)
    }

    /// 按声明顺序重新编号为 1..N
    pub fn renumber_aisles(&mut self) {
        for (i, aisle) in self.aisles.iter_mut().enumerate() {
            aisle.aisle_number = i as u32 + 1;
        }
    }

    /// 巷道号是否恰好为 1..N（声明顺序）
    pub fn has_dense_numbering(&self) -> bool {
        self.aisles
            .iter()
            .enumerate()
            .all(|(i, a)| a.aisle_number == i as u32 + 1)
    }
}

// ==========================================
// BinAddress - 编码输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinAddress {
    pub aisle: u32,
    /// 层号（巷道内从 1 开始）
    pub shelf: u32,
    /// 库位标签（字母或数字）
    pub position: String,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ZoneStructure {
        ZoneStructure::new(
            "WH1",
            "A",
            vec![
                AisleConfig::new(1, 4, 3),
                AisleConfig::new(2, 2, 5),
                AisleConfig::new(3, 1, 1),
            ],
            CodePattern::default(),
        )
    }

    #[test]
    fn test_total_bins_heterogeneous() {
        assert_eq!(sample().total_bins(), 12 + 10 + 1);
    }

    #[test]
    fn test_remove_aisle_renumbers() {
        let mut s = sample();
        let removed = s.remove_aisle(2).unwrap();
        assert_eq!(removed.shelves_count, 2);
        assert_eq!(s.aisles.len(), 2);
        assert!(s.has_dense_numbering());
        assert_eq!(s.aisles[1].shelves_count, 1);
        assert!(s.remove_aisle(9).is_none());
    }

    #[test]
    fn test_add_aisle_appends_next_number() {
        let mut s = sample();
        assert_eq!(s.add_aisle(6, 2), 4);
        assert!(s.has_dense_numbering());
        assert_eq!(s.total_bins(), 23 + 12);
    }

    #[test]
    fn test_structure_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["warehouseCode"], "WH1");
        assert_eq!(json["aisles"][0]["binsPerShelf"], 3);
        assert_eq!(json["codePattern"]["binLabeling"], "LETTERS");
        assert_eq!(json["codePattern"]["separator"], "-");
    }
}
