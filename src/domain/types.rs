// ==========================================
// 仓库库位结构配置器 - 领域类型定义
// ==========================================
// 库位层级 / 编码规则枚举 / 占用库位处理策略
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库、前端一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 库位类型 (Location Type)
// ==========================================
// 固定层级: WAREHOUSE → ZONE → AISLE → SHELF → BIN → OTHER
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Warehouse, // 仓库
    Zone,      // 库区
    Aisle,     // 巷道
    Shelf,     // 货架层
    Bin,       // 库位
    Other,     // 其他
}

impl LocationType {
    /// 下一级库位类型（OTHER 的下一级仍为 OTHER）
    pub fn child_type(&self) -> LocationType {
        match self {
            LocationType::Warehouse => LocationType::Zone,
            LocationType::Zone => LocationType::Aisle,
            LocationType::Aisle => LocationType::Shelf,
            LocationType::Shelf => LocationType::Bin,
            LocationType::Bin | LocationType::Other => LocationType::Other,
        }
    }

    /// 向下推进 depth 级后的类型
    pub fn descend(&self, depth: usize) -> LocationType {
        (0..depth).fold(*self, |t, _| t.child_type())
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            LocationType::Warehouse => "WAREHOUSE",
            LocationType::Zone => "ZONE",
            LocationType::Aisle => "AISLE",
            LocationType::Shelf => "SHELF",
            LocationType::Bin => "BIN",
            LocationType::Other => "OTHER",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "WAREHOUSE" => LocationType::Warehouse,
            "ZONE" => LocationType::Zone,
            "AISLE" => LocationType::Aisle,
            "SHELF" => LocationType::Shelf,
            "BIN" => LocationType::Bin,
            _ => LocationType::Other,
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 库位标签方式 (Bin Labeling)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinLabeling {
    Letters, // A, B, C …
    Numbers, // 1, 2, 3 …
}

impl fmt::Display for BinLabeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinLabeling::Letters => write!(f, "LETTERS"),
            BinLabeling::Numbers => write!(f, "NUMBERS"),
        }
    }
}

// ==========================================
// 库位方向 (Bin Direction)
// ==========================================
// BOTTOM_UP: 第一个标签对应最低层位置
// TOP_DOWN:  第一个标签对应最高层位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinDirection {
    BottomUp,
    TopDown,
}

impl fmt::Display for BinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinDirection::BottomUp => write!(f, "BOTTOM_UP"),
            BinDirection::TopDown => write!(f, "TOP_DOWN"),
        }
    }
}

// ==========================================
// 编码分隔符 (Code Separator)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeSeparator {
    #[serde(rename = "-")]
    Dash,
    #[serde(rename = ".")]
    Dot,
    #[serde(rename = "")]
    None,
}

impl CodeSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeSeparator::Dash => "-",
            CodeSeparator::Dot => ".",
            CodeSeparator::None => "",
        }
    }
}

impl fmt::Display for CodeSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 占用库位处理策略 (Occupied Bins Policy)
// ==========================================
// 结构变更导致有库存的库位失效时的处理方式
// REJECT 为默认值: 调用方未显式选择时拒绝执行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccupiedBinsPolicy {
    #[default]
    Reject, // 存在占用库位时报冲突
    Block,  // 保留库位并冻结，等待人工调拨
    Force,  // 强制删除，库存失去库位关联
}

impl OccupiedBinsPolicy {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OccupiedBinsPolicy::Reject => "REJECT",
            OccupiedBinsPolicy::Block => "BLOCK",
            OccupiedBinsPolicy::Force => "FORCE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "REJECT" => Some(OccupiedBinsPolicy::Reject),
            "BLOCK" => Some(OccupiedBinsPolicy::Block),
            "FORCE" => Some(OccupiedBinsPolicy::Force),
            _ => None,
        }
    }
}

impl fmt::Display for OccupiedBinsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_type_descend() {
        assert_eq!(LocationType::Warehouse.descend(0), LocationType::Warehouse);
        assert_eq!(LocationType::Warehouse.descend(3), LocationType::Shelf);
        assert_eq!(LocationType::Shelf.descend(1), LocationType::Bin);
        assert_eq!(LocationType::Bin.descend(1), LocationType::Other);
        assert_eq!(LocationType::Other.descend(5), LocationType::Other);
    }

    #[test]
    fn test_code_separator_serde() {
        let json = serde_json::to_string(&CodeSeparator::None).unwrap();
        assert_eq!(json, "\"\"");
        let sep: CodeSeparator = serde_json::from_str("\".\"").unwrap();
        assert_eq!(sep, CodeSeparator::Dot);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(OccupiedBinsPolicy::from_str("force"), Some(OccupiedBinsPolicy::Force));
        assert_eq!(OccupiedBinsPolicy::from_str(" Block "), Some(OccupiedBinsPolicy::Block));
        assert_eq!(OccupiedBinsPolicy::from_str("x"), None);
        assert_eq!(OccupiedBinsPolicy::default(), OccupiedBinsPolicy::Reject);
    }
}
