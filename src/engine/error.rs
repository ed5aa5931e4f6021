// ==========================================
// 仓库库位结构配置器 - 引擎层错误类型
// ==========================================
// 纯计算错误（模式语法 / 容量超限 / 结构非法）同步抛出并终止整个操作
// 批量创建的单项失败不走此类型，累计进 BatchResult
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// 括号不匹配或无法识别的括号内容
    #[error("命名模式语法错误 (位置 {position}): {message}")]
    PatternSyntax { position: usize, message: String },

    /// 请求数量超出编码位数/字母表所能表示的范围
    #[error("容量超限: {what} 请求 {requested}，上限 {capacity}")]
    CapacityExceeded {
        what: String,
        requested: u64,
        capacity: u64,
    },

    #[error("库区结构无效: {0}")]
    InvalidStructure(String),

    /// 未显式选择 FORCE/BLOCK 时，新结构会让有库存的库位失效
    #[error("占用库位冲突: zone_id={zone_id}, 受影响库位 {} 个", .occupied_addresses.len())]
    OccupiedBinConflict {
        zone_id: String,
        occupied_addresses: Vec<String>,
    },
}

impl EngineError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        EngineError::PatternSyntax {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn capacity(what: impl Into<String>, requested: u64, capacity: u64) -> Self {
        EngineError::CapacityExceeded {
            what: what.into(),
            requested,
            capacity,
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
