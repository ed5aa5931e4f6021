// ==========================================
// 仓库库位结构配置器 - 命名模式展开引擎
// ==========================================
// 职责: 将紧凑的命名模式文本展开为有序（可嵌套）的库位名称树
// 输入: 模式字符串，例如 "A{3}"、"X{2}-[2]"、"20{2}*(+-[2])"
// 输出: Vec<LocationNode>
// 红线: 纯计算，无副作用；只在括号结构非法时报错
// ==========================================
// 数字补零宽度由数量 N 的位数决定（{3} → 1 位，{12} → 2 位）
// 字母标签上限 26（A..Z），超出报容量超限，不回绕
// ==========================================

mod parser;


use crate::domain::{leaf_names, total_nodes, LocationNode};
use crate::engine::error::EngineResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) use parser::letter_label;
pub use parser::{MAX_EXPANDED_NODES, MAX_LETTER_COUNT};

// ==========================================
// PatternExpander - 命名模式展开器
// ==========================================
// 无状态引擎，可在任意线程并发调用
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExpander;

impl PatternExpander {
    pub fn new() -> Self {
        Self
    }

    /// 展开命名模式
    ///
    /// # 返回
    /// - `Ok(Vec<LocationNode>)`: 根节点列表（按生成顺序）
    /// - `Err(EngineError::PatternSyntax)`: 括号不匹配或内容无法识别
    /// - `Err(EngineError::CapacityExceeded)`: 字母超过 26 个或展开节点过多
    pub fn expand(&self, pattern: &str) -> EngineResult<Vec<LocationNode>> {
        parser::check_balance(pattern)?;

        let mut budget = MAX_EXPANDED_NODES;
        let roots = parser::expand_list(pattern, 0, None, &mut budget)?;

        debug!(
            pattern = %pattern,
            roots = roots.len(),
            nodes = MAX_EXPANDED_NODES - budget,
            "命名模式展开完成"
        );
        Ok(roots)
    }

    /// 展开并只返回叶子名称（先序）
    pub fn expand_leaf_names(&self, pattern: &str) -> EngineResult<Vec<String>> {
        Ok(leaf_names(&self.expand(pattern)?))
    }

    /// 生成提交前的预览
    pub fn preview(&self, pattern: &str, sample_size: usize) -> EngineResult<PatternPreview> {
        let roots = self.expand(pattern)?;
        Ok(PatternPreview::from_roots(pattern, &roots, sample_size))
    }
}

/// 便捷函数，等价于 `PatternExpander::new().expand(pattern)`
pub fn expand(pattern: &str) -> EngineResult<Vec<LocationNode>> {
    PatternExpander::new().expand(pattern)
}

// ==========================================
// PatternPreview - 展开预览
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternPreview {
    pub pattern: String,
    pub root_count: usize,
    pub total_nodes: usize,
    pub leaf_count: usize,
    /// 前 N 个叶子名称
    pub sample_names: Vec<String>,
    pub tree: Vec<LocationNode>,
}

impl PatternPreview {
    pub fn from_roots(pattern: &str, roots: &[LocationNode], sample_size: usize) -> Self {
        let leaves = leaf_names(roots);
        Self {
            pattern: pattern.to_string(),
            root_count: roots.len(),
            total_nodes: total_nodes(roots),
            leaf_count: leaves.len(),
            sample_names: leaves.into_iter().take(sample_size).collect(),
            tree: roots.to_vec(),
        }
    }
}
