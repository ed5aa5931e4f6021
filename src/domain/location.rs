// ==========================================
// 仓库库位结构配置器 - 库位节点与库位实体
// ==========================================
// LocationNode: 命名模式展开后的内存树（创建后即丢弃）
// Location:     后端已持久化的库位记录
// ==========================================

use crate::domain::types::LocationType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// LocationNode - 展开树节点
// ==========================================
/// 命名模式展开结果中的一个节点
///
/// 叶子节点只有名称；分支节点带有按生成顺序排列的子节点。
/// 树由字符串一次性构建，不会出现环。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationNode {
    Leaf {
        name: String,
    },
    Branch {
        name: String,
        children: Vec<LocationNode>,
    },
}

impl LocationNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        LocationNode::Leaf { name: name.into() }
    }

    /// 创建分支节点；子节点为空时退化为叶子节点
    pub fn branch(name: impl Into<String>, children: Vec<LocationNode>) -> Self {
        let name = name.into();
        if children.is_empty() {
            LocationNode::Leaf { name }
        } else {
            LocationNode::Branch { name, children }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            LocationNode::Leaf { name } | LocationNode::Branch { name, .. } => name,
        }
    }

    pub fn children(&self) -> &[LocationNode] {
        match self {
            LocationNode::Leaf { .. } => &[],
            LocationNode::Branch { children, .. } => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, LocationNode::Leaf { .. })
    }

    /// 以本节点为根的子树节点总数（含自身）
    pub fn subtree_size(&self) -> usize {
        1 + self.children().iter().map(|c| c.subtree_size()).sum::<usize>()
    }

    /// 子树深度（叶子为 1）
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    /// 按先序收集所有叶子名称
    pub fn collect_leaf_names(&self, out: &mut Vec<String>) {
        match self {
            LocationNode::Leaf { name } => out.push(name.clone()),
            LocationNode::Branch { children, .. } => {
                for child in children {
                    child.collect_leaf_names(out);
                }
            }
        }
    }
}

/// 一组根节点的全部叶子名称（先序）
pub fn leaf_names(roots: &[LocationNode]) -> Vec<String> {
    let mut out = Vec::new();
    for root in roots {
        root.collect_leaf_names(&mut out);
    }
    out
}

/// 一组根节点的节点总数
pub fn total_nodes(roots: &[LocationNode]) -> usize {
    roots.iter().map(|r| r.subtree_size()).sum()
}

// ==========================================
// Location - 库位记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// 库位ID（后端分配）
    pub location_id: String,

    /// 库位名称
    pub name: String,

    /// 库位类型
    pub location_type: LocationType,

    /// 上级库位ID
    pub parent_id: Option<String>,

    pub created_at: DateTime<Utc>,
}
