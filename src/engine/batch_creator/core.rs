// ==========================================
// 仓库库位结构配置器 - 分层批量创建引擎
// ==========================================
// 职责: 按层级逐层创建库位，子节点引用上一层后端分配的ID
// 输入: 展开树 + 上级库位ID + 库位创建接口
// 输出: BatchResult（成功/失败/取消明细）
// ==========================================
// 阶段划分:
//   第 0 层: 根节点，父ID 为调用方传入的 parent_id
//   第 d 层: 第 d-1 层成功节点的子节点，父ID 取自第 d-1 层返回的解析表
// 红线: 阶段严格串行，上一阶段（含重试）全部结束后才开始下一阶段
// 红线: 父节点失败时整棵子树记为失败，不产生孤儿节点
// 取消: 只在批与批之间检查，已发出的调用允许完成
// ==========================================

use super::config::BatchCreatorConfig;
use super::result::{BatchResult, CreatedLocation, CreationFailure, FailureReason};
use crate::domain::{total_nodes, LocationNode, LocationType};
use crate::engine::store::{BackendError, LocationCreator};
use futures::future::join_all;
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 节点在展开树中的下标路径
type NodePath = Vec<usize>;

/// 某一阶段的解析结果: 节点路径 → 后端分配的ID
///
/// 由一个阶段产出、下一阶段只读使用
type ResolvedIds = HashMap<NodePath, String>;

/// 待创建节点
struct PendingNode<'a> {
    node: &'a LocationNode,
    path: NodePath,
    display_path: String,
}

impl<'a> PendingNode<'a> {
    fn root(index: usize, node: &'a LocationNode) -> Self {
        Self {
            node,
            path: vec![index],
            display_path: node.name().to_string(),
        }
    }

    fn children(&self) -> impl Iterator<Item = PendingNode<'a>> + '_ {
        self.node.children().iter().enumerate().map(move |(i, child)| {
            let mut path = self.path.clone();
            path.push(i);
            PendingNode {
                node: child,
                path,
                display_path: format!("{} / {}", self.display_path, child.name()),
            }
        })
    }

    fn parent_path(&self) -> Option<&[usize]> {
        match self.path.len() {
            0 | 1 => None,
            n => Some(&self.path[..n - 1]),
        }
    }
}

/// 单个阶段的执行结果
struct PhaseOutcome {
    resolved: ResolvedIds,
    cancelled: bool,
}

// ==========================================
// HierarchyCreator - 分层批量创建器
// ==========================================
pub struct HierarchyCreator {
    config: BatchCreatorConfig,
}

impl HierarchyCreator {
    pub fn new(config: BatchCreatorConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &BatchCreatorConfig {
        &self.config
    }

    /// 分层创建整棵展开树
    ///
    /// # 参数
    /// - `roots`: 展开树根节点
    /// - `parent_id`: 根节点的上级库位ID（None 表示顶层）
    /// - `root_type`: 根节点的库位类型，子层按固定层级依次下推
    /// - `creator`: 库位创建接口
    /// - `cancel`: 协作式取消令牌
    pub async fn create_hierarchy<C>(
        &self,
        roots: &[LocationNode],
        parent_id: Option<&str>,
        root_type: LocationType,
        creator: &C,
        cancel: &CancellationToken,
    ) -> BatchResult
    where
        C: LocationCreator + ?Sized,
    {
        let mut result = BatchResult::new(total_nodes(roots));

        info!(
            roots = roots.len(),
            total_nodes = result.total,
            root_type = %root_type,
            parent_id = ?parent_id,
            batch_size = self.config.batch_size,
            "开始分层批量创建库位"
        );

        let mut level: Vec<PendingNode> = roots
            .iter()
            .enumerate()
            .map(|(i, node)| PendingNode::root(i, node))
            .collect();
        let mut previous = ResolvedIds::new();
        let mut depth = 0usize;
        let mut batches_started = 0usize;

        while !level.is_empty() {
            let location_type = root_type.descend(depth);
            debug!(depth, nodes = level.len(), location_type = %location_type, "开始创建阶段");

            let outcome = self
                .run_phase(
                    depth,
                    &level,
                    &previous,
                    parent_id,
                    location_type,
                    creator,
                    cancel,
                    &mut batches_started,
                    &mut result,
                )
                .await;

            let next: Vec<PendingNode> = level
                .iter()
                .filter(|p| outcome.resolved.contains_key(&p.path))
                .flat_map(|p| p.children())
                .collect();

            if outcome.cancelled {
                for pending in &next {
                    record_cancelled(pending, &mut result);
                }
                result.was_cancelled = true;
                break;
            }

            previous = outcome.resolved;
            level = next;
            depth += 1;
        }

        info!(
            total = result.total,
            created = result.success_count(),
            failed = result.failure_count(),
            cancelled = result.cancelled_count(),
            "分层批量创建完成"
        );
        result
    }

    /// 执行单个阶段: 分批并发创建本层节点
    #[allow(clippy::too_many_arguments)]
    async fn run_phase<C>(
        &self,
        depth: usize,
        level: &[PendingNode<'_>],
        previous: &ResolvedIds,
        root_parent_id: Option<&str>,
        location_type: LocationType,
        creator: &C,
        cancel: &CancellationToken,
        batches_started: &mut usize,
        result: &mut BatchResult,
    ) -> PhaseOutcome
    where
        C: LocationCreator + ?Sized,
    {
        let mut resolved = ResolvedIds::new();

        for (batch_no, chunk) in level.chunks(self.config.batch_size).enumerate() {
            if cancel.is_cancelled() {
                let remaining = &level[batch_no * self.config.batch_size..];
                info!(depth, remaining = remaining.len(), "批量创建已取消，停止发起新批次");
                for pending in remaining {
                    record_cancelled(pending, result);
                }
                return PhaseOutcome {
                    resolved,
                    cancelled: true,
                };
            }

            if *batches_started > 0 && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
            *batches_started += 1;

            debug!(depth, batch_no, size = chunk.len(), "发起批次");

            let calls = chunk.iter().enumerate().map(|(i, pending)| {
                let parent_id = match pending.parent_path() {
                    None => root_parent_id.map(str::to_string),
                    Some(parent_path) => previous.get(parent_path).cloned(),
                };
                let stagger = self.config.item_delay.saturating_mul(i as u32);
                async move {
                    if !stagger.is_zero() {
                        tokio::time::sleep(stagger).await;
                    }
                    let outcome = self
                        .create_with_retry(
                            creator,
                            pending.node.name(),
                            location_type,
                            parent_id.as_deref(),
                        )
                        .await;
                    (pending, parent_id, outcome)
                }
            });

            for (pending, parent_id, outcome) in join_all(calls).await {
                match outcome {
                    Ok((location_id, attempts)) => {
                        resolved.insert(pending.path.clone(), location_id.clone());
                        result.created.push(CreatedLocation {
                            name: pending.node.name().to_string(),
                            path: pending.display_path.clone(),
                            location_id,
                            location_type,
                            parent_id,
                            depth,
                            attempts,
                        });
                    }
                    Err((err, attempts)) => {
                        warn!(
                            path = %pending.display_path,
                            attempts,
                            error = %err,
                            skipped_descendants = pending.node.subtree_size() - 1,
                            "库位创建失败，跳过其子树"
                        );
                        result.failures.push(CreationFailure {
                            name: pending.node.name().to_string(),
                            path: pending.display_path.clone(),
                            location_type,
                            depth,
                            reason: FailureReason::Backend {
                                message: err.message,
                                attempts,
                            },
                        });
                        record_parent_failed(pending, depth, location_type, result);
                    }
                }
            }
        }

        PhaseOutcome {
            resolved,
            cancelled: false,
        }
    }

    /// 单次创建，对可重试错误按配置退避重试
    ///
    /// 返回成功ID或最后一次错误，以及实际尝试次数
    async fn create_with_retry<C>(
        &self,
        creator: &C,
        name: &str,
        location_type: LocationType,
        parent_id: Option<&str>,
    ) -> Result<(String, u32), (BackendError, u32)>
    where
        C: LocationCreator + ?Sized,
    {
        let mut attempt = 1u32;
        loop {
            match creator.create_location(name, location_type, parent_id).await {
                Ok(id) => return Ok((id, attempt)),
                Err(err) if err.transient && attempt < self.config.max_attempts => {
                    warn!(location_name = %name, attempt, error = %err, "库位创建失败，准备重试");
                    let backoff = self.config.retry_delay.saturating_mul(attempt);
                    if !backoff.is_zero() {
                        tokio::time::sleep(backoff).await;
                    }
                    attempt += 1;
                }
                Err(err) => return Err((err, attempt)),
            }
        }
    }
}

/// 父节点失败: 全部后代记为失败（未尝试）
fn record_parent_failed(
    failed: &PendingNode<'_>,
    depth: usize,
    location_type: LocationType,
    result: &mut BatchResult,
) {
    for child in failed.children() {
        result.failures.push(CreationFailure {
            name: child.node.name().to_string(),
            path: child.display_path.clone(),
            location_type: location_type.child_type(),
            depth: depth + 1,
            reason: FailureReason::ParentFailed {
                parent_path: failed.display_path.clone(),
            },
        });
        record_parent_failed(&child, depth + 1, location_type.child_type(), result);
    }
}

/// 取消: 节点及其全部后代记为未开始
fn record_cancelled(pending: &PendingNode<'_>, result: &mut BatchResult) {
    result.cancelled.push(pending.display_path.clone());
    for child in pending.children() {
        record_cancelled(&child, result);
    }
}
