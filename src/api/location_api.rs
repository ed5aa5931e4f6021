// ==========================================
// 仓库库位结构配置器 - 库位层级 API
// ==========================================
// 职责: 命名模式预览、按模式批量创建库位层级、层级查询
// ==========================================

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_pattern;
use crate::config::LocationConfigReader;
use crate::domain::{Location, LocationType};
use crate::engine::{BatchResult, HierarchyCreator, PatternExpander, PatternPreview};
use crate::repository::LocationRepository;

// ==========================================
// LocationApi - 库位层级 API
// ==========================================

/// 库位层级API
///
/// 职责：
/// 1. 命名模式预览（不落库）
/// 2. 按模式在指定上级下逐层创建库位
/// 3. 下级库位查询
pub struct LocationApi {
    location_repo: Arc<LocationRepository>,
    config: Arc<dyn LocationConfigReader>,
    expander: PatternExpander,
}

impl LocationApi {
    pub fn new(
        location_repo: Arc<LocationRepository>,
        config: Arc<dyn LocationConfigReader>,
    ) -> Self {
        Self {
            location_repo,
            config,
            expander: PatternExpander::new(),
        }
    }

    /// 预览命名模式展开结果
    ///
    /// # 返回
    /// - Ok(PatternPreview): 节点数、叶子数、样例名称与完整树
    /// - Err(ApiError::PatternSyntax / CapacityExceeded): 模式非法
    pub async fn preview_pattern(&self, pattern: &str) -> ApiResult<PatternPreview> {
        validate_pattern(pattern)?;
        let sample_size = self.config.get_preview_sample_size().await?;
        Ok(self.expander.preview(pattern, sample_size)?)
    }

    /// 按命名模式创建库位层级
    ///
    /// # 参数
    /// - pattern: 命名模式，如 `R{3}*(+-[2])`
    /// - parent_id: 挂载到的上级库位；None 时根节点为顶层仓库
    /// - cancel: 取消令牌，已派发的调用会完成，未派发的记入 cancelled
    ///
    /// # 说明
    /// 根节点类型取上级类型的下一层；单项失败累计在 BatchResult 中，不作为 Err 返回
    pub async fn create_from_pattern(
        &self,
        pattern: &str,
        parent_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> ApiResult<BatchResult> {
        validate_pattern(pattern)?;
        let roots = self.expander.expand(pattern)?;

        let root_type = match parent_id {
            Some(id) => {
                let parent = self
                    .location_repo
                    .find_by_id(id)?
                    .ok_or_else(|| ApiError::NotFound(format!("上级库位(id={})不存在", id)))?;
                parent.location_type.child_type()
            }
            None => LocationType::Warehouse,
        };

        let config = self.config.get_batch_creator_config().await?;
        let creator = HierarchyCreator::new(config);
        let result = creator
            .create_hierarchy(
                &roots,
                parent_id,
                root_type,
                self.location_repo.as_ref(),
                cancel,
            )
            .await;

        info!(
            pattern,
            parent_id = ?parent_id,
            total = result.total,
            created = result.success_count(),
            failed = result.failure_count(),
            cancelled = result.cancelled_count(),
            "按模式创建库位完成"
        );
        Ok(result)
    }

    /// 查询直接下级库位；parent_id 为 None 时返回顶层库位
    pub fn list_children(&self, parent_id: Option<&str>) -> ApiResult<Vec<Location>> {
        let _perf = crate::perf::PerfGuard::new("api.list_children");
        Ok(self.location_repo.find_children(parent_id)?)
    }
}
