// ==========================================
// 仓库库位结构配置器 - 库区结构 API
// ==========================================
// 职责: 库位编码预览、重配置预览、按策略落地、当前结构查询
// 流程: 校验 → 编码 → 对账 → (预览 | 策略校验 → 落地 → 保存结构)
// ==========================================

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_zone_structure;
use crate::config::LocationConfigReader;
use crate::domain::{
    ApplyResult, Bin, BinAddress, LocationType, OccupiedBinsPolicy, ZoneStructure,
};
use crate::engine::{AddressCodec, StructureOrchestrator, StructurePreview};
use crate::repository::{BinRepository, LocationRepository, ZoneStructureRepository};

// ==========================================
// ZoneStructureApi - 库区结构 API
// ==========================================
pub struct ZoneStructureApi {
    location_repo: Arc<LocationRepository>,
    bin_repo: Arc<BinRepository>,
    structure_repo: Arc<ZoneStructureRepository>,
    config: Arc<dyn LocationConfigReader>,
    orchestrator: StructureOrchestrator<BinRepository>,
    codec: AddressCodec,
}

impl ZoneStructureApi {
    pub fn new(
        location_repo: Arc<LocationRepository>,
        bin_repo: Arc<BinRepository>,
        structure_repo: Arc<ZoneStructureRepository>,
        config: Arc<dyn LocationConfigReader>,
    ) -> Self {
        Self {
            location_repo,
            orchestrator: StructureOrchestrator::new(bin_repo.clone()),
            bin_repo,
            structure_repo,
            config,
            codec: AddressCodec::new(),
        }
    }

    /// 计算目标结构的全部库位编码（不访问存储）
    ///
    /// # 参数
    /// - limit: 只返回前 N 个；None 返回全部
    pub fn preview_addresses(
        &self,
        structure: &ZoneStructure,
        limit: Option<usize>,
    ) -> ApiResult<Vec<BinAddress>> {
        validate_zone_structure(structure)?;
        let mut addresses = self.codec.addresses_for_zone(structure)?;
        if let Some(n) = limit {
            addresses.truncate(n);
        }
        Ok(addresses)
    }

    /// 重配置预览（只读）
    pub async fn preview(
        &self,
        zone_id: &str,
        structure: &ZoneStructure,
    ) -> ApiResult<StructurePreview> {
        self.ensure_zone(zone_id)?;
        validate_zone_structure(structure)?;

        let sample_size = self.config.get_preview_sample_size().await?;
        let proposal = self
            .orchestrator
            .propose(zone_id, structure, sample_size)
            .await?;
        Ok(proposal.preview)
    }

    /// 按策略落地目标结构
    ///
    /// # 参数
    /// - policy: 占用库位处理策略；None 等同 REJECT
    ///
    /// # 返回
    /// - Err(ApiError::OccupiedBinConflict): REJECT 下存在会失效的占用库位，未做任何修改
    ///
    /// # 说明
    /// 方案在执行时重新计算；成功后保存目标结构，供下次编辑读取
    pub async fn apply(
        &self,
        zone_id: &str,
        structure: &ZoneStructure,
        policy: Option<OccupiedBinsPolicy>,
    ) -> ApiResult<ApplyResult> {
        self.ensure_zone(zone_id)?;
        validate_zone_structure(structure)?;

        let policy = policy.unwrap_or_default();
        let result = match self.orchestrator.apply(zone_id, structure, policy).await {
            Ok(r) => r,
            Err(e) => {
                warn!(zone_id, policy = %policy, error = %e, "库区结构落地失败");
                return Err(e.into());
            }
        };

        self.structure_repo.save(zone_id, structure)?;
        info!(
            zone_id,
            total_bins = structure.total_bins(),
            "库区结构已保存"
        );
        Ok(result)
    }

    /// 读取库区最近一次落地的结构
    pub fn get_current_structure(&self, zone_id: &str) -> ApiResult<Option<ZoneStructure>> {
        let _perf = crate::perf::PerfGuard::new("api.get_current_structure");
        Ok(self.structure_repo.find_by_zone(zone_id)?)
    }

    /// 查询库区当前库位
    pub fn list_bins(&self, zone_id: &str) -> ApiResult<Vec<Bin>> {
        let _perf = crate::perf::PerfGuard::new("api.list_bins");
        Ok(self.bin_repo.list_by_zone(zone_id)?)
    }

    fn ensure_zone(&self, zone_id: &str) -> ApiResult<()> {
        if zone_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("库区ID不能为空".to_string()));
        }
        let location = self
            .location_repo
            .find_by_id(zone_id)?
            .ok_or_else(|| ApiError::NotFound(format!("库区(id={})不存在", zone_id)))?;
        if location.location_type != LocationType::Zone {
            return Err(ApiError::BusinessRuleViolation(format!(
                "库位 {} 的类型为 {}，不是库区",
                location.name, location.location_type
            )));
        }
        Ok(())
    }
}
