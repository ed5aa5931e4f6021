// ==========================================
// 仓库库位结构配置器 - 结构重配置编排器
// ==========================================
// 用途: 协调 编码 → 对账 → 策略校验 → 落地 的执行顺序
// 流程:
//   1. 读取库区当前库位快照
//   2. 计算目标编码并对账
//   3. 预览: 直接返回方案与汇总
//      执行: 校验占用库位策略后交给存储后端落地
// 说明: 方案每次重新计算；执行中断后再次执行即可继续收敛
// ==========================================

use crate::domain::{ApplyResult, BinAddress, OccupiedBinsPolicy, ReconfigurationPlan, ZoneStructure};
use crate::engine::address::AddressCodec;
use crate::engine::error::EngineError;
use crate::engine::reconciler::{StructurePreview, StructureReconciler};
use crate::engine::store::{BackendError, BinStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ReconfigureError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("存储后端错误: {0}")]
    Backend(#[from] BackendError),
}

// ==========================================
// StructureProposal - 预览结果
// ==========================================
#[derive(Debug, Clone)]
pub struct StructureProposal {
    pub target: Vec<BinAddress>,
    pub plan: ReconfigurationPlan,
    pub preview: StructurePreview,
}

// ==========================================
// StructureOrchestrator - 重配置编排器
// ==========================================
pub struct StructureOrchestrator<S>
where
    S: BinStore + ?Sized,
{
    store: Arc<S>,
    codec: AddressCodec,
    reconciler: StructureReconciler,
}

impl<S> StructureOrchestrator<S>
where
    S: BinStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            codec: AddressCodec::new(),
            reconciler: StructureReconciler::new(),
        }
    }

    /// 计算重配置方案与预览（只读）
    pub async fn propose(
        &self,
        zone_id: &str,
        target: &ZoneStructure,
        sample_size: usize,
    ) -> Result<StructureProposal, ReconfigureError> {
        // 先校验目标结构，避免无效请求访问后端
        let target_addresses = self.codec.addresses_for_zone(target)?;
        let current = self.store.list_bins(zone_id).await?;
        let plan = self.reconciler.reconcile_addresses(&current, &target_addresses);
        let preview = StructurePreview::build(&target_addresses, &plan, sample_size);

        info!(
            zone_id,
            target_bins = preview.total_target_bins,
            create = preview.create_count,
            preserve = preview.preserve_count,
            block = preview.block_count,
            remove = preview.remove_count,
            "结构重配置预览完成"
        );

        Ok(StructureProposal {
            target: target_addresses,
            plan,
            preview,
        })
    }

    /// 重新计算方案并按策略落地
    pub async fn apply(
        &self,
        zone_id: &str,
        target: &ZoneStructure,
        policy: OccupiedBinsPolicy,
    ) -> Result<ApplyResult, ReconfigureError> {
        let target_addresses = self.codec.addresses_for_zone(target)?;
        let current = self.store.list_bins(zone_id).await?;
        let plan = self.reconciler.reconcile_addresses(&current, &target_addresses);

        self.reconciler.check_policy(zone_id, &plan, policy)?;

        let result = self
            .store
            .apply_zone_structure(zone_id, &plan, policy)
            .await?;

        info!(
            zone_id,
            policy = %policy,
            created = result.created,
            preserved = result.preserved,
            blocked = result.blocked,
            removed = result.removed,
            force_removed = result.force_removed,
            unblocked = result.unblocked,
            "结构重配置执行完成"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bin, CodePattern};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// 内存库位存储
    struct MemoryStore {
        bins: Mutex<Vec<Bin>>,
    }

    impl MemoryStore {
        fn with(bins: Vec<Bin>) -> Arc<Self> {
            Arc::new(Self {
                bins: Mutex::new(bins),
            })
        }

        fn snapshot(&self) -> Vec<Bin> {
            self.bins.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BinStore for MemoryStore {
        async fn list_bins(&self, zone_id: &str) -> Result<Vec<Bin>, BackendError> {
            Ok(self
                .snapshot()
                .into_iter()
                .filter(|b| b.zone_id == zone_id)
                .collect())
        }

        async fn apply_zone_structure(
            &self,
            zone_id: &str,
            plan: &ReconfigurationPlan,
            policy: OccupiedBinsPolicy,
        ) -> Result<ApplyResult, BackendError> {
            let mut bins = self.bins.lock().unwrap();
            let removed: Vec<&str> = plan.to_remove.iter().map(|b| b.address.as_str()).collect();
            let blocked: Vec<&str> = plan.to_block.iter().map(|b| b.address.as_str()).collect();

            bins.retain(|b| {
                !removed.contains(&b.address.as_str())
                    && !(policy == OccupiedBinsPolicy::Force && blocked.contains(&b.address.as_str()))
            });
            let preserved: Vec<&str> =
                plan.to_preserve.iter().map(|b| b.address.as_str()).collect();
            let mut unblocked = 0;
            for b in bins.iter_mut() {
                if policy == OccupiedBinsPolicy::Block && blocked.contains(&b.address.as_str()) {
                    b.is_blocked = true;
                }
                if b.is_blocked && preserved.contains(&b.address.as_str()) {
                    b.is_blocked = false;
                    unblocked += 1;
                }
            }
            for a in &plan.to_create {
                bins.push(Bin {
                    id: format!("BIN-{}", a.address),
                    zone_id: zone_id.to_string(),
                    address: a.address.clone(),
                    aisle: a.aisle,
                    shelf: a.shelf,
                    position: a.position.clone(),
                    capacity: None,
                    current_occupancy: 0.0,
                    is_blocked: false,
                });
            }

            let occupied = plan.to_block.len();
            Ok(ApplyResult {
                zone_id: zone_id.to_string(),
                policy,
                created: plan.to_create.len(),
                preserved: plan.to_preserve.len(),
                blocked: if policy == OccupiedBinsPolicy::Block { occupied } else { 0 },
                removed: plan.to_remove.len(),
                force_removed: if policy == OccupiedBinsPolicy::Force { occupied } else { 0 },
                unblocked,
                applied_at: Utc::now(),
            })
        }
    }

    fn structure(aisles: u32) -> ZoneStructure {
        ZoneStructure::uniform("WH1", "A", aisles, 2, 2, CodePattern::default())
    }

    #[tokio::test]
    async fn test_apply_then_reapply_converges() {
        let store = MemoryStore::with(vec![]);
        let orchestrator = StructureOrchestrator::new(store.clone());

        let first = orchestrator
            .apply("Z1", &structure(2), OccupiedBinsPolicy::Reject)
            .await
            .unwrap();
        assert_eq!(first.created, 8);

        let again = orchestrator.propose("Z1", &structure(2), 5).await.unwrap();
        assert!(again.plan.is_noop());
        assert_eq!(again.preview.preserve_count, 8);
        assert_eq!(again.preview.sample_addresses.len(), 5);
    }

    #[tokio::test]
    async fn test_apply_rejects_occupied_without_policy() {
        let store = MemoryStore::with(vec![]);
        let orchestrator = StructureOrchestrator::new(store.clone());
        orchestrator
            .apply("Z1", &structure(2), OccupiedBinsPolicy::Reject)
            .await
            .unwrap();

        {
            let mut bins = store.bins.lock().unwrap();
            let last = bins.last_mut().unwrap();
            last.current_occupancy = 4.0;
        }

        let err = orchestrator
            .apply("Z1", &structure(1), OccupiedBinsPolicy::Reject)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReconfigureError::Engine(EngineError::OccupiedBinConflict { .. })
        ));
        // 冲突时不落地
        assert_eq!(store.snapshot().len(), 8);

        let blocked = orchestrator
            .apply("Z1", &structure(1), OccupiedBinsPolicy::Block)
            .await
            .unwrap();
        assert_eq!(blocked.blocked, 1);
        assert_eq!(blocked.removed, 3);
        let remaining = store.snapshot();
        assert_eq!(remaining.len(), 5);
        assert_eq!(remaining.iter().filter(|b| b.is_blocked).count(), 1);

        let forced = orchestrator
            .apply("Z1", &structure(1), OccupiedBinsPolicy::Force)
            .await
            .unwrap();
        assert_eq!(forced.force_removed, 1);
        assert_eq!(store.snapshot().len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_target_fails_before_backend() {
        let store = MemoryStore::with(vec![]);
        let orchestrator = StructureOrchestrator::new(store);
        let mut bad = structure(1);
        bad.zone_code = "  ".to_string();
        assert!(matches!(
            orchestrator.propose("Z1", &bad, 3).await,
            Err(ReconfigureError::Engine(EngineError::InvalidStructure(_)))
        ));
    }
}
