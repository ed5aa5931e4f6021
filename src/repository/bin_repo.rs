// ==========================================
// 仓库库位结构配置器 - 库位(Bin)仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: bin 表读写 + 重配置方案的事务性落地
// ==========================================

use crate::domain::{ApplyResult, Bin, OccupiedBinsPolicy, ReconfigurationPlan};
use crate::engine::store::{BackendError, BinStore};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

const SELECT_COLUMNS: &str =
    "bin_id, zone_id, address, aisle, shelf, position, capacity, current_occupancy, is_blocked";

// ==========================================
// BinRepository - 库位仓储
// ==========================================
pub struct BinRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BinRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询库区下所有库位（按 巷道/层/位置 排序）
    pub fn list_by_zone(&self, zone_id: &str) -> RepositoryResult<Vec<Bin>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM bin WHERE zone_id = ?1 ORDER BY aisle, shelf, position",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![zone_id], map_bin_row)?;
        let bins = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(bins)
    }

    /// 按编码查询
    pub fn find_by_address(&self, address: &str) -> RepositoryResult<Option<Bin>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM bin WHERE address = ?1", SELECT_COLUMNS);
        let bin = conn
            .query_row(&sql, params![address], map_bin_row)
            .optional()?;
        Ok(bin)
    }

    /// 库区库位数
    pub fn count_by_zone(&self, zone_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM bin WHERE zone_id = ?1",
            params![zone_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 更新占用量（库存移动回写）
    pub fn update_occupancy(&self, bin_id: &str, occupancy: f64) -> RepositoryResult<()> {
        if !occupancy.is_finite() || occupancy < 0.0 {
            return Err(RepositoryError::FieldValueError {
                field: "current_occupancy".to_string(),
                message: format!("占用量必须为非负数: {}", occupancy),
            });
        }

        let conn = self.get_conn()?;
        let updated = conn.execute(
            "UPDATE bin SET current_occupancy = ?1, updated_at = ?2 WHERE bin_id = ?3",
            params![occupancy, Utc::now().to_rfc3339(), bin_id],
        )?;
        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Bin".to_string(),
                id: bin_id.to_string(),
            });
        }
        Ok(())
    }

    /// 在单个事务内落地重配置方案
    ///
    /// # 说明
    /// - to_remove: 仅删除仍无库存的库位；规划后新增了库存则整体回滚
    /// - to_block: BLOCK 冻结、FORCE 删除；REJECT 下出现即报错
    /// - to_create: 新建空库位，ID 由 uuid v4 分配
    /// - to_preserve: 保持ID与库存；此前被冻结的库位解除冻结
    pub fn apply_plan(
        &self,
        zone_id: &str,
        plan: &ReconfigurationPlan,
        policy: OccupiedBinsPolicy,
    ) -> RepositoryResult<ApplyResult> {
        if policy == OccupiedBinsPolicy::Reject && !plan.to_block.is_empty() {
            return Err(RepositoryError::ValidationError(format!(
                "REJECT 策略下存在 {} 个占用库位待处理",
                plan.to_block.len()
            )));
        }

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let now = Utc::now().to_rfc3339();

        for bin in &plan.to_remove {
            let deleted = tx.execute(
                "DELETE FROM bin WHERE bin_id = ?1 AND current_occupancy <= 0",
                params![bin.id],
            )?;
            if deleted == 0 {
                return Err(RepositoryError::DatabaseTransactionError(format!(
                    "库位 {} 已不存在或已有库存，方案已过期",
                    bin.address
                )));
            }
        }

        let mut unblocked = 0;
        for bin in plan.to_preserve.iter().filter(|b| b.is_blocked) {
            unblocked += tx.execute(
                "UPDATE bin SET is_blocked = 0, updated_at = ?1 WHERE bin_id = ?2",
                params![now, bin.id],
            )?;
        }

        let mut blocked = 0;
        let mut force_removed = 0;
        for bin in &plan.to_block {
            match policy {
                OccupiedBinsPolicy::Block => {
                    tx.execute(
                        "UPDATE bin SET is_blocked = 1, updated_at = ?1 WHERE bin_id = ?2",
                        params![now, bin.id],
                    )?;
                    blocked += 1;
                }
                OccupiedBinsPolicy::Force => {
                    warn!(
                        zone_id,
                        address = %bin.address,
                        occupancy = bin.current_occupancy,
                        "强制删除占用库位，库存记录将被丢弃"
                    );
                    tx.execute("DELETE FROM bin WHERE bin_id = ?1", params![bin.id])?;
                    force_removed += 1;
                }
                OccupiedBinsPolicy::Reject => {}
            }
        }

        {
            let mut insert = tx.prepare(
                r#"
                INSERT INTO bin (
                    bin_id, zone_id, address, aisle, shelf, position,
                    capacity, current_occupancy, is_blocked, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, 0, 0, ?7, ?7)
                "#,
            )?;
            for address in &plan.to_create {
                insert.execute(params![
                    Uuid::new_v4().to_string(),
                    zone_id,
                    address.address,
                    address.aisle,
                    address.shelf,
                    address.position,
                    now,
                ])?;
            }
        }

        tx.commit()?;

        let result = ApplyResult {
            zone_id: zone_id.to_string(),
            policy,
            created: plan.to_create.len(),
            preserved: plan.to_preserve.len(),
            blocked,
            removed: plan.to_remove.len(),
            force_removed,
            unblocked,
            applied_at: Utc::now(),
        };
        info!(
            zone_id,
            created = result.created,
            removed = result.removed,
            blocked = result.blocked,
            force_removed = result.force_removed,
            unblocked = result.unblocked,
            "库位结构已落库"
        );
        Ok(result)
    }
}

fn map_bin_row(row: &Row<'_>) -> rusqlite::Result<Bin> {
    Ok(Bin {
        id: row.get(0)?,
        zone_id: row.get(1)?,
        address: row.get(2)?,
        aisle: row.get(3)?,
        shelf: row.get(4)?,
        position: row.get(5)?,
        capacity: row.get(6)?,
        current_occupancy: row.get(7)?,
        is_blocked: row.get::<_, i64>(8)? != 0,
    })
}

#[async_trait]
impl BinStore for BinRepository {
    async fn list_bins(&self, zone_id: &str) -> Result<Vec<Bin>, BackendError> {
        self.list_by_zone(zone_id).map_err(BackendError::from)
    }

    async fn apply_zone_structure(
        &self,
        zone_id: &str,
        plan: &ReconfigurationPlan,
        policy: OccupiedBinsPolicy,
    ) -> Result<ApplyResult, BackendError> {
        self.apply_plan(zone_id, plan, policy)
            .map_err(BackendError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BinAddress, LocationType};
    use crate::repository::LocationRepository;

    fn setup() -> (BinRepository, String) {
        let conn = Arc::new(Mutex::new(crate::db::open_in_memory().unwrap()));
        let locations = LocationRepository::from_connection(conn.clone());
        let wh = locations.create("WH1", LocationType::Warehouse, None).unwrap();
        let zone = locations.create("A", LocationType::Zone, Some(&wh)).unwrap();
        (BinRepository::from_connection(conn), zone)
    }

    fn address(addr: &str, aisle: u32, shelf: u32, position: &str) -> BinAddress {
        BinAddress {
            aisle,
            shelf,
            position: position.to_string(),
            address: addr.to_string(),
        }
    }

    fn create_plan(addresses: Vec<BinAddress>) -> ReconfigurationPlan {
        ReconfigurationPlan {
            to_create: addresses,
            to_preserve: vec![],
            to_block: vec![],
            to_remove: vec![],
            is_first_configuration: true,
        }
    }

    #[test]
    fn test_apply_plan_creates_bins() {
        let (repo, zone) = setup();
        let plan = create_plan(vec![
            address("WH1-A-0101-A", 1, 1, "A"),
            address("WH1-A-0101-B", 1, 1, "B"),
        ]);
        let result = repo
            .apply_plan(&zone, &plan, OccupiedBinsPolicy::Reject)
            .unwrap();
        assert_eq!(result.created, 2);

        let bins = repo.list_by_zone(&zone).unwrap();
        assert_eq!(bins.len(), 2);
        assert!(bins.iter().all(|b| b.current_occupancy == 0.0 && !b.is_blocked));
        assert_eq!(bins[0].address, "WH1-A-0101-A");
    }

    #[test]
    fn test_stale_remove_rolls_back() {
        let (repo, zone) = setup();
        repo.apply_plan(
            &zone,
            &create_plan(vec![address("WH1-A-0101-A", 1, 1, "A")]),
            OccupiedBinsPolicy::Reject,
        )
        .unwrap();
        let stale = repo.list_by_zone(&zone).unwrap();

        // 规划后库位新增了库存
        repo.update_occupancy(&stale[0].id, 3.0).unwrap();

        let plan = ReconfigurationPlan {
            to_create: vec![address("WH1-A-0101-B", 1, 1, "B")],
            to_preserve: vec![],
            to_block: vec![],
            to_remove: stale,
            is_first_configuration: false,
        };
        let err = repo
            .apply_plan(&zone, &plan, OccupiedBinsPolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DatabaseTransactionError(_)));

        let bins = repo.list_by_zone(&zone).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].current_occupancy, 3.0);
    }

    #[test]
    fn test_preserved_bin_is_unblocked() {
        let (repo, zone) = setup();
        repo.apply_plan(
            &zone,
            &create_plan(vec![address("WH1-A-0101-A", 1, 1, "A")]),
            OccupiedBinsPolicy::Reject,
        )
        .unwrap();
        let id = repo.list_by_zone(&zone).unwrap()[0].id.clone();
        repo.update_occupancy(&id, 2.0).unwrap();

        // 缩容时冻结
        let occupied = repo.list_by_zone(&zone).unwrap();
        let block = ReconfigurationPlan {
            to_block: occupied,
            ..ReconfigurationPlan::default()
        };
        let result = repo
            .apply_plan(&zone, &block, OccupiedBinsPolicy::Block)
            .unwrap();
        assert_eq!(result.blocked, 1);
        assert!(repo.list_by_zone(&zone).unwrap()[0].is_blocked);

        // 地址重新回到目标结构
        let frozen = repo.list_by_zone(&zone).unwrap();
        let restore = ReconfigurationPlan {
            to_preserve: frozen,
            ..ReconfigurationPlan::default()
        };
        let result = repo
            .apply_plan(&zone, &restore, OccupiedBinsPolicy::Reject)
            .unwrap();
        assert_eq!(result.unblocked, 1);
        assert_eq!(result.preserved, 1);

        let bins = repo.list_by_zone(&zone).unwrap();
        assert_eq!(bins[0].id, id);
        assert!(!bins[0].is_blocked);
        assert_eq!(bins[0].current_occupancy, 2.0);
    }

    #[test]
    fn test_update_occupancy_rejects_negative() {
        let (repo, _zone) = setup();
        assert!(matches!(
            repo.update_occupancy("any", -1.0),
            Err(RepositoryError::FieldValueError { .. })
        ));
        assert!(matches!(
            repo.update_occupancy("missing", 1.0),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
