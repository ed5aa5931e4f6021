// ==========================================
// 仓库库位结构配置器 - 库位层级仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 同一上级下名称唯一 (uq_location_parent_name)
// ==========================================

use crate::domain::{Location, LocationType};
use crate::engine::store::{BackendError, LocationCreator};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "location_id, name, location_type, parent_id, created_at";

// ==========================================
// LocationRepository - 库位层级仓储
// ==========================================
/// 库位层级仓储
/// 职责: 管理 location 表的写入与查询
pub struct LocationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LocationRepository {
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

    /// 创建库位，返回新分配的 location_id
    ///
    /// # 错误
    /// - ForeignKeyViolation: parent_id 不存在
    /// - UniqueConstraintViolation: 同一上级下已有同名库位
    pub fn create(
        &self,
        name: &str,
        location_type: LocationType,
        parent_id: Option<&str>,
    ) -> RepositoryResult<String> {
        if name.trim().is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "name".to_string(),
                message: "库位名称不能为空".to_string(),
            });
        }

        let location_id = Uuid::new_v4().to_string();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO location (location_id, name, location_type, parent_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                location_id,
                name,
                location_type.to_db_str(),
                parent_id,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(location_id)
    }

    /// 按ID查询
    pub fn find_by_id(&self, location_id: &str) -> RepositoryResult<Option<Location>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM location WHERE location_id = ?1", SELECT_COLUMNS);
        let location = conn
            .query_row(&sql, params![location_id], map_location_row)
            .optional()?;
        Ok(location)
    }

    /// 查询直接下级（按名称排序）
    ///
    /// parent_id 为 None 时返回顶层库位
    pub fn find_children(&self, parent_id: Option<&str>) -> RepositoryResult<Vec<Location>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM location WHERE COALESCE(parent_id, '') = COALESCE(?1, '') ORDER BY name",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![parent_id], map_location_row)?;
        let locations = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(locations)
    }

    /// 统计某库位下（含自身）的全部库位数
    pub fn count_subtree(&self, location_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            r#"
            WITH RECURSIVE subtree(id) AS (
                SELECT location_id FROM location WHERE location_id = ?1
                UNION ALL
                SELECT l.location_id FROM location l JOIN subtree s ON l.parent_id = s.id
            )
            SELECT COUNT(*) FROM subtree
            "#,
            params![location_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn map_location_row(row: &Row<'_>) -> rusqlite::Result<Location> {
    let created_at: String = row.get(4)?;
    Ok(Location {
        location_id: row.get(0)?,
        name: row.get(1)?,
        location_type: LocationType::from_str(&row.get::<_, String>(2)?),
        parent_id: row.get(3)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[async_trait]
impl LocationCreator for LocationRepository {
    async fn create_location(
        &self,
        name: &str,
        location_type: LocationType,
        parent_id: Option<&str>,
    ) -> Result<String, BackendError> {
        self.create(name, location_type, parent_id)
            .map_err(BackendError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> LocationRepository {
        let conn = crate::db::open_in_memory().unwrap();
        LocationRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_create_and_find_children() {
        let repo = repo();
        let wh = repo.create("WH1", LocationType::Warehouse, None).unwrap();
        repo.create("Z2", LocationType::Zone, Some(&wh)).unwrap();
        repo.create("Z1", LocationType::Zone, Some(&wh)).unwrap();

        let children = repo.find_children(Some(&wh)).unwrap();
        let names: Vec<&str> = children.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Z1", "Z2"]);
        assert!(children.iter().all(|l| l.location_type == LocationType::Zone));

        let roots = repo.find_children(None).unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(repo.count_subtree(&wh).unwrap(), 3);
    }

    #[test]
    fn test_duplicate_sibling_name_is_rejected() {
        let repo = repo();
        let wh = repo.create("WH1", LocationType::Warehouse, None).unwrap();
        repo.create("Z1", LocationType::Zone, Some(&wh)).unwrap();
        let err = repo.create("Z1", LocationType::Zone, Some(&wh)).unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let repo = repo();
        let err = repo
            .create("Z1", LocationType::Zone, Some("missing"))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }
}
