// ==========================================
// 仓库库位结构配置器 - 库区结构仓储
// ==========================================
// 每个库区保存最近一次落地的 ZoneStructure（JSON）
// ==========================================

use crate::domain::ZoneStructure;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct ZoneStructureRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ZoneStructureRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存（upsert）库区结构
    pub fn save(&self, zone_id: &str, structure: &ZoneStructure) -> RepositoryResult<()> {
        let json = serde_json::to_string(structure)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO zone_structure (zone_id, structure_json, total_bins, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(zone_id) DO UPDATE SET
                structure_json = excluded.structure_json,
                total_bins = excluded.total_bins,
                updated_at = excluded.updated_at
            "#,
            params![
                zone_id,
                json,
                structure.total_bins() as i64,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn find_by_zone(&self, zone_id: &str) -> RepositoryResult<Option<ZoneStructure>> {
        let conn = self.get_conn()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT structure_json FROM zone_structure WHERE zone_id = ?1",
                params![zone_id],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }
}
