// ==========================================
// 仓库库位结构配置器 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 缺失或非法的值一律回退默认值
// ==========================================

use crate::config::location_config_trait::{ConfigError, LocationConfigReader};
use crate::db::open_sqlite_connection;
use crate::engine::batch_creator::{
    BatchCreatorConfig, DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE, DEFAULT_ITEM_DELAY_MS,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 默认预览样例条数
pub const DEFAULT_PREVIEW_SAMPLE_SIZE: usize = 10;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（upsert）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 获取 global scope 全部配置的快照（JSON）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt = conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut map = BTreeMap::new();
        for row in rows {
            let (k, v) = row?;
            map.insert(k, v);
        }
        Ok(serde_json::to_string(&map)?)
    }

    /// 读取数值配置；缺失或解析失败时返回默认值
    fn get_parsed_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(config_key = key, value = %raw, "配置值非法，使用默认值");
                Ok(default)
            }
        }
    }
}

#[async_trait]
impl LocationConfigReader for ConfigManager {
    async fn get_batch_creator_config(&self) -> Result<BatchCreatorConfig, ConfigError> {
        let config = BatchCreatorConfig {
            batch_size: self.get_parsed_or(config_keys::BATCH_SIZE, DEFAULT_BATCH_SIZE)?,
            item_delay: Duration::from_millis(
                self.get_parsed_or(config_keys::ITEM_DELAY_MS, DEFAULT_ITEM_DELAY_MS)?,
            ),
            batch_delay: Duration::from_millis(
                self.get_parsed_or(config_keys::BATCH_DELAY_MS, DEFAULT_BATCH_DELAY_MS)?,
            ),
            max_attempts: self.get_parsed_or(config_keys::MAX_ATTEMPTS, DEFAULT_MAX_ATTEMPTS)?,
            retry_delay: Duration::from_millis(
                self.get_parsed_or(config_keys::RETRY_DELAY_MS, DEFAULT_RETRY_DELAY_MS)?,
            ),
        };
        Ok(config.normalized())
    }

    async fn get_preview_sample_size(&self) -> Result<usize, ConfigError> {
        self.get_parsed_or(
            config_keys::PREVIEW_SAMPLE_SIZE,
            DEFAULT_PREVIEW_SAMPLE_SIZE,
        )
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 批量创建节流
    pub const BATCH_SIZE: &str = "location_batch/batch_size";
    pub const ITEM_DELAY_MS: &str = "location_batch/item_delay_ms";
    pub const BATCH_DELAY_MS: &str = "location_batch/batch_delay_ms";

    // 重试
    pub const MAX_ATTEMPTS: &str = "location_batch/max_attempts";
    pub const RETRY_DELAY_MS: &str = "location_batch/retry_delay_ms";

    // 预览
    pub const PREVIEW_SAMPLE_SIZE: &str = "structure/preview_sample_size";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = crate::db::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let cm = manager();
        assert_eq!(
            cm.get_batch_creator_config().await.unwrap(),
            BatchCreatorConfig::default()
        );
        assert_eq!(
            cm.get_preview_sample_size().await.unwrap(),
            DEFAULT_PREVIEW_SAMPLE_SIZE
        );
    }

    #[tokio::test]
    async fn test_overrides_and_invalid_values() {
        let cm = manager();
        cm.set_global_config_value(config_keys::BATCH_SIZE, "5").unwrap();
        cm.set_global_config_value(config_keys::ITEM_DELAY_MS, "abc").unwrap();
        cm.set_global_config_value(config_keys::MAX_ATTEMPTS, "0").unwrap();

        let config = cm.get_batch_creator_config().await.unwrap();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.item_delay, Duration::from_millis(DEFAULT_ITEM_DELAY_MS));
        // 0 次尝试被修正为 1
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn test_set_is_upsert() {
        let cm = manager();
        cm.set_global_config_value("k", "1").unwrap();
        cm.set_global_config_value("k", "2").unwrap();
        assert_eq!(cm.get_global_config_value("k").unwrap().as_deref(), Some("2"));
        assert_eq!(cm.get_config_snapshot().unwrap(), r#"{"k":"2"}"#);
    }
}
