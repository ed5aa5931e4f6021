// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use warehouse_location_config::db;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("非 UTF-8 路径")?.to_string();

    let conn = Connection::open(&db_path)?;
    db::configure_sqlite_connection(&conn)?;
    db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    let conn = Connection::open(db_path)?;
    db::configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开共享连接（仓储 from_connection 使用）
pub fn open_shared_connection(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    Ok(Arc::new(Mutex::new(open_test_connection(db_path)?)))
}

/// 插入测试配置：关闭所有节流等待，缩小预览样例
pub fn insert_test_config(conn: &Connection) -> Result<(), Box<dyn Error>> {
    conn.execute(
        r#"
        INSERT OR REPLACE INTO config_kv (scope_id, key, value, updated_at) VALUES
        ('global', 'location_batch/batch_size', '4', datetime('now')),
        ('global', 'location_batch/item_delay_ms', '0', datetime('now')),
        ('global', 'location_batch/batch_delay_ms', '0', datetime('now')),
        ('global', 'location_batch/max_attempts', '2', datetime('now')),
        ('global', 'location_batch/retry_delay_ms', '0', datetime('now')),
        ('global', 'structure/preview_sample_size', '5', datetime('now'))
        "#,
        [],
    )?;
    Ok(())
}

/// 插入 仓库 + 库区 两级库位
///
/// # 返回
/// - (warehouse_id, zone_id)
pub fn insert_test_zone(
    conn: &Connection,
    warehouse: &str,
    zone: &str,
) -> Result<(String, String), Box<dyn Error>> {
    let warehouse_id = format!("LOC-{}", warehouse);
    let zone_id = format!("LOC-{}-{}", warehouse, zone);
    conn.execute(
        r#"
        INSERT INTO location (location_id, name, location_type, parent_id, created_at)
        VALUES (?1, ?2, 'WAREHOUSE', NULL, '2026-01-01T00:00:00+00:00')
        "#,
        params![warehouse_id, warehouse],
    )?;
    conn.execute(
        r#"
        INSERT INTO location (location_id, name, location_type, parent_id, created_at)
        VALUES (?1, ?2, 'ZONE', ?3, '2026-01-01T00:00:00+00:00')
        "#,
        params![zone_id, zone, warehouse_id],
    )?;
    Ok((warehouse_id, zone_id))
}

/// 设置库位占用量（模拟库存移动）
pub fn set_occupancy(conn: &Connection, address: &str, occupancy: f64) -> Result<(), Box<dyn Error>> {
    let updated = conn.execute(
        "UPDATE bin SET current_occupancy = ?1 WHERE address = ?2",
        params![occupancy, address],
    )?;
    if updated != 1 {
        return Err(format!("库位 {} 不存在", address).into());
    }
    Ok(())
}
