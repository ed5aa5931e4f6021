// ==========================================
// 仓库库位结构配置器 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use crate::api::{LocationApi, ZoneStructureApi};
use crate::config::{ConfigManager, LocationConfigReader};
use crate::repository::{BinRepository, LocationRepository, ZoneStructureRepository};

/// 默认数据库路径的环境变量
pub const DB_PATH_ENV: &str = "WAREHOUSE_LOCATION_DB_PATH";

const DB_FILE_NAME: &str = "warehouse_location.db";

/// 应用状态
///
/// 所有仓储共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub location_api: Arc<LocationApi>,
    pub zone_structure_api: Arc<ZoneStructureApi>,
    pub config_manager: Arc<ConfigManager>,

    /// 应用级取消令牌；关闭时取消进行中的批量创建
    pub shutdown: CancellationToken,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并建表
    /// 2. 初始化所有Repository与配置管理器
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let location_repo = Arc::new(LocationRepository::from_connection(conn.clone()));
        let bin_repo = Arc::new(BinRepository::from_connection(conn.clone()));
        let structure_repo = Arc::new(ZoneStructureRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config_reader: Arc<dyn LocationConfigReader> = config_manager.clone();

        // ==========================================
        // 初始化API层
        // ==========================================
        let location_api = Arc::new(LocationApi::new(
            location_repo.clone(),
            config_reader.clone(),
        ));
        let zone_structure_api = Arc::new(ZoneStructureApi::new(
            location_repo,
            bin_repo,
            structure_repo,
            config_reader,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            location_api,
            zone_structure_api,
            config_manager,
            shutdown: CancellationToken::new(),
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 WAREHOUSE_LOCATION_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(".").join(DB_FILE_NAME);

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        let dir = if cfg!(debug_assertions) {
            data_dir.join("warehouse-location-config-dev")
        } else {
            data_dir.join("warehouse-location-config")
        };

        match std::fs::create_dir_all(&dir) {
            Ok(()) => path = dir.join(DB_FILE_NAME),
            Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "无法创建数据目录，使用当前目录"),
        }
    }

    path.to_string_lossy().to_string()
}
