// ==========================================
// 仓库库位结构配置器 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把引擎/仓储/后端错误转换为用户可读的错误消息
// 要求: 错误信息必须包含显式原因
// ==========================================

use crate::config::ConfigError;
use crate::engine::{BackendError, EngineError, ReconfigureError};
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 结构请求校验失败（带字段级明细）
    #[error("结构校验失败: {reason}")]
    StructureValidationError {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    #[error("命名模式语法错误 (位置 {position}): {message}")]
    PatternSyntax { position: usize, message: String },

    #[error("容量超限: {0}")]
    CapacityExceeded(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    /// 新结构会让有库存的库位失效，需显式选择 BLOCK 或 FORCE
    #[error("占用库位冲突: zone_id={zone_id}, 受影响库位 {} 个", .occupied_addresses.len())]
    OccupiedBinConflict {
        zone_id: String,
        occupied_addresses: Vec<String>,
    },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("存储后端错误: {0}")]
    BackendError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 校验违规详情
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationViolation {
    /// 字段路径（如 aisles[2].shelvesCount）
    pub field: String,
    /// 违规原因
    pub reason: String,
}

impl ValidationViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::PatternSyntax { position, message } => {
                ApiError::PatternSyntax { position, message }
            }
            EngineError::CapacityExceeded { .. } => ApiError::CapacityExceeded(err.to_string()),
            EngineError::InvalidStructure(msg) => ApiError::InvalidInput(msg),
            EngineError::OccupiedBinConflict {
                zone_id,
                occupied_addresses,
            } => ApiError::OccupiedBinConflict {
                zone_id,
                occupied_addresses,
            },
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户可读的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) | RepositoryError::DatabaseBusy(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::BusinessRuleViolation(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::SerializationError(msg) => ApiError::InternalError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        ApiError::BackendError(err.message)
    }
}

impl From<ReconfigureError> for ApiError {
    fn from(err: ReconfigureError) -> Self {
        match err {
            ReconfigureError::Engine(e) => e.into(),
            ReconfigureError::Backend(e) => e.into(),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
