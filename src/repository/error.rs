// ==========================================
// 仓库库位结构配置器 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 映射: rusqlite::Error → RepositoryError → BackendError（引擎侧）
// ==========================================

use crate::engine::store::BackendError;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库繁忙: {0}")]
    DatabaseBusy(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    // ===== 数据质量错误 =====
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    #[error("序列化失败: {0}")]
    SerializationError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// 是否为可重试错误（锁竞争 / SQLITE_BUSY）
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RepositoryError::LockError(_) | RepositoryError::DatabaseBusy(_)
        )
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                let text = msg.unwrap_or_else(|| code.to_string());
                match code.code {
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                        RepositoryError::DatabaseBusy(text)
                    }
                    _ if text.contains("UNIQUE") => RepositoryError::UniqueConstraintViolation(text),
                    _ if text.contains("FOREIGN KEY") => RepositoryError::ForeignKeyViolation(text),
                    _ => RepositoryError::DatabaseQueryError(text),
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

impl From<RepositoryError> for BackendError {
    fn from(err: RepositoryError) -> Self {
        if err.is_transient() {
            BackendError::transient(err.to_string())
        } else {
            BackendError::permanent(err.to_string())
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
