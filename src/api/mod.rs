// ==========================================
// 仓库库位结构配置器 - API 层
// ==========================================
// 职责: 对外业务接口，编排 Engine 与 Repository
// 红线: API 层不拼 SQL、不实现引擎算法
// ==========================================

pub mod error;
pub mod location_api;
pub mod validator;
pub mod zone_structure_api;

pub use error::{ApiError, ApiResult, ValidationViolation};
pub use location_api::LocationApi;
pub use zone_structure_api::ZoneStructureApi;
