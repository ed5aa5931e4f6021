// ==========================================
// 仓库库位结构配置器 - 引擎层
// ==========================================
// 职责: 命名模式展开、库位编码、分层批量创建、结构对账
// 红线: Engine 不拼 SQL，存储访问只经由 store 中定义的 trait
// ==========================================

pub mod address;
pub mod batch_creator;
pub mod error;
pub mod orchestrator;
pub mod pattern;
pub mod reconciler;
pub mod store;

// 重导出核心引擎
pub use address::{addresses_for_zone, compose_address, AddressCodec};
pub use batch_creator::{
    BatchCreatorConfig, BatchResult, CreatedLocation, CreationFailure, FailureReason,
    HierarchyCreator,
};
pub use error::{EngineError, EngineResult};
pub use orchestrator::{ReconfigureError, StructureOrchestrator, StructureProposal};
pub use pattern::{expand, PatternExpander, PatternPreview};
pub use reconciler::{StructurePreview, StructureReconciler};
pub use store::{BackendError, BinStore, LocationCreator};
