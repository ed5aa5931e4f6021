// ==========================================
// 仓库库位结构配置器 - 结构重配置对账
// ==========================================
// 职责: 安全变更已有库存的库区结构，不丢失占用库位
// ==========================================

mod core;
mod preview;


pub use self::core::StructureReconciler;
pub use self::preview::StructurePreview;
