// ==========================================
// 仓库库位结构配置器 - 请求校验器
// ==========================================
// 职责: 在进入引擎前对结构请求/命名模式做字段级校验
// 说明: 容量上限（位数、字母数）由编码器负责，这里只查请求本身的形状
// ==========================================

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::ZoneStructure;

/// 命名模式最大长度（字符）
pub const MAX_PATTERN_LEN: usize = 2_000;

/// 仓库/库区代码最大长度
pub const MAX_CODE_LEN: usize = 16;

/// 校验库区结构请求
///
/// # 检查项
/// - 仓库/库区代码非空、长度受限、不含空白与当前分隔符
/// - 至少一个巷道，巷道号从 1 开始连续
/// - 每个巷道层数与每层库位数 > 0
pub fn validate_zone_structure(structure: &ZoneStructure) -> ApiResult<()> {
    let mut violations = Vec::new();
    let separator = structure.code_pattern.separator.as_str();

    for (field, code) in [
        ("warehouseCode", &structure.warehouse_code),
        ("zoneCode", &structure.zone_code),
    ] {
        check_code(field, code, separator, &mut violations);
    }

    if structure.aisles.is_empty() {
        violations.push(ValidationViolation::new("aisles", "至少需要一个巷道"));
    } else if !structure.has_dense_numbering() {
        violations.push(ValidationViolation::new(
            "aisles",
            "巷道号必须从 1 开始连续编号",
        ));
    }

    for (i, aisle) in structure.aisles.iter().enumerate() {
        if aisle.shelves_count == 0 {
            violations.push(ValidationViolation::new(
                format!("aisles[{}].shelvesCount", i),
                "层数必须大于 0",
            ));
        }
        if aisle.bins_per_shelf == 0 {
            violations.push(ValidationViolation::new(
                format!("aisles[{}].binsPerShelf", i),
                "每层库位数必须大于 0",
            ));
        }
    }

    into_result(violations)
}

/// 校验命名模式
pub fn validate_pattern(pattern: &str) -> ApiResult<()> {
    if pattern.trim().is_empty() {
        return Err(ApiError::InvalidInput("命名模式不能为空".to_string()));
    }
    if pattern.chars().count() > MAX_PATTERN_LEN {
        return Err(ApiError::InvalidInput(format!(
            "命名模式过长: 超过 {} 个字符",
            MAX_PATTERN_LEN
        )));
    }
    Ok(())
}

fn check_code(field: &str, code: &str, separator: &str, out: &mut Vec<ValidationViolation>) {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        out.push(ValidationViolation::new(field, "不能为空"));
        return;
    }
    if trimmed.chars().count() > MAX_CODE_LEN {
        out.push(ValidationViolation::new(
            field,
            format!("长度不能超过 {}", MAX_CODE_LEN),
        ));
    }
    if code.chars().any(char::is_whitespace) {
        out.push(ValidationViolation::new(field, "不能包含空白字符"));
    }
    if !separator.is_empty() && code.contains(separator) {
        out.push(ValidationViolation::new(
            field,
            format!("不能包含分隔符 '{}'", separator),
        ));
    }
}

fn into_result(violations: Vec<ValidationViolation>) -> ApiResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    let reason = violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.reason))
        .collect::<Vec<_>>()
        .join("; ");
    Err(ApiError::StructureValidationError { reason, violations })
}
