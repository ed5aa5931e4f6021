// ==========================================
// 仓库库位结构配置器 - 库位编码引擎
// ==========================================
// 职责: 由库区结构 + 编码规则确定性地计算全部库位编码
// 输入: ZoneStructure
// 输出: 有序 Vec<BinAddress>（巷道声明顺序 → 层 1..S → 库位 0..B-1）
// 红线: 纯函数；同一输入必得逐字节相同的输出
// 红线: 超出位数容量时在生成任何编码之前报错，不截断不回绕
// ==========================================
// 编码格式: 仓库 sep 库区 sep 巷道(补零) 层(补零) sep 位置
// 补零位数取自编码规则（用户设置），与命名模式按数量推断位数不同
// ==========================================

use crate::domain::{BinAddress, BinDirection, BinLabeling, CodePattern, ZoneStructure};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::pattern::{letter_label, MAX_LETTER_COUNT};
use std::collections::HashSet;
use tracing::debug;

pub const SUPPORTED_AISLE_DIGITS: [u8; 2] = [1, 2];
pub const SUPPORTED_SHELF_DIGITS: [u8; 2] = [2, 3];

/// 单个库区库位总数上限
pub const MAX_ZONE_BINS: u64 = 1_000_000;

// ==========================================
// AddressCodec - 库位编码器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressCodec;

impl AddressCodec {
    pub fn new() -> Self {
        Self
    }

    /// 校验结构是否可编码（不生成编码）
    ///
    /// # 验证规则
    /// 1. 仓库、库区代码非空
    /// 2. 巷道号为正且唯一，层数、每层库位数为正
    /// 3. 位数设置在支持范围内
    /// 4. 巷道号 / 层数不超出位数容量；字母标签不超过 26 个
    /// 5. 库区库位总数不超过 MAX_ZONE_BINS
    pub fn validate(&self, structure: &ZoneStructure) -> EngineResult<()> {
        if structure.warehouse_code.trim().is_empty() {
            return Err(EngineError::InvalidStructure("仓库代码不能为空".to_string()));
        }
        if structure.zone_code.trim().is_empty() {
            return Err(EngineError::InvalidStructure("库区代码不能为空".to_string()));
        }

        let pattern = &structure.code_pattern;
        if !SUPPORTED_AISLE_DIGITS.contains(&pattern.aisle_digits) {
            return Err(EngineError::InvalidStructure(format!(
                "巷道号位数 {} 不受支持 (1 或 2)",
                pattern.aisle_digits
            )));
        }
        if !SUPPORTED_SHELF_DIGITS.contains(&pattern.shelf_digits) {
            return Err(EngineError::InvalidStructure(format!(
                "层号位数 {} 不受支持 (2 或 3)",
                pattern.shelf_digits
            )));
        }

        let aisle_capacity = digit_capacity(pattern.aisle_digits);
        let shelf_capacity = digit_capacity(pattern.shelf_digits);
        let mut seen = HashSet::new();
        let mut total_bins = 0u64;

        for aisle in &structure.aisles {
            if aisle.aisle_number == 0 {
                return Err(EngineError::InvalidStructure("巷道号必须为正整数".to_string()));
            }
            if !seen.insert(aisle.aisle_number) {
                return Err(EngineError::InvalidStructure(format!(
                    "巷道号 {} 重复",
                    aisle.aisle_number
                )));
            }
            if aisle.shelves_count == 0 || aisle.bins_per_shelf == 0 {
                return Err(EngineError::InvalidStructure(format!(
                    "巷道 {} 的层数和每层库位数必须为正整数",
                    aisle.aisle_number
                )));
            }
            if u64::from(aisle.aisle_number) > aisle_capacity {
                return Err(EngineError::capacity(
                    format!("巷道号 ({} 位)", pattern.aisle_digits),
                    u64::from(aisle.aisle_number),
                    aisle_capacity,
                ));
            }
            if u64::from(aisle.shelves_count) > shelf_capacity {
                return Err(EngineError::capacity(
                    format!("巷道 {} 层数 ({} 位)", aisle.aisle_number, pattern.shelf_digits),
                    u64::from(aisle.shelves_count),
                    shelf_capacity,
                ));
            }
            if pattern.bin_labeling == BinLabeling::Letters
                && aisle.bins_per_shelf > MAX_LETTER_COUNT
            {
                return Err(EngineError::capacity(
                    format!("巷道 {} 每层字母库位数", aisle.aisle_number),
                    u64::from(aisle.bins_per_shelf),
                    u64::from(MAX_LETTER_COUNT),
                ));
            }
            total_bins = total_bins.saturating_add(aisle.bin_count());
        }

        if total_bins > MAX_ZONE_BINS {
            return Err(EngineError::capacity(
                "库区库位总数",
                total_bins,
                MAX_ZONE_BINS,
            ));
        }

        Ok(())
    }

    /// 计算库区全部库位编码
    pub fn addresses_for_zone(&self, structure: &ZoneStructure) -> EngineResult<Vec<BinAddress>> {
        self.validate(structure)?;

        let pattern = &structure.code_pattern;
        // validate 已保证总数不超过 MAX_ZONE_BINS
        let mut out = Vec::with_capacity(usize::try_from(structure.total_bins()).unwrap_or(0));

        for aisle in &structure.aisles {
            for shelf in 1..=aisle.shelves_count {
                for index in 0..aisle.bins_per_shelf {
                    let position = position_label(pattern, index, aisle.bins_per_shelf);
                    let address = compose_address(
                        &structure.warehouse_code,
                        &structure.zone_code,
                        aisle.aisle_number,
                        shelf,
                        &position,
                        pattern,
                    );
                    out.push(BinAddress {
                        aisle: aisle.aisle_number,
                        shelf,
                        position,
                        address,
                    });
                }
            }
        }

        debug!(
            warehouse = %structure.warehouse_code,
            zone = %structure.zone_code,
            aisles = structure.aisles.len(),
            bins = out.len(),
            "库位编码生成完成"
        );
        Ok(out)
    }
}

/// 便捷函数，等价于 `AddressCodec::new().addresses_for_zone(structure)`
pub fn addresses_for_zone(structure: &ZoneStructure) -> EngineResult<Vec<BinAddress>> {
    AddressCodec::new().addresses_for_zone(structure)
}

/// n 位十进制可表示的最大值
fn digit_capacity(digits: u8) -> u64 {
    10u64.pow(u32::from(digits)) - 1
}

/// 层内第 index 个生成位置的标签；TOP_DOWN 时反向映射
fn position_label(pattern: &CodePattern, index: u32, bins_per_shelf: u32) -> String {
    let slot = match pattern.bin_direction {
        BinDirection::BottomUp => index,
        BinDirection::TopDown => bins_per_shelf - 1 - index,
    };
    match pattern.bin_labeling {
        BinLabeling::Letters => letter_label(slot),
        BinLabeling::Numbers => (slot + 1).to_string(),
    }
}

/// 拼接单个库位编码
pub fn compose_address(
    warehouse_code: &str,
    zone_code: &str,
    aisle: u32,
    shelf: u32,
    position: &str,
    pattern: &CodePattern,
) -> String {
    let sep = pattern.separator.as_str();
    format!(
        "{wh}{sep}{zone}{sep}{aisle:0aw$}{shelf:0sw$}{sep}{pos}",
        wh = warehouse_code,
        zone = zone_code,
        sep = sep,
        aisle = aisle,
        aw = usize::from(pattern.aisle_digits),
        shelf = shelf,
        sw = usize::from(pattern.shelf_digits),
        pos = position,
    )
}
