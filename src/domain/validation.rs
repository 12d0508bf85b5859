// ==========================================
// 排班优化引擎 - 校验报告领域模型
// ==========================================
// 派生对象,不落库;每次由当前排班集合与需求列表重新计算
// ==========================================

use crate::domain::requirement::SlotKey;
use serde::{Deserialize, Serialize};

// ==========================================
// RequirementFulfillment - 单需求满足度
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementFulfillment {
    pub slot: SlotKey,
    pub required_count: i32,
    pub assigned_count: i32,
    pub responsible_count: i32,
    pub delta: i32, // assigned - required
    pub responsible_covered: bool,
}

impl RequirementFulfillment {
    pub fn is_fulfilled(&self) -> bool {
        self.delta >= 0 && self.responsible_covered
    }
}

// ==========================================
// ValidationReport - 校验报告
// ==========================================
// errors 非空 → 不可提交; warnings 仅供人工复核
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub fulfillment: Vec<RequirementFulfillment>,
}

impl ValidationReport {
    pub fn unfulfilled_count(&self) -> usize {
        self.fulfillment.iter().filter(|f| !f.is_fulfilled()).count()
    }
}
