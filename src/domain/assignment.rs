// ==========================================
// 排班优化引擎 - 排班结果领域模型
// ==========================================
// 红线: 同一 (worker_id, date) 至多一条排班 (插入时由约束模型保证)
// ==========================================

use crate::domain::requirement::{PositionRequirement, SlotKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 排班来源原因
pub mod assign_reason {
    pub const RESPONSIBLE_FIRST: &str = "RESPONSIBLE_FIRST";
    pub const BEST_SCORE: &str = "BEST_SCORE";
    pub const LOCAL_SEARCH_SWAP: &str = "LOCAL_SEARCH_SWAP";
}

// ==========================================
// Assignment - 人员与岗位的绑定
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: String,
    pub date: NaiveDate,
    pub location_id: String,
    pub duty_code_id: String,
    pub worker_id: String,
    #[serde(default)]
    pub is_responsible_slot: bool,
    #[serde(default)]
    pub assign_reason: Option<String>,
}

impl Assignment {
    /// 为需求创建一条新排班 (UUID v4)
    pub fn for_requirement(
        requirement: &PositionRequirement,
        worker_id: &str,
        is_responsible_slot: bool,
        assign_reason: &str,
    ) -> Self {
        Self {
            assignment_id: uuid::Uuid::new_v4().to_string(),
            date: requirement.date,
            location_id: requirement.location_id.clone(),
            duty_code_id: requirement.duty_code_id.clone(),
            worker_id: worker_id.to_string(),
            is_responsible_slot,
            assign_reason: Some(assign_reason.to_string()),
        }
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            location_id: self.location_id.clone(),
            duty_code_id: self.duty_code_id.clone(),
        }
    }

    pub fn belongs_to(&self, requirement: &PositionRequirement) -> bool {
        requirement.matches_slot(self.date, &self.location_id, &self.duty_code_id)
    }
}
