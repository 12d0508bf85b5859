// ==========================================
// 排班优化引擎 - 岗位需求领域模型
// ==========================================
// 一条需求 = 某日某地点某勤务代码需要 N 人
// 每个名额独立填充,责任人/标签满足度按需求整体计算
// ==========================================

use crate::domain::duty::DutyTimeRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ==========================================
// SlotKey - 岗位键 (日期 × 地点 × 勤务代码)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub location_id: String,
    pub duty_code_id: String,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.date, self.location_id, self.duty_code_id)
    }
}

// ==========================================
// PositionRequirement - 岗位需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRequirement {
    pub date: NaiveDate,
    pub location_id: String,
    pub duty_code_id: String,
    pub time_range: DutyTimeRange,
    pub required_count: i32,
    #[serde(default)]
    pub requires_responsible: bool,
    #[serde(default)]
    pub required_tags: BTreeSet<String>,
}

impl PositionRequirement {
    pub fn new(
        date: NaiveDate,
        location_id: impl Into<String>,
        duty_code_id: impl Into<String>,
        time_range: DutyTimeRange,
        required_count: i32,
    ) -> Self {
        Self {
            date,
            location_id: location_id.into(),
            duty_code_id: duty_code_id.into(),
            time_range,
            required_count,
            requires_responsible: false,
            required_tags: BTreeSet::new(),
        }
    }

    pub fn with_responsible(mut self) -> Self {
        self.requires_responsible = true;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.required_tags.insert(tag.into());
        self
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            location_id: self.location_id.clone(),
            duty_code_id: self.duty_code_id.clone(),
        }
    }

    /// 判定是否为同一岗位 (不分配 SlotKey)
    pub fn matches_slot(&self, date: NaiveDate, location_id: &str, duty_code_id: &str) -> bool {
        self.date == date && self.location_id == location_id && self.duty_code_id == duty_code_id
    }

    /// 需求人数 (负数按 0 处理,负数输入在 API 层已拒绝)
    pub fn required_slots(&self) -> usize {
        self.required_count.max(0) as usize
    }
}
