// ==========================================
// 排班优化引擎 - 求解输入
// ==========================================
// 一次求解的完整输入快照;求解期间调用方不得修改
// ==========================================

use crate::domain::availability::AvailabilityRequest;
use crate::domain::duty::DutyCode;
use crate::domain::requirement::PositionRequirement;
use crate::domain::worker::Worker;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterProblem {
    pub requirements: Vec<PositionRequirement>,
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub availability: Vec<AvailabilityRequest>,
    /// 勤务代码目录 (可选;为空时仅使用需求自带的时间区间)
    #[serde(default)]
    pub duty_codes: Vec<DutyCode>,
}

impl RosterProblem {
    pub fn new(
        requirements: Vec<PositionRequirement>,
        workers: Vec<Worker>,
        availability: Vec<AvailabilityRequest>,
    ) -> Self {
        Self {
            requirements,
            workers,
            availability,
            duty_codes: Vec::new(),
        }
    }

    pub fn with_duty_codes(mut self, duty_codes: Vec<DutyCode>) -> Self {
        self.duty_codes = duty_codes;
        self
    }
}

// ==========================================
// PartialFilter - 局部重排范围
// ==========================================
// 已给出的条件全部满足才算命中 (AND);全部为空时命中一切
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialFilter {
    #[serde(default)]
    pub date_range: Option<(NaiveDate, NaiveDate)>, // 闭区间
    #[serde(default)]
    pub location_ids: Option<BTreeSet<String>>,
    #[serde(default)]
    pub duty_code_ids: Option<BTreeSet<String>>,
}

impl PartialFilter {
    pub fn with_date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_range = Some((from, to));
        self
    }

    pub fn with_locations<I, S>(mut self, location_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.location_ids = Some(location_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_duty_codes<I, S>(mut self, duty_code_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.duty_code_ids = Some(duty_code_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn matches(&self, date: NaiveDate, location_id: &str, duty_code_id: &str) -> bool {
        let date_ok = self
            .date_range
            .map(|(from, to)| from <= date && date <= to)
            .unwrap_or(true);
        let location_ok = self
            .location_ids
            .as_ref()
            .map(|ids| ids.contains(location_id))
            .unwrap_or(true);
        let duty_ok = self
            .duty_code_ids
            .as_ref()
            .map(|ids| ids.contains(duty_code_id))
            .unwrap_or(true);
        date_ok && location_ok && duty_ok
    }

    pub fn matches_requirement(&self, requirement: &PositionRequirement) -> bool {
        self.matches(requirement.date, &requirement.location_id, &requirement.duty_code_id)
    }
}
