// ==========================================
// 排班优化引擎 - 排班索引
// ==========================================
// 职责: 为约束判定与评分提供 O(log n) 的排班查询
// 输入: 当前排班集合 (求解过程中的可变工作状态)
// 红线: 同一 (worker_id, date) 至多一条
// ==========================================

use crate::domain::assignment::Assignment;
use crate::domain::duty::{DutyCode, DutyTimeRange};
use crate::domain::requirement::PositionRequirement;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// ScheduleIndex - 人员 × 日期 排班索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    // worker_id → (date → duty_code_id)
    by_worker: HashMap<String, BTreeMap<NaiveDate, String>>,
    // date → 当日排班人数
    daily_counts: BTreeMap<NaiveDate, usize>,
}

impl ScheduleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由排班集合构建 (重复的 worker/date 仅保留第一条)
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        let mut index = Self::new();
        for assignment in assignments {
            index.insert_assignment(assignment);
        }
        index
    }

    /// 登记排班
    ///
    /// # 返回
    /// - `true`: 登记成功
    /// - `false`: 该人员当日已有排班,未登记
    pub fn insert(&mut self, worker_id: &str, date: NaiveDate, duty_code_id: &str) -> bool {
        let dates = self.by_worker.entry(worker_id.to_string()).or_default();
        if dates.contains_key(&date) {
            return false;
        }
        dates.insert(date, duty_code_id.to_string());
        *self.daily_counts.entry(date).or_insert(0) += 1;
        true
    }

    pub fn insert_assignment(&mut self, assignment: &Assignment) -> bool {
        self.insert(&assignment.worker_id, assignment.date, &assignment.duty_code_id)
    }

    /// 撤销排班,返回原勤务代码
    pub fn remove(&mut self, worker_id: &str, date: NaiveDate) -> Option<String> {
        let removed = self
            .by_worker
            .get_mut(worker_id)
            .and_then(|dates| dates.remove(&date));

        if removed.is_some() {
            if let Some(count) = self.daily_counts.get_mut(&date) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.daily_counts.remove(&date);
                }
            }
        }
        removed
    }

    pub fn is_booked(&self, worker_id: &str, date: NaiveDate) -> bool {
        self.duty_on(worker_id, date).is_some()
    }

    pub fn duty_on(&self, worker_id: &str, date: NaiveDate) -> Option<&str> {
        self.by_worker
            .get(worker_id)
            .and_then(|dates| dates.get(&date))
            .map(|s| s.as_str())
    }

    /// 人员已排班天数
    pub fn assigned_days(&self, worker_id: &str) -> usize {
        self.by_worker.get(worker_id).map(|d| d.len()).unwrap_or(0)
    }

    /// 排班总条数
    pub fn len(&self) -> usize {
        self.daily_counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.daily_counts.is_empty()
    }

    /// 候选日之前的连续出勤天数 (date-1, date-2, ... 直到空档)
    pub fn consecutive_days_before(&self, worker_id: &str, date: NaiveDate) -> u32 {
        let Some(dates) = self.by_worker.get(worker_id) else {
            return 0;
        };

        let mut count = 0;
        let mut cursor = date.pred_opt();
        while let Some(day) = cursor {
            if !dates.contains_key(&day) {
                break;
            }
            count += 1;
            cursor = day.pred_opt();
        }
        count
    }

    /// 当月截至候选日(不含)的出勤天数
    pub fn month_to_date_days(&self, worker_id: &str, date: NaiveDate) -> usize {
        self.by_worker
            .get(worker_id)
            .map(|dates| dates.range(month_start(date)..date).count())
            .unwrap_or(0)
    }

    /// 当月截至候选日(不含)全员出勤人天合计
    pub fn month_to_date_total(&self, date: NaiveDate) -> usize {
        self.daily_counts
            .range(month_start(date)..date)
            .map(|(_, count)| *count)
            .sum()
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

// ==========================================
// DutyTimeTable - 勤务代码 → 时间区间
// ==========================================
// 来源: 勤务代码目录 + 需求自带时间区间 (目录优先)
#[derive(Debug, Clone, Default)]
pub struct DutyTimeTable {
    ranges: HashMap<String, DutyTimeRange>,
}

impl DutyTimeTable {
    pub fn build(duty_codes: &[DutyCode], requirements: &[PositionRequirement]) -> Self {
        let mut ranges = HashMap::with_capacity(duty_codes.len() + requirements.len());
        for requirement in requirements {
            ranges
                .entry(requirement.duty_code_id.clone())
                .or_insert(requirement.time_range);
        }
        for duty_code in duty_codes {
            ranges.insert(duty_code.duty_code_id.clone(), duty_code.time_range);
        }
        Self { ranges }
    }

    pub fn get(&self, duty_code_id: &str) -> Option<&DutyTimeRange> {
        self.ranges.get(duty_code_id)
    }

    pub fn contains(&self, duty_code_id: &str) -> bool {
        self.ranges.contains_key(duty_code_id)
    }
}
