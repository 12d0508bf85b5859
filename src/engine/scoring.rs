// ==========================================
// 排班优化引擎 - 候选评分函数
// ==========================================
// 职责: 对 (人员, 日期, 勤务时间) 计算带符号的偏好分,越高越优
// 红线: 确定性、无副作用、无 I/O;所有扣/加分必须输出 reason
// ==========================================
// 规则 (累加):
// 1) 出勤申请: AVAILABLE +10 / UNAVAILABLE -20 / 时段偏好 命中+5 未命中-3
// 2) 夜班相邻: 前一日班次开始 >= 19 点或跨夜 → -10
// 3) 连续出勤 n 天(含候选日): <=3 → 0; 4~5 → -5; >=6 → -15×(n-5)
// 4) 公平性: 当月累计天数低于名册均值 2 天以上 +3,高于 2 天以上 -3
// ==========================================

use crate::config::scoring_profile::ScoringWeights;
use crate::domain::availability::AvailabilityBook;
use crate::domain::duty::DutyTimeRange;
use crate::domain::types::RequestType;
use crate::engine::schedule_index::{DutyTimeTable, ScheduleIndex};
use chrono::NaiveDate;
use serde::Serialize;

// ==========================================
// ScoringContext - 单次评分所需的只读视图
// ==========================================
#[derive(Clone, Copy)]
pub struct ScoringContext<'a> {
    pub availability: &'a AvailabilityBook,
    pub duty_times: &'a DutyTimeTable,
    pub schedule: &'a ScheduleIndex,
    pub roster_size: usize,
}

// ==========================================
// ScoreBreakdown - 分项得分
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub availability: f64,
    pub time_band: f64,
    pub night_adjacency: f64,
    pub consecutive: f64,
    pub fairness: f64,
    pub reasons: Vec<String>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.availability + self.time_band + self.night_adjacency + self.consecutive + self.fairness
    }
}

// ==========================================
// ScoringEngine - 评分引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// 计算总分
    pub fn score(
        &self,
        worker_id: &str,
        date: NaiveDate,
        time_range: &DutyTimeRange,
        ctx: &ScoringContext<'_>,
    ) -> f64 {
        self.score_with_breakdown(worker_id, date, time_range, ctx).total()
    }

    /// 计算分项得分与原因
    pub fn score_with_breakdown(
        &self,
        worker_id: &str,
        date: NaiveDate,
        time_range: &DutyTimeRange,
        ctx: &ScoringContext<'_>,
    ) -> ScoreBreakdown {
        let w = &self.weights;
        let mut breakdown = ScoreBreakdown::default();

        // 规则 1: 出勤申请
        match ctx.availability.get(worker_id, date) {
            Some(RequestType::Available) => {
                breakdown.availability = w.available_bonus;
                breakdown.reasons.push(format!("AVAILABLE_REQUEST: {:+}", w.available_bonus));
            }
            Some(RequestType::Unavailable) => {
                breakdown.availability = w.unavailable_penalty;
                breakdown
                    .reasons
                    .push(format!("UNAVAILABLE_REQUEST: {:+}", w.unavailable_penalty));
            }
            Some(RequestType::TimeBandPreference(preferred)) => {
                let actual = w.time_bands.band_for_hour(time_range.start_hour());
                if actual == preferred {
                    breakdown.time_band = w.time_band_match_bonus;
                    breakdown.reasons.push(format!(
                        "TIME_BAND_MATCH: {} {:+}",
                        actual, w.time_band_match_bonus
                    ));
                } else {
                    breakdown.time_band = w.time_band_mismatch_penalty;
                    breakdown.reasons.push(format!(
                        "TIME_BAND_MISMATCH: preferred={}, actual={} {:+}",
                        preferred, actual, w.time_band_mismatch_penalty
                    ));
                }
            }
            None => {}
        }

        // 规则 2: 夜班相邻
        if let Some(previous_day) = date.pred_opt() {
            let previous_range = ctx
                .schedule
                .duty_on(worker_id, previous_day)
                .and_then(|duty_code_id| ctx.duty_times.get(duty_code_id));
            if let Some(range) = previous_range {
                if range.is_night_start(w.night_start_hour) {
                    breakdown.night_adjacency = w.night_adjacency_penalty;
                    breakdown.reasons.push(format!(
                        "NIGHT_ADJACENCY: previous={} {:+}",
                        range, w.night_adjacency_penalty
                    ));
                }
            }
        }

        // 规则 3: 连续出勤
        let run_length = ctx.schedule.consecutive_days_before(worker_id, date) + 1;
        let consecutive = self.consecutive_penalty(run_length);
        if consecutive != 0.0 {
            breakdown.consecutive = consecutive;
            breakdown
                .reasons
                .push(format!("CONSECUTIVE_DAYS: n={} {:+}", run_length, consecutive));
        }

        // 规则 4: 公平性
        if ctx.roster_size > 0 {
            let own = ctx.schedule.month_to_date_days(worker_id, date) as f64;
            let average = ctx.schedule.month_to_date_total(date) as f64 / ctx.roster_size as f64;
            if own < average - w.fairness_gap_days {
                breakdown.fairness = w.fairness_adjustment;
            } else if own > average + w.fairness_gap_days {
                breakdown.fairness = -w.fairness_adjustment;
            }
            if breakdown.fairness != 0.0 {
                breakdown.reasons.push(format!(
                    "FAIRNESS: month_to_date={}, roster_avg={:.2} {:+}",
                    own, average, breakdown.fairness
                ));
            }
        }

        breakdown
    }

    /// 连续出勤扣分
    ///
    /// # 参数
    /// - run_length: 截至候选日(含)的连续出勤天数
    pub fn consecutive_penalty(&self, run_length: u32) -> f64 {
        let w = &self.weights;
        if run_length <= w.consecutive_free_days {
            0.0
        } else if run_length <= w.consecutive_soft_limit {
            w.consecutive_moderate_penalty
        } else {
            w.consecutive_excess_penalty_per_day * (run_length - w.consecutive_soft_limit) as f64
        }
    }
}
