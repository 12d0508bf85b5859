// ==========================================
// 排班优化引擎 - 结果与统计
// ==========================================
// 职责: 汇总单次求解的排班结果、校验报告与统计指标
// ==========================================
// 偏好满足率: 已满足的 AVAILABLE/UNAVAILABLE 申请 / 该类申请总数
//   - 仅统计日期落在需求日期内的申请
//   - AVAILABLE 满足 = 当日有排班; UNAVAILABLE 满足 = 当日无排班
//   - 无该类申请时记为 1.0
// 工作量: 名册全员(含 0 天)的出勤天数均值与总体标准差
// ==========================================

use crate::domain::assignment::Assignment;
use crate::domain::problem::RosterProblem;
use crate::domain::types::RequestType;
use crate::domain::validation::ValidationReport;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ==========================================
// OptimizationStats - 统计指标
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptimizationStats {
    pub total_assignments: usize,
    pub total_requirements: usize,
    pub unfilled_requirements: usize,

    // 偏好
    pub preference_requests: usize,
    pub preference_matched: usize,
    pub preference_fulfillment_rate: f64,

    // 工作量
    pub workload_mean: f64,
    pub workload_std_dev: f64,
    pub workload_by_worker: BTreeMap<String, usize>,

    // 局部搜索
    pub local_search_iterations: u32,
    pub local_search_improvements: u32,
    pub timed_out: bool,
}

// ==========================================
// OptimizationResult - 求解结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub assignments: Vec<Assignment>,
    pub validation: ValidationReport,
    pub stats: OptimizationStats,
    pub total_score: f64,
    pub greedy_score: f64,
    pub processing_time_ms: u64,
}

// ==========================================
// StatsCollector - 统计计算
// ==========================================
pub struct StatsCollector;

impl StatsCollector {
    /// 计算统计指标 (局部搜索计数由调用方填写)
    pub fn collect(
        problem: &RosterProblem,
        assignments: &[Assignment],
        validation: &ValidationReport,
    ) -> OptimizationStats {
        let (preference_requests, preference_matched) =
            Self::preference_counts(problem, assignments);
        let preference_fulfillment_rate = if preference_requests == 0 {
            1.0
        } else {
            preference_matched as f64 / preference_requests as f64
        };

        let workload_by_worker = Self::workload(problem, assignments);
        let (workload_mean, workload_std_dev) = mean_and_std_dev(&workload_by_worker);

        OptimizationStats {
            total_assignments: assignments.len(),
            total_requirements: problem.requirements.len(),
            unfilled_requirements: validation.unfulfilled_count(),
            preference_requests,
            preference_matched,
            preference_fulfillment_rate,
            workload_mean,
            workload_std_dev,
            workload_by_worker,
            ..Default::default()
        }
    }

    fn preference_counts(problem: &RosterProblem, assignments: &[Assignment]) -> (usize, usize) {
        let period: HashSet<NaiveDate> = problem.requirements.iter().map(|r| r.date).collect();
        let booked: HashSet<(&str, NaiveDate)> = assignments
            .iter()
            .map(|a| (a.worker_id.as_str(), a.date))
            .collect();

        let mut total = 0;
        let mut matched = 0;
        for request in &problem.availability {
            if !request.request_type.counts_toward_fulfillment() || !period.contains(&request.date)
            {
                continue;
            }
            total += 1;
            let is_booked = booked.contains(&(request.worker_id.as_str(), request.date));
            let satisfied = match request.request_type {
                RequestType::Available => is_booked,
                RequestType::Unavailable => !is_booked,
                RequestType::TimeBandPreference(_) => false,
            };
            if satisfied {
                matched += 1;
            }
        }
        (total, matched)
    }

    fn workload(problem: &RosterProblem, assignments: &[Assignment]) -> BTreeMap<String, usize> {
        let mut days: BTreeMap<String, HashSet<NaiveDate>> = problem
            .workers
            .iter()
            .map(|w| (w.worker_id.clone(), HashSet::new()))
            .collect();
        for assignment in assignments {
            days.entry(assignment.worker_id.clone())
                .or_default()
                .insert(assignment.date);
        }
        days.into_iter()
            .map(|(worker_id, dates)| (worker_id, dates.len()))
            .collect()
    }
}

fn mean_and_std_dev(counts: &BTreeMap<String, usize>) -> (f64, f64) {
    if counts.is_empty() {
        return (0.0, 0.0);
    }
    let n = counts.len() as f64;
    let mean = counts.values().map(|&c| c as f64).sum::<f64>() / n;
    let variance = counts
        .values()
        .map(|&c| {
            let diff = c as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::AvailabilityRequest;
    use crate::domain::duty::DutyTimeRange;
    use crate::domain::requirement::PositionRequirement;
    use crate::domain::types::TimeBand;
    use crate::domain::worker::Worker;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn problem(requests: Vec<AvailabilityRequest>) -> RosterProblem {
        let requirements = vec![
            PositionRequirement::new(d(10), "LocA", "DC1", DutyTimeRange::from_hm(8, 0, 16, 0), 1),
            PositionRequirement::new(d(11), "LocA", "DC1", DutyTimeRange::from_hm(8, 0, 16, 0), 1),
        ];
        let workers = vec![Worker::new("W1"), Worker::new("W2"), Worker::new("W3")];
        RosterProblem::new(requirements, workers, requests)
    }

    #[test]
    fn test_preference_rate_counts_only_period_requests() {
        let problem = problem(vec![
            AvailabilityRequest::new("W1", d(10), RequestType::Available),
            AvailabilityRequest::new("W2", d(10), RequestType::Unavailable),
            AvailabilityRequest::new("W2", d(11), RequestType::Available),
            // 不在需求日期内
            AvailabilityRequest::new("W3", d(20), RequestType::Available),
            // 时段偏好不计入
            AvailabilityRequest::new(
                "W3",
                d(10),
                RequestType::TimeBandPreference(TimeBand::Morning),
            ),
        ]);
        let assignments = vec![
            Assignment::for_requirement(&problem.requirements[0], "W1", false, "MANUAL"),
            Assignment::for_requirement(&problem.requirements[1], "W1", false, "MANUAL"),
        ];

        let validation = ValidationReport::default();
        let stats = StatsCollector::collect(&problem, &assignments, &validation);
        assert_eq!(stats.preference_requests, 3);
        assert_eq!(stats.preference_matched, 2);
        assert!((stats.preference_fulfillment_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_preference_requests_rate_is_one() {
        let problem = problem(vec![]);
        let stats = StatsCollector::collect(&problem, &[], &ValidationReport::default());
        assert_eq!(stats.preference_fulfillment_rate, 1.0);
        assert_eq!(stats.total_assignments, 0);
    }

    #[test]
    fn test_workload_includes_idle_workers() {
        let problem = problem(vec![]);
        let assignments = vec![
            Assignment::for_requirement(&problem.requirements[0], "W1", false, "MANUAL"),
            Assignment::for_requirement(&problem.requirements[1], "W1", false, "MANUAL"),
            Assignment::for_requirement(&problem.requirements[1], "W2", false, "MANUAL"),
        ];

        let stats = StatsCollector::collect(&problem, &assignments, &ValidationReport::default());
        assert_eq!(stats.workload_by_worker["W1"], 2);
        assert_eq!(stats.workload_by_worker["W3"], 0);
        assert!((stats.workload_mean - 1.0).abs() < 1e-9);
        // 方差 = ((2-1)^2 + 0 + (0-1)^2) / 3
        assert!((stats.workload_std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-9);
    }
}
