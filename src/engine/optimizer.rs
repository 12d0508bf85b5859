// ==========================================
// 排班优化引擎 - 两阶段求解器
// ==========================================
// 流程: 贪心构造 → 局部搜索改进 (可选) → 满足度校验 → 统计
// 红线: 单线程、无 I/O、无全局状态;缺员不是错误,只进入校验报告
// ==========================================
// 贪心构造:
//   - 需求排序: 要求责任人的优先,其次标签多的优先 (稳定排序)
//   - 逐条调用 select_optimal_staff_multiple
//   - 每条需求之前检查截止时间,超时则剩余需求保持未满足
// 局部搜索:
//   - 逐条扫描非保留排班,尝试名册中其他人员替换同一岗位
//   - 替换后重算全体总分,严格提高才接受 (first-improvement)
//   - 整轮无改进 / 达到迭代上限 / 超时 即终止
// ==========================================

use crate::config::optimizer_config::{OptimizeOptions, UnavailablePolicy};
use crate::config::scoring_profile::ScoringWeights;
use crate::domain::assignment::{assign_reason, Assignment};
use crate::domain::availability::AvailabilityBook;
use crate::domain::problem::{PartialFilter, RosterProblem};
use crate::domain::requirement::{PositionRequirement, SlotKey};
use crate::domain::worker::Worker;
use crate::engine::constraint::{CandidateScorer, ConstraintModel};
use crate::engine::deadline::Deadline;
use crate::engine::fulfillment::FulfillmentValidator;
use crate::engine::report::{OptimizationResult, StatsCollector};
use crate::engine::schedule_index::{DutyTimeTable, ScheduleIndex};
use crate::engine::scoring::{ScoringContext, ScoringEngine};
use crate::perf::PerfGuard;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument};

const SCORE_EPSILON: f64 = 1e-9;

// ==========================================
// 求解工作状态
// ==========================================

struct WorkingAssignment {
    assignment: Assignment,
    locked: bool, // 局部重排时范围外的保留排班
}

struct SolveState {
    availability: AvailabilityBook,
    duty_times: DutyTimeTable,
    schedule: ScheduleIndex,
    working: Vec<WorkingAssignment>,
    roster_size: usize,
}

impl SolveState {
    fn ctx(&self) -> ScoringContext<'_> {
        ScoringContext {
            availability: &self.availability,
            duty_times: &self.duty_times,
            schedule: &self.schedule,
            roster_size: self.roster_size,
        }
    }

    fn admits(&self, policy: UnavailablePolicy, worker: &Worker, requirement: &PositionRequirement) -> bool {
        policy_admits(policy, &self.availability, worker, requirement)
    }
}

fn policy_admits(
    policy: UnavailablePolicy,
    availability: &AvailabilityBook,
    worker: &Worker,
    requirement: &PositionRequirement,
) -> bool {
    match policy {
        UnavailablePolicy::Penalize => true,
        UnavailablePolicy::Exclude => !availability.is_unavailable(&worker.worker_id, requirement.date),
    }
}

/// 贪心阶段的候选评分器
struct RunScorer<'a> {
    engine: &'a ScoringEngine,
    availability: &'a AvailabilityBook,
    duty_times: &'a DutyTimeTable,
    roster_size: usize,
    policy: UnavailablePolicy,
}

impl CandidateScorer for RunScorer<'_> {
    fn score(&self, worker: &Worker, requirement: &PositionRequirement, schedule: &ScheduleIndex) -> f64 {
        let ctx = ScoringContext {
            availability: self.availability,
            duty_times: self.duty_times,
            schedule,
            roster_size: self.roster_size,
        };
        self.engine
            .score(&worker.worker_id, requirement.date, &requirement.time_range, &ctx)
    }

    fn admits(&self, worker: &Worker, requirement: &PositionRequirement) -> bool {
        policy_admits(self.policy, self.availability, worker, requirement)
    }
}

#[derive(Debug, Default)]
struct LocalSearchOutcome {
    iterations: u32,
    improvements: u32,
    timed_out: bool,
}

// ==========================================
// RosterOptimizer - 求解器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RosterOptimizer {
    scoring: ScoringEngine,
}

impl RosterOptimizer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            scoring: ScoringEngine::new(weights),
        }
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    /// 全量求解
    #[instrument(skip_all, fields(
        requirements = problem.requirements.len(),
        workers = problem.workers.len(),
        timeout_ms = options.timeout_ms
    ))]
    pub fn optimize(&self, problem: &RosterProblem, options: &OptimizeOptions) -> OptimizationResult {
        let targets: Vec<&PositionRequirement> = problem.requirements.iter().collect();
        self.run(problem, &targets, Vec::new(), options)
    }

    /// 局部重排
    ///
    /// # 规则
    /// 1. 命中 filter 的需求重新求解,这些需求岗位上的已有排班丢弃
    /// 2. 其余已有排班原样保留 (含 assign_reason),局部搜索不改动
    /// 3. 合并结果按全量需求列表重新校验
    #[instrument(skip_all, fields(
        requirements = problem.requirements.len(),
        existing = existing.len(),
        timeout_ms = options.timeout_ms
    ))]
    pub fn optimize_partial(
        &self,
        problem: &RosterProblem,
        existing: &[Assignment],
        filter: &PartialFilter,
        options: &OptimizeOptions,
    ) -> OptimizationResult {
        let targets: Vec<&PositionRequirement> = problem
            .requirements
            .iter()
            .filter(|r| filter.matches_requirement(r))
            .collect();
        // 只释放属于重排需求的排班;无对应需求的排班即使命中 filter 也保留
        let released_slots: HashSet<SlotKey> = targets.iter().map(|r| r.slot_key()).collect();
        let preserved: Vec<Assignment> = existing
            .iter()
            .filter(|a| !released_slots.contains(&a.slot_key()))
            .cloned()
            .collect();

        info!(
            preserved = preserved.len(),
            released = existing.len() - preserved.len(),
            targets = targets.len(),
            "局部重排范围已确定"
        );
        self.run(problem, &targets, preserved, options)
    }

    /// 全体排班总分 (基于当前完整排班重算,含保留排班)
    pub fn total_score(&self, problem: &RosterProblem, assignments: &[Assignment]) -> f64 {
        let state = SolveState {
            availability: AvailabilityBook::from_requests(&problem.availability),
            duty_times: DutyTimeTable::build(&problem.duty_codes, &problem.requirements),
            schedule: ScheduleIndex::from_assignments(assignments),
            working: assignments
                .iter()
                .cloned()
                .map(|assignment| WorkingAssignment {
                    assignment,
                    locked: true,
                })
                .collect(),
            roster_size: problem.workers.len(),
        };
        self.state_score(&state)
    }

    fn run(
        &self,
        problem: &RosterProblem,
        targets: &[&PositionRequirement],
        preserved: Vec<Assignment>,
        options: &OptimizeOptions,
    ) -> OptimizationResult {
        let perf = PerfGuard::new("roster_optimize");
        let deadline = Deadline::new(options.timeout());

        let mut state = SolveState {
            availability: AvailabilityBook::from_requests(&problem.availability),
            duty_times: DutyTimeTable::build(&problem.duty_codes, &problem.requirements),
            schedule: ScheduleIndex::from_assignments(&preserved),
            working: preserved
                .into_iter()
                .map(|assignment| WorkingAssignment {
                    assignment,
                    locked: true,
                })
                .collect(),
            roster_size: problem.workers.len(),
        };

        // 1. 贪心构造
        let greedy_timed_out = self.construct(problem, targets, &mut state, options, &deadline);
        let greedy_score = self.state_score(&state);

        // 2. 局部搜索
        let outcome = if options.apply_local_search && options.max_local_search_iterations > 0 {
            self.improve(problem, &mut state, options, &deadline, greedy_score)
        } else {
            LocalSearchOutcome::default()
        };
        let total_score = self.state_score(&state);

        // 3. 校验与统计
        let assignments: Vec<Assignment> = state.working.into_iter().map(|w| w.assignment).collect();
        let validation = FulfillmentValidator::validate(&problem.requirements, &assignments);
        let mut stats = StatsCollector::collect(problem, &assignments, &validation);
        stats.local_search_iterations = outcome.iterations;
        stats.local_search_improvements = outcome.improvements;
        stats.timed_out = greedy_timed_out || outcome.timed_out;

        let processing_time_ms = perf.elapsed_ms();
        info!(
            assignments = assignments.len(),
            greedy_score,
            total_score,
            is_valid = validation.is_valid,
            errors = validation.errors.len(),
            warnings = validation.warnings.len(),
            processing_time_ms,
            "排班求解完成"
        );

        OptimizationResult {
            assignments,
            validation,
            stats,
            total_score,
            greedy_score,
            processing_time_ms,
        }
    }

    /// 贪心构造,返回是否因超时提前结束
    #[instrument(skip_all, fields(targets = targets.len()))]
    fn construct(
        &self,
        problem: &RosterProblem,
        targets: &[&PositionRequirement],
        state: &mut SolveState,
        options: &OptimizeOptions,
        deadline: &Deadline,
    ) -> bool {
        let mut ordered: Vec<&PositionRequirement> = targets.to_vec();
        ordered.sort_by(|a, b| {
            b.requires_responsible
                .cmp(&a.requires_responsible)
                .then_with(|| b.required_tags.len().cmp(&a.required_tags.len()))
        });

        let scorer = RunScorer {
            engine: &self.scoring,
            availability: &state.availability,
            duty_times: &state.duty_times,
            roster_size: state.roster_size,
            policy: options.unavailable_policy,
        };

        let mut created = 0;
        for (index, requirement) in ordered.iter().enumerate() {
            if deadline.is_expired() {
                info!(
                    processed = index,
                    remaining = ordered.len() - index,
                    elapsed_ms = deadline.elapsed().as_millis() as u64,
                    "贪心构造超时,剩余需求保持未满足"
                );
                return true;
            }

            let selection = ConstraintModel::select_optimal_staff_multiple(
                requirement,
                &problem.workers,
                &state.schedule,
                &scorer,
            );

            debug!(
                slot = %requirement.slot_key(),
                needed = requirement.required_slots(),
                selected = selection.selected.len(),
                shortfall = ?selection.errors,
                "需求已处理"
            );

            for assignment in selection.selected {
                state.schedule.insert_assignment(&assignment);
                state.working.push(WorkingAssignment {
                    assignment,
                    locked: false,
                });
                created += 1;
            }
        }

        info!(requirements = ordered.len(), created, "贪心构造完成");
        false
    }

    /// 局部搜索 (first-improvement 替换)
    #[instrument(skip_all, fields(max_iterations = options.max_local_search_iterations))]
    fn improve(
        &self,
        problem: &RosterProblem,
        state: &mut SolveState,
        options: &OptimizeOptions,
        deadline: &Deadline,
        start_score: f64,
    ) -> LocalSearchOutcome {
        let requirements: HashMap<SlotKey, &PositionRequirement> = problem
            .requirements
            .iter()
            .map(|r| (r.slot_key(), r))
            .collect();

        let mut outcome = LocalSearchOutcome::default();
        let mut current = start_score;

        'scan: while outcome.iterations < options.max_local_search_iterations {
            if deadline.is_expired() {
                outcome.timed_out = true;
                break;
            }
            outcome.iterations += 1;
            let mut improved = false;

            for position in 0..state.working.len() {
                if state.working[position].locked {
                    continue;
                }
                let (slot, incumbent, responsible_slot) = {
                    let assignment = &state.working[position].assignment;
                    (
                        assignment.slot_key(),
                        assignment.worker_id.clone(),
                        assignment.is_responsible_slot,
                    )
                };
                let Some(requirement) = requirements.get(&slot) else {
                    continue;
                };

                for candidate in &problem.workers {
                    if deadline.is_expired() {
                        outcome.timed_out = true;
                        break 'scan;
                    }
                    if candidate.worker_id == incumbent
                        || !self.substitution_allowed(state, options, candidate, requirement, responsible_slot)
                    {
                        continue;
                    }

                    Self::reassign(state, position, &incumbent, &candidate.worker_id);
                    let candidate_total = self.state_score(state);
                    if candidate_total > current + SCORE_EPSILON {
                        debug!(
                            slot = %slot,
                            from = %incumbent,
                            to = %candidate.worker_id,
                            before = current,
                            after = candidate_total,
                            "局部搜索接受替换"
                        );
                        current = candidate_total;
                        state.working[position].assignment.assign_reason =
                            Some(assign_reason::LOCAL_SEARCH_SWAP.to_string());
                        outcome.improvements += 1;
                        improved = true;
                        break;
                    }
                    Self::reassign(state, position, &candidate.worker_id, &incumbent);
                }
            }

            if !improved {
                break;
            }
        }

        if outcome.timed_out {
            info!(
                iterations = outcome.iterations,
                improvements = outcome.improvements,
                elapsed_ms = deadline.elapsed().as_millis() as u64,
                "局部搜索超时,返回当前最优结果"
            );
        } else {
            info!(
                iterations = outcome.iterations,
                improvements = outcome.improvements,
                score = current,
                "局部搜索完成"
            );
        }
        outcome
    }

    fn substitution_allowed(
        &self,
        state: &SolveState,
        options: &OptimizeOptions,
        candidate: &Worker,
        requirement: &PositionRequirement,
        responsible_slot: bool,
    ) -> bool {
        if state.schedule.is_booked(&candidate.worker_id, requirement.date) {
            return false;
        }
        if responsible_slot && !candidate.is_responsible {
            return false;
        }
        candidate.has_all_tags(&requirement.required_tags)
            && state.admits(options.unavailable_policy, candidate, requirement)
    }

    fn reassign(state: &mut SolveState, position: usize, from: &str, to: &str) {
        let assignment = &mut state.working[position].assignment;
        state.schedule.remove(from, assignment.date);
        state.schedule.insert(to, assignment.date, &assignment.duty_code_id);
        assignment.worker_id = to.to_string();
    }

    fn state_score(&self, state: &SolveState) -> f64 {
        let ctx = state.ctx();
        state
            .working
            .iter()
            .filter_map(|w| {
                let a = &w.assignment;
                ctx.duty_times
                    .get(&a.duty_code_id)
                    .map(|range| self.scoring.score(&a.worker_id, a.date, range, &ctx))
            })
            .sum()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::AvailabilityRequest;
    use crate::domain::duty::DutyTimeRange;
    use crate::domain::types::RequestType;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn day_requirement(day: u32, location: &str, count: i32) -> PositionRequirement {
        PositionRequirement::new(d(day), location, "DAY", DutyTimeRange::from_hm(8, 0, 16, 0), count)
    }

    #[test]
    fn test_greedy_orders_responsible_and_tagged_first() {
        // 唯一的责任人 + radio 人员必须留给要求最严的需求
        let requirements = vec![
            day_requirement(10, "Plain", 1),
            day_requirement(10, "Radio", 1).with_tag("radio"),
            day_requirement(10, "Lead", 1).with_responsible(),
        ];
        let workers = vec![
            Worker::new("LEAD").responsible().with_tag("radio"),
            Worker::new("RADIO").with_tag("radio"),
            Worker::new("PLAIN"),
        ];
        let problem = RosterProblem::new(requirements, workers, vec![]);

        let result = RosterOptimizer::default().optimize(&problem, &OptimizeOptions::greedy_only());
        assert!(result.validation.is_valid, "{:?}", result.validation.errors);

        let by_location: HashMap<&str, &str> = result
            .assignments
            .iter()
            .map(|a| (a.location_id.as_str(), a.worker_id.as_str()))
            .collect();
        assert_eq!(by_location["Lead"], "LEAD");
        assert_eq!(by_location["Radio"], "RADIO");
        assert_eq!(by_location["Plain"], "PLAIN");
    }

    #[test]
    fn test_zero_timeout_leaves_requirements_unfilled() {
        let problem = RosterProblem::new(
            vec![day_requirement(10, "LocA", 1)],
            vec![Worker::new("W1")],
            vec![],
        );
        let options = OptimizeOptions {
            timeout_ms: 0,
            ..OptimizeOptions::default()
        };

        let result = RosterOptimizer::default().optimize(&problem, &options);
        assert!(result.assignments.is_empty());
        assert!(result.stats.timed_out);
        assert!(!result.validation.is_valid);
        assert!(result.validation.errors[0].starts_with("STAFF_SHORTFALL"));
    }

    #[test]
    fn test_exclude_policy_never_assigns_unavailable_worker() {
        let problem = RosterProblem::new(
            vec![day_requirement(10, "LocA", 2)],
            vec![Worker::new("W1"), Worker::new("W2")],
            vec![AvailabilityRequest::new("W1", d(10), RequestType::Unavailable)],
        );

        let result = RosterOptimizer::default().optimize(&problem, &OptimizeOptions::default());
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.assignments[0].worker_id, "W2");
        assert!(!result.validation.is_valid);
    }

    #[test]
    fn test_penalize_policy_uses_unavailable_as_last_resort() {
        let problem = RosterProblem::new(
            vec![day_requirement(10, "LocA", 2)],
            vec![Worker::new("W1"), Worker::new("W2")],
            vec![AvailabilityRequest::new("W1", d(10), RequestType::Unavailable)],
        );
        let options = OptimizeOptions {
            unavailable_policy: UnavailablePolicy::Penalize,
            ..OptimizeOptions::default()
        };

        let result = RosterOptimizer::default().optimize(&problem, &options);
        assert_eq!(result.assignments.len(), 2);
        assert!(result.validation.is_valid);
        assert_eq!(result.total_score, -20.0);
    }

    #[test]
    fn test_local_search_never_lowers_score() {
        let mut requirements = Vec::new();
        for day in 1..=10 {
            requirements.push(day_requirement(day, "LocA", 1));
        }
        let workers = vec![Worker::new("W1"), Worker::new("W2"), Worker::new("W3")];
        let availability = vec![
            AvailabilityRequest::new("W3", d(4), RequestType::Available),
            AvailabilityRequest::new("W2", d(5), RequestType::Unavailable),
        ];
        let problem = RosterProblem::new(requirements, workers, availability);

        let result = RosterOptimizer::default().optimize(&problem, &OptimizeOptions::default());
        assert!(result.total_score >= result.greedy_score);
        assert_eq!(
            result.total_score,
            RosterOptimizer::default().total_score(&problem, &result.assignments)
        );
    }

    #[test]
    fn test_partial_keeps_assignments_outside_filter() {
        let requirements = vec![day_requirement(10, "LocA", 1), day_requirement(10, "LocB", 1)];
        let workers = vec![Worker::new("W1"), Worker::new("W2")];
        let problem = RosterProblem::new(requirements.clone(), workers, vec![]);
        let existing = vec![
            Assignment::for_requirement(&requirements[0], "W1", false, "MANUAL"),
            Assignment::for_requirement(&requirements[1], "W2", false, "MANUAL"),
        ];

        let filter = PartialFilter::default().with_locations(["LocB"]);
        let result = RosterOptimizer::default().optimize_partial(
            &problem,
            &existing,
            &filter,
            &OptimizeOptions::default(),
        );

        assert!(result.validation.is_valid);
        assert!(result.assignments.contains(&existing[0]));
        let loc_b: Vec<&Assignment> = result
            .assignments
            .iter()
            .filter(|a| a.location_id == "LocB")
            .collect();
        assert_eq!(loc_b.len(), 1);
        assert_eq!(loc_b[0].worker_id, "W2");
    }
}
