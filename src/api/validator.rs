// ==========================================
// 排班优化引擎 - 输入校验器
// ==========================================
// 职责: 求解前对输入做格式与交叉引用校验
// 规则: 收集全部违规并逐条记录日志,返回第一条作为错误
// 红线: 输入错误立即失败,不做部分恢复
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::assignment::Assignment;
use crate::domain::duty::{DutyCode, DutyTimeRange};
use crate::domain::problem::{PartialFilter, RosterProblem};
use crate::domain::requirement::{PositionRequirement, SlotKey};
use crate::engine::schedule_index::DutyTimeTable;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::warn;

// ==========================================
// Violations - 违规收集器
// ==========================================
#[derive(Default)]
struct Violations {
    items: Vec<ApiError>,
}

impl Violations {
    fn push(&mut self, err: ApiError) {
        self.items.push(err);
    }

    fn finish(self, stage: &str) -> ApiResult<()> {
        if self.items.is_empty() {
            return Ok(());
        }
        for (idx, err) in self.items.iter().enumerate() {
            warn!(stage, index = idx, total = self.items.len(), "输入校验失败: {}", err);
        }
        match self.items.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(()),
        }
    }
}

// ==========================================
// InputValidator - 输入校验器 (无状态)
// ==========================================
pub struct InputValidator;

impl InputValidator {
    /// 校验求解输入
    ///
    /// # 检查项
    /// 1. 人员: ID 非空、不重复
    /// 2. 勤务代码目录: ID 非空、不重复、时间区间合法
    /// 3. 需求: ID 非空、人数非负、时间区间合法、岗位不重复、与目录一致
    ///    (目录为空时同一勤务代码的时间区间须一致)
    /// 4. 出勤申请: 人员存在、每人每日至多一条
    pub fn validate_problem(problem: &RosterProblem) -> ApiResult<()> {
        let mut violations = Violations::default();
        Self::check_problem(problem, &mut violations);
        violations.finish("problem")
    }

    /// 校验局部重排输入 (在 validate_problem 之外追加已有排班与范围检查)
    pub fn validate_partial(
        problem: &RosterProblem,
        existing: &[Assignment],
        filter: &PartialFilter,
    ) -> ApiResult<()> {
        let mut violations = Violations::default();
        Self::check_problem(problem, &mut violations);

        if let Some((from, to)) = filter.date_range {
            if from > to {
                violations.push(ApiError::invalid_input(
                    "filter.date_range",
                    format!("起始日期 {} 晚于结束日期 {}", from, to),
                ));
            }
        }

        let worker_ids: HashSet<&str> = problem.workers.iter().map(|w| w.worker_id.as_str()).collect();
        let duty_times = DutyTimeTable::build(&problem.duty_codes, &problem.requirements);
        Self::check_assignments(existing, &mut violations);
        for (idx, assignment) in existing.iter().enumerate() {
            let record = format!("existing[{}]", idx);
            if !assignment.worker_id.is_empty() && !worker_ids.contains(assignment.worker_id.as_str()) {
                violations.push(ApiError::unknown_reference("Worker", &assignment.worker_id, &record));
            }
            if !assignment.duty_code_id.is_empty() && !duty_times.contains(&assignment.duty_code_id) {
                violations.push(ApiError::unknown_reference(
                    "DutyCode",
                    &assignment.duty_code_id,
                    &record,
                ));
            }
        }

        violations.finish("partial")
    }

    /// 校验待复核的需求与排班 (不依赖名册)
    pub fn validate_schedule(
        requirements: &[PositionRequirement],
        assignments: &[Assignment],
    ) -> ApiResult<()> {
        let mut violations = Violations::default();
        Self::check_requirements(requirements, &[], &mut violations);
        for (idx, assignment) in assignments.iter().enumerate() {
            Self::check_assignment_fields(idx, "assignment", assignment, &mut violations);
        }
        violations.finish("schedule")
    }

    fn check_problem(problem: &RosterProblem, violations: &mut Violations) {
        // 1. 人员
        let mut worker_ids = HashSet::new();
        for (idx, worker) in problem.workers.iter().enumerate() {
            if worker.worker_id.trim().is_empty() {
                violations.push(ApiError::invalid_input(format!("worker[{}]", idx), "worker_id 为空"));
            } else if !worker_ids.insert(worker.worker_id.as_str()) {
                violations.push(ApiError::duplicate_id("Worker", &worker.worker_id));
            }
        }

        // 2. 勤务代码目录
        Self::check_duty_codes(&problem.duty_codes, violations);

        // 3. 需求
        Self::check_requirements(&problem.requirements, &problem.duty_codes, violations);

        // 4. 出勤申请
        let mut seen: HashSet<(&str, NaiveDate)> = HashSet::new();
        for (idx, request) in problem.availability.iter().enumerate() {
            let record = format!("availability[{}]", idx);
            if !worker_ids.contains(request.worker_id.as_str()) {
                violations.push(ApiError::unknown_reference("Worker", &request.worker_id, &record));
            }
            if !seen.insert((request.worker_id.as_str(), request.date)) {
                violations.push(ApiError::duplicate_id(
                    "AvailabilityRequest",
                    format!("{}/{}", request.worker_id, request.date),
                ));
            }
        }
    }

    fn check_duty_codes(duty_codes: &[DutyCode], violations: &mut Violations) {
        let mut ids = HashSet::new();
        for (idx, duty_code) in duty_codes.iter().enumerate() {
            let record = format!("duty_code[{}]", idx);
            if duty_code.duty_code_id.trim().is_empty() {
                violations.push(ApiError::invalid_input(&record, "duty_code_id 为空"));
                continue;
            }
            if !ids.insert(duty_code.duty_code_id.as_str()) {
                violations.push(ApiError::duplicate_id("DutyCode", &duty_code.duty_code_id));
            }
            if !duty_code.time_range.is_well_formed() {
                violations.push(ApiError::invalid_input(
                    &record,
                    format!("时间区间不合法: {:?}", duty_code.time_range),
                ));
            }
        }
    }

    fn check_requirements(
        requirements: &[PositionRequirement],
        duty_codes: &[DutyCode],
        violations: &mut Violations,
    ) {
        let catalog: HashMap<&str, &DutyCode> = duty_codes
            .iter()
            .map(|dc| (dc.duty_code_id.as_str(), dc))
            .collect();
        let mut slots: HashSet<SlotKey> = HashSet::new();
        let mut first_ranges: HashMap<&str, (usize, &DutyTimeRange)> = HashMap::new();

        for (idx, requirement) in requirements.iter().enumerate() {
            let record = format!("requirement[{}]", idx);

            if requirement.location_id.trim().is_empty() {
                violations.push(ApiError::invalid_input(&record, "location_id 为空"));
            }
            if requirement.duty_code_id.trim().is_empty() {
                violations.push(ApiError::invalid_input(&record, "duty_code_id 为空"));
            }
            if requirement.required_count < 0 {
                violations.push(ApiError::invalid_input(
                    &record,
                    format!("required_count 不能为负: {}", requirement.required_count),
                ));
            }
            if !requirement.time_range.is_well_formed() {
                violations.push(ApiError::invalid_input(
                    &record,
                    format!("时间区间不合法: {:?}", requirement.time_range),
                ));
            }
            if !slots.insert(requirement.slot_key()) {
                violations.push(ApiError::duplicate_id(
                    "PositionRequirement",
                    requirement.slot_key().to_string(),
                ));
            }

            // 目录为空时,同一勤务代码在各需求中的时间区间必须一致
            if catalog.is_empty() {
                let (first_idx, first_range) = *first_ranges
                    .entry(requirement.duty_code_id.as_str())
                    .or_insert((idx, &requirement.time_range));
                if *first_range != requirement.time_range {
                    violations.push(ApiError::invalid_input(
                        &record,
                        format!(
                            "勤务代码 {} 的时间区间 {} 与 requirement[{}] 的 {} 不一致",
                            requirement.duty_code_id, requirement.time_range, first_idx, first_range
                        ),
                    ));
                }
                continue;
            }

            // 目录非空时,需求的勤务代码必须在目录中且时间一致
            match catalog.get(requirement.duty_code_id.as_str()) {
                None => violations.push(ApiError::unknown_reference(
                    "DutyCode",
                    &requirement.duty_code_id,
                    &record,
                )),
                Some(duty_code) if duty_code.time_range != requirement.time_range => {
                    violations.push(ApiError::invalid_input(
                        &record,
                        format!(
                            "时间区间 {} 与勤务代码 {} 的 {} 不一致",
                            requirement.time_range, duty_code.duty_code_id, duty_code.time_range
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
    }

    fn check_assignments(assignments: &[Assignment], violations: &mut Violations) {
        let mut ids = HashSet::new();
        let mut booked: HashSet<(&str, NaiveDate)> = HashSet::new();
        for (idx, assignment) in assignments.iter().enumerate() {
            Self::check_assignment_fields(idx, "existing", assignment, violations);
            if !assignment.assignment_id.is_empty() && !ids.insert(assignment.assignment_id.as_str()) {
                violations.push(ApiError::duplicate_id("Assignment", &assignment.assignment_id));
            }
            if !booked.insert((assignment.worker_id.as_str(), assignment.date)) {
                violations.push(ApiError::invalid_input(
                    format!("existing[{}]", idx),
                    format!(
                        "worker={} 在 {} 已有其他排班",
                        assignment.worker_id, assignment.date
                    ),
                ));
            }
        }
    }

    fn check_assignment_fields(idx: usize, prefix: &str, assignment: &Assignment, violations: &mut Violations) {
        let record = format!("{}[{}]", prefix, idx);
        for (field, value) in [
            ("assignment_id", &assignment.assignment_id),
            ("worker_id", &assignment.worker_id),
            ("location_id", &assignment.location_id),
            ("duty_code_id", &assignment.duty_code_id),
        ] {
            if value.trim().is_empty() {
                violations.push(ApiError::invalid_input(&record, format!("{} 为空", field)));
            }
        }
    }
}
