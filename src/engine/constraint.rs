// ==========================================
// 排班优化引擎 - 约束模型
// ==========================================
// 职责: 判定某人员此刻能否合法填充某需求;单需求多名额选人
// 红线: 纯函数、无副作用;所有拒绝必须输出 reason
// ==========================================
// 硬约束:
// (a) 需求要求责任人 → 人员须具备责任人资格
// (b) 人员技能标签 ⊇ 需求标签
// (c) 人员当日无其他排班 (禁止重复排班)
// ==========================================

use crate::domain::assignment::{assign_reason, Assignment};
use crate::domain::requirement::PositionRequirement;
use crate::domain::worker::Worker;
use crate::engine::schedule_index::ScheduleIndex;
use chrono::NaiveDate;
use serde::Serialize;

// ==========================================
// 判定结果
// ==========================================

/// 单人可排判定结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignCheck {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// 需求满足度判定结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FulfillmentCheck {
    pub valid: bool,
    pub errors: Vec<String>,
    pub assigned_count: usize,
    pub responsible_count: usize,
}

/// 单需求选人结果
#[derive(Debug, Clone)]
pub struct StaffSelection {
    pub selected: Vec<Assignment>,
    pub errors: Vec<String>,
}

// ==========================================
// Trait: CandidateScorer
// ==========================================
// 用途: 选人时的候选评分与准入(如不可出勤策略)
pub trait CandidateScorer {
    /// 候选得分,越高越优
    fn score(&self, worker: &Worker, requirement: &PositionRequirement, schedule: &ScheduleIndex)
        -> f64;

    /// 是否允许作为候选 (硬约束之外的调用方策略)
    fn admits(&self, _worker: &Worker, _requirement: &PositionRequirement) -> bool {
        true
    }
}

impl<F> CandidateScorer for F
where
    F: Fn(&Worker, &PositionRequirement, &ScheduleIndex) -> f64,
{
    fn score(&self, worker: &Worker, requirement: &PositionRequirement, schedule: &ScheduleIndex) -> f64 {
        self(worker, requirement, schedule)
    }
}

// ==========================================
// ProvisionalSet - 选人过程中的临时排班
// ==========================================
// 仅在 select_optimal_staff_multiple 内部存在,结束时整体提交
struct ProvisionalSet {
    generation: u32,
    records: Vec<(u32, Assignment)>,
}

impl ProvisionalSet {
    fn new() -> Self {
        Self {
            generation: 0,
            records: Vec::new(),
        }
    }

    fn push(&mut self, assignment: Assignment) -> u32 {
        self.generation += 1;
        self.records.push((self.generation, assignment));
        self.generation
    }

    fn occupies(&self, worker_id: &str, date: NaiveDate) -> bool {
        self.records
            .iter()
            .any(|(_, a)| a.worker_id == worker_id && a.date == date)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn commit(self) -> Vec<Assignment> {
        self.records.into_iter().map(|(_, a)| a).collect()
    }
}

// ==========================================
// ConstraintModel - 约束模型 (无状态)
// ==========================================
pub struct ConstraintModel;

impl ConstraintModel {
    /// 判定人员能否填充需求
    ///
    /// 三项检查相互独立,全部违规一并返回 (不短路)
    ///
    /// # 参数
    /// - worker: 候选人员
    /// - requirement: 岗位需求
    /// - current_assignments: 当前排班集合
    pub fn can_assign(
        worker: &Worker,
        requirement: &PositionRequirement,
        current_assignments: &[Assignment],
    ) -> AssignCheck {
        let booked = current_assignments
            .iter()
            .any(|a| a.worker_id == worker.worker_id && a.date == requirement.date);
        Self::check(worker, requirement, booked)
    }

    /// 同 can_assign,当日占用通过排班索引查询
    pub fn can_assign_indexed(
        worker: &Worker,
        requirement: &PositionRequirement,
        schedule: &ScheduleIndex,
    ) -> AssignCheck {
        let booked = schedule.is_booked(&worker.worker_id, requirement.date);
        Self::check(worker, requirement, booked)
    }

    fn check(worker: &Worker, requirement: &PositionRequirement, booked: bool) -> AssignCheck {
        let mut errors = Vec::new();

        // (a) 责任人资格
        if requirement.requires_responsible && !worker.is_responsible {
            errors.push(format!(
                "NOT_RESPONSIBLE: worker={} 不具备责任人资格",
                worker.worker_id
            ));
        }

        // (b) 技能标签
        let missing = worker.missing_tags(&requirement.required_tags);
        if !missing.is_empty() {
            errors.push(format!(
                "MISSING_TAGS: worker={}, missing=[{}]",
                worker.worker_id,
                missing.join(",")
            ));
        }

        // (c) 重复排班
        if booked {
            errors.push(format!(
                "DOUBLE_BOOKING: worker={} 在 {} 已有排班",
                worker.worker_id, requirement.date
            ));
        }

        AssignCheck {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// 判定需求满足度
    ///
    /// # 规则
    /// 1. 已排人数 >= 需求人数
    /// 2. 要求责任人时,至少一条排班为责任人名额
    pub fn validate_fulfillment(
        requirement: &PositionRequirement,
        assignments: &[Assignment],
    ) -> FulfillmentCheck {
        let mut assigned_count = 0;
        let mut responsible_count = 0;
        for assignment in assignments.iter().filter(|a| a.belongs_to(requirement)) {
            assigned_count += 1;
            if assignment.is_responsible_slot {
                responsible_count += 1;
            }
        }

        let mut errors = Vec::new();
        if assigned_count < requirement.required_slots() {
            errors.push(format!(
                "STAFF_SHORTFALL: {} 需要 {} 人, 已安排 {} 人",
                requirement.slot_key(),
                requirement.required_count,
                assigned_count
            ));
        }
        if requirement.requires_responsible && responsible_count == 0 {
            errors.push(format!(
                "RESPONSIBLE_SHORTFALL: {} 未安排责任人",
                requirement.slot_key()
            ));
        }

        FulfillmentCheck {
            valid: errors.is_empty(),
            errors,
            assigned_count,
            responsible_count,
        }
    }

    /// 为单条需求选满 required_count 人
    ///
    /// # 规则
    /// 1. 要求责任人时,先选得分最高的合法责任人
    /// 2. 再反复选得分最高的合法人员,直至满员或无候选
    /// 3. 无候选时停止并记录缺员,不突破其他约束
    /// 4. 同分按名册顺序 (先出现者优先)
    ///
    /// # 返回
    /// 选中的排班 (已满足互不重复) + 缺员原因
    pub fn select_optimal_staff_multiple<S: CandidateScorer + ?Sized>(
        requirement: &PositionRequirement,
        roster: &[Worker],
        schedule: &ScheduleIndex,
        scorer: &S,
    ) -> StaffSelection {
        let needed = requirement.required_slots();
        let mut provisional = ProvisionalSet::new();
        let mut errors = Vec::new();

        if needed == 0 {
            return StaffSelection {
                selected: Vec::new(),
                errors,
            };
        }

        if requirement.requires_responsible {
            match Self::best_candidate(requirement, roster, schedule, &provisional, scorer, true) {
                Some(worker) => {
                    provisional.push(Assignment::for_requirement(
                        requirement,
                        &worker.worker_id,
                        true,
                        assign_reason::RESPONSIBLE_FIRST,
                    ));
                }
                None => errors.push(format!(
                    "RESPONSIBLE_SHORTFALL: {} 无可用责任人",
                    requirement.slot_key()
                )),
            }
        }

        while provisional.len() < needed {
            match Self::best_candidate(requirement, roster, schedule, &provisional, scorer, false) {
                Some(worker) => {
                    provisional.push(Assignment::for_requirement(
                        requirement,
                        &worker.worker_id,
                        false,
                        assign_reason::BEST_SCORE,
                    ));
                }
                None => break,
            }
        }

        if provisional.len() < needed {
            errors.push(format!(
                "STAFF_SHORTFALL: {} 需要 {} 人, 仅找到 {} 名合法人员",
                requirement.slot_key(),
                needed,
                provisional.len()
            ));
        }

        StaffSelection {
            selected: provisional.commit(),
            errors,
        }
    }

    fn best_candidate<'r, S: CandidateScorer + ?Sized>(
        requirement: &PositionRequirement,
        roster: &'r [Worker],
        schedule: &ScheduleIndex,
        provisional: &ProvisionalSet,
        scorer: &S,
        responsible_only: bool,
    ) -> Option<&'r Worker> {
        // 非责任人名额不再校验责任人资格
        let relaxed;
        let effective = if responsible_only || !requirement.requires_responsible {
            requirement
        } else {
            relaxed = PositionRequirement {
                requires_responsible: false,
                ..requirement.clone()
            };
            &relaxed
        };

        let mut best: Option<(&Worker, f64)> = None;
        for worker in roster {
            if responsible_only && !worker.is_responsible {
                continue;
            }
            if !scorer.admits(worker, requirement) {
                continue;
            }
            if provisional.occupies(&worker.worker_id, requirement.date) {
                continue;
            }
            if !Self::can_assign_indexed(worker, effective, schedule).valid {
                continue;
            }

            let score = scorer.score(worker, requirement, schedule);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((worker, score)),
            }
        }
        best.map(|(worker, _)| worker)
    }
}
