// ==========================================
// 排班优化引擎 - 满足度校验
// ==========================================
// 职责: 对排班集合按需求列表复核,输出 ValidationReport
// 输入: 需求列表 + 排班集合 (可为人工编辑后的排班)
// 输出: errors (阻断提交) / warnings (人工复核) / 每条需求的满足度
// 红线: 纯函数,同一输入两次调用结果完全一致
// ==========================================

use crate::domain::assignment::Assignment;
use crate::domain::requirement::{PositionRequirement, SlotKey};
use crate::domain::validation::{RequirementFulfillment, ValidationReport};
use crate::engine::constraint::ConstraintModel;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub struct FulfillmentValidator;

impl FulfillmentValidator {
    /// 生成校验报告
    ///
    /// # 规则
    /// 1. 每条需求: 人数不足 / 缺责任人 → error
    /// 2. 同一人员同日多条排班 → error
    /// 3. 人数超出需求 → warning
    /// 4. 排班不对应任何需求 → warning
    pub fn validate(
        requirements: &[PositionRequirement],
        assignments: &[Assignment],
    ) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut fulfillment = Vec::with_capacity(requirements.len());

        // 1. 按需求复核
        for requirement in requirements {
            let check = ConstraintModel::validate_fulfillment(requirement, assignments);
            errors.extend(check.errors);

            let assigned = check.assigned_count as i32;
            let delta = assigned - requirement.required_count;
            if delta > 0 {
                warnings.push(format!(
                    "OVER_STAFFED: {} 需要 {} 人, 已安排 {} 人",
                    requirement.slot_key(),
                    requirement.required_count,
                    assigned
                ));
            }

            fulfillment.push(RequirementFulfillment {
                slot: requirement.slot_key(),
                required_count: requirement.required_count,
                assigned_count: assigned,
                responsible_count: check.responsible_count as i32,
                delta,
                responsible_covered: !requirement.requires_responsible
                    || check.responsible_count > 0,
            });
        }

        // 2. 重复排班
        let mut per_worker_day: BTreeMap<(&str, NaiveDate), usize> = BTreeMap::new();
        for assignment in assignments {
            *per_worker_day
                .entry((assignment.worker_id.as_str(), assignment.date))
                .or_insert(0) += 1;
        }
        for ((worker_id, date), count) in per_worker_day {
            if count > 1 {
                errors.push(format!(
                    "DOUBLE_BOOKING: worker={} 在 {} 有 {} 条排班",
                    worker_id, date, count
                ));
            }
        }

        // 3. 无对应需求的排班
        let known_slots: HashSet<SlotKey> = requirements.iter().map(|r| r.slot_key()).collect();
        for assignment in assignments {
            if !known_slots.contains(&assignment.slot_key()) {
                warnings.push(format!(
                    "UNMATCHED_ASSIGNMENT: assignment={} ({}) 无对应需求",
                    assignment.assignment_id,
                    assignment.slot_key()
                ));
            }
        }

        debug!(
            requirements = requirements.len(),
            assignments = assignments.len(),
            errors = errors.len(),
            warnings = warnings.len(),
            "满足度校验完成"
        );

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            fulfillment,
        }
    }
}
