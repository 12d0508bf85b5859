// ==========================================
// 排班优化引擎 - 引擎层
// ==========================================
// 职责: 约束判定、候选评分、两阶段求解、满足度校验
// 红线: 引擎不做 I/O, 所有拒绝/扣分必须输出 reason
// ==========================================

pub mod constraint;
pub mod deadline;
pub mod fulfillment;
pub mod optimizer;
pub mod report;
pub mod schedule_index;
pub mod scoring;

// 重导出核心引擎
pub use constraint::{AssignCheck, CandidateScorer, ConstraintModel, FulfillmentCheck, StaffSelection};
pub use deadline::Deadline;
pub use fulfillment::FulfillmentValidator;
pub use optimizer::RosterOptimizer;
pub use report::{OptimizationResult, OptimizationStats, StatsCollector};
pub use schedule_index::{DutyTimeTable, ScheduleIndex};
pub use scoring::{ScoreBreakdown, ScoringContext, ScoringEngine};
