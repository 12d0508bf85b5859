// ==========================================
// 排班优化引擎 - 领域模型层
// ==========================================
// 职责: 定义人员、岗位需求、出勤申请、排班结果与校验报告
// 红线: 不含求解逻辑,不含 I/O
// ==========================================

pub mod assignment;
pub mod availability;
pub mod duty;
pub mod problem;
pub mod requirement;
pub mod types;
pub mod validation;
pub mod worker;

// 重导出核心类型
pub use assignment::{assign_reason, Assignment};
pub use availability::{AvailabilityBook, AvailabilityRequest};
pub use duty::{DutyCode, DutyTimeRange, MINUTES_PER_DAY};
pub use problem::{PartialFilter, RosterProblem};
pub use requirement::{PositionRequirement, SlotKey};
pub use types::{RequestType, TimeBand};
pub use validation::{RequirementFulfillment, ValidationReport};
pub use worker::Worker;
