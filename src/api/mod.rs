// ==========================================
// 排班优化引擎 - API 层
// ==========================================
// 职责: 对外提供 optimize / optimize_partial / validate 接口
// ==========================================

pub mod error;
pub mod roster_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use roster_api::RosterApi;
pub use validator::InputValidator;

use crate::config::config_manager::ConfigManager;
use crate::config::optimizer_config::OptimizeOptions;
use crate::domain::assignment::Assignment;
use crate::domain::problem::{PartialFilter, RosterProblem};
use crate::domain::requirement::PositionRequirement;
use crate::domain::validation::ValidationReport;
use crate::engine::report::OptimizationResult;
use std::sync::Arc;

fn default_api() -> RosterApi<ConfigManager> {
    RosterApi::new(Arc::new(ConfigManager::new()))
}

/// 使用默认评分权重全量求解
pub fn optimize(problem: &RosterProblem, options: &OptimizeOptions) -> ApiResult<OptimizationResult> {
    default_api().optimize(problem, options)
}

/// 使用默认评分权重局部重排
pub fn optimize_partial(
    problem: &RosterProblem,
    existing: &[Assignment],
    filter: &PartialFilter,
    options: &OptimizeOptions,
) -> ApiResult<OptimizationResult> {
    default_api().optimize_partial(problem, existing, filter, options)
}

/// 复核排班
pub fn validate(
    requirements: &[PositionRequirement],
    assignments: &[Assignment],
) -> ApiResult<ValidationReport> {
    default_api().validate(requirements, assignments)
}
