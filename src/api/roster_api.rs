// ==========================================
// 排班优化引擎 - 排班 API
// ==========================================
// 职责: 输入校验 → 读取评分配置 → 调用求解器 → 返回结果
// 红线: 输入错误立即返回 Err;缺员只进入 ValidationReport
// ==========================================

use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::InputValidator;
use crate::config::optimizer_config::OptimizeOptions;
use crate::config::roster_config_trait::RosterConfigReader;
use crate::domain::assignment::Assignment;
use crate::domain::problem::{PartialFilter, RosterProblem};
use crate::domain::requirement::PositionRequirement;
use crate::domain::validation::ValidationReport;
use crate::engine::fulfillment::FulfillmentValidator;
use crate::engine::optimizer::RosterOptimizer;
use crate::engine::report::OptimizationResult;

// ==========================================
// RosterApi - 排班 API
// ==========================================

/// 排班API
///
/// 职责：
/// 1. 全量求解 / 局部重排
/// 2. 排班复核
///
/// 每次调用独立读取配置并创建求解器，多线程并发调用互不影响
pub struct RosterApi<C>
where
    C: RosterConfigReader,
{
    config: Arc<C>,
}

impl<C> RosterApi<C>
where
    C: RosterConfigReader,
{
    pub fn new(config: Arc<C>) -> Self {
        Self { config }
    }

    /// 配置中的求解参数（含环境变量覆写）
    pub fn default_options(&self) -> ApiResult<OptimizeOptions> {
        self.config
            .get_optimize_options()
            .map_err(|e| ApiError::InvalidConfig(format!("{:#}", e)))
    }

    fn optimizer(&self) -> ApiResult<RosterOptimizer> {
        let weights = self
            .config
            .get_scoring_weights()
            .map_err(|e| ApiError::InvalidConfig(format!("{:#}", e)))?;
        Ok(RosterOptimizer::new(weights))
    }

    /// 全量求解
    ///
    /// # 参数
    /// - problem: 需求 + 名册 + 出勤申请 (+ 可选勤务代码目录)
    /// - options: 求解参数
    ///
    /// # 返回
    /// - Ok(OptimizationResult): 求解结果 (是否可提交以 validation.is_valid 为准)
    /// - Err(ApiError): 输入或配置错误
    #[instrument(skip_all)]
    pub fn optimize(
        &self,
        problem: &RosterProblem,
        options: &OptimizeOptions,
    ) -> ApiResult<OptimizationResult> {
        InputValidator::validate_problem(problem)?;
        let optimizer = self.optimizer()?;
        let result = optimizer.optimize(problem, options);
        info!(
            is_valid = result.validation.is_valid,
            total_score = result.total_score,
            "optimize 完成"
        );
        Ok(result)
    }

    /// 局部重排
    ///
    /// # 参数
    /// - existing: 已有排班 (filter 之外的原样保留)
    /// - filter: 重排范围
    #[instrument(skip_all)]
    pub fn optimize_partial(
        &self,
        problem: &RosterProblem,
        existing: &[Assignment],
        filter: &PartialFilter,
        options: &OptimizeOptions,
    ) -> ApiResult<OptimizationResult> {
        InputValidator::validate_partial(problem, existing, filter)?;
        let optimizer = self.optimizer()?;
        let result = optimizer.optimize_partial(problem, existing, filter, options);
        info!(
            is_valid = result.validation.is_valid,
            total_score = result.total_score,
            "optimize_partial 完成"
        );
        Ok(result)
    }

    /// 复核排班 (如人工编辑后的排班)
    pub fn validate(
        &self,
        requirements: &[PositionRequirement],
        assignments: &[Assignment],
    ) -> ApiResult<ValidationReport> {
        InputValidator::validate_schedule(requirements, assignments)?;
        Ok(FulfillmentValidator::validate(requirements, assignments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_manager::{config_keys, ConfigManager};
    use crate::domain::duty::DutyTimeRange;
    use crate::domain::worker::Worker;
    use chrono::NaiveDate;

    fn problem() -> RosterProblem {
        let requirement = PositionRequirement::new(
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            "LocA",
            "DC1",
            DutyTimeRange::from_hm(8, 0, 16, 0),
            1,
        );
        RosterProblem::new(vec![requirement], vec![Worker::new("W1")], vec![])
    }

    #[test]
    fn test_optimize_with_defaults() {
        let api = RosterApi::new(Arc::new(ConfigManager::new()));
        let options = api.default_options().unwrap();
        let result = api.optimize(&problem(), &options).unwrap();
        assert!(result.validation.is_valid);
        assert_eq!(result.assignments.len(), 1);
    }

    #[test]
    fn test_broken_weights_are_config_error() {
        let manager = ConfigManager::new();
        manager
            .set_config_value(config_keys::SCORING_WEIGHTS, "{not json")
            .unwrap();
        let api = RosterApi::new(Arc::new(manager));

        let err = api
            .optimize(&problem(), &OptimizeOptions::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfig(_)));
    }

    #[test]
    fn test_input_error_before_solving() {
        let api = RosterApi::new(Arc::new(ConfigManager::new()));
        let mut p = problem();
        p.requirements[0].required_count = -2;
        let err = api.optimize(&p, &OptimizeOptions::default()).unwrap_err();
        assert!(err.is_input_error());
    }
}
