// ==========================================
// 排班优化引擎 - 核心库
// ==========================================
// 技术栈: Rust + serde + tracing
// 系统定位: 决策支持 (求解结果经人工复核后提交)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 约束/评分/求解/校验
pub mod engine;

// 配置层 - 评分权重与求解参数
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 对外接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RequestType, TimeBand};

// 领域实体
pub use domain::{
    Assignment, AvailabilityRequest, DutyCode, DutyTimeRange, PartialFilter, PositionRequirement,
    RequirementFulfillment, RosterProblem, SlotKey, ValidationReport, Worker,
};

// 引擎
pub use engine::{
    ConstraintModel, FulfillmentValidator, OptimizationResult, OptimizationStats, RosterOptimizer,
    ScoringEngine,
};

// 配置
pub use config::{ConfigManager, OptimizeOptions, RosterConfigReader, ScoringWeights, UnavailablePolicy};

// API
pub use api::{ApiError, ApiResult, RosterApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "排班优化引擎";
