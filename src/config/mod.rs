// ==========================================
// 排班优化引擎 - 配置层
// ==========================================
// 职责: 评分权重、求解参数的加载与覆写
// 存储: 内存 key-value (JSON 文件/环境变量)
// ==========================================

pub mod config_manager;
pub mod optimizer_config;
pub mod roster_config_trait;
pub mod scoring_profile;

// 重导出核心配置管理器
pub use config_manager::{config_keys, env_keys, ConfigManager};
pub use optimizer_config::{OptimizeOptions, UnavailablePolicy};
pub use roster_config_trait::RosterConfigReader;
pub use scoring_profile::{ScoringWeights, TimeBandThresholds};
