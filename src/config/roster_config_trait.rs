// ==========================================
// 排班优化引擎 - 配置读取 Trait
// ==========================================
// 职责: 定义求解所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::optimizer_config::OptimizeOptions;
use crate::config::scoring_profile::ScoringWeights;

// ==========================================
// RosterConfigReader Trait
// ==========================================
// 实现者: ConfigManager（内存 key-value，可由 JSON 文件加载）
pub trait RosterConfigReader: Send + Sync {
    /// 获取评分权重
    ///
    /// # 默认值
    /// - ScoringWeights::default()
    fn get_scoring_weights(&self) -> anyhow::Result<ScoringWeights>;

    /// 获取默认求解参数（调用方未显式传入时使用）
    ///
    /// # 默认值
    /// - OptimizeOptions::default()，再叠加环境变量覆写
    fn get_optimize_options(&self) -> anyhow::Result<OptimizeOptions>;
}
