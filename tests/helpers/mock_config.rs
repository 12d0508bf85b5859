// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use duty_roster::config::{OptimizeOptions, RosterConfigReader, ScoringWeights};

/// Mock 配置结构
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub weights: ScoringWeights,
    pub options: OptimizeOptions,
    pub fail_weights: bool,
}

impl MockConfig {
    /// 仅贪心构造
    pub fn greedy_only() -> Self {
        Self {
            options: OptimizeOptions::greedy_only(),
            ..Self::default()
        }
    }

    /// 自定义评分权重
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self {
            weights,
            ..Self::default()
        }
    }

    /// 读取评分权重时报错
    pub fn broken() -> Self {
        Self {
            fail_weights: true,
            ..Self::default()
        }
    }
}

impl RosterConfigReader for MockConfig {
    fn get_scoring_weights(&self) -> anyhow::Result<ScoringWeights> {
        if self.fail_weights {
            anyhow::bail!("mock: 评分权重不可用");
        }
        Ok(self.weights.clone())
    }

    fn get_optimize_options(&self) -> anyhow::Result<OptimizeOptions> {
        Ok(self.options.clone())
    }
}
