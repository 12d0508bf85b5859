// ==========================================
// 排班优化引擎 - 求解参数
// ==========================================
// 用途: 单次 optimize 调用的运行参数 (局部搜索开关/迭代上限/超时/不可出勤策略)
// ==========================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_LOCAL_SEARCH_ITERATIONS: u32 = 100;

/// 申请 UNAVAILABLE 的人员如何参与候选
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnavailablePolicy {
    /// 不作为候选（评分中的扣分仍然保留）
    Exclude,
    /// 仅按评分扣分，无其他候选时仍可被选中
    Penalize,
}

impl Default for UnavailablePolicy {
    fn default() -> Self {
        UnavailablePolicy::Exclude
    }
}

impl std::str::FromStr for UnavailablePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EXCLUDE" => Ok(UnavailablePolicy::Exclude),
            "PENALIZE" => Ok(UnavailablePolicy::Penalize),
            other => Err(format!("未知不可出勤策略: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeOptions {
    pub apply_local_search: bool,
    pub max_local_search_iterations: u32,
    pub timeout_ms: u64,
    pub unavailable_policy: UnavailablePolicy,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            apply_local_search: true,
            max_local_search_iterations: DEFAULT_MAX_LOCAL_SEARCH_ITERATIONS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            unavailable_policy: UnavailablePolicy::default(),
        }
    }
}

impl OptimizeOptions {
    /// 仅贪心构造
    pub fn greedy_only() -> Self {
        Self {
            apply_local_search: false,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
