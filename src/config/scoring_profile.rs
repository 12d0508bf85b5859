use crate::domain::types::TimeBand;
use serde::{Deserialize, Serialize};

/// 评分权重（可通过配置文件覆写，未设置的字段取默认值）
///
/// 配置键：scoring/weights（JSON 对象）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// 当日申请 AVAILABLE 的加分
    pub available_bonus: f64,

    /// 当日申请 UNAVAILABLE 的扣分（软约束，是否硬排除由 UnavailablePolicy 决定）
    pub unavailable_penalty: f64,

    /// 时段偏好命中加分
    pub time_band_match_bonus: f64,

    /// 时段偏好未命中扣分
    pub time_band_mismatch_penalty: f64,

    /// 前一日为夜班时的扣分
    pub night_adjacency_penalty: f64,

    /// 夜班判定小时（开始时间 >= 该小时即视为夜班）
    pub night_start_hour: u32,

    /// 连续出勤免罚天数（含候选日）
    pub consecutive_free_days: u32,

    /// 连续出勤轻度区间上限（free_days+1 ..= soft_limit 扣 moderate 分）
    pub consecutive_soft_limit: u32,

    /// 轻度区间扣分
    pub consecutive_moderate_penalty: f64,

    /// 超过 soft_limit 后每多一天的扣分
    pub consecutive_excess_penalty_per_day: f64,

    /// 月累计天数与名册平均值的容差（天）
    pub fairness_gap_days: f64,

    /// 低于平均值时的加分 / 高于平均值时的扣分幅度
    pub fairness_adjustment: f64,

    /// 时段阈值
    pub time_bands: TimeBandThresholds,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            available_bonus: 10.0,
            unavailable_penalty: -20.0,
            time_band_match_bonus: 5.0,
            time_band_mismatch_penalty: -3.0,
            night_adjacency_penalty: -10.0,
            night_start_hour: 19,
            consecutive_free_days: 3,
            consecutive_soft_limit: 5,
            consecutive_moderate_penalty: -5.0,
            consecutive_excess_penalty_per_day: -15.0,
            fairness_gap_days: 2.0,
            fairness_adjustment: 3.0,
            time_bands: TimeBandThresholds::default(),
        }
    }
}

/// 时段阈值（开始小时）
///
/// - PRE_DAWN: [0, morning_start)
/// - MORNING: [morning_start, afternoon_start)
/// - AFTERNOON: [afternoon_start, evening_start)
/// - EVENING: [evening_start, 24)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeBandThresholds {
    pub morning_start: u32,
    pub afternoon_start: u32,
    pub evening_start: u32,
}

impl Default for TimeBandThresholds {
    fn default() -> Self {
        Self {
            morning_start: 6,
            afternoon_start: 12,
            evening_start: 17,
        }
    }
}

impl TimeBandThresholds {
    pub fn band_for_hour(&self, start_hour: u32) -> TimeBand {
        if start_hour < self.morning_start {
            TimeBand::PreDawn
        } else if start_hour < self.afternoon_start {
            TimeBand::Morning
        } else if start_hour < self.evening_start {
            TimeBand::Afternoon
        } else {
            TimeBand::Evening
        }
    }

    /// 阈值须严格递增且落在 (0, 24)
    pub fn is_ordered(&self) -> bool {
        0 < self.morning_start
            && self.morning_start < self.afternoon_start
            && self.afternoon_start < self.evening_start
            && self.evening_start < 24
    }
}
