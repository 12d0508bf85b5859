// ==========================================
// 排班优化引擎 - 领域类型定义
// ==========================================
// 职责: 申请类型、时段枚举等基础值类型
// 序列化格式: SCREAMING_SNAKE_CASE (与上游接口一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 时段 (Time Band)
// ==========================================
// 按班次开始小时划分,阈值见 config::TimeBandThresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeBand {
    PreDawn,   // 凌晨
    Morning,   // 上午
    Afternoon, // 下午
    Evening,   // 晚间
}

impl fmt::Display for TimeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBand::PreDawn => write!(f, "PRE_DAWN"),
            TimeBand::Morning => write!(f, "MORNING"),
            TimeBand::Afternoon => write!(f, "AFTERNOON"),
            TimeBand::Evening => write!(f, "EVENING"),
        }
    }
}

impl FromStr for TimeBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "PRE_DAWN" | "PREDAWN" => Ok(TimeBand::PreDawn),
            "MORNING" => Ok(TimeBand::Morning),
            "AFTERNOON" => Ok(TimeBand::Afternoon),
            "EVENING" => Ok(TimeBand::Evening),
            other => Err(format!("未知时段: {}", other)),
        }
    }
}

// ==========================================
// 出勤申请类型 (Request Type)
// ==========================================
// 每人每日至多一条,由外部收集流程提交
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "band", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Available,                    // 可出勤
    Unavailable,                  // 不可出勤(软约束)
    TimeBandPreference(TimeBand), // 时段偏好
}

impl RequestType {
    /// 是否计入偏好满足率统计 (仅 AVAILABLE / UNAVAILABLE)
    pub fn counts_toward_fulfillment(&self) -> bool {
        matches!(self, RequestType::Available | RequestType::Unavailable)
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::Available => write!(f, "AVAILABLE"),
            RequestType::Unavailable => write!(f, "UNAVAILABLE"),
            RequestType::TimeBandPreference(band) => write!(f, "TIME_BAND_PREFERENCE({})", band),
        }
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_band_from_str() {
        assert_eq!("pre-dawn".parse::<TimeBand>().unwrap(), TimeBand::PreDawn);
        assert_eq!("EVENING".parse::<TimeBand>().unwrap(), TimeBand::Evening);
        assert!("noon".parse::<TimeBand>().is_err());
    }

    #[test]
    fn test_request_type_serde() {
        let pref = RequestType::TimeBandPreference(TimeBand::Morning);
        let json = serde_json::to_string(&pref).unwrap();
        assert_eq!(json, r#"{"type":"TIME_BAND_PREFERENCE","band":"MORNING"}"#);

        let parsed: RequestType = serde_json::from_str(r#"{"type":"UNAVAILABLE"}"#).unwrap();
        assert_eq!(parsed, RequestType::Unavailable);
    }

    #[test]
    fn test_counts_toward_fulfillment() {
        assert!(RequestType::Available.counts_toward_fulfillment());
        assert!(RequestType::Unavailable.counts_toward_fulfillment());
        assert!(!RequestType::TimeBandPreference(TimeBand::Evening).counts_toward_fulfillment());
    }
}
