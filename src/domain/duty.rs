// ==========================================
// 排班优化引擎 - 勤务代码与时间区间
// ==========================================
// 职责: 勤务时间区间值类型(分钟制) + 勤务代码主数据
// 红线: 跨夜折返计算只在本模块实现,评分与外部薪资计算共用
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

// ==========================================
// DutyTimeRange - 勤务时间区间
// ==========================================
// start/end 为当日分钟数 [0, 1440); overnight=true 表示结束于次日
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DutyTimeRange {
    pub start_minute: u32,
    pub end_minute: u32,
    #[serde(default)]
    pub overnight: bool,
}

impl DutyTimeRange {
    /// 构造时间区间
    ///
    /// end_minute <= start_minute 时自动视为跨夜
    pub fn new(start_minute: u32, end_minute: u32) -> Self {
        Self {
            start_minute,
            end_minute,
            overnight: end_minute <= start_minute,
        }
    }

    /// 按 时:分 构造
    pub fn from_hm(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Self {
        Self::new(start_hour * 60 + start_min, end_hour * 60 + end_min)
    }

    /// 解析 "HH:MM-HH:MM" 格式
    ///
    /// # 示例
    /// ```
    /// use duty_roster::domain::DutyTimeRange;
    /// let range = DutyTimeRange::parse("22:00-06:00").unwrap();
    /// assert!(range.overnight);
    /// assert_eq!(range.duration_minutes(), 480);
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("时间区间格式错误: {}", s))?;
        let start_minute = parse_hhmm(start)?;
        let end_minute = parse_hhmm(end)?;
        Ok(Self::new(start_minute, end_minute))
    }

    /// 区间字段是否合法
    pub fn is_well_formed(&self) -> bool {
        self.start_minute < MINUTES_PER_DAY
            && self.end_minute <= MINUTES_PER_DAY
            && (self.overnight || self.end_minute > self.start_minute)
    }

    /// 开始小时 (0-23)
    pub fn start_hour(&self) -> u32 {
        self.start_minute / 60
    }

    /// 是否为夜班: 开始时间 >= 阈值小时 或 显式跨夜
    pub fn is_night_start(&self, night_start_hour: u32) -> bool {
        self.overnight || self.start_hour() >= night_start_hour
    }

    /// 以开始日零点为基准的结束分钟数 (跨夜时 > 1440)
    pub fn absolute_end_minute(&self) -> u32 {
        if self.overnight {
            self.end_minute + MINUTES_PER_DAY
        } else {
            self.end_minute
        }
    }

    /// 时长(分钟),跨夜折返
    pub fn duration_minutes(&self) -> u32 {
        self.absolute_end_minute().saturating_sub(self.start_minute)
    }

    /// 与另一时间窗口的重叠分钟数 (双方均可跨夜)
    ///
    /// 窗口按本区间开始日及其前一日、后一日展开比较,
    /// 可直接用于夜间津贴窗口 (如 22:00-05:00) 的计时。
    pub fn overlap_minutes(&self, window: &DutyTimeRange) -> u32 {
        let (start, end) = (self.start_minute as i64, self.absolute_end_minute() as i64);
        let day = MINUTES_PER_DAY as i64;

        [-day, 0, day]
            .iter()
            .map(|offset| {
                let w_start = window.start_minute as i64 + offset;
                let w_end = window.absolute_end_minute() as i64 + offset;
                (end.min(w_end) - start.max(w_start)).max(0)
            })
            .sum::<i64>() as u32
    }
}

impl fmt::Display for DutyTimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_minute / 60,
            self.start_minute % 60,
            (self.end_minute / 60) % 24,
            self.end_minute % 60
        )
    }
}

fn parse_hhmm(s: &str) -> Result<u32, String> {
    let (h, m) = s
        .trim()
        .split_once(':')
        .ok_or_else(|| format!("时间格式错误: {}", s))?;
    let hour: u32 = h.parse().map_err(|_| format!("小时无效: {}", h))?;
    let minute: u32 = m.parse().map_err(|_| format!("分钟无效: {}", m))?;
    if hour > 24 || minute >= 60 || (hour == 24 && minute > 0) {
        return Err(format!("时间超出范围: {}", s));
    }
    Ok(hour * 60 + minute)
}

// ==========================================
// DutyCode - 勤务代码
// ==========================================
// 用途: 解析既有排班记录的勤务时间(夜班相邻判定需要前一日班次时间)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyCode {
    pub duty_code_id: String,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    pub time_range: DutyTimeRange,
}

impl DutyCode {
    pub fn new(duty_code_id: impl Into<String>, code: impl Into<String>, time_range: DutyTimeRange) -> Self {
        Self {
            duty_code_id: duty_code_id.into(),
            code: code.into(),
            name: None,
            time_range,
        }
    }
}
