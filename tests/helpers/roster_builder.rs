// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{Duration, NaiveDate};
use duty_roster::domain::{
    AvailabilityRequest, DutyCode, DutyTimeRange, PositionRequirement, RequestType, RosterProblem,
    TimeBand, Worker,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 场景默认日期 2025-01-10
pub fn scenario_date() -> NaiveDate {
    date(2025, 1, 10)
}

pub fn day_shift() -> DutyTimeRange {
    DutyTimeRange::from_hm(8, 0, 16, 0)
}

pub fn night_shift() -> DutyTimeRange {
    DutyTimeRange::from_hm(22, 0, 6, 0)
}

/// 勤务代码目录: DAY 08-16 / EVE 16-22 / NIGHT 22-06
pub fn duty_catalog() -> Vec<DutyCode> {
    vec![
        DutyCode::new("DAY", "D", day_shift()),
        DutyCode::new("EVE", "E", DutyTimeRange::from_hm(16, 0, 22, 0)),
        DutyCode::new("NIGHT", "N", night_shift()),
    ]
}

// ==========================================
// PositionRequirement 构建器
// ==========================================

pub struct RequirementBuilder {
    requirement: PositionRequirement,
}

impl RequirementBuilder {
    pub fn new(date: NaiveDate, location_id: &str, duty_code_id: &str) -> Self {
        Self {
            requirement: PositionRequirement::new(date, location_id, duty_code_id, day_shift(), 1),
        }
    }

    pub fn count(mut self, count: i32) -> Self {
        self.requirement.required_count = count;
        self
    }

    pub fn time(mut self, range: DutyTimeRange) -> Self {
        self.requirement.time_range = range;
        self
    }

    pub fn responsible(mut self) -> Self {
        self.requirement.requires_responsible = true;
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.requirement.required_tags.insert(tag.to_string());
        self
    }

    pub fn build(self) -> PositionRequirement {
        self.requirement
    }
}

// ==========================================
// 随机场景 (性质测试)
// ==========================================

const TAGS: [&str; 3] = ["radio", "first_aid", "driver"];

/// 按种子生成随机排班问题
///
/// - 名册 4~12 人,约 1/3 为责任人,随机技能标签
/// - 3~7 天 × 1~3 个地点 × 勤务代码目录
/// - 约 20% 的 (人员, 日期) 带出勤申请
pub fn random_problem(seed: u64) -> RosterProblem {
    let mut rng = StdRng::seed_from_u64(seed);
    let catalog = duty_catalog();

    let worker_count = rng.random_range(4..=12);
    let mut workers = Vec::with_capacity(worker_count);
    for idx in 0..worker_count {
        let mut worker = Worker::new(format!("W{:02}", idx));
        if rng.random_bool(0.35) {
            worker = worker.responsible();
        }
        for tag in TAGS {
            if rng.random_bool(0.4) {
                worker = worker.with_tag(tag);
            }
        }
        workers.push(worker);
    }

    let start = date(2025, 1, 1) + Duration::days(rng.random_range(0..25));
    let days = rng.random_range(3..=7);
    let locations = rng.random_range(1..=3);
    let mut requirements = Vec::new();
    for offset in 0..days {
        let day = start + Duration::days(offset);
        for loc in 0..locations {
            for duty_code in &catalog {
                if !rng.random_bool(0.6) {
                    continue;
                }
                let mut requirement = PositionRequirement::new(
                    day,
                    format!("Loc{}", loc),
                    duty_code.duty_code_id.clone(),
                    duty_code.time_range,
                    rng.random_range(0..=3),
                );
                if rng.random_bool(0.3) {
                    requirement = requirement.with_responsible();
                }
                if rng.random_bool(0.25) {
                    requirement = requirement.with_tag(TAGS[rng.random_range(0..TAGS.len())]);
                }
                requirements.push(requirement);
            }
        }
    }

    let mut availability = Vec::new();
    for worker in &workers {
        for offset in 0..days {
            if !rng.random_bool(0.2) {
                continue;
            }
            let request_type = match rng.random_range(0..3) {
                0 => RequestType::Available,
                1 => RequestType::Unavailable,
                _ => RequestType::TimeBandPreference(match rng.random_range(0..4) {
                    0 => TimeBand::PreDawn,
                    1 => TimeBand::Morning,
                    2 => TimeBand::Afternoon,
                    _ => TimeBand::Evening,
                }),
            };
            availability.push(AvailabilityRequest::new(
                worker.worker_id.clone(),
                start + Duration::days(offset),
                request_type,
            ));
        }
    }

    RosterProblem::new(requirements, workers, availability).with_duty_codes(catalog)
}
