// ==========================================
// 典型场景端到端测试
// ==========================================
// 场景:
// 1. 责任人优先 + 可出勤人员补足 → 校验通过
// 2. 唯一责任人申请不可出勤 → 责任人缺员,不排该人员
// 3. 连续第 7 天的候选得分低于无连续出勤的候选
// ==========================================

mod helpers;

use duty_roster::api;
use duty_roster::domain::{
    AvailabilityBook, AvailabilityRequest, PositionRequirement, RequestType, RosterProblem, Worker,
};
use duty_roster::engine::{DutyTimeTable, ScheduleIndex, ScoringContext, ScoringEngine};
use duty_roster::OptimizeOptions;
use helpers::roster_builder::{date, day_shift, scenario_date, RequirementBuilder};

fn three_worker_roster() -> Vec<Worker> {
    vec![Worker::new("W1").responsible(), Worker::new("W2"), Worker::new("W3")]
}

fn lead_requirement() -> PositionRequirement {
    RequirementBuilder::new(scenario_date(), "LocA", "DC1")
        .count(2)
        .responsible()
        .build()
}

#[test]
fn test_responsible_first_then_available_worker() {
    let problem = RosterProblem::new(
        vec![lead_requirement()],
        three_worker_roster(),
        vec![
            AvailabilityRequest::new("W1", scenario_date(), RequestType::Available),
            AvailabilityRequest::new("W2", scenario_date(), RequestType::Available),
            AvailabilityRequest::new("W3", scenario_date(), RequestType::Unavailable),
        ],
    );

    let result = api::optimize(&problem, &OptimizeOptions::default()).unwrap();

    assert!(result.validation.is_valid, "errors: {:?}", result.validation.errors);
    assert_eq!(result.stats.total_assignments, 2);

    let responsible: Vec<&str> = result
        .assignments
        .iter()
        .filter(|a| a.is_responsible_slot)
        .map(|a| a.worker_id.as_str())
        .collect();
    assert_eq!(responsible, vec!["W1"]);

    let mut workers: Vec<&str> = result.assignments.iter().map(|a| a.worker_id.as_str()).collect();
    workers.sort();
    assert_eq!(workers, vec!["W1", "W2"]);
    assert_eq!(result.stats.preference_fulfillment_rate, 1.0);
}

#[test]
fn test_unavailable_responsible_worker_is_never_assigned() {
    let problem = RosterProblem::new(
        vec![lead_requirement()],
        three_worker_roster(),
        vec![AvailabilityRequest::new("W1", scenario_date(), RequestType::Unavailable)],
    );

    let result = api::optimize(&problem, &OptimizeOptions::default()).unwrap();

    assert!(!result.validation.is_valid);
    assert!(result
        .validation
        .errors
        .iter()
        .any(|e| e.starts_with("RESPONSIBLE_SHORTFALL")));
    assert!(result.assignments.len() <= 2);
    assert!(result.assignments.iter().all(|a| a.worker_id != "W1"));
    assert!(result.assignments.iter().all(|a| !a.is_responsible_slot));
}

#[test]
fn test_seventh_consecutive_day_scores_strictly_lower() {
    let engine = ScoringEngine::default();
    let requirement = RequirementBuilder::new(date(2025, 1, 10), "LocA", "DAY").build();
    let duty_times = DutyTimeTable::build(&[], &[requirement.clone()]);
    let availability = AvailabilityBook::default();

    let mut schedule = ScheduleIndex::new();
    for day in 4..=9 {
        schedule.insert("TIRED", date(2025, 1, day), "DAY");
    }
    // 同样的月累计天数,但不连续
    for day in [1, 2, 3, 5, 6, 8] {
        schedule.insert("RESTED", date(2025, 1, day), "DAY");
    }

    let ctx = ScoringContext {
        availability: &availability,
        duty_times: &duty_times,
        schedule: &schedule,
        roster_size: 2,
    };
    let tired = engine.score("TIRED", requirement.date, &day_shift(), &ctx);
    let rested = engine.score("RESTED", requirement.date, &day_shift(), &ctx);

    assert!(tired < rested, "tired={} rested={}", tired, rested);
    assert_eq!(rested - tired, 30.0);
}
