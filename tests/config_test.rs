// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证配置文件加载、快照恢复与 RosterApi 取用配置
// ==========================================

mod helpers;

use duty_roster::api::{ApiError, RosterApi};
use duty_roster::config::{
    config_keys, ConfigManager, RosterConfigReader, ScoringWeights, UnavailablePolicy,
};
use duty_roster::domain::{AvailabilityRequest, RequestType, RosterProblem, Worker};
use helpers::mock_config::MockConfig;
use helpers::roster_builder::{scenario_date, RequirementBuilder};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_load_config_file() {
    let file = write_config(
        r#"{
            "scoring/weights": {"available_bonus": 12, "night_start_hour": 20},
            "optimizer/apply_local_search": false,
            "optimizer/max_local_search_iterations": 7,
            "optimizer/unavailable_policy": "PENALIZE"
        }"#,
    );

    let manager = ConfigManager::from_file(file.path()).expect("config should load");
    let weights = manager.get_scoring_weights().unwrap();
    assert_eq!(weights.available_bonus, 12.0);
    assert_eq!(weights.night_start_hour, 20);
    // 未给出的字段取默认值
    assert_eq!(weights.unavailable_penalty, ScoringWeights::default().unavailable_penalty);

    let options = manager.get_optimize_options().unwrap();
    assert!(!options.apply_local_search);
    assert_eq!(options.unavailable_policy, UnavailablePolicy::Penalize);
}

#[test]
fn test_missing_or_malformed_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ConfigManager::from_file(dir.path().join("absent.json")).is_err());

    let file = write_config("[1, 2, 3]");
    let err = ConfigManager::from_file(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("JSON 对象"));
}

#[test]
fn test_snapshot_restore_between_managers() {
    let source = ConfigManager::new();
    source
        .set_config_value(config_keys::TIMEOUT_MS, "2500")
        .unwrap();
    source
        .set_config_value(config_keys::UNAVAILABLE_POLICY, "EXCLUDE")
        .unwrap();
    let snapshot = source.get_config_snapshot().unwrap();

    let target = ConfigManager::new();
    assert_eq!(target.restore_config_from_snapshot(&snapshot).unwrap(), 2);
    assert_eq!(
        target.get_config_value(config_keys::TIMEOUT_MS).unwrap(),
        Some("2500".to_string())
    );
}

#[test]
fn test_api_uses_configured_weights() {
    let problem = RosterProblem::new(
        vec![RequirementBuilder::new(scenario_date(), "LocA", "DC1").build()],
        vec![Worker::new("W1")],
        vec![AvailabilityRequest::new("W1", scenario_date(), RequestType::Available)],
    );

    let weights = ScoringWeights {
        available_bonus: 42.0,
        ..ScoringWeights::default()
    };
    let api = RosterApi::new(Arc::new(MockConfig::with_weights(weights)));
    let options = api.default_options().unwrap();
    let result = api.optimize(&problem, &options).unwrap();
    assert_eq!(result.total_score, 42.0);
}

#[test]
fn test_api_reports_config_failure() {
    let problem = RosterProblem::new(
        vec![RequirementBuilder::new(scenario_date(), "LocA", "DC1").build()],
        vec![Worker::new("W1")],
        vec![],
    );
    let api = RosterApi::new(Arc::new(MockConfig::broken()));
    let options = api.default_options().unwrap();
    let err = api.optimize(&problem, &options).unwrap_err();
    assert!(matches!(err, ApiError::InvalidConfig(_)));
}
