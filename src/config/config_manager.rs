// ==========================================
// 排班优化引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: 内存 key-value (可由 JSON 文件/字符串加载,支持快照与恢复)
// 覆写顺序: 默认值 < 配置文件 < 环境变量
// ==========================================

use crate::config::optimizer_config::{OptimizeOptions, UnavailablePolicy};
use crate::config::roster_config_trait::RosterConfigReader;
use crate::config::scoring_profile::ScoringWeights;
use anyhow::{anyhow, Context};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::RwLock;
use tracing::{debug, info};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const SCORING_WEIGHTS: &str = "scoring/weights";
    pub const APPLY_LOCAL_SEARCH: &str = "optimizer/apply_local_search";
    pub const MAX_LOCAL_SEARCH_ITERATIONS: &str = "optimizer/max_local_search_iterations";
    pub const TIMEOUT_MS: &str = "optimizer/timeout_ms";
    pub const UNAVAILABLE_POLICY: &str = "optimizer/unavailable_policy";
}

/// 环境变量覆写
pub mod env_keys {
    pub const TIMEOUT_MS: &str = "DUTY_ROSTER_TIMEOUT_MS";
    pub const MAX_LOCAL_SEARCH_ITERATIONS: &str = "DUTY_ROSTER_MAX_LS_ITER";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Default)]
pub struct ConfigManager {
    kv: RwLock<HashMap<String, String>>,
}

impl ConfigManager {
    /// 创建空配置（全部取默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 对象字符串加载
    ///
    /// 字符串值原样存储,其他 JSON 值以其序列化文本存储
    /// (如 `"scoring/weights": {"available_bonus": 12}`)
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let root: Value = serde_json::from_str(raw).context("配置内容不是合法 JSON")?;
        let object = root
            .as_object()
            .ok_or_else(|| anyhow!("配置根节点必须是 JSON 对象"))?;

        let mut kv = HashMap::with_capacity(object.len());
        for (key, value) in object {
            let stored = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            kv.insert(key.clone(), stored);
        }

        debug!(keys = kv.len(), "配置已加载");
        Ok(Self {
            kv: RwLock::new(kv),
        })
    }

    /// 从 JSON 文件加载
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let manager = Self::from_json_str(&raw)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        info!(path = %path.display(), "配置文件已加载");
        Ok(manager)
    }

    /// 默认配置文件位置: <用户配置目录>/duty-roster/config.json
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("duty-roster").join("config.json"))
    }

    /// 默认位置存在配置文件则加载,否则使用空配置
    pub fn load_default() -> anyhow::Result<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::new()),
        }
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> anyhow::Result<Option<String>> {
        let kv = self.kv.read().map_err(|e| anyhow!("锁获取失败: {}", e))?;
        Ok(kv.get(key).cloned())
    }

    /// 写入配置值（覆盖已有值）
    pub fn set_config_value(&self, key: &str, value: impl Into<String>) -> anyhow::Result<()> {
        let mut kv = self.kv.write().map_err(|e| anyhow!("锁获取失败: {}", e))?;
        kv.insert(key.to_string(), value.into());
        Ok(())
    }

    fn get_parsed<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key)? {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| anyhow!("配置项 {} 解析失败 ({}): {}", key, raw, e)),
            None => Ok(None),
        }
    }

    /// 获取所有配置的快照（JSON 格式,按键排序）
    pub fn get_config_snapshot(&self) -> anyhow::Result<String> {
        let kv = self.kv.read().map_err(|e| anyhow!("锁获取失败: {}", e))?;
        let ordered: std::collections::BTreeMap<&String, &String> = kv.iter().collect();
        Ok(serde_json::to_string(&ordered)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 注意
    /// - 覆盖同名配置
    /// - `__meta_` 前缀的元信息不回写
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> anyhow::Result<usize> {
        let config_map: HashMap<String, String> =
            serde_json::from_str(snapshot_json).context("配置快照格式错误")?;

        let mut kv = self.kv.write().map_err(|e| anyhow!("锁获取失败: {}", e))?;
        let mut count = 0;
        for (key, value) in config_map {
            if key.starts_with("__meta_") {
                continue;
            }
            kv.insert(key, value);
            count += 1;
        }
        Ok(count)
    }
}

/// 叠加环境变量覆写
///
/// lookup 通常为 `std::env::var(..).ok()`,测试中可替换
pub fn apply_env_overrides(
    mut options: OptimizeOptions,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<OptimizeOptions> {
    if let Some(raw) = lookup(env_keys::TIMEOUT_MS) {
        options.timeout_ms = raw
            .trim()
            .parse()
            .with_context(|| format!("环境变量 {} 无效: {}", env_keys::TIMEOUT_MS, raw))?;
    }
    if let Some(raw) = lookup(env_keys::MAX_LOCAL_SEARCH_ITERATIONS) {
        options.max_local_search_iterations = raw.trim().parse().with_context(|| {
            format!(
                "环境变量 {} 无效: {}",
                env_keys::MAX_LOCAL_SEARCH_ITERATIONS,
                raw
            )
        })?;
    }
    Ok(options)
}

impl RosterConfigReader for ConfigManager {
    fn get_scoring_weights(&self) -> anyhow::Result<ScoringWeights> {
        match self.get_config_value(config_keys::SCORING_WEIGHTS)? {
            Some(raw) => {
                let weights: ScoringWeights = serde_json::from_str(&raw)
                    .with_context(|| format!("配置项 {} 解析失败", config_keys::SCORING_WEIGHTS))?;
                if !weights.time_bands.is_ordered() {
                    return Err(anyhow!("时段阈值必须严格递增: {:?}", weights.time_bands));
                }
                Ok(weights)
            }
            None => Ok(ScoringWeights::default()),
        }
    }

    fn get_optimize_options(&self) -> anyhow::Result<OptimizeOptions> {
        let defaults = OptimizeOptions::default();
        let options = OptimizeOptions {
            apply_local_search: self
                .get_parsed::<bool>(config_keys::APPLY_LOCAL_SEARCH)?
                .unwrap_or(defaults.apply_local_search),
            max_local_search_iterations: self
                .get_parsed::<u32>(config_keys::MAX_LOCAL_SEARCH_ITERATIONS)?
                .unwrap_or(defaults.max_local_search_iterations),
            timeout_ms: self
                .get_parsed::<u64>(config_keys::TIMEOUT_MS)?
                .unwrap_or(defaults.timeout_ms),
            unavailable_policy: self
                .get_parsed::<UnavailablePolicy>(config_keys::UNAVAILABLE_POLICY)?
                .unwrap_or(defaults.unavailable_policy),
        };
        apply_env_overrides(options, |key| std::env::var(key).ok())
    }
}
