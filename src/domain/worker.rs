// ==========================================
// 排班优化引擎 - 人员领域模型
// ==========================================
// 红线: 人员为只读输入,生命周期由外部人员库管理
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// Worker - 可排班人员
// ==========================================
// 名册顺序即同分时的选择顺序(可复现性约定)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub worker_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skill_tags: BTreeSet<String>, // 技能标签
    #[serde(default)]
    pub is_responsible: bool, // 具备现场责任人资格
}

impl Worker {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            name: None,
            skill_tags: BTreeSet::new(),
            is_responsible: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.skill_tags.insert(tag.into());
        self
    }

    pub fn responsible(mut self) -> Self {
        self.is_responsible = true;
        self
    }

    /// 缺失的技能标签 (按字典序)
    pub fn missing_tags<'a>(&self, required: &'a BTreeSet<String>) -> Vec<&'a str> {
        required
            .iter()
            .filter(|tag| !self.skill_tags.contains(*tag))
            .map(|tag| tag.as_str())
            .collect()
    }

    /// 是否覆盖全部要求标签
    pub fn has_all_tags(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.skill_tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tags() {
        let worker = Worker::new("W1").with_tag("forklift").with_tag("first_aid");
        let required: BTreeSet<String> = ["first_aid", "radio", "forklift"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(worker.missing_tags(&required), vec!["radio"]);
        assert!(!worker.has_all_tags(&required));
        assert!(worker.has_all_tags(&BTreeSet::new()));
    }
}
