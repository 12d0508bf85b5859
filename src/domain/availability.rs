// ==========================================
// 排班优化引擎 - 出勤申请领域模型
// ==========================================
// 红线: 申请为不可变输入,每人每日至多一条
// ==========================================

use crate::domain::types::RequestType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub worker_id: String,
    pub date: NaiveDate,
    pub request_type: RequestType,
}

impl AvailabilityRequest {
    pub fn new(worker_id: impl Into<String>, date: NaiveDate, request_type: RequestType) -> Self {
        Self {
            worker_id: worker_id.into(),
            date,
            request_type,
        }
    }
}

// ==========================================
// AvailabilityBook - 申请查询索引
// ==========================================
// worker_id → (date → 申请类型)
#[derive(Debug, Clone, Default)]
pub struct AvailabilityBook {
    by_worker: HashMap<String, HashMap<NaiveDate, RequestType>>,
}

impl AvailabilityBook {
    /// 构建索引 (重复申请以后出现者为准,重复在 API 层已拒绝)
    pub fn from_requests(requests: &[AvailabilityRequest]) -> Self {
        let mut by_worker: HashMap<String, HashMap<NaiveDate, RequestType>> = HashMap::new();
        for request in requests {
            by_worker
                .entry(request.worker_id.clone())
                .or_default()
                .insert(request.date, request.request_type);
        }
        Self { by_worker }
    }

    pub fn get(&self, worker_id: &str, date: NaiveDate) -> Option<RequestType> {
        self.by_worker
            .get(worker_id)
            .and_then(|dates| dates.get(&date))
            .copied()
    }

    pub fn is_unavailable(&self, worker_id: &str, date: NaiveDate) -> bool {
        self.get(worker_id, date) == Some(RequestType::Unavailable)
    }
}
