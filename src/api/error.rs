// ==========================================
// 排班优化引擎 - API层错误类型
// ==========================================
// 职责: 定义输入错误类型;缺员等求解结果不属于错误,只进入校验报告
// 可解释性: 每个错误必须指明出问题的记录
// ==========================================

use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: record={record}, reason={reason}")]
    InvalidInput { record: String, reason: String },

    #[error("引用不存在: {entity}(id={id}) 被 {referenced_by} 引用")]
    UnknownReference {
        entity: String,
        id: String,
        referenced_by: String,
    },

    #[error("重复标识: {entity}(id={id})")]
    DuplicateId { entity: String, id: String },

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置无效: {0}")]
    InvalidConfig(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub fn invalid_input(record: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::InvalidInput {
            record: record.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_reference(
        entity: impl Into<String>,
        id: impl Into<String>,
        referenced_by: impl Into<String>,
    ) -> Self {
        ApiError::UnknownReference {
            entity: entity.into(),
            id: id.into(),
            referenced_by: referenced_by.into(),
        }
    }

    pub fn duplicate_id(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::DuplicateId {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// 是否为调用方数据问题 (修正数据后可重试)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidInput { .. } | ApiError::UnknownReference { .. } | ApiError::DuplicateId { .. }
        )
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
