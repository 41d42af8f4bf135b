//! 领域层统一错误定义
//!
//! 错误分层刻意保持扁平：构造期校验失败立即返回，下游（发布机制、仓储实现）
//! 的失败不在本层捕获或翻译，统一经 `?` 向调用方传播。
//!
use thiserror::Error;

/// 统一错误类型（共享内核最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 构造期校验 ---
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
    #[error("parse error: {reason}")]
    Parse { reason: String },

    // --- 事件发布 ---
    #[error("event publish error: {reason}")]
    Publish { reason: String },

    // --- 仓储 ---
    #[error("repository error: {reason}")]
    Repository { reason: String },
    #[error("not found: {reason}")]
    NotFound { reason: String },

    // --- 通用 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
