use crate::error::AppError;
use async_trait::async_trait;
use seedwork_domain::domain_event::DomainEvent;
use std::sync::Arc;

/// 领域事件处理器：消费某一具体类型的事件
///
/// 事件以 `Arc<dyn DomainEvent>` 投递，处理器通过 `as_any` 还原具体类型。
#[async_trait]
pub trait DomainEventHandler: Send + Sync {
    /// 处理器名称（用于失败诊断与审计）
    fn handler_name(&self) -> &str;

    /// 处理事件
    async fn handle(&self, event: Arc<dyn DomainEvent>) -> Result<(), AppError>;
}
