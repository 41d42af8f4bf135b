//! 内存版事件总线（InMemoryEventBus）
//!
//! 实现领域层的 `EventPublisher` 协议：按事件的具体类型（TypeId）把
//! `Arc<dyn DomainEvent>` 路由到已订阅的处理器，按订阅顺序串行调用。
//! - 无订阅者的事件类型视为无操作；
//! - 处理器失败转换为 `DomainError::Publish` 并向调度器传播；
//! - 典型用途：测试环境、示例与本地开发。
//!
use crate::error::AppError;
use crate::event_handler::DomainEventHandler;
use async_trait::async_trait;
use dashmap::DashMap;
use seedwork_domain::dispatcher::EventPublisher;
use seedwork_domain::domain_event::DomainEvent;
use seedwork_domain::error::{DomainError, DomainResult};
use std::any::{Any, TypeId};
use std::sync::Arc;

/// 简单的进程内事件总线实现
pub struct InMemoryEventBus {
    handlers: DashMap<TypeId, Vec<Arc<dyn DomainEventHandler>>>,
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为事件类型 `E` 订阅一个处理器（同一类型可订阅多个，按订阅顺序调用）
    pub fn subscribe<E>(&self, handler: Arc<dyn DomainEventHandler>)
    where
        E: DomainEvent + Any,
    {
        self.handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(handler);
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: Arc<dyn DomainEvent>) -> DomainResult<()> {
        let type_id = event.as_any().type_id();

        // 克隆订阅列表，避免跨 await 持有分片锁
        let Some(handlers) = self.handlers.get(&type_id).map(|h| h.value().clone()) else {
            return Ok(());
        };

        for handler in handlers {
            handler
                .handle(Arc::clone(&event))
                .await
                .map_err(|e| match e {
                    AppError::Domain(domain) => domain,
                    other => DomainError::Publish {
                        reason: format!("{}: {other}", handler.handler_name()),
                    },
                })?;
        }

        Ok(())
    }
}
