//! 领域事件（Domain Event）
//!
//! 领域事件是“已经发生的事实”：构造时自动戳定 UTC 发生时间，之后整体不可变。
//! 事件由所属实体的缓冲区暂存，经调度器抽取后即焚（不做二次保留）。
//!
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use uuid::Uuid;

/// 领域事件需要满足的通用能力边界
///
/// 具体事件通常内嵌 [`EventMetadata`] 并委托实现（`#[domain_event]` 宏会生成这部分样板）。
pub trait DomainEvent: fmt::Debug + Send + Sync + 'static {
    /// 事件类型名（用于路由、日志与审计，不随重构变化）
    fn event_type(&self) -> &'static str;

    /// 事件发生时间（UTC，构造时固定）
    fn occurred_at(&self) -> DateTime<Utc>;

    /// 供处理器按具体类型还原
    fn as_any(&self) -> &dyn Any;
}

/// 事件元数据：标识与发生时间，均在构造时戳定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    event_id: Uuid,
    occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        }
    }

    pub fn event_id(&self) -> &Uuid {
        &self.event_id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedwork_macros::domain_event;

    #[domain_event]
    struct OrderShipped {
        order_id: String,
    }

    // 时间戳在构造时戳定，为 UTC，且之后不再变化
    #[tokio::test]
    async fn occurred_at_is_stamped_once_in_utc() {
        let before = Utc::now();
        let event = OrderShipped::new("o-1".to_string());
        let after = Utc::now();

        let first = event.occurred_at();
        assert!(first >= before && first <= after);
        assert_eq!(first.timezone(), Utc);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert_eq!(event.occurred_at(), first);
    }

    #[test]
    fn event_type_is_the_type_name() {
        let event = OrderShipped::new("o-2".to_string());
        assert_eq!(event.event_type(), "OrderShipped");
        assert_eq!(event.order_id, "o-2");
    }

    #[test]
    fn as_any_downcasts_to_the_concrete_event() {
        let event = OrderShipped::new("o-3".to_string());
        let dyn_event: &dyn DomainEvent = &event;
        let concrete = dyn_event
            .as_any()
            .downcast_ref::<OrderShipped>()
            .expect("downcast");
        assert_eq!(concrete.order_id, "o-3");
    }

    #[test]
    fn metadata_ids_are_unique() {
        let a = EventMetadata::new();
        let b = EventMetadata::new();
        assert_ne!(a.event_id(), b.event_id());
    }
}
