//! 领域事件调度（Dispatcher）
//!
//! 在持久化事务成功后，由集成层把本次涉及的实体交给调度器：逐个实体抽取
//! 待发布事件并经注入的发布机制逐条转发。语义要点：
//! - 抽取即清空：缓冲区在发布前清空，发布失败不会重投（至多一次投递）；
//! - 串行发布：逐条 await，不做并行扇出、超时与取消；
//! - 不符合内部契约的实体记录诊断后跳过，不使整批失败；
//! - 发布机制的错误不在本层捕获，经 `?` 原样传播。
//!
use crate::domain_event::DomainEvent;
use crate::entity::HasDomainEvents;
use crate::error::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 事件发布机制（外部协作方，如进程内中介者或消息系统）
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: Arc<dyn DomainEvent>) -> DomainResult<()>;
}

#[async_trait]
impl<T> EventPublisher for Arc<T>
where
    T: EventPublisher + ?Sized,
{
    async fn publish(&self, event: Arc<dyn DomainEvent>) -> DomainResult<()> {
        (**self).publish(event).await
    }
}

/// 领域事件调度器契约
#[async_trait]
pub trait DomainEventDispatcher: Send + Sync {
    /// 按输入顺序抽取每个实体的事件并逐条发布，随后实体缓冲区为空
    async fn dispatch_and_clear(
        &self,
        entities: &mut [&mut dyn HasDomainEvents],
    ) -> DomainResult<()>;
}

#[async_trait]
impl<T> DomainEventDispatcher for Arc<T>
where
    T: DomainEventDispatcher + ?Sized,
{
    async fn dispatch_and_clear(
        &self,
        entities: &mut [&mut dyn HasDomainEvents],
    ) -> DomainResult<()> {
        (**self).dispatch_and_clear(entities).await
    }
}

/// 默认实现：把抽取到的事件交给注入的 [`EventPublisher`]
pub struct PublishingDispatcher<P> {
    publisher: P,
}

impl<P> PublishingDispatcher<P>
where
    P: EventPublisher,
{
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl<P> DomainEventDispatcher for PublishingDispatcher<P>
where
    P: EventPublisher,
{
    async fn dispatch_and_clear(
        &self,
        entities: &mut [&mut dyn HasDomainEvents],
    ) -> DomainResult<()> {
        for entity in entities.iter_mut() {
            let pending = entity.domain_events().len();
            match entity.event_buffer_mut() {
                Some(buffer) => {
                    // 先抽取并清空，再逐条发布（至多一次投递）
                    let events = buffer.take();
                    for event in events {
                        self.publisher.publish(event).await?;
                    }
                }
                None => {
                    tracing::error!(
                        pending,
                        "entity exposes domain events without an internal event buffer; skipped"
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::EventMetadata;
    use crate::entity::EventBuffer;
    use crate::error::DomainError;
    use chrono::{DateTime, Utc};
    use std::any::Any;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Tagged {
        metadata: EventMetadata,
        tag: &'static str,
    }

    impl Tagged {
        fn new(tag: &'static str) -> Self {
            Self {
                metadata: EventMetadata::new(),
                tag,
            }
        }
    }

    impl DomainEvent for Tagged {
        fn event_type(&self) -> &'static str {
            "Tagged"
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.metadata.occurred_at()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Default)]
    struct Order {
        events: EventBuffer,
    }

    impl Order {
        fn record(&mut self, tag: &'static str) {
            self.events.register(Tagged::new(tag));
        }
    }

    impl HasDomainEvents for Order {
        fn domain_events(&self) -> &[Arc<dyn DomainEvent>] {
            self.events.events()
        }

        fn event_buffer_mut(&mut self) -> Option<&mut EventBuffer> {
            Some(&mut self.events)
        }
    }

    // 只实现只读契约、没有内部缓冲区的实体
    struct ReadOnlyProjection {
        events: Vec<Arc<dyn DomainEvent>>,
    }

    impl HasDomainEvents for ReadOnlyProjection {
        fn domain_events(&self) -> &[Arc<dyn DomainEvent>] {
            &self.events
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<&'static str>>,
    }

    impl RecordingPublisher {
        fn tags(&self) -> Vec<&'static str> {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: Arc<dyn DomainEvent>) -> DomainResult<()> {
            let tagged = event.as_any().downcast_ref::<Tagged>().unwrap();
            self.published.lock().unwrap().push(tagged.tag);
            Ok(())
        }
    }

    /// 发布到指定标签时失败
    struct FailingPublisher {
        inner: RecordingPublisher,
        fail_on: &'static str,
    }

    #[async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, event: Arc<dyn DomainEvent>) -> DomainResult<()> {
            let tagged = event.as_any().downcast_ref::<Tagged>().unwrap();
            if tagged.tag == self.fail_on {
                return Err(DomainError::Publish {
                    reason: format!("refused to publish {}", tagged.tag),
                });
            }
            self.inner.publish(event).await
        }
    }

    #[tokio::test]
    async fn publishes_in_registration_order_across_entities() {
        let publisher = Arc::new(RecordingPublisher::default());
        let dispatcher = PublishingDispatcher::new(Arc::clone(&publisher));

        let mut first = Order::default();
        first.record("A");
        first.record("B");
        let mut second = Order::default();
        second.record("C");

        let mut batch: Vec<&mut dyn HasDomainEvents> = vec![&mut first, &mut second];
        dispatcher.dispatch_and_clear(&mut batch).await.unwrap();

        assert_eq!(publisher.tags(), vec!["A", "B", "C"]);
        assert!(first.domain_events().is_empty());
        assert!(second.domain_events().is_empty());
    }

    // 不符合内部契约的实体被跳过，其前后的实体照常调度
    #[tokio::test]
    async fn non_conforming_entity_does_not_abort_the_batch() {
        let publisher = Arc::new(RecordingPublisher::default());
        let dispatcher = PublishingDispatcher::new(Arc::clone(&publisher));

        let mut before = Order::default();
        before.record("A");
        let mut stray = ReadOnlyProjection {
            events: vec![Arc::new(Tagged::new("X"))],
        };
        let mut after = Order::default();
        after.record("B");

        let mut batch: Vec<&mut dyn HasDomainEvents> = vec![&mut before, &mut stray, &mut after];
        dispatcher.dispatch_and_clear(&mut batch).await.unwrap();

        assert_eq!(publisher.tags(), vec!["A", "B"]);
        // 只读实体的视图不受影响
        assert_eq!(stray.domain_events().len(), 1);
    }

    // 发布失败向调用方传播：失败实体的缓冲区已清空（至多一次），
    // 其后的实体保持未调度
    #[tokio::test]
    async fn publish_failure_propagates_and_loses_taken_events() {
        let publisher = FailingPublisher {
            inner: RecordingPublisher::default(),
            fail_on: "B",
        };
        let dispatcher = PublishingDispatcher::new(publisher);

        let mut first = Order::default();
        first.record("A");
        first.record("B");
        let mut second = Order::default();
        second.record("C");

        let mut batch: Vec<&mut dyn HasDomainEvents> = vec![&mut first, &mut second];
        let err = dispatcher.dispatch_and_clear(&mut batch).await.unwrap_err();
        match err {
            DomainError::Publish { reason } => assert!(reason.contains("B")),
            other => panic!("unexpected error: {other:?}"),
        }

        // 抽取发生在发布之前，B 已随清空丢失
        assert!(first.domain_events().is_empty());
        // 后续实体未被触达
        assert_eq!(second.domain_events().len(), 1);
    }

    #[tokio::test]
    async fn empty_buffers_dispatch_as_a_noop() {
        let publisher = Arc::new(RecordingPublisher::default());
        let dispatcher = PublishingDispatcher::new(Arc::clone(&publisher));

        let mut order = Order::default();
        let mut batch: Vec<&mut dyn HasDomainEvents> = vec![&mut order];
        dispatcher.dispatch_and_clear(&mut batch).await.unwrap();

        assert!(publisher.tags().is_empty());
    }
}
