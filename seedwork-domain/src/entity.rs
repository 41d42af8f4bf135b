//! 实体（Entity）基础抽象
//!
//! 为实体与聚合提供统一标识，以及只追加的待发布事件缓冲区：
//! - 登记（append）仅暴露给实体自身的实现代码；
//! - 清空（clear/take）限定为 `pub(crate)`，只有本 crate 内的调度器可以调用；
//! - 读取视图保序且不可变。
//!
use crate::domain_event::DomainEvent;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::sync::Arc;

/// 具备唯一标识的实体抽象
///
/// 标识类型统一为一个泛型关联类型：裸整数、`#[entity_id]` 生成的强类型包装、
/// 或外部框架提供的键类型都满足同一能力边界。标识由调用方或持久化机制赋值，
/// 本层不做任何生成。
pub trait Entity: Send + Sync {
    /// 实体标识类型，要求可比较、可显示与可克隆
    type Id: Clone + PartialEq + Display + Send + Sync;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;
}

/// 待发布事件缓冲区（只追加，按登记顺序保序）
///
/// 缓冲区不参与实体持久化：序列化为 unit，反序列化总是得到空缓冲区，
/// 因此内嵌它的实体可以照常派生 serde。
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
    events: Vec<Arc<dyn DomainEvent>>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个事件到缓冲区末尾
    pub fn register<E>(&mut self, event: E)
    where
        E: DomainEvent,
    {
        self.events.push(Arc::new(event));
    }

    /// 当前缓冲内容的只读视图（登记顺序）
    pub fn events(&self) -> &[Arc<dyn DomainEvent>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// 抽取全部事件并清空缓冲区（仅限本 crate 的调度器调用）
    pub(crate) fn take(&mut self) -> Vec<Arc<dyn DomainEvent>> {
        std::mem::take(&mut self.events)
    }

    /// 清空缓冲区；对空缓冲区为无操作（仅限本 crate 的调度器调用）
    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }
}

impl Serialize for EventBuffer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_unit()
    }
}

impl<'de> Deserialize<'de> for EventBuffer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Self::default())
    }
}

/// 携带领域事件的实体（对外只读契约）
///
/// `event_buffer_mut` 是调度器的符合性探针：只有真正内嵌 [`EventBuffer`]
/// 的实体返回 `Some`（`#[entity]` 宏会生成这部分）；仅实现只读视图的类型
/// 保持默认的 `None`，调度时会被记录诊断并跳过。
pub trait HasDomainEvents: Send + Sync {
    /// 待发布事件的只读视图（登记顺序）
    fn domain_events(&self) -> &[Arc<dyn DomainEvent>];

    /// 内部缓冲区（默认不符合：无缓冲区可抽取）
    fn event_buffer_mut(&mut self) -> Option<&mut EventBuffer> {
        None
    }
}

/// 聚合根标记：事务/一致性边界
///
/// 纯能力标记，无任何方法。仓储契约只接受带有该标记的实体。
pub trait AggregateRoot: Entity + HasDomainEvents {}
