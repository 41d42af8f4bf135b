//! DDD 共享内核（seedwork-domain）
//!
//! 提供以 DDD 为中心的基础构件，用于在应用中实现：
//! - 实体（`entity`）：统一标识与待发布事件缓冲区
//! - 值对象（`value_object`）：基于等值组件的结构化相等
//! - 领域事件（`domain_event`）：构造时戳定发生时间的不可变事实
//! - 事件调度（`dispatcher`）：批量抽取并转发实体缓冲的事件
//! - 规约（`specification`）与仓储契约（`repository`）
//!
//! 本 crate 只定义领域层契约与最小必要的错误类型，不绑定任何存储或传输实现；
//! 发布机制、仓储执行等由外部协作方（如 `seedwork-application` 的内存总线）提供。
//!
//! 典型用法：
//! 1. 用 `#[entity]` / `#[entity_id]` / `#[domain_event]` 宏声明聚合与事件；
//! 2. 领域逻辑在状态变更时向实体缓冲区登记事件；
//! 3. 持久化成功后，由 `PublishingDispatcher` 抽取并经 `EventPublisher` 逐个发布。
//!
pub mod dispatcher;
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod repository;
pub mod repository_inmemory;
pub mod specification;
pub mod value_object;

// 宏生成的代码以 ::seedwork_domain 绝对路径引用本 crate 的类型，
// 这里重导出 chrono 并允许在本 crate 内部自引用，使宏在本 crate 的测试中同样可用。
pub use chrono;

extern crate self as seedwork_domain;
