//! CQRS 应用层（seedwork-application）
//!
//! 在 `seedwork-domain` 之上提供命令/查询两条语义通道与进程内中介者：
//! - `command`/`query`：请求标记契约（写通道返回结果、读通道返回 DTO）；
//! - `*_handler`：处理器契约；
//! - `inmemory_*_bus`：基于 `TypeId` 的类型擦除路由实现；
//! - `inmemory_event_bus`：实现领域层 `EventPublisher`，把事件路由到订阅处理器；
//! - `logging`：总线装饰器，调用前后输出结构化日志并计时。
//!
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod context;
pub mod dto;
pub mod error;
pub mod event_handler;
pub mod inmemory_command_bus;
pub mod inmemory_event_bus;
pub mod inmemory_query_bus;
pub mod logging;
pub mod query;
pub mod query_bus;
pub mod query_handler;

pub use inmemory_command_bus::InMemoryCommandBus;
pub use inmemory_event_bus::InMemoryEventBus;
pub use inmemory_query_bus::InMemoryQueryBus;
pub use logging::{LoggingCommandBus, LoggingQueryBus};
