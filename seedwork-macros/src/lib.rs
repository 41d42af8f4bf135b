//! seedwork 过程宏
//!
//! 为 `seedwork-domain` 的实体与事件契约消除样板：
//! - `#[entity]`：注入标识与事件缓冲区字段，生成 `Entity`/`HasDomainEvents` 实现；
//! - `#[entity_id]`：把单字段 tuple struct 包装为强类型标识；
//! - `#[domain_event]`：注入事件元数据字段，生成 `DomainEvent` 实现与构造函数。
//!
//! 生成代码一律使用 `::seedwork_domain` 绝对路径，因此宏既可在下游 crate
//! 使用，也可在 `seedwork-domain` 自身的测试中使用（该 crate 自引用别名）。
//!
use proc_macro::TokenStream;

mod derive_utils;
mod domain_event;
mod entity;
mod entity_id;

/// 实体宏
/// - 注入字段：`id: IdType`、`events: EventBuffer`（若缺失），并置于字段最前
/// - 实现 `::seedwork_domain::entity::Entity` 与 `HasDomainEvents`
/// - 生成 `new(id)`（要求 `Default`）与 `pub(crate)` 的 `record_event`
/// - 参数：`#[entity(id = IdType)]`，默认 `String`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 实体标识宏
/// 仅支持单字段 tuple struct：
/// - 合并/追加派生：Default, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash
/// - 提供 `new(value)`、`Display`、`FromStr`、`AsRef`、`From` 等便捷实现
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 领域事件宏
/// 仅支持具名字段 struct：
/// - 追加字段：`metadata: EventMetadata`（若缺失），构造时戳定事件标识与时间
/// - 合并/追加派生：Debug, Clone
/// - 实现 `::seedwork_domain::domain_event::DomainEvent`（`event_type` 为类型名）
/// - 生成按载荷字段排列的 `new(...)` 构造函数
#[proc_macro_attribute]
pub fn domain_event(attr: TokenStream, item: TokenStream) -> TokenStream {
    domain_event::expand(attr, item)
}
