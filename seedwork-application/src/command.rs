use serde::Serialize;
use std::fmt;

/// 应用层命令（Command）
///
/// 表达“意图”的写操作请求，通常会修改领域状态。
/// - 与 [`Query`](crate::query::Query) 相对，`Command` 应避免读写混用；
/// - 建议保持语义化的“动宾结构”命名，如 `CreateUser`、`CloseOrder`；
/// - 要求 `Serialize`：日志装饰器以序列化后的字段做结构化输出。
///
/// 关联项：
/// - `NAME`：命令的稳定名称，用于日志、追踪与路由，避免依赖 `type_name::<T>()`；
/// - `Output`：命令执行结果（写通道也返回响应，如新建聚合的标识）。
pub trait Command: Serialize + Send + Sync + 'static {
    /// 命令的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 命令执行结果类型
    type Output: fmt::Debug + Send + 'static;
}
