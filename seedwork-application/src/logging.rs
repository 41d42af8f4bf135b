//! 日志装饰器（Logging Pipeline Step）
//!
//! 包装一次总线调用：调用前输出请求名称与全部顶层属性（序列化为结构化字段，
//! 仅在 INFO 级别启用时才做这笔开销），调用后输出响应与耗时（毫秒）。
//! 不重试、不吞错、不改写响应；取消语义即 future 的 drop，随调用方传播。
//!
use crate::{
    command::Command, command_bus::CommandBus, context::AppContext, error::AppError, query::Query,
    query_bus::QueryBus,
};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::Level;

/// 以序列化结果逐项输出请求属性（运行时反射的静态替代）
fn log_request_properties<T>(name: &'static str, request: &T)
where
    T: Serialize,
{
    tracing::info!(request = name, "handling request");
    match serde_json::to_value(request) {
        Ok(Value::Object(properties)) => {
            for (property, value) in &properties {
                tracing::info!(request = name, property = %property, value = %value, "request property");
            }
        }
        Ok(other) => {
            tracing::info!(request = name, value = %other, "request payload");
        }
        Err(error) => {
            tracing::warn!(request = name, %error, "failed to render request properties");
        }
    }
}

/// 为内层命令总线追加日志的装饰器
pub struct LoggingCommandBus<B> {
    inner: B,
}

impl<B> LoggingCommandBus<B>
where
    B: CommandBus,
{
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B> CommandBus for LoggingCommandBus<B>
where
    B: CommandBus,
{
    async fn dispatch<C>(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError>
    where
        C: Command,
    {
        if tracing::enabled!(Level::INFO) {
            log_request_properties(C::NAME, &cmd);
        }

        let started = Instant::now();
        let output = self.inner.dispatch(ctx, cmd).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::info!(command = C::NAME, response = ?output, elapsed_ms, "command handled");
        Ok(output)
    }
}

/// 为内层查询总线追加日志的装饰器
pub struct LoggingQueryBus<B> {
    inner: B,
}

impl<B> LoggingQueryBus<B>
where
    B: QueryBus,
{
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B> QueryBus for LoggingQueryBus<B>
where
    B: QueryBus,
{
    async fn dispatch<Q>(&self, ctx: &AppContext, query: Q) -> Result<Q::Dto, AppError>
    where
        Q: Query,
    {
        if tracing::enabled!(Level::INFO) {
            log_request_properties(Q::NAME, &query);
        }

        let started = Instant::now();
        let dto = self.inner.dispatch(ctx, query).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::info!(query = Q::NAME, response = ?dto, elapsed_ms, "query handled");
        Ok(dto)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_handler::CommandHandler;
    use crate::dto::Dto;
    use crate::inmemory_command_bus::InMemoryCommandBus;
    use crate::inmemory_query_bus::InMemoryQueryBus;
    use crate::query_handler::QueryHandler;
    use std::sync::Arc;

    #[derive(Debug, Serialize)]
    struct Rename {
        name: String,
    }

    impl Command for Rename {
        const NAME: &'static str = "Rename";
        type Output = String;
    }

    struct RenameHandler;

    #[async_trait]
    impl CommandHandler<Rename> for RenameHandler {
        async fn handle(&self, _ctx: &AppContext, cmd: Rename) -> Result<String, AppError> {
            if cmd.name.is_empty() {
                return Err(AppError::Validation("name must not be empty".to_string()));
            }
            Ok(cmd.name.to_uppercase())
        }
    }

    #[derive(Debug, Serialize)]
    struct GetGreeting {
        name: String,
    }

    #[derive(Debug, Serialize, PartialEq)]
    struct GreetingDto(String);

    impl Dto for GreetingDto {}

    impl Query for GetGreeting {
        const NAME: &'static str = "GetGreeting";
        type Dto = GreetingDto;
    }

    struct GetGreetingHandler;

    #[async_trait]
    impl QueryHandler<GetGreeting> for GetGreetingHandler {
        async fn handle(
            &self,
            _ctx: &AppContext,
            query: GetGreeting,
        ) -> Result<GreetingDto, AppError> {
            Ok(GreetingDto(format!("hello {}", query.name)))
        }
    }

    // 装饰器只追加日志，结果原样透传
    #[tokio::test]
    async fn command_results_pass_through_unchanged() {
        let inner = InMemoryCommandBus::new();
        inner.register::<Rename, _>(Arc::new(RenameHandler)).unwrap();
        let bus = LoggingCommandBus::new(inner);

        let ctx = AppContext::default();
        let out = bus
            .dispatch(
                &ctx,
                Rename {
                    name: "ada".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(out, "ADA");
    }

    // 内层错误不被吞掉或转换
    #[tokio::test]
    async fn command_errors_pass_through_unchanged() {
        let inner = InMemoryCommandBus::new();
        inner.register::<Rename, _>(Arc::new(RenameHandler)).unwrap();
        let bus = LoggingCommandBus::new(inner);

        let ctx = AppContext::default();
        let err = bus
            .dispatch(
                &ctx,
                Rename {
                    name: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn query_results_pass_through_unchanged() {
        let inner = InMemoryQueryBus::new();
        inner
            .register::<GetGreeting, _>(Arc::new(GetGreetingHandler))
            .unwrap();
        let bus = LoggingQueryBus::new(inner);

        let ctx = AppContext::default();
        let dto = bus
            .dispatch(
                &ctx,
                GetGreeting {
                    name: "ada".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(dto, GreetingDto("hello ada".to_string()));
    }

    #[tokio::test]
    async fn missing_handler_errors_surface_through_the_decorator() {
        let bus = LoggingCommandBus::new(InMemoryCommandBus::new());
        let ctx = AppContext::default();
        let err = bus
            .dispatch(
                &ctx,
                Rename {
                    name: "ada".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::HandlerNotFound("Rename")));
    }
}
