use crate::{
    context::AppContext, error::AppError, query::Query, query_bus::QueryBus,
    query_handler::QueryHandler,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::any::{Any, TypeId, type_name};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type BoxAnySend = Box<dyn Any + Send>;

type QueryHandlerFuture<'a> =
    Pin<Box<dyn Future<Output = Result<BoxAnySend, AppError>> + Send + 'a>>;

type QueryHandlerFn =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a AppContext) -> QueryHandlerFuture<'a> + Send + Sync>;

/// 基于内存的 QueryBus 实现
/// - 通过 TypeId 注册不同 Query 对应的 Handler
/// - DTO 是查询的关联类型，因此键只需查询本身的 TypeId
pub struct InMemoryQueryBus {
    handlers: DashMap<TypeId, (&'static str, QueryHandlerFn)>,
}

impl Default for InMemoryQueryBus {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl InMemoryQueryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册查询处理器；同一查询类型重复注册返回错误
    pub fn register<Q, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let key = TypeId::of::<Q>();

        let f: QueryHandlerFn = {
            let handler = handler.clone();

            Arc::new(move |boxed_query, ctx| {
                let handler = handler.clone();

                Box::pin(async move {
                    match boxed_query.downcast::<Q>() {
                        Ok(query) => {
                            let dto = handler.handle(ctx, *query).await?;
                            Ok(Box::new(dto) as BoxAnySend)
                        }
                        Err(_) => Err(AppError::TypeMismatch {
                            expected: Q::NAME,
                            found: "unknown",
                        }),
                    }
                })
            })
        };

        if self.handlers.contains_key(&key) {
            return Err(AppError::AlreadyRegisteredQuery { query: Q::NAME });
        }

        self.handlers.insert(key, (Q::NAME, f));

        Ok(())
    }

    /// 获取已注册的查询名列表（只读视图）
    pub fn registered_queries(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|e| e.value().0).collect()
    }
}

#[async_trait]
impl QueryBus for InMemoryQueryBus {
    async fn dispatch<Q>(&self, ctx: &AppContext, query: Q) -> Result<Q::Dto, AppError>
    where
        Q: Query,
    {
        let Some((_name, f)) = self.handlers.get(&TypeId::of::<Q>()).map(|h| h.clone()) else {
            return Err(AppError::HandlerNotFound(Q::NAME));
        };

        let out = (f)(Box::new(query), ctx).await?;

        match out.downcast::<Q::Dto>() {
            Ok(dto) => Ok(*dto),
            Err(_) => Err(AppError::TypeMismatch {
                expected: type_name::<Q::Dto>(),
                found: "unknown",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::Dto;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    struct GetBalance {
        account: String,
    }

    #[derive(Debug, Serialize, PartialEq)]
    struct BalanceDto {
        account: String,
        amount: i64,
    }

    impl Dto for BalanceDto {}

    impl Query for GetBalance {
        const NAME: &'static str = "GetBalance";
        type Dto = BalanceDto;
    }

    struct GetBalanceHandler;

    #[async_trait]
    impl QueryHandler<GetBalance> for GetBalanceHandler {
        async fn handle(
            &self,
            _ctx: &AppContext,
            query: GetBalance,
        ) -> Result<BalanceDto, AppError> {
            Ok(BalanceDto {
                account: query.account,
                amount: 42,
            })
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn register_and_dispatch_returns_the_dto() {
        let bus = InMemoryQueryBus::new();
        bus.register::<GetBalance, _>(Arc::new(GetBalanceHandler))
            .unwrap();

        let ctx = AppContext::default();
        let dto = bus
            .dispatch(
                &ctx,
                GetBalance {
                    account: "a-1".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            dto,
            BalanceDto {
                account: "a-1".to_string(),
                amount: 42,
            }
        );
        assert_eq!(bus.registered_queries(), vec!["GetBalance"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn not_found_error_when_unregistered() {
        let bus = InMemoryQueryBus::new();
        let ctx = AppContext::default();
        let err = bus
            .dispatch(
                &ctx,
                GetBalance {
                    account: "a-1".to_string(),
                },
            )
            .await
            .unwrap_err();
        match err {
            AppError::HandlerNotFound(name) => assert_eq!(name, "GetBalance"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn duplicate_registration_is_rejected() {
        let bus = InMemoryQueryBus::new();
        bus.register::<GetBalance, _>(Arc::new(GetBalanceHandler))
            .unwrap();
        let err = bus
            .register::<GetBalance, _>(Arc::new(GetBalanceHandler))
            .unwrap_err();
        match err {
            AppError::AlreadyRegisteredQuery { query } => assert_eq!(query, "GetBalance"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
