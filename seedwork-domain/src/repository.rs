//! 仓储契约（Repository / ReadRepository）
//!
//! 面向聚合根的通用仓储抽象：读写分离为两层契约，全部操作以 `A: AggregateRoot`
//! 约束做类型级收窄——只有聚合根可以成为仓储目标。查询/计数以规约对象参数化，
//! 具体执行由基础设施实现（内存版见 `repository_inmemory`）。
//!
use crate::entity::AggregateRoot;
use crate::error::DomainResult;
use crate::specification::Specification;
use async_trait::async_trait;
use std::sync::Arc;

/// 只读仓储
#[async_trait]
pub trait ReadRepository<A>: Send + Sync
where
    A: AggregateRoot,
{
    async fn get_by_id(&self, id: &A::Id) -> DomainResult<Option<A>>;

    async fn list_all(&self) -> DomainResult<Vec<A>>;

    /// 列出满足规约的聚合
    async fn list(&self, spec: &dyn Specification<A>) -> DomainResult<Vec<A>>;

    async fn count(&self, spec: &dyn Specification<A>) -> DomainResult<usize>;

    async fn exists(&self, spec: &dyn Specification<A>) -> DomainResult<bool> {
        Ok(self.count(spec).await? > 0)
    }
}

/// 读写仓储
#[async_trait]
pub trait Repository<A>: ReadRepository<A>
where
    A: AggregateRoot,
{
    async fn add(&self, aggregate: A) -> DomainResult<A>;

    async fn update(&self, aggregate: A) -> DomainResult<()>;

    async fn delete(&self, id: &A::Id) -> DomainResult<()>;
}

#[async_trait]
impl<A, T> ReadRepository<A> for Arc<T>
where
    A: AggregateRoot + 'static,
    T: ReadRepository<A> + ?Sized,
{
    async fn get_by_id(&self, id: &A::Id) -> DomainResult<Option<A>> {
        (**self).get_by_id(id).await
    }

    async fn list_all(&self) -> DomainResult<Vec<A>> {
        (**self).list_all().await
    }

    async fn list(&self, spec: &dyn Specification<A>) -> DomainResult<Vec<A>> {
        (**self).list(spec).await
    }

    async fn count(&self, spec: &dyn Specification<A>) -> DomainResult<usize> {
        (**self).count(spec).await
    }

    async fn exists(&self, spec: &dyn Specification<A>) -> DomainResult<bool> {
        (**self).exists(spec).await
    }
}

#[async_trait]
impl<A, T> Repository<A> for Arc<T>
where
    A: AggregateRoot + 'static,
    T: Repository<A> + ?Sized,
{
    async fn add(&self, aggregate: A) -> DomainResult<A> {
        (**self).add(aggregate).await
    }

    async fn update(&self, aggregate: A) -> DomainResult<()> {
        (**self).update(aggregate).await
    }

    async fn delete(&self, id: &A::Id) -> DomainResult<()> {
        (**self).delete(id).await
    }
}
