//! 内存版仓储（InMemoryRepository）
//!
//! 以 `DashMap` 为底的参考实现，键为聚合标识的字符串形式。
//! 典型用途：测试环境、示例与本地开发；生产实现应对接真实存储。
//!
use crate::entity::AggregateRoot;
use crate::error::{DomainError, DomainResult};
use crate::repository::{ReadRepository, Repository};
use crate::specification::Specification;
use async_trait::async_trait;
use dashmap::DashMap;

/// 简单的内存仓储实现
pub struct InMemoryRepository<A> {
    items: DashMap<String, A>,
}

impl<A> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self {
            items: DashMap::new(),
        }
    }
}

impl<A> InMemoryRepository<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl<A> ReadRepository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Clone + 'static,
{
    async fn get_by_id(&self, id: &A::Id) -> DomainResult<Option<A>> {
        Ok(self.items.get(&id.to_string()).map(|e| e.value().clone()))
    }

    async fn list_all(&self) -> DomainResult<Vec<A>> {
        Ok(self.items.iter().map(|e| e.value().clone()).collect())
    }

    async fn list(&self, spec: &dyn Specification<A>) -> DomainResult<Vec<A>> {
        Ok(self
            .items
            .iter()
            .filter(|e| spec.is_satisfied_by(e.value()))
            .map(|e| e.value().clone())
            .collect())
    }

    async fn count(&self, spec: &dyn Specification<A>) -> DomainResult<usize> {
        Ok(self
            .items
            .iter()
            .filter(|e| spec.is_satisfied_by(e.value()))
            .count())
    }
}

#[async_trait]
impl<A> Repository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Clone + 'static,
{
    async fn add(&self, aggregate: A) -> DomainResult<A> {
        self.items
            .insert(aggregate.id().to_string(), aggregate.clone());
        Ok(aggregate)
    }

    async fn update(&self, aggregate: A) -> DomainResult<()> {
        let key = aggregate.id().to_string();
        if !self.items.contains_key(&key) {
            return Err(DomainError::NotFound {
                reason: format!("aggregate {key} does not exist"),
            });
        }
        self.items.insert(key, aggregate);
        Ok(())
    }

    async fn delete(&self, id: &A::Id) -> DomainResult<()> {
        let key = id.to_string();
        self.items
            .remove(&key)
            .ok_or_else(|| DomainError::NotFound {
                reason: format!("aggregate {key} does not exist"),
            })?;
        Ok(())
    }
}
