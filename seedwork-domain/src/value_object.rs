//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象：相等性由一组有序的“等值组件”决定，
//! 两个实例当且仅当组件序列逐项相等（含长度）时相等；哈希是同一序列的
//! 顺序敏感组合。校验在构造时完成，构造后不可变。
//!
//! 可空组件用 `Option<T>` 表达：`None == None` 成立，`None` 与任何
//! `Some(_)` 不等，哈希由 `Option` 的判别值充当固定哨兵。
//!
use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 可做动态相等与哈希的组件内核
trait DynEq: Any + fmt::Debug + Send + Sync {
    fn dyn_eq(&self, other: &dyn DynEq) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
    fn as_any(&self) -> &dyn Any;
}

impl<T> DynEq for T
where
    T: Any + PartialEq + Hash + fmt::Debug + Send + Sync,
{
    fn dyn_eq(&self, other: &dyn DynEq) -> bool {
        // 类型不同的组件一律不等
        other.as_any().downcast_ref::<T>().is_some_and(|o| self == o)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 等值组件：对任意可比较、可哈希的值做类型擦除后的快照
pub struct EqualityComponent(Box<dyn DynEq>);

impl EqualityComponent {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + PartialEq + Hash + fmt::Debug + Send + Sync,
    {
        Self(Box::new(value))
    }
}

impl fmt::Debug for EqualityComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for EqualityComponent {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

impl Eq for EqualityComponent {}

impl Hash for EqualityComponent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

/// 值对象抽象
///
/// 实现方提供构造期校验与有序等值组件；`value_eq`/`value_hash` 给出
/// 结构化相等与顺序敏感哈希的默认计算，具体类型的 `PartialEq`/`Hash`
/// 直接委托即可。组件序列为空是合法的：该类型的所有实例彼此相等。
pub trait ValueObject: fmt::Debug + Send + Sync {
    /// 业务校验失败时的错误类型
    type Error;

    /// 创建值对象时进行验证
    fn validate(&self) -> Result<(), Self::Error>;

    /// 决定相等性的有序组件序列
    fn equality_components(&self) -> Vec<EqualityComponent>;

    /// 组件序列逐项相等（含长度）即相等
    fn value_eq(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.equality_components() == other.equality_components()
    }

    /// 同一组件序列的顺序敏感哈希组合
    fn value_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for component in self.equality_components() {
            component.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// 人名值对象
///
/// 构造时去除两端空白；姓或名为空白时独立报错。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonName {
    first: String,
    last: String,
}

impl PersonName {
    pub fn new(first: &str, last: &str) -> DomainResult<Self> {
        let name = Self {
            first: first.trim().to_string(),
            last: last.trim().to_string(),
        };
        name.validate()?;
        Ok(name)
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    /// `"John Doe"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }

    /// `"Doe, John"`
    pub fn reversed_name(&self) -> String {
        format!("{}, {}", self.last, self.first)
    }

    /// 单字符缩写，如 `"JD"`
    pub fn initials(&self) -> String {
        self.first
            .chars()
            .take(1)
            .chain(self.last.chars().take(1))
            .collect()
    }
}

impl ValueObject for PersonName {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.first.trim().is_empty() {
            return Err(DomainError::InvalidValue {
                reason: "first name must not be blank".to_string(),
            });
        }
        if self.last.trim().is_empty() {
            return Err(DomainError::InvalidValue {
                reason: "last name must not be blank".to_string(),
            });
        }
        Ok(())
    }

    fn equality_components(&self) -> Vec<EqualityComponent> {
        vec![
            EqualityComponent::new(self.first.clone()),
            EqualityComponent::new(self.last.clone()),
        ]
    }
}

impl PartialEq for PersonName {
    fn eq(&self, other: &Self) -> bool {
        self.value_eq(other)
    }
}

impl Eq for PersonName {}

impl Hash for PersonName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.value_hash());
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
