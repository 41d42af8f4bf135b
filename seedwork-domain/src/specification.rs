//! 规约（Specification）模式
//!
//! 把业务筛选规则封装为可复用、可组合的对象，供仓储的查询/计数操作参数化。
//!
/// 规约核心 trait
///
/// 组合方法带 `Self: Sized` 约束，因此 `dyn Specification<T>` 仍可作为
/// 仓储参数的 trait object 使用。
pub trait Specification<T>: Send + Sync {
    /// 检查候选对象是否满足规约
    fn is_satisfied_by(&self, candidate: &T) -> bool;

    /// 与另一个规约做 AND 组合
    fn and<S>(self, other: S) -> And<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        And {
            left: self,
            right: other,
        }
    }

    /// 与另一个规约做 OR 组合
    fn or<S>(self, other: S) -> Or<Self, S>
    where
        Self: Sized,
        S: Specification<T>,
    {
        Or {
            left: self,
            right: other,
        }
    }

    /// 取反
    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not { inner: self }
    }
}

impl<T, S> Specification<T> for Box<S>
where
    S: Specification<T> + ?Sized,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (**self).is_satisfied_by(candidate)
    }
}

/// AND 组合：两个规约都满足时成立
pub struct And<A, B> {
    left: A,
    right: B,
}

impl<T, A, B> Specification<T> for And<A, B>
where
    A: Specification<T>,
    B: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) && self.right.is_satisfied_by(candidate)
    }
}

/// OR 组合：任一规约满足即成立
pub struct Or<A, B> {
    left: A,
    right: B,
}

impl<T, A, B> Specification<T> for Or<A, B>
where
    A: Specification<T>,
    B: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        self.left.is_satisfied_by(candidate) || self.right.is_satisfied_by(candidate)
    }
}

/// NOT：内部规约不满足时成立
pub struct Not<S> {
    inner: S,
}

impl<T, S> Specification<T> for Not<S>
where
    S: Specification<T>,
{
    fn is_satisfied_by(&self, candidate: &T) -> bool {
        !self.inner.is_satisfied_by(candidate)
    }
}

/// 恒真规约（用于“列出全部”类操作）
pub struct All;

impl<T> Specification<T> for All {
    fn is_satisfied_by(&self, _candidate: &T) -> bool {
        true
    }
}
