use bon::Builder;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询）所需的横切信息：
/// - 链路追踪：关联 `correlation_id` 与因果链 `causation_id`；
/// - 审计主体：触发调用的主体类型与标识；
/// - 幂等键：用于在基础设施层实现请求幂等（如 API 层重复提交保护）。
///
/// 典型用法：
/// ```rust
/// use seedwork_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .correlation_id("cor-123".to_string())
///     .actor_type("user".to_string())
///     .actor_id("u-1".to_string())
///     .build();
/// assert_eq!(ctx.correlation_id(), Some("cor-123"));
/// ```
#[derive(Builder, Default, Debug, Clone)]
pub struct AppContext {
    /// 关联ID
    correlation_id: Option<String>,
    /// 因果ID
    causation_id: Option<String>,
    /// 触发调用的主体类型（如用户、系统等）
    actor_type: Option<String>,
    /// 触发调用的主体ID
    actor_id: Option<String>,
    /// 幂等键（可选）：为空则由上层或基础设施决定是否参与幂等
    idempotency_key: Option<String>,
}

impl AppContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    pub fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }
}
