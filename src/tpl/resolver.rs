use crate::value::Value;
use async_trait::async_trait;

/// `Resolver` replaces the default Ref lookup for every placeholder.
///
/// It receives the raw (trimmed) placeholder expression and the scope, and
/// returns the value to stringify. Whether an error aborts rendering or falls
/// back to the default lookup is decided by
/// [`ResolverMode`](crate::ResolverMode).
///
/// Any `Fn(&str, &Value) -> anyhow::Result<Value>` closure is a resolver.
pub trait Resolver: Send + Sync {
    fn resolve(&self, path: &str, scope: &Value) -> anyhow::Result<Value>;
}

impl<F> Resolver for F
where
    F: Fn(&str, &Value) -> anyhow::Result<Value> + Send + Sync,
{
    fn resolve(&self, path: &str, scope: &Value) -> anyhow::Result<Value> {
        self(path, scope)
    }
}

/// The asynchronous counterpart of [`Resolver`], used by
/// [`Renderer::render_async`](crate::Renderer::render_async).
///
/// All placeholders of one render are resolved concurrently; the output keeps
/// template order regardless of completion order.
#[async_trait]
pub trait AsyncResolver: Send + Sync {
    async fn resolve(&self, path: &str, scope: &Value) -> anyhow::Result<Value>;
}
