use std::future::Future;
use std::pin::Pin;

/// A pinned, boxed future that is required to be Send.
pub type BoxFutureSend<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Context function producing a string, possibly after suspending.
pub type TextFn<C> = std::sync::Arc<dyn for<'a> Fn(&'a C) -> BoxFutureSend<'a, String> + Send + Sync>;

/// Handler step run against the mutable request context.
pub type HandlerFn<C> = std::sync::Arc<dyn for<'a> Fn(&'a mut C) -> BoxFutureSend<'a, anyhow::Result<crate::Flow>> + Send + Sync>;

/// Dynamic layout generator. Receives a fresh nested range and may either
/// fill it in place (returning `None`) or return a different range.
pub type DynamicFn<C> =
	std::sync::Arc<dyn for<'a> Fn(&'a C, &'a mut crate::Range<C>) -> BoxFutureSend<'a, anyhow::Result<Option<crate::Range<C>>>> + Send + Sync>;
