use std::sync::Arc;

use crate::future::{BoxFutureSend, HandlerFn};
use crate::{MenuError, Result};

/// Whether a handler chain keeps going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
	Continue,
	Stop,
}

/// One step of a button's handler chain.
pub struct Handler<C> {
	run: HandlerFn<C>,
}

impl<C> Clone for Handler<C> {
	fn clone(&self) -> Self {
		Self { run: Arc::clone(&self.run) }
	}
}

impl<C> std::fmt::Debug for Handler<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("Handler")
	}
}

impl<C: Send + 'static> Handler<C> {
	/// Wraps an async handler.
	///
	/// ```ignore
	/// Handler::new(|ctx: &mut Ctx| Box::pin(async move {
	///     ctx.reply("clicked").await?;
	///     Ok(Flow::Continue)
	/// }))
	/// ```
	pub fn new<F>(f: F) -> Self
	where
		F: for<'a> Fn(&'a mut C) -> BoxFutureSend<'a, anyhow::Result<Flow>> + Send + Sync + 'static,
	{
		Self { run: Arc::new(f) }
	}

	/// Wraps a synchronous handler.
	pub fn from_fn<F>(f: F) -> Self
	where
		F: Fn(&mut C) -> anyhow::Result<Flow> + Send + Sync + 'static,
	{
		Self::new(move |ctx| Box::pin(std::future::ready(f(ctx))))
	}

	/// Handler that does nothing and lets the chain continue.
	pub fn noop() -> Self {
		Self::from_fn(|_| Ok(Flow::Continue))
	}

	pub async fn call(&self, ctx: &mut C) -> anyhow::Result<Flow> {
		(self.run)(ctx).await
	}
}

/// Runs handlers in order until one returns [`Flow::Stop`].
pub(crate) async fn run_chain<C: Send + 'static>(handlers: &[Handler<C>], ctx: &mut C) -> Result<Flow> {
	for handler in handlers {
		if handler.call(ctx).await.map_err(MenuError::Handler)? == Flow::Stop {
			return Ok(Flow::Stop);
		}
	}
	Ok(Flow::Continue)
}
