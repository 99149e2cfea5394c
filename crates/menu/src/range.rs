//! Declarative layout builder.
//!
//! A [`Range`] is an ordered list of operations. Order is significant: the
//! renderer replays operations left to right and derives every button's row
//! and column from everything placed before it.

use std::sync::Arc;

use trellis_wire::{check_budget, validate_payload};

use crate::button::{Button, ButtonKind, CallbackButton, Text};
use crate::future::{BoxFutureSend, DynamicFn};
use crate::markup::LoginUrl;
use crate::{Flow, Handler, MenuControl, MenuContext, Result};

/// One layout step.
pub enum Operation<C> {
	/// Literal block; its first row continues the current row.
	Block(Vec<Vec<Button<C>>>),
	/// Starts a new, empty row.
	RowBreak,
	/// Generates buttons from the request context at render time.
	Dynamic(DynamicFn<C>),
}

impl<C> Clone for Operation<C> {
	fn clone(&self) -> Self {
		match self {
			Self::Block(block) => Self::Block(block.clone()),
			Self::RowBreak => Self::RowBreak,
			Self::Dynamic(f) => Self::Dynamic(Arc::clone(f)),
		}
	}
}

impl<C> std::fmt::Debug for Operation<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Block(block) => f.debug_tuple("Block").field(block).finish(),
			Self::RowBreak => f.write_str("RowBreak"),
			Self::Dynamic(_) => f.write_str("Dynamic"),
		}
	}
}

/// Ordered operation list with chaining builders.
///
/// Ranges owned by a menu know the menu id and check callback buttons
/// against the token byte budget as they are added. Free-standing ranges
/// (including the ones handed to dynamic generators) are checked at render
/// time instead.
pub struct Range<C> {
	ops: Vec<Operation<C>>,
	owner: Option<Arc<str>>,
}

impl<C> Clone for Range<C> {
	fn clone(&self) -> Self {
		Self {
			ops: self.ops.clone(),
			owner: self.owner.clone(),
		}
	}
}

impl<C> std::fmt::Debug for Range<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Range").field("owner", &self.owner).field("ops", &self.ops).finish()
	}
}

impl<C> Default for Range<C> {
	fn default() -> Self {
		Self {
			ops: Vec::new(),
			owner: None,
		}
	}
}

impl<C: MenuContext> Range<C> {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn owned_by(owner: Arc<str>) -> Self {
		Self {
			ops: Vec::new(),
			owner: Some(owner),
		}
	}

	pub fn ops(&self) -> &[Operation<C>] {
		&self.ops
	}

	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}

	/// Appends a raw operation.
	pub fn add(&mut self, op: Operation<C>) -> Result<&mut Self> {
		if let Operation::Block(block) = &op {
			for button in block.iter().flatten() {
				self.check(button)?;
			}
		}
		self.ops.push(op);
		Ok(self)
	}

	/// Starts a new row.
	pub fn row(&mut self) -> &mut Self {
		self.ops.push(Operation::RowBreak);
		self
	}

	/// Adds a single button to the current row.
	pub fn button(&mut self, button: Button<C>) -> Result<&mut Self> {
		self.check(&button)?;
		self.ops.push(Operation::Block(vec![vec![button]]));
		Ok(self)
	}

	fn push(&mut self, button: Button<C>) -> &mut Self {
		self.ops.push(Operation::Block(vec![vec![button]]));
		self
	}

	pub fn url(&mut self, label: impl Into<Text<C>>, url: impl Into<String>) -> &mut Self {
		self.push(Button::new(label, ButtonKind::Url(url.into())))
	}

	pub fn login(&mut self, label: impl Into<Text<C>>, login: LoginUrl) -> &mut Self {
		self.push(Button::new(label, ButtonKind::Login(login)))
	}

	/// Callback button running `handler` when clicked.
	pub fn text(&mut self, label: impl Into<Text<C>>, handler: Handler<C>) -> Result<&mut Self> {
		self.button(Button::callback(label, CallbackButton::new().handler(handler)))
	}

	/// Callback button with an explicit payload, fingerprint or handler chain.
	pub fn callback(&mut self, label: impl Into<Text<C>>, callback: CallbackButton<C>) -> Result<&mut Self> {
		self.button(Button::callback(label, callback))
	}

	pub fn switch_inline(&mut self, label: impl Into<Text<C>>, query: impl Into<String>) -> &mut Self {
		self.push(Button::new(label, ButtonKind::SwitchInline(query.into())))
	}

	pub fn switch_inline_current(&mut self, label: impl Into<Text<C>>, query: impl Into<String>) -> &mut Self {
		self.push(Button::new(label, ButtonKind::SwitchInlineCurrent(query.into())))
	}

	pub fn web_app(&mut self, label: impl Into<Text<C>>, url: impl Into<String>) -> &mut Self {
		self.push(Button::new(label, ButtonKind::WebApp(url.into())))
	}

	pub fn game(&mut self, label: impl Into<Text<C>>) -> &mut Self {
		self.push(Button::new(label, ButtonKind::Game))
	}

	pub fn pay(&mut self, label: impl Into<Text<C>>) -> &mut Self {
		self.push(Button::new(label, ButtonKind::Pay))
	}

	/// Button that navigates to menu `target`, then runs `handler` (if any).
	///
	/// The navigation is deferred, so an edit call made by `handler` carries
	/// the target grid.
	pub fn submenu(&mut self, label: impl Into<Text<C>>, target: impl Into<String>, handler: Option<Handler<C>>) -> Result<&mut Self> {
		let target: Arc<str> = Arc::from(target.into());
		let navigate = Handler::new(move |ctx: &mut C| {
			let target = Arc::clone(&target);
			Box::pin(async move {
				let control = MenuControl::<C>::current(ctx)?;
				control.nav(ctx, &target, false).await?;
				Ok(Flow::Continue)
			})
		});
		self.callback(label, with_trailing(navigate, handler))
	}

	/// Button that navigates to the parent menu, then runs `handler` (if any).
	pub fn back(&mut self, label: impl Into<Text<C>>, handler: Option<Handler<C>>) -> Result<&mut Self> {
		let navigate = Handler::new(|ctx: &mut C| {
			Box::pin(async move {
				let control = MenuControl::<C>::current(ctx)?;
				control.back(ctx, false).await?;
				Ok(Flow::Continue)
			})
		});
		self.callback(label, with_trailing(navigate, handler))
	}

	/// Adds a generator evaluated on every render.
	///
	/// The generator receives a fresh range; it may fill that range and
	/// return `Ok(None)`, or return another range to use instead.
	pub fn dynamic<F>(&mut self, f: F) -> &mut Self
	where
		F: for<'a> Fn(&'a C, &'a mut Range<C>) -> BoxFutureSend<'a, anyhow::Result<Option<Range<C>>>> + Send + Sync + 'static,
	{
		self.ops.push(Operation::Dynamic(Arc::new(f)));
		self
	}

	/// Synchronous, builder-style [`Self::dynamic`].
	pub fn dynamic_sync<F>(&mut self, f: F) -> &mut Self
	where
		F: Fn(&C, &mut Range<C>) -> anyhow::Result<()> + Send + Sync + 'static,
	{
		self.dynamic(move |ctx, range| Box::pin(std::future::ready(f(ctx, range).map(|()| None))))
	}

	/// Replays another range's operations onto this one.
	pub fn append(&mut self, range: Range<C>) -> Result<&mut Self> {
		for op in range.ops {
			self.add(op)?;
		}
		Ok(self)
	}

	/// Rejects static payloads that break framing, and, for menu-owned
	/// ranges, buttons whose token could not fit the byte budget.
	fn check(&self, button: &Button<C>) -> Result<()> {
		let Some(callback) = button.as_callback() else {
			return Ok(());
		};
		let payload = match callback.payload_text() {
			Some(text) => match text.as_static() {
				Some(payload) => payload,
				None => return Ok(()),
			},
			None => "",
		};
		match &self.owner {
			Some(owner) => check_budget(owner, payload)?,
			None => validate_payload(payload)?,
		}
		Ok(())
	}
}

fn with_trailing<C: MenuContext>(navigate: Handler<C>, handler: Option<Handler<C>>) -> CallbackButton<C> {
	let callback = CallbackButton::new().handler(navigate);
	match handler {
		Some(handler) => callback.handler(handler),
		None => callback,
	}
}

impl<C: MenuContext> From<Vec<Vec<Button<C>>>> for Range<C> {
	fn from(block: Vec<Vec<Button<C>>>) -> Self {
		Self {
			ops: vec![Operation::Block(block)],
			owner: None,
		}
	}
}
