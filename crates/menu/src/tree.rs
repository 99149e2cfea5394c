//! Frozen menu trees: rendering, outgoing call preparation and click dispatch.
//!
//! # Role
//!
//! [`MenuTree`] is what serves requests. It resolves menu references in
//! outgoing calls ([`MenuTree::prepare`]) and verifies incoming click tokens
//! ([`MenuTree::handle`]) before running the bound handler chain.
//!
//! # Invariants
//!
//! - The tree is immutable; concurrent updates only read it.
//! - Unknown or foreign callback data never errors, the update is ignored.
//! - A token that does not match the current render never reaches a button
//!   handler; it takes the outdated path.
//! - At most one edit call per update is caused by navigation.

use std::sync::Arc;

use indexmap::IndexMap;
use trellis_wire::{Token, split};

use crate::button::CallbackButton;
use crate::context::{OutgoingCall, PreparedCall, ReplyMarkup};
use crate::handler::run_chain;
use crate::markup::InlineKeyboard;
use crate::menu::{Menu, OutdatedPolicy};
use crate::nav::{MenuControl, NavTarget};
use crate::render::{Identity, WireEncoder, expected_tag, render, shape};
use crate::{Handler, MenuContext, MenuError, Result};

/// Outcome of [`MenuTree::handle`] for one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
	/// Not a click on one of this tree's menus.
	Ignored,
	/// The token matched and the handler chain ran.
	Handled,
	/// The token no longer matched; the outdated policy ran instead.
	Outdated,
}

/// Result of checking a token against the current render.
///
/// `button` describes what currently sits at the clicked position, if anything.
enum Verdict<C> {
	Valid(CallbackButton<C>),
	Outdated { check: &'static str, button: Option<String> },
	Unmatched { button: Option<String> },
}

impl<C> Verdict<C> {
	/// A failed `check`; with outdated checks disabled the click is only unmatched.
	fn mismatch(lenient: bool, check: &'static str, button: Option<String>) -> Self {
		if lenient {
			Self::Unmatched { button }
		} else {
			Self::Outdated { check, button }
		}
	}
}

/// Immutable set of menus sharing one registry.
pub struct MenuTree<C> {
	menus: IndexMap<Arc<str>, Menu<C>>,
}

impl<C> std::fmt::Debug for MenuTree<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MenuTree").field("menus", &self.menus.keys().collect::<Vec<_>>()).finish()
	}
}

impl<C: MenuContext> MenuTree<C> {
	/// `menus` starts with the root.
	pub(crate) fn new(menus: IndexMap<Arc<str>, Menu<C>>) -> Self {
		Self { menus }
	}

	/// The menu the tree was frozen from.
	pub fn root(&self) -> Option<&Menu<C>> {
		self.menus.first().map(|(_, menu)| menu)
	}

	pub fn get(&self, id: &str) -> Option<&Menu<C>> {
		self.menus.get(id)
	}

	/// Resolves `id`, naming every known id on failure.
	pub fn at(&self, id: &str) -> Result<&Menu<C>> {
		self.get(id).ok_or_else(|| MenuError::UnknownMenu {
			id: id.to_owned(),
			known: self.known_ids(),
		})
	}

	pub fn known_ids(&self) -> Vec<String> {
		self.menus.keys().map(|id| id.to_string()).collect()
	}

	/// Renders menu `id` with fresh tokens.
	pub async fn render(&self, id: &str, ctx: &C) -> Result<InlineKeyboard> {
		self.render_menu(self.at(id)?, ctx).await
	}

	async fn render_menu(&self, menu: &Menu<C>, ctx: &C) -> Result<InlineKeyboard> {
		let encoder = WireEncoder::new(menu.id(), menu.options().fingerprint.as_ref());
		let rows = render(menu.range(), ctx, encoder).await?;
		tracing::trace!(menu = menu.id(), rows = rows.len(), "menu rendered");
		Ok(InlineKeyboard::new(rows))
	}

	/// Grid a navigation target stands for; closing removes the grid.
	pub(crate) async fn markup_for(&self, ctx: &C, target: &NavTarget) -> Result<InlineKeyboard> {
		match target {
			NavTarget::Menu(id) => self.render(id, ctx).await,
			NavTarget::Close => Ok(InlineKeyboard::default()),
		}
	}

	/// Replaces menu references with rendered grids and, for edit-style calls
	/// without a grid, injects a pending navigation of the current update.
	pub async fn prepare(&self, ctx: &C, call: OutgoingCall) -> Result<PreparedCall> {
		let OutgoingCall { method, params, reply_markup } = call;
		let reply_markup = match reply_markup {
			Some(ReplyMarkup::Menu(id)) => Some(self.render(&id, ctx).await?),
			Some(ReplyMarkup::Inline(keyboard)) => Some(keyboard),
			None if method.is_edit() => inject_pending(ctx).await?,
			None => None,
		};
		Ok(PreparedCall {
			method,
			params,
			reply_markup,
		})
	}

	/// Prepares `call` and sends it through the context's transport.
	pub async fn execute(&self, ctx: &C, call: OutgoingCall) -> Result<()> {
		let prepared = self.prepare(ctx, call).await?;
		ctx.transport().execute(prepared).await.map_err(MenuError::Transport)
	}

	/// Handles one incoming update.
	pub async fn handle(self: &Arc<Self>, ctx: &mut C) -> Result<Dispatch> {
		let Some(data) = ctx.callback_data().map(str::to_owned) else {
			return Ok(Dispatch::Ignored);
		};
		let Some(raw) = split(&data) else {
			tracing::debug!(data = %data, "callback data is not a menu token");
			return Ok(Dispatch::Ignored);
		};
		let Some(menu) = self.get(raw.menu_id) else {
			tracing::debug!(menu = raw.menu_id, "click on unknown menu");
			return Ok(Dispatch::Ignored);
		};
		let token = raw.resolve()?;

		match self.verify(menu, ctx, &token).await? {
			Verdict::Unmatched { button } => {
				tracing::debug!(
					menu = token.menu_id,
					row = token.row,
					col = token.col,
					button = ?button,
					"no callback button at position"
				);
				Ok(Dispatch::Ignored)
			}
			Verdict::Outdated { check, button } => {
				tracing::debug!(
					menu = token.menu_id,
					row = token.row,
					col = token.col,
					check,
					button = ?button,
					"menu outdated"
				);
				self.outdated(menu, ctx, token.payload).await?;
				Ok(Dispatch::Outdated)
			}
			Verdict::Valid(callback) => {
				if menu.options().auto_answer {
					ctx.transport().answer_callback_query(None).await.map_err(MenuError::Transport)?;
				}
				self.run_with_control(menu, ctx, token.payload, callback.handlers()).await?;
				Ok(Dispatch::Handled)
			}
		}
	}

	/// Re-renders `menu` dry and compares the button at the token position.
	async fn verify(&self, menu: &Menu<C>, ctx: &C, token: &Token<'_>) -> Result<Verdict<C>> {
		let lenient = menu.options().on_outdated.is_disabled();
		let grid = render(menu.range(), ctx, Identity).await?;
		let Some(button) = grid.get(token.row).and_then(|row| row.get(token.col)) else {
			return Ok(Verdict::mismatch(lenient, "position", None));
		};
		let Some(callback) = button.as_callback() else {
			return Ok(Verdict::mismatch(lenient, "kind", Some(button.describe())));
		};
		if lenient {
			return Ok(Verdict::Valid(callback.clone()));
		}

		let dims = shape(&grid);
		let expected = expected_tag(token.tag.kind(), ctx, &dims, button, callback, menu.options().fingerprint.as_ref()).await;
		if expected != Some(token.tag) {
			return Ok(Verdict::mismatch(false, "fingerprint", Some(button.describe())));
		}
		if callback.resolve_payload(ctx).await != token.payload {
			return Ok(Verdict::mismatch(false, "payload", Some(button.describe())));
		}
		Ok(Verdict::Valid(callback.clone()))
	}

	async fn outdated(self: &Arc<Self>, menu: &Menu<C>, ctx: &mut C, payload: &str) -> Result<()> {
		match &menu.options().on_outdated {
			OutdatedPolicy::Notice(notice) => {
				if let Err(err) = ctx.transport().answer_callback_query(Some(notice.clone())).await {
					tracing::warn!(menu = menu.id(), error = %err, "failed to send outdated notice");
				}
				let keyboard = self.render_menu(menu, ctx).await?;
				ctx.transport()
					.execute(PreparedCall::edit_reply_markup(keyboard))
					.await
					.map_err(MenuError::Transport)
			}
			OutdatedPolicy::Custom(handlers) => {
				if menu.options().auto_answer {
					ctx.transport().answer_callback_query(None).await.map_err(MenuError::Transport)?;
				}
				self.run_with_control(menu, ctx, payload, handlers).await
			}
			OutdatedPolicy::Disabled => Ok(()),
		}
	}

	/// Runs `handlers` with a control panel installed, then flushes any
	/// navigation that no edit call picked up.
	async fn run_with_control(self: &Arc<Self>, menu: &Menu<C>, ctx: &mut C, payload: &str, handlers: &[Handler<C>]) -> Result<()> {
		let control = MenuControl::new(Arc::clone(self), Arc::clone(menu.shared_id()), Arc::from(payload));
		ctx.attachments_mut().insert(control.clone());
		let outcome = run_chain(handlers, ctx).await;
		ctx.attachments_mut().remove::<MenuControl<C>>();
		outcome?;
		control.flush(ctx).await
	}
}

/// Takes the pending navigation of the current update, if any, and renders it.
async fn inject_pending<C: MenuContext>(ctx: &C) -> Result<Option<InlineKeyboard>> {
	let Some(control) = ctx.attachments().get::<MenuControl<C>>() else {
		return Ok(None);
	};
	let Some(target) = control.take_pending() else {
		return Ok(None);
	};
	tracing::debug!(menu = control.menu_id(), ?target, "navigation injected into edit call");
	control.tree().markup_for(ctx, &target).await.map(Some)
}
