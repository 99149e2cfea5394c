//! Navigation control panel handed to menu handlers.
//!
//! Navigation is a two-phase protocol. A deferred call only records the
//! target. The next edit-style call of the same update without an explicit
//! grid consumes it (see [`crate::MenuTree::prepare`]); if none happens, the
//! dispatcher sends a dedicated grid edit once the handler chain is done.
//! An immediate call sends the edit right away and clears any recorded
//! target, so one navigation never causes two edits.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::context::PreparedCall;
use crate::tree::MenuTree;
use crate::{MenuContext, MenuError, Result};

/// Where a navigation leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
	/// Show this menu.
	Menu(Arc<str>),
	/// Remove the grid from the message.
	Close,
}

/// Control panel bound to the clicked menu and the current update.
///
/// Clones share the recorded navigation target.
pub struct MenuControl<C> {
	tree: Arc<MenuTree<C>>,
	menu_id: Arc<str>,
	payload: Arc<str>,
	pending: Arc<Mutex<Option<NavTarget>>>,
}

impl<C> Clone for MenuControl<C> {
	fn clone(&self) -> Self {
		Self {
			tree: Arc::clone(&self.tree),
			menu_id: Arc::clone(&self.menu_id),
			payload: Arc::clone(&self.payload),
			pending: Arc::clone(&self.pending),
		}
	}
}

impl<C> std::fmt::Debug for MenuControl<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MenuControl")
			.field("menu_id", &self.menu_id)
			.field("payload", &self.payload)
			.field("pending", &*self.pending.lock())
			.finish()
	}
}

impl<C: MenuContext> MenuControl<C> {
	pub(crate) fn new(tree: Arc<MenuTree<C>>, menu_id: Arc<str>, payload: Arc<str>) -> Self {
		Self {
			tree,
			menu_id,
			payload,
			pending: Arc::new(Mutex::new(None)),
		}
	}

	/// Control panel installed for the update `ctx` belongs to.
	pub fn current(ctx: &C) -> Result<Self> {
		ctx.attachments().get::<Self>().cloned().ok_or(MenuError::NoActiveMenu)
	}

	/// Id of the menu whose button was clicked.
	pub fn menu_id(&self) -> &str {
		&self.menu_id
	}

	/// Application payload of the clicked button.
	pub fn payload(&self) -> &str {
		&self.payload
	}

	pub fn tree(&self) -> &Arc<MenuTree<C>> {
		&self.tree
	}

	/// Navigation recorded but not yet sent.
	pub fn pending(&self) -> Option<NavTarget> {
		self.pending.lock().clone()
	}

	/// Re-renders the current menu.
	pub async fn update(&self, ctx: &C, immediate: bool) -> Result<()> {
		self.apply(ctx, NavTarget::Menu(Arc::clone(&self.menu_id)), immediate).await
	}

	/// Removes the grid.
	pub async fn close(&self, ctx: &C, immediate: bool) -> Result<()> {
		self.apply(ctx, NavTarget::Close, immediate).await
	}

	/// Navigates to the parent of the current menu.
	pub async fn back(&self, ctx: &C, immediate: bool) -> Result<()> {
		let menu = self.tree.at(&self.menu_id)?;
		let Some(parent) = menu.parent() else {
			return Err(MenuError::NoParent {
				id: self.menu_id.to_string(),
				known: self.tree.known_ids(),
			});
		};
		self.nav(ctx, parent, immediate).await
	}

	/// Navigates to menu `id` of the same tree.
	pub async fn nav(&self, ctx: &C, id: &str, immediate: bool) -> Result<()> {
		let target = Arc::clone(self.tree.at(id)?.shared_id());
		self.apply(ctx, NavTarget::Menu(target), immediate).await
	}

	async fn apply(&self, ctx: &C, target: NavTarget, immediate: bool) -> Result<()> {
		if !immediate {
			tracing::debug!(menu = %self.menu_id, ?target, "navigation deferred");
			*self.pending.lock() = Some(target);
			return Ok(());
		}
		self.pending.lock().take();
		let keyboard = self.tree.markup_for(ctx, &target).await?;
		ctx.transport()
			.execute(PreparedCall::edit_reply_markup(keyboard))
			.await
			.map_err(MenuError::Transport)
	}

	pub(crate) fn take_pending(&self) -> Option<NavTarget> {
		self.pending.lock().take()
	}

	/// Sends the recorded navigation if no edit call consumed it.
	pub(crate) async fn flush(&self, ctx: &C) -> Result<()> {
		let Some(target) = self.take_pending() else {
			return Ok(());
		};
		tracing::debug!(menu = %self.menu_id, ?target, "navigation flushed");
		let keyboard = self.tree.markup_for(ctx, &target).await?;
		ctx.transport()
			.execute(PreparedCall::edit_reply_markup(keyboard))
			.await
			.map_err(MenuError::Transport)
	}
}
