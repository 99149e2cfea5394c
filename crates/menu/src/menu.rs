//! Menus and their registry.
//!
//! A [`Menu`] is a [`Range`] with an identity, options and a place in the
//! navigation graph. Registering menu B under menu A moves B, together with
//! everything B had registered, into A's registry and records A as B's
//! parent. Parent links are stored as ids, so attaching a subtree is a map
//! union.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use indexmap::IndexMap;
use trellis_wire::validate_menu_id;

use crate::button::Text;
use crate::range::{Operation, Range};
use crate::tree::MenuTree;
use crate::{Handler, MenuContext, MenuError, Result};

/// Default notice shown when a click hits an outdated grid.
pub const DEFAULT_OUTDATED_NOTICE: &str = "Menu was outdated, try again!";

/// What happens when a click no longer matches the current render.
pub enum OutdatedPolicy<C> {
	/// Acknowledge with this notice and rewrite the grid to the current render.
	Notice(String),
	/// Trust coordinates and run handlers regardless of drift.
	Disabled,
	/// Run these handlers instead.
	Custom(Vec<Handler<C>>),
}

impl<C> Default for OutdatedPolicy<C> {
	fn default() -> Self {
		Self::Notice(DEFAULT_OUTDATED_NOTICE.to_owned())
	}
}

impl<C> Clone for OutdatedPolicy<C> {
	fn clone(&self) -> Self {
		match self {
			Self::Notice(text) => Self::Notice(text.clone()),
			Self::Disabled => Self::Disabled,
			Self::Custom(handlers) => Self::Custom(handlers.clone()),
		}
	}
}

impl<C> std::fmt::Debug for OutdatedPolicy<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Notice(text) => f.debug_tuple("Notice").field(text).finish(),
			Self::Disabled => f.write_str("Disabled"),
			Self::Custom(handlers) => f.debug_tuple("Custom").field(&handlers.len()).finish(),
		}
	}
}

impl<C> OutdatedPolicy<C> {
	pub const fn is_disabled(&self) -> bool {
		matches!(self, Self::Disabled)
	}
}

/// Per-menu configuration.
pub struct MenuOptions<C> {
	/// Acknowledge clicks automatically before running handlers.
	pub auto_answer: bool,
	pub on_outdated: OutdatedPolicy<C>,
	/// Custom fingerprint; switches tokens from structural to custom tags.
	pub fingerprint: Option<Text<C>>,
}

impl<C> Default for MenuOptions<C> {
	fn default() -> Self {
		Self {
			auto_answer: true,
			on_outdated: OutdatedPolicy::default(),
			fingerprint: None,
		}
	}
}

impl<C> Clone for MenuOptions<C> {
	fn clone(&self) -> Self {
		Self {
			auto_answer: self.auto_answer,
			on_outdated: self.on_outdated.clone(),
			fingerprint: self.fingerprint.clone(),
		}
	}
}

impl<C> std::fmt::Debug for MenuOptions<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MenuOptions")
			.field("auto_answer", &self.auto_answer)
			.field("on_outdated", &self.on_outdated)
			.field("fingerprint", &self.fingerprint)
			.finish()
	}
}

/// A navigable menu.
pub struct Menu<C> {
	id: Arc<str>,
	range: Range<C>,
	options: MenuOptions<C>,
	parent: Option<Arc<str>>,
	registry: IndexMap<Arc<str>, Menu<C>>,
}

impl<C> std::fmt::Debug for Menu<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Menu")
			.field("id", &self.id)
			.field("parent", &self.parent)
			.field("options", &self.options)
			.field("registered", &self.registry.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl<C> Deref for Menu<C> {
	type Target = Range<C>;

	fn deref(&self) -> &Range<C> {
		&self.range
	}
}

impl<C> DerefMut for Menu<C> {
	fn deref_mut(&mut self) -> &mut Range<C> {
		&mut self.range
	}
}

impl<C: MenuContext> Menu<C> {
	/// Creates a menu with default options.
	pub fn new(id: impl Into<String>) -> Result<Self> {
		Self::with_options(id, MenuOptions::default())
	}

	/// Creates a menu, rejecting ids containing the token delimiter and a
	/// custom fingerprint combined with disabled outdated checks.
	pub fn with_options(id: impl Into<String>, options: MenuOptions<C>) -> Result<Self> {
		let id = id.into();
		validate_menu_id(&id)?;
		if options.fingerprint.is_some() && options.on_outdated.is_disabled() {
			return Err(MenuError::FingerprintWithoutOutdatedCheck { id });
		}
		let id: Arc<str> = Arc::from(id);
		Ok(Self {
			range: Range::owned_by(Arc::clone(&id)),
			id,
			options,
			parent: None,
			registry: IndexMap::new(),
		})
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub(crate) fn shared_id(&self) -> &Arc<str> {
		&self.id
	}

	/// Parent id used by back navigation.
	pub fn parent(&self) -> Option<&str> {
		self.parent.as_deref()
	}

	pub fn options(&self) -> &MenuOptions<C> {
		&self.options
	}

	pub fn range(&self) -> &Range<C> {
		&self.range
	}

	/// Registers `child` with this menu as its parent.
	pub fn register(&mut self, child: Menu<C>) -> Result<&mut Self> {
		let parent = Arc::clone(&self.id);
		self.attach(child, Some(parent))
	}

	/// Registers `child` with an explicit parent; `None` suppresses back
	/// navigation from `child`.
	pub fn register_under(&mut self, child: Menu<C>, parent: Option<&str>) -> Result<&mut Self> {
		self.attach(child, parent.map(Arc::from))
	}

	/// Registers several children with this menu as their parent.
	pub fn register_all(&mut self, children: impl IntoIterator<Item = Menu<C>>) -> Result<&mut Self> {
		for child in children {
			self.register(child)?;
		}
		Ok(self)
	}

	fn attach(&mut self, mut child: Menu<C>, parent: Option<Arc<str>>) -> Result<&mut Self> {
		let incoming = std::iter::once(&child.id).chain(child.registry.keys());
		for id in incoming {
			if *id == self.id || self.registry.contains_key(id) {
				return Err(MenuError::DuplicateId { id: id.to_string() });
			}
		}
		let nested = std::mem::take(&mut child.registry);
		child.parent = parent;
		tracing::debug!(menu = %self.id, child = %child.id, merged = nested.len(), "menu registered");
		self.registry.insert(Arc::clone(&child.id), child);
		self.registry.extend(nested);
		Ok(self)
	}

	/// Resolves `id` to this menu or a registered one.
	pub fn at(&self, id: &str) -> Result<&Menu<C>> {
		if id == &*self.id {
			return Ok(self);
		}
		self.registry.get(id).ok_or_else(|| self.unknown(id))
	}

	/// Layout of this menu or a registered one, for further editing.
	pub fn range_mut(&mut self, id: &str) -> Result<&mut Range<C>> {
		if id == &*self.id {
			return Ok(&mut self.range);
		}
		match self.registry.get_index_of(id) {
			Some(index) => Ok(&mut self.registry[index].range),
			None => Err(self.unknown(id)),
		}
	}

	/// Ids of this menu and every registered one, in registration order.
	pub fn known_ids(&self) -> Vec<String> {
		std::iter::once(&self.id).chain(self.registry.keys()).map(|id| id.to_string()).collect()
	}

	fn unknown(&self, id: &str) -> MenuError {
		MenuError::UnknownMenu {
			id: id.to_owned(),
			known: self.known_ids(),
		}
	}

	/// Freezes this menu and its registry into an immutable tree that can
	/// serve requests. No structural change is possible afterwards.
	pub fn freeze(mut self) -> Result<Arc<MenuTree<C>>> {
		let registry = std::mem::take(&mut self.registry);
		let mut menus = IndexMap::with_capacity(registry.len() + 1);
		menus.insert(Arc::clone(&self.id), self);
		menus.extend(registry);
		for menu in menus.values() {
			menu.check_static_fingerprints()?;
		}
		Ok(Arc::new(MenuTree::new(menus)))
	}

	/// Button-level fingerprints contradict disabled outdated checks too.
	fn check_static_fingerprints(&self) -> Result<()> {
		if !self.options.on_outdated.is_disabled() {
			return Ok(());
		}
		let mut blocks = self.range.ops().iter().filter_map(|op| match op {
			Operation::Block(block) => Some(block),
			_ => None,
		});
		let fingerprinted = blocks.any(|block| {
			block
				.iter()
				.flatten()
				.any(|button| button.as_callback().is_some_and(|callback| callback.fingerprint_text().is_some()))
		});
		if fingerprinted {
			return Err(MenuError::FingerprintWithoutOutdatedCheck { id: self.id.to_string() });
		}
		Ok(())
	}
}
