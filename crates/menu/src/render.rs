//! Flattening of a [`Range`] into a concrete grid.
//!
//! # Role
//!
//! Rendering happens in two passes. [`flatten`] replays the operation list
//! against a request context and yields the declared buttons at their final
//! positions. [`render`] then hands every positioned button to a
//! [`ButtonTransform`], which either encodes it for the wire
//! ([`WireEncoder`]) or leaves it untouched ([`Identity`]) so the verifier
//! can recompute the button that currently sits at a known position.
//!
//! # Invariants
//!
//! - The accumulator starts with one empty row; an empty range renders to `[[]]`.
//! - Operations are evaluated strictly in order, dynamic ones included,
//!   because positions depend on everything rendered before.
//! - Dynamic output is replayed onto the shared accumulator and continues
//!   the current row unless it starts with a row break itself.

use async_trait::async_trait;
use trellis_wire::{Tag, TagKind, encode};

use crate::button::{Button, ButtonKind, CallbackButton, Text};
use crate::future::BoxFutureSend;
use crate::markup::{CallbackGame, InlineAction, InlineButton, WebAppInfo};
use crate::range::{Operation, Range};
use crate::{MenuContext, MenuError, Result};

/// Row-major grid of rendered items.
pub type Grid<T> = Vec<Vec<T>>;

/// Column count of every row.
pub fn shape<T>(grid: &Grid<T>) -> Vec<usize> {
	grid.iter().map(Vec::len).collect()
}

/// Flattens `range` into positioned, declared buttons.
pub async fn flatten<C: MenuContext>(range: &Range<C>, ctx: &C) -> Result<Grid<Button<C>>> {
	let mut acc = vec![Vec::new()];
	reduce(range.ops(), ctx, &mut acc).await?;
	Ok(acc)
}

fn reduce<'a, C: MenuContext>(ops: &'a [Operation<C>], ctx: &'a C, acc: &'a mut Grid<Button<C>>) -> BoxFutureSend<'a, Result<()>> {
	Box::pin(async move {
		for op in ops {
			match op {
				Operation::Block(block) => push_block(acc, block),
				Operation::RowBreak => acc.push(Vec::new()),
				Operation::Dynamic(generate) => {
					let mut nested = Range::new();
					let produced = generate(ctx, &mut nested).await.map_err(MenuError::Handler)?;
					let nested = produced.unwrap_or(nested);
					reduce(nested.ops(), ctx, acc).await?;
				}
			}
		}
		Ok(())
	})
}

fn push_block<C>(acc: &mut Grid<Button<C>>, block: &[Vec<Button<C>>]) {
	let mut rows = block.iter();
	if let Some(first) = rows.next() {
		match acc.last_mut() {
			Some(current) => current.extend(first.iter().cloned()),
			None => acc.push(first.clone()),
		}
	}
	for row in rows {
		acc.push(row.clone());
	}
}

/// Per-button step applied after flattening.
#[async_trait]
pub trait ButtonTransform<C: MenuContext>: Send {
	type Output: Send;

	/// Transforms the button at (`row`, `col`) of a grid with `shape`.
	async fn apply(&mut self, ctx: &C, shape: &[usize], button: &Button<C>, row: usize, col: usize) -> Result<Self::Output>;
}

/// Flattens `range`, then runs `transform` over every button in order.
pub async fn render<C, T>(range: &Range<C>, ctx: &C, mut transform: T) -> Result<Grid<T::Output>>
where
	C: MenuContext,
	T: ButtonTransform<C>,
{
	let grid = flatten(range, ctx).await?;
	let dims = shape(&grid);
	let mut out = Vec::with_capacity(grid.len());
	for (row, buttons) in grid.iter().enumerate() {
		let mut rendered = Vec::with_capacity(buttons.len());
		for (col, button) in buttons.iter().enumerate() {
			rendered.push(transform.apply(ctx, &dims, button, row, col).await?);
		}
		out.push(rendered);
	}
	Ok(out)
}

/// Leaves declared buttons as they are ("dry" rendering).
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

#[async_trait]
impl<C: MenuContext> ButtonTransform<C> for Identity {
	type Output = Button<C>;

	async fn apply(&mut self, _ctx: &C, _shape: &[usize], button: &Button<C>, _row: usize, _col: usize) -> Result<Button<C>> {
		Ok(button.clone())
	}
}

/// Encodes buttons for the wire, minting a token for every callback button.
pub struct WireEncoder<'m, C> {
	menu_id: &'m str,
	fingerprint: Option<&'m Text<C>>,
}

impl<'m, C: MenuContext> WireEncoder<'m, C> {
	/// `fingerprint` is the owning menu's custom fingerprint, if any.
	pub fn new(menu_id: &'m str, fingerprint: Option<&'m Text<C>>) -> Self {
		Self { menu_id, fingerprint }
	}
}

#[async_trait]
impl<'m, C: MenuContext> ButtonTransform<C> for WireEncoder<'m, C> {
	type Output = InlineButton;

	async fn apply(&mut self, ctx: &C, shape: &[usize], button: &Button<C>, row: usize, col: usize) -> Result<InlineButton> {
		let text = button.label.resolve(ctx).await;
		let action = match &button.kind {
			ButtonKind::Url(url) => InlineAction::Url(url.clone()),
			ButtonKind::Login(login) => InlineAction::LoginUrl(login.clone()),
			ButtonKind::SwitchInline(query) => InlineAction::SwitchInlineQuery(query.clone()),
			ButtonKind::SwitchInlineCurrent(query) => InlineAction::SwitchInlineQueryCurrentChat(query.clone()),
			ButtonKind::WebApp(url) => InlineAction::WebApp(WebAppInfo { url: url.clone() }),
			ButtonKind::Game => InlineAction::CallbackGame(CallbackGame {}),
			ButtonKind::Pay => InlineAction::Pay(true),
			ButtonKind::Callback(callback) => {
				let payload = callback.resolve_payload(ctx).await;
				let tag = match custom_fingerprint(callback, self.fingerprint) {
					Some(source) => Tag::custom(&source.resolve(ctx).await),
					None => Tag::structural(shape, &text),
				};
				InlineAction::CallbackData(encode(self.menu_id, row, col, &payload, &tag)?)
			}
		};
		Ok(InlineButton { text, action })
	}
}

/// Button-level fingerprint first, then the menu's.
pub(crate) fn custom_fingerprint<'a, C>(callback: &'a CallbackButton<C>, menu: Option<&'a Text<C>>) -> Option<&'a Text<C>>
where
	C: MenuContext,
{
	callback.fingerprint_text().or(menu)
}

/// Recomputes the tag a callback button would carry today, following the
/// tag kind of an incoming token. `None` if that kind cannot be produced.
pub(crate) async fn expected_tag<C: MenuContext>(
	kind: TagKind,
	ctx: &C,
	shape: &[usize],
	button: &Button<C>,
	callback: &CallbackButton<C>,
	menu_fingerprint: Option<&Text<C>>,
) -> Option<Tag> {
	match kind {
		TagKind::Structural => Some(Tag::structural(shape, &button.label.resolve(ctx).await)),
		TagKind::Custom => {
			let source = custom_fingerprint(callback, menu_fingerprint)?;
			Some(Tag::custom(&source.resolve(ctx).await))
		}
	}
}
