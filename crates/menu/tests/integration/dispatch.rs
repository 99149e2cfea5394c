use std::sync::Arc;

use pretty_assertions::assert_eq;
use trellis_menu::trellis_wire::{WireError, decode, encode};
use trellis_menu::{
	CallbackButton, DEFAULT_OUTDATED_NOTICE, Dispatch, Flow, Handler, Menu, MenuControl, MenuError, MenuOptions, MenuTree, PreparedCall,
	Text,
};

use crate::common::{Ctx, Sent, click, data_at, record, sent_grid};

fn two_rows(second: &str) -> Arc<MenuTree<Ctx>> {
	let mut root = Menu::new("root").unwrap();
	root.text("A", record("a")).unwrap().row().text(second, record("b")).unwrap();
	root.freeze().unwrap()
}

#[tokio::test]
async fn click_runs_the_handler_at_its_position() {
	let tree = two_rows("B");
	let grid = sent_grid(&tree, "root").await;
	assert_eq!(grid.shape(), vec![1, 1]);

	let (dispatch, ctx) = click(&tree, &data_at(&grid, 0, 0)).await;
	assert_eq!(dispatch, Dispatch::Handled);
	assert_eq!(ctx.log, vec!["a"]);
	assert_eq!(ctx.transport.sent(), vec![Sent::Answer(None)]);

	let (dispatch, ctx) = click(&tree, &data_at(&grid, 1, 0)).await;
	assert_eq!(dispatch, Dispatch::Handled);
	assert_eq!(ctx.log, vec!["b"]);
}

#[tokio::test]
async fn forged_position_takes_the_outdated_path() {
	let tree = two_rows("B");
	let grid = sent_grid(&tree, "root").await;
	let original = data_at(&grid, 0, 0);
	let token = decode(&original).unwrap().unwrap();
	let forged = encode("root", 5, 0, "", &token.tag).unwrap();

	let (dispatch, ctx) = click(&tree, &forged).await;
	assert_eq!(dispatch, Dispatch::Outdated);
	assert!(ctx.log.is_empty());
	assert_eq!(
		ctx.transport.sent(),
		vec![
			Sent::Answer(Some(DEFAULT_OUTDATED_NOTICE.to_owned())),
			Sent::Call(PreparedCall::edit_reply_markup(grid)),
		]
	);
}

#[tokio::test]
async fn removed_button_is_outdated() {
	let before = two_rows("B");
	let stale = data_at(&sent_grid(&before, "root").await, 1, 0);

	let mut root = Menu::new("root").unwrap();
	root.text("A", record("a")).unwrap();
	let after = root.freeze().unwrap();

	let (dispatch, ctx) = click(&after, &stale).await;
	assert_eq!(dispatch, Dispatch::Outdated);
	assert!(ctx.log.is_empty());
	assert_eq!(ctx.transport.calls(), vec![PreparedCall::edit_reply_markup(sent_grid(&after, "root").await)]);
}

#[tokio::test]
async fn label_change_is_outdated() {
	let stale = data_at(&sent_grid(&two_rows("B"), "root").await, 1, 0);
	let (dispatch, ctx) = click(&two_rows("B (new)"), &stale).await;
	assert_eq!(dispatch, Dispatch::Outdated);
	assert!(ctx.log.is_empty());
}

#[tokio::test]
async fn shape_change_invalidates_every_button() {
	let stale = data_at(&sent_grid(&two_rows("B"), "root").await, 0, 0);

	let mut root = Menu::new("root").unwrap();
	root.text("A", record("a")).unwrap().row().text("B", record("b")).unwrap().text("C", record("c")).unwrap();
	let (dispatch, _) = click(&root.freeze().unwrap(), &stale).await;
	assert_eq!(dispatch, Dispatch::Outdated);
}

fn counter(fingerprint: &'static str) -> Arc<MenuTree<Ctx>> {
	let options = MenuOptions {
		fingerprint: Some(fingerprint.into()),
		..MenuOptions::default()
	};
	let mut root = Menu::with_options("counter", options).unwrap();
	root.text(Text::from_fn(|ctx: &Ctx| format!("Items: {}", ctx.items.len())), record("count")).unwrap();
	root.freeze().unwrap()
}

#[tokio::test]
async fn custom_fingerprint_ignores_label_drift() {
	let tree = counter("v1");
	let stale = data_at(&sent_grid(&tree, "counter").await, 0, 0);

	let mut ctx = Ctx::clicking(&stale);
	ctx.items = vec!["apple".into(), "pear".into()];
	assert_eq!(tree.handle(&mut ctx).await.unwrap(), Dispatch::Handled);
	assert_eq!(ctx.log, vec!["count"]);
}

#[tokio::test]
async fn custom_fingerprint_change_is_outdated() {
	let stale = data_at(&sent_grid(&counter("v1"), "counter").await, 0, 0);
	let (dispatch, _) = click(&counter("v2"), &stale).await;
	assert_eq!(dispatch, Dispatch::Outdated);
}

#[tokio::test]
async fn fingerprint_token_without_fingerprint_source_is_outdated() {
	let stale = data_at(&sent_grid(&counter("v1"), "counter").await, 0, 0);

	let mut root = Menu::new("counter").unwrap();
	root.text("Items: 0", record("count")).unwrap();
	let (dispatch, _) = click(&root.freeze().unwrap(), &stale).await;
	assert_eq!(dispatch, Dispatch::Outdated);
}

fn greeting() -> Arc<MenuTree<Ctx>> {
	let mut root = Menu::new("root").unwrap();
	root.callback(
		"Greet",
		CallbackButton::new().payload(Text::from_fn(|ctx: &Ctx| ctx.user.clone())).handler(Handler::from_fn(|ctx: &mut Ctx| {
			let payload = MenuControl::<Ctx>::current(ctx)?.payload().to_owned();
			ctx.log.push(format!("hello {payload}"));
			Ok(Flow::Continue)
		})),
	)
	.unwrap();
	root.freeze().unwrap()
}

#[tokio::test]
async fn payload_reaches_the_handler() {
	let tree = greeting();
	let data = data_at(&sent_grid(&tree, "root").await, 0, 0);
	let (dispatch, ctx) = click(&tree, &data).await;
	assert_eq!(dispatch, Dispatch::Handled);
	assert_eq!(ctx.log, vec!["hello alice"]);
	assert!(ctx.attachments.get::<MenuControl<Ctx>>().is_none());
}

#[tokio::test]
async fn payload_mismatch_is_outdated() {
	let tree = greeting();
	let data = data_at(&sent_grid(&tree, "root").await, 0, 0);

	let mut ctx = Ctx::clicking(&data);
	ctx.user = "bob".into();
	assert_eq!(tree.handle(&mut ctx).await.unwrap(), Dispatch::Outdated);
	assert!(ctx.log.is_empty());
}

#[tokio::test]
async fn foreign_and_unknown_data_is_ignored() {
	let tree = two_rows("B");
	let data = data_at(&sent_grid(&tree, "root").await, 0, 0);
	let elsewhere = data.replacen("root", "other", 1);

	for foreign in [
		"like",
		"a/b",
		"root/0/0//zzzzz",
		"user/profile/settings/x/hello",
		"shop/item/zz/1/h1234",
		elsewhere.as_str(),
	] {
		let (dispatch, ctx) = click(&tree, foreign).await;
		assert_eq!(dispatch, Dispatch::Ignored, "{foreign}");
		assert!(ctx.transport.sent().is_empty());
	}
}

#[tokio::test]
async fn negative_coordinates_are_an_error() {
	let tree = two_rows("B");
	let data = data_at(&sent_grid(&tree, "root").await, 0, 0).replacen("/0/", "/-1/", 1);
	let mut ctx = Ctx::clicking(&data);
	let err = tree.handle(&mut ctx).await.unwrap_err();
	assert!(matches!(err, MenuError::Wire(WireError::InvalidCoordinate { field: "row", .. })));
}

#[tokio::test]
async fn auto_answer_can_be_turned_off() {
	let options = MenuOptions {
		auto_answer: false,
		..MenuOptions::default()
	};
	let mut root = Menu::with_options("root", options).unwrap();
	root.text("A", record("a")).unwrap();
	let tree = root.freeze().unwrap();

	let (dispatch, ctx) = click(&tree, &data_at(&sent_grid(&tree, "root").await, 0, 0)).await;
	assert_eq!(dispatch, Dispatch::Handled);
	assert!(ctx.transport.sent().is_empty());
}

#[tokio::test]
async fn handler_chain_stops_and_errors_propagate() {
	let mut root = Menu::new("root").unwrap();
	root.callback(
		"Stop",
		CallbackButton::new()
			.handler(record("first"))
			.handler(Handler::from_fn(|_: &mut Ctx| Ok(Flow::Stop)))
			.handler(record("never")),
	)
	.unwrap()
	.text("Fail", Handler::from_fn(|_: &mut Ctx| Err(anyhow::anyhow!("storage offline"))))
	.unwrap();
	let tree = root.freeze().unwrap();
	let grid = sent_grid(&tree, "root").await;

	let (_, ctx) = click(&tree, &data_at(&grid, 0, 0)).await;
	assert_eq!(ctx.log, vec!["first"]);

	let mut ctx = Ctx::clicking(&data_at(&grid, 0, 1));
	let err = tree.handle(&mut ctx).await.unwrap_err();
	assert_eq!(err.to_string(), "menu handler failed: storage offline");
	assert!(ctx.attachments.get::<MenuControl<Ctx>>().is_none());
}

#[tokio::test]
async fn dynamic_buttons_are_verified_against_the_current_items() {
	let mut root = Menu::new("list").unwrap();
	root.dynamic_sync(|ctx: &Ctx, range| {
		for item in &ctx.items {
			range.callback(item.as_str(), CallbackButton::new().payload(item.as_str()).handler(record("picked")))?.row();
		}
		Ok(())
	});
	let tree = root.freeze().unwrap();

	let mut render_ctx = Ctx::new();
	render_ctx.items = vec!["apple".into(), "pear".into()];
	let grid = tree.render("list", &render_ctx).await.unwrap();
	let pear = data_at(&grid, 1, 0);

	let mut ctx = Ctx::clicking(&pear);
	ctx.items = render_ctx.items.clone();
	assert_eq!(tree.handle(&mut ctx).await.unwrap(), Dispatch::Handled);
	assert_eq!(ctx.log, vec!["picked"]);

	let mut ctx = Ctx::clicking(&pear);
	ctx.items = vec!["apple".into(), "plum".into()];
	assert_eq!(tree.handle(&mut ctx).await.unwrap(), Dispatch::Outdated);
}
