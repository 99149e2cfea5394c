use std::sync::Arc;

use pretty_assertions::assert_eq;
use trellis_menu::{
	Dispatch, Flow, Handler, InlineKeyboard, Menu, MenuConfig, MenuControl, MenuOptions, MenuTree, OutdatedPolicy, PreparedCall,
};

use crate::common::{Ctx, Recorder, Sent, click, data_at, record, sent_grid};

fn with_policy(on_outdated: OutdatedPolicy<Ctx>, label: &str, extra_row: bool) -> Arc<MenuTree<Ctx>> {
	let options = MenuOptions {
		on_outdated,
		..MenuOptions::default()
	};
	let mut root = Menu::with_options("root", options).unwrap();
	root.text(label, record("a")).unwrap();
	if extra_row {
		root.row().url("Docs", "https://example.org").text("Help", record("help")).unwrap();
	}
	root.freeze().unwrap()
}

#[tokio::test]
async fn disabled_checks_trust_coordinates() {
	let stale = data_at(&sent_grid(&with_policy(OutdatedPolicy::Disabled, "A", false), "root").await, 0, 0);
	let drifted = with_policy(OutdatedPolicy::Disabled, "Renamed", true);

	let (dispatch, ctx) = click(&drifted, &stale).await;
	assert_eq!(dispatch, Dispatch::Handled);
	assert_eq!(ctx.log, vec!["a"]);
}

#[tokio::test]
async fn disabled_checks_ignore_unmatched_positions() {
	let tree = with_policy(OutdatedPolicy::Disabled, "A", true);
	let grid = sent_grid(&tree, "root").await;
	let help = data_at(&grid, 1, 1);

	let out_of_range = help.replacen("/1/1/", "/7/0/", 1);
	let (dispatch, ctx) = click(&tree, &out_of_range).await;
	assert_eq!(dispatch, Dispatch::Ignored);
	assert!(ctx.transport.sent().is_empty());

	let on_url = help.replacen("/1/1/", "/1/0/", 1);
	let (dispatch, _) = click(&tree, &on_url).await;
	assert_eq!(dispatch, Dispatch::Ignored);
}

#[tokio::test]
async fn non_callback_button_at_position_is_outdated() {
	let stale = data_at(&sent_grid(&with_policy(OutdatedPolicy::default(), "A", true), "root").await, 1, 1);
	let forged = stale.replacen("/1/1/", "/1/0/", 1);
	let (dispatch, _) = click(&with_policy(OutdatedPolicy::default(), "A", true), &forged).await;
	assert_eq!(dispatch, Dispatch::Outdated);
}

#[tokio::test]
async fn custom_policy_runs_instead_of_the_notice() {
	let recover = Handler::new(|ctx: &mut Ctx| {
		Box::pin(async move {
			ctx.log.push("recovering".to_owned());
			MenuControl::<Ctx>::current(ctx)?.close(ctx, false).await?;
			Ok(Flow::Continue)
		})
	});
	let stale = data_at(&sent_grid(&with_policy(OutdatedPolicy::default(), "A", false), "root").await, 0, 0);
	let tree = with_policy(OutdatedPolicy::Custom(vec![recover]), "B", false);

	let (dispatch, ctx) = click(&tree, &stale).await;
	assert_eq!(dispatch, Dispatch::Outdated);
	assert_eq!(ctx.log, vec!["recovering"]);
	assert_eq!(
		ctx.transport.sent(),
		vec![
			Sent::Answer(None),
			Sent::Call(PreparedCall::edit_reply_markup(InlineKeyboard::default())),
		]
	);
}

#[tokio::test]
async fn configured_notice_is_shown() {
	let config = MenuConfig::from_toml("outdated = \"Please try again\"").unwrap();
	let stale = data_at(&sent_grid(&with_policy(OutdatedPolicy::default(), "A", false), "root").await, 0, 0);
	let tree = with_policy(config.into_options::<Ctx>().on_outdated, "B", false);

	let (dispatch, ctx) = click(&tree, &stale).await;
	assert_eq!(dispatch, Dispatch::Outdated);
	assert_eq!(ctx.transport.answers(), vec![Some("Please try again".to_owned())]);
}

#[tokio::test]
async fn failed_notice_still_rewrites_the_grid() {
	let stale = data_at(&sent_grid(&with_policy(OutdatedPolicy::default(), "A", false), "root").await, 0, 0);
	let tree = with_policy(OutdatedPolicy::default(), "B", false);

	let mut ctx = Ctx::clicking(&stale);
	ctx.transport = Recorder::rejecting_answers();
	assert_eq!(tree.handle(&mut ctx).await.unwrap(), Dispatch::Outdated);
	assert_eq!(ctx.transport.calls(), vec![PreparedCall::edit_reply_markup(sent_grid(&tree, "root").await)]);
}
