//! Common utilities for menu integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use trellis_menu::{
	Attachments, Dispatch, Flow, Handler, InlineKeyboard, MenuContext, MenuTree, PreparedCall, Transport,
};

/// Everything the host was asked to send, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
	Call(PreparedCall),
	Answer(Option<String>),
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
	log: Arc<Mutex<Vec<Sent>>>,
	reject_answers: bool,
}

impl Recorder {
	/// Transport whose callback answers always fail.
	pub fn rejecting_answers() -> Self {
		Self {
			reject_answers: true,
			..Self::default()
		}
	}

	pub fn sent(&self) -> Vec<Sent> {
		self.log.lock().clone()
	}

	pub fn answers(&self) -> Vec<Option<String>> {
		self.sent()
			.into_iter()
			.filter_map(|sent| match sent {
				Sent::Answer(text) => Some(text),
				Sent::Call(_) => None,
			})
			.collect()
	}

	pub fn calls(&self) -> Vec<PreparedCall> {
		self.sent()
			.into_iter()
			.filter_map(|sent| match sent {
				Sent::Call(call) => Some(call),
				Sent::Answer(_) => None,
			})
			.collect()
	}
}

#[async_trait]
impl Transport for Recorder {
	async fn execute(&self, call: PreparedCall) -> anyhow::Result<()> {
		self.log.lock().push(Sent::Call(call));
		Ok(())
	}

	async fn answer_callback_query(&self, text: Option<String>) -> anyhow::Result<()> {
		if self.reject_answers {
			anyhow::bail!("query is too old");
		}
		self.log.lock().push(Sent::Answer(text));
		Ok(())
	}
}

/// Bot-side context for one update.
#[derive(Debug, Default)]
pub struct Ctx {
	pub data: Option<String>,
	pub user: String,
	pub items: Vec<String>,
	pub log: Vec<String>,
	pub attachments: Attachments,
	pub transport: Recorder,
}

impl Ctx {
	pub fn new() -> Self {
		let _ = tracing_subscriber::fmt().with_test_writer().try_init();
		Self {
			user: "alice".into(),
			..Self::default()
		}
	}

	pub fn clicking(data: &str) -> Self {
		Self {
			data: Some(data.to_owned()),
			..Self::new()
		}
	}
}

impl MenuContext for Ctx {
	fn callback_data(&self) -> Option<&str> {
		self.data.as_deref()
	}

	fn attachments(&self) -> &Attachments {
		&self.attachments
	}

	fn attachments_mut(&mut self) -> &mut Attachments {
		&mut self.attachments
	}

	fn transport(&self) -> &dyn Transport {
		&self.transport
	}
}

/// Handler that appends `entry` to the context log.
pub fn record(entry: &'static str) -> Handler<Ctx> {
	Handler::from_fn(move |ctx: &mut Ctx| {
		ctx.log.push(entry.to_owned());
		Ok(Flow::Continue)
	})
}

/// Renders `menu` for a fresh context, as if it was just sent.
pub async fn sent_grid(tree: &Arc<MenuTree<Ctx>>, menu: &str) -> InlineKeyboard {
	tree.render(menu, &Ctx::new()).await.unwrap()
}

/// Callback data of the button at (`row`, `col`).
pub fn data_at(keyboard: &InlineKeyboard, row: usize, col: usize) -> String {
	keyboard.button(row, col).and_then(|b| b.callback_data()).unwrap().to_owned()
}

/// Delivers a click on `data` and returns the outcome with the context.
pub async fn click(tree: &Arc<MenuTree<Ctx>>, data: &str) -> (Dispatch, Ctx) {
	let mut ctx = Ctx::clicking(data);
	let dispatch = tree.handle(&mut ctx).await.unwrap();
	(dispatch, ctx)
}
