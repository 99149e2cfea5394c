//! Rendered, transport-ready keyboard types.
//!
//! These serialize to the Bot API shape, e.g.
//! `{"inline_keyboard": [[{"text": "A", "callback_data": "root/0/0//h...."}]]}`.

use serde::Serialize;

/// Login URL button settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginUrl {
	pub url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub forward_text: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bot_username: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request_write_access: Option<bool>,
}

impl LoginUrl {
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			forward_text: None,
			bot_username: None,
			request_write_access: None,
		}
	}
}

/// Mini app launched by a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebAppInfo {
	pub url: String,
}

/// Placeholder object for game buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CallbackGame {}

/// What pressing a rendered button does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineAction {
	Url(String),
	LoginUrl(LoginUrl),
	CallbackData(String),
	SwitchInlineQuery(String),
	SwitchInlineQueryCurrentChat(String),
	WebApp(WebAppInfo),
	CallbackGame(CallbackGame),
	Pay(bool),
}

/// One rendered button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineButton {
	pub text: String,
	#[serde(flatten)]
	pub action: InlineAction,
}

impl InlineButton {
	/// Returns the callback token if this is a callback button.
	pub fn callback_data(&self) -> Option<&str> {
		match &self.action {
			InlineAction::CallbackData(data) => Some(data),
			_ => None,
		}
	}
}

/// Rendered grid attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboard {
	pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
	pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
		Self { inline_keyboard: rows }
	}

	pub fn rows(&self) -> &[Vec<InlineButton>] {
		&self.inline_keyboard
	}

	pub fn button(&self, row: usize, col: usize) -> Option<&InlineButton> {
		self.inline_keyboard.get(row)?.get(col)
	}

	/// Column count of every row.
	pub fn shape(&self) -> Vec<usize> {
		self.inline_keyboard.iter().map(Vec::len).collect()
	}
}
